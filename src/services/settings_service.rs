use crate::entities::setting_entity as settings;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// A key some part of the portal reads, with the value used while it is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingKey {
    pub key: &'static str,
    pub default: &'static str,
}

impl SettingKey {
    pub const fn new(key: &'static str, default: &'static str) -> Self {
        Self { key, default }
    }

    fn read<'a>(&self, values: &'a HashMap<String, String>) -> &'a str {
        values
            .get(self.key)
            .map(String::as_str)
            .unwrap_or(self.default)
    }
}

/// Typed view over a set of keys in the flat settings table.
pub trait SettingsGroup: Sized {
    const KEYS: &'static [SettingKey];

    /// Build the group from stored rows; keys missing from `values` fall back to their default.
    fn from_values(values: &HashMap<String, String>) -> Self;

    fn defaults() -> Self {
        Self::from_values(&HashMap::new())
    }
}

pub const RUNNING_TEXT_TEXT: SettingKey = SettingKey::new("runningText_text", "");
pub const RUNNING_TEXT_SPEED: SettingKey = SettingKey::new("runningText_speed", "30");
pub const RUNNING_TEXT_IS_ACTIVE: SettingKey = SettingKey::new("runningText_isActive", "true");
pub const QRIS_IMAGE: SettingKey = SettingKey::new("qris_image", "");
pub const BANK_ACCOUNT: SettingKey = SettingKey::new("bank_account", "");
pub const ZAKAT_GOLD_PRICE: SettingKey = SettingKey::new("zakat_goldPricePerGram", "1500000");
pub const ZAKAT_RICE_PRICE: SettingKey = SettingKey::new("zakat_ricePricePerKg", "15000");

/// Home page marquee.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunningTextSettings {
    pub text: String,
    /// Seconds for one full scroll
    pub speed: u32,
    pub is_active: bool,
}

impl RunningTextSettings {
    pub fn is_visible(&self) -> bool {
        self.is_active && !self.text.trim().is_empty()
    }
}

impl SettingsGroup for RunningTextSettings {
    const KEYS: &'static [SettingKey] =
        &[RUNNING_TEXT_TEXT, RUNNING_TEXT_SPEED, RUNNING_TEXT_IS_ACTIVE];

    fn from_values(values: &HashMap<String, String>) -> Self {
        let speed = RUNNING_TEXT_SPEED
            .read(values)
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(30);
        Self {
            text: RUNNING_TEXT_TEXT.read(values).to_string(),
            speed,
            // only an explicit "false" switches the banner off
            is_active: RUNNING_TEXT_IS_ACTIVE.read(values).trim() != "false",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaymentSettings {
    pub qris_image: Option<String>,
    pub bank_account: Option<String>,
}

impl SettingsGroup for PaymentSettings {
    const KEYS: &'static [SettingKey] = &[QRIS_IMAGE, BANK_ACCOUNT];

    fn from_values(values: &HashMap<String, String>) -> Self {
        let non_empty = |key: &SettingKey| {
            let v = key.read(values).trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        Self {
            qris_image: non_empty(&QRIS_IMAGE),
            bank_account: non_empty(&BANK_ACCOUNT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ZakatSettings {
    pub gold_price_per_gram: f64,
    pub rice_price_per_kg: f64,
}

impl SettingsGroup for ZakatSettings {
    const KEYS: &'static [SettingKey] = &[ZAKAT_GOLD_PRICE, ZAKAT_RICE_PRICE];

    fn from_values(values: &HashMap<String, String>) -> Self {
        let price = |key: &SettingKey, fallback: f64| {
            key.read(values)
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p > 0.0)
                .unwrap_or(fallback)
        };
        Self {
            gold_price_per_gram: price(&ZAKAT_GOLD_PRICE, 1_500_000.0),
            rice_price_per_kg: price(&ZAKAT_RICE_PRICE, 15_000.0),
        }
    }
}

/// Every declared key, used by the seed script and the admin settings form.
pub fn declared_keys() -> Vec<SettingKey> {
    RunningTextSettings::KEYS
        .iter()
        .chain(PaymentSettings::KEYS)
        .chain(ZakatSettings::KEYS)
        .copied()
        .collect()
}

#[derive(Clone)]
pub struct SettingsService {
    pool: DatabaseConnection,
}

impl SettingsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn load<G: SettingsGroup>(&self) -> AppResult<G> {
        let keys: Vec<&str> = G::KEYS.iter().map(|k| k.key).collect();
        let rows = settings::Entity::find()
            .filter(settings::Column::Key.is_in(keys))
            .all(&self.pool)
            .await?;
        let values: HashMap<String, String> = rows.into_iter().map(|r| (r.key, r.value)).collect();
        Ok(G::from_values(&values))
    }

    pub async fn list_all(&self) -> AppResult<Vec<SettingResponse>> {
        let rows = settings::Entity::find()
            .order_by_asc(settings::Column::Key)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(SettingResponse::from).collect())
    }

    /// Insert or overwrite. Keys outside the declared groups are accepted.
    pub async fn upsert(&self, request: UpsertSettingRequest) -> AppResult<SettingResponse> {
        let key = request.key.trim();
        if key.is_empty() || key.len() > 100 {
            return Err(AppError::ValidationError(
                "Setting key must be 1-100 characters".to_string(),
            ));
        }

        let now = Utc::now();
        let model = settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(request.value.clone()),
            updated_at: Set(now),
        };
        settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await?;

        log::info!("Setting {key} updated");
        Ok(SettingResponse {
            key: key.to_string(),
            value: request.value,
            updated_at: now,
        })
    }

    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let res = settings::Entity::delete_by_id(key.to_string())
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Setting {key} not found")));
        }
        Ok(())
    }

    /// Writes defaults for declared keys that have no row yet. Returns how many were added.
    pub async fn seed_defaults(&self) -> AppResult<usize> {
        let existing: Vec<String> = settings::Entity::find()
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|m| m.key)
            .collect();

        let mut added = 0;
        for key in declared_keys() {
            if existing.iter().any(|k| k == key.key) {
                continue;
            }
            self.upsert(UpsertSettingRequest {
                key: key.key.to_string(),
                value: key.default.to_string(),
            })
            .await?;
            added += 1;
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_running_text_defaults() {
        let banner = RunningTextSettings::defaults();
        assert_eq!(banner.text, "");
        assert_eq!(banner.speed, 30);
        assert!(banner.is_active);
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_running_text_only_false_disables() {
        let banner = RunningTextSettings::from_values(&values(&[
            ("runningText_text", "Kajian malam ini"),
            ("runningText_isActive", "false"),
        ]));
        assert!(!banner.is_active);
        assert!(!banner.is_visible());

        let banner = RunningTextSettings::from_values(&values(&[
            ("runningText_text", "Kajian malam ini"),
            ("runningText_isActive", "yes"),
            ("runningText_speed", "abc"),
        ]));
        assert!(banner.is_visible());
        assert_eq!(banner.speed, 30);
    }

    #[test]
    fn test_zakat_prices_fall_back_on_garbage() {
        let s = ZakatSettings::from_values(&values(&[
            ("zakat_goldPricePerGram", "-3"),
            ("zakat_ricePricePerKg", "16000"),
        ]));
        assert_eq!(s.gold_price_per_gram, 1_500_000.0);
        assert_eq!(s.rice_price_per_kg, 16_000.0);
    }

    #[test]
    fn test_declared_keys_are_unique() {
        let keys = declared_keys();
        assert_eq!(keys.len(), 7);
        for (i, k) in keys.iter().enumerate() {
            assert!(keys[i + 1..].iter().all(|o| o.key != k.key));
        }
    }

    #[actix_web::test]
    async fn test_load_group_from_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![settings::Model {
                key: "qris_image".to_string(),
                value: "/uploads/qris.png".to_string(),
                updated_at: Utc::now(),
            }]])
            .into_connection();
        let service = SettingsService::new(db);

        let payment: PaymentSettings = service.load().await.unwrap();
        assert_eq!(payment.qris_image.as_deref(), Some("/uploads/qris.png"));
        assert_eq!(payment.bank_account, None);
    }

    #[actix_web::test]
    async fn test_upsert_rejects_blank_key() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = SettingsService::new(db);
        let result = service
            .upsert(UpsertSettingRequest {
                key: "  ".to_string(),
                value: "x".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
