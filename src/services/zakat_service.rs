use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::settings_service::{SettingsService, ZakatSettings};

pub const ZAKAT_RATE_PERCENT: f64 = 2.5;
/// Nisab for wealth and gold, in grams of gold.
pub const GOLD_NISAB_GRAMS: f64 = 85.0;
/// Zakat al-fitr per person, in kilograms of rice.
pub const FITRAH_RICE_KG: f64 = 2.5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_non_negative(fields: &[(&str, f64)]) -> AppResult<()> {
    for (name, value) in fields {
        if !value.is_finite() || *value < 0.0 {
            return Err(AppError::ValidationError(format!(
                "{name} must be zero or a positive number"
            )));
        }
    }
    Ok(())
}

fn price_or(override_price: Option<f64>, configured: f64, name: &str) -> AppResult<f64> {
    match override_price {
        Some(p) if !p.is_finite() || p <= 0.0 => Err(AppError::ValidationError(format!(
            "{name} must be greater than zero"
        ))),
        Some(p) => Ok(p),
        None => Ok(configured),
    }
}

/// Pure calculation; `prices` comes from the zakat settings group unless the request overrides it.
pub fn calculate_zakat(request: &ZakatRequest, prices: &ZakatSettings) -> AppResult<ZakatResult> {
    ensure_non_negative(&[
        ("cash", request.cash),
        ("investments", request.investments),
        ("receivables", request.receivables),
        ("gold_value", request.gold_value),
        ("debts", request.debts),
        ("monthly_income", request.monthly_income),
        ("other_income", request.other_income),
        ("monthly_expenses", request.monthly_expenses),
        ("gold_grams", request.gold_grams),
    ])?;
    let gold_price = price_or(
        request.gold_price_per_gram,
        prices.gold_price_per_gram,
        "gold_price_per_gram",
    )?;
    let yearly_nisab = GOLD_NISAB_GRAMS * gold_price;

    let result = match request.kind {
        ZakatKind::Maal => {
            let wealth = (request.cash + request.investments + request.receivables
                + request.gold_value
                - request.debts)
                .max(0.0);
            let is_obligatory = wealth >= yearly_nisab;
            ZakatResult {
                kind: request.kind,
                base_amount: round2(wealth),
                nisab: round2(yearly_nisab),
                is_obligatory,
                rate_percent: ZAKAT_RATE_PERCENT,
                zakat_due: if is_obligatory {
                    round2(wealth * ZAKAT_RATE_PERCENT / 100.0)
                } else {
                    0.0
                },
            }
        }
        ZakatKind::Income => {
            let net = (request.monthly_income + request.other_income - request.monthly_expenses)
                .max(0.0);
            let monthly_nisab = yearly_nisab / 12.0;
            let is_obligatory = net > 0.0 && net >= monthly_nisab;
            ZakatResult {
                kind: request.kind,
                base_amount: round2(net),
                nisab: round2(monthly_nisab),
                is_obligatory,
                rate_percent: ZAKAT_RATE_PERCENT,
                zakat_due: if is_obligatory {
                    round2(net * ZAKAT_RATE_PERCENT / 100.0)
                } else {
                    0.0
                },
            }
        }
        ZakatKind::Gold => {
            let value = request.gold_grams * gold_price;
            let is_obligatory = request.gold_grams >= GOLD_NISAB_GRAMS;
            ZakatResult {
                kind: request.kind,
                base_amount: round2(value),
                nisab: round2(yearly_nisab),
                is_obligatory,
                rate_percent: ZAKAT_RATE_PERCENT,
                zakat_due: if is_obligatory {
                    round2(value * ZAKAT_RATE_PERCENT / 100.0)
                } else {
                    0.0
                },
            }
        }
        ZakatKind::Fitrah => {
            let people = request.people.unwrap_or(1);
            if people == 0 {
                return Err(AppError::ValidationError(
                    "people must be at least 1".to_string(),
                ));
            }
            let rice_price = price_or(
                request.rice_price_per_kg,
                prices.rice_price_per_kg,
                "rice_price_per_kg",
            )?;
            let due = f64::from(people) * FITRAH_RICE_KG * rice_price;
            // fitrah is a fixed amount per head, not a share of wealth
            ZakatResult {
                kind: request.kind,
                base_amount: round2(due),
                nisab: 0.0,
                is_obligatory: true,
                rate_percent: 100.0,
                zakat_due: round2(due),
            }
        }
    };

    Ok(result)
}

#[derive(Clone)]
pub struct ZakatService {
    settings: SettingsService,
}

impl ZakatService {
    pub fn new(settings: SettingsService) -> Self {
        Self { settings }
    }

    pub async fn prices(&self) -> AppResult<ZakatSettings> {
        self.settings.load().await
    }

    pub async fn calculate(&self, request: &ZakatRequest) -> AppResult<ZakatResult> {
        let prices = self.prices().await?;
        calculate_zakat(request, &prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> ZakatSettings {
        ZakatSettings {
            gold_price_per_gram: 1_000_000.0,
            rice_price_per_kg: 15_000.0,
        }
    }

    #[test]
    fn test_maal_below_and_above_nisab() {
        // nisab = 85 * 1_000_000 = 85_000_000
        let mut req = ZakatRequest::empty(ZakatKind::Maal);
        req.cash = 80_000_000.0;
        req.receivables = 10_000_000.0;
        req.debts = 6_000_000.0;
        let r = calculate_zakat(&req, &prices()).unwrap();
        assert_eq!(r.base_amount, 84_000_000.0);
        assert!(!r.is_obligatory);
        assert_eq!(r.zakat_due, 0.0);

        req.debts = 5_000_000.0;
        let r = calculate_zakat(&req, &prices()).unwrap();
        assert!(r.is_obligatory);
        assert_eq!(r.zakat_due, 2_125_000.0);
    }

    #[test]
    fn test_debts_larger_than_wealth_floor_at_zero() {
        let mut req = ZakatRequest::empty(ZakatKind::Maal);
        req.cash = 1_000.0;
        req.debts = 5_000.0;
        let r = calculate_zakat(&req, &prices()).unwrap();
        assert_eq!(r.base_amount, 0.0);
        assert!(!r.is_obligatory);
    }

    #[test]
    fn test_income_uses_monthly_nisab() {
        let mut req = ZakatRequest::empty(ZakatKind::Income);
        req.monthly_income = 10_000_000.0;
        req.monthly_expenses = 2_000_000.0;
        let r = calculate_zakat(&req, &prices()).unwrap();
        assert_eq!(r.nisab, 7_083_333.33);
        assert!(r.is_obligatory);
        assert_eq!(r.zakat_due, 200_000.0);
    }

    #[test]
    fn test_gold_threshold_is_by_weight() {
        let mut req = ZakatRequest::empty(ZakatKind::Gold);
        req.gold_grams = 84.9;
        assert!(!calculate_zakat(&req, &prices()).unwrap().is_obligatory);
        req.gold_grams = 100.0;
        let r = calculate_zakat(&req, &prices()).unwrap();
        assert!(r.is_obligatory);
        assert_eq!(r.zakat_due, 2_500_000.0);
    }

    #[test]
    fn test_fitrah_per_person() {
        let mut req = ZakatRequest::empty(ZakatKind::Fitrah);
        req.people = Some(4);
        let r = calculate_zakat(&req, &prices()).unwrap();
        assert_eq!(r.zakat_due, 150_000.0);
        assert!(r.is_obligatory);

        req.rice_price_per_kg = Some(20_000.0);
        assert_eq!(calculate_zakat(&req, &prices()).unwrap().zakat_due, 200_000.0);

        req.people = Some(0);
        assert!(calculate_zakat(&req, &prices()).is_err());
    }

    #[test]
    fn test_negative_input_rejected() {
        let mut req = ZakatRequest::empty(ZakatKind::Maal);
        req.cash = -1.0;
        assert!(matches!(
            calculate_zakat(&req, &prices()),
            Err(AppError::ValidationError(_))
        ));
    }
}
