use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ZakatKind {
    /// Zakat on stored wealth (savings, investments, receivables)
    Maal,
    /// Monthly zakat on professional income
    Income,
    /// Zakat on gold holdings by weight
    Gold,
    /// Zakat al-fitr paid per person in rice equivalent
    Fitrah,
}

impl ZakatKind {
    pub const ALL: [ZakatKind; 4] = [
        ZakatKind::Maal,
        ZakatKind::Income,
        ZakatKind::Gold,
        ZakatKind::Fitrah,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZakatKind::Maal => "maal",
            ZakatKind::Income => "income",
            ZakatKind::Gold => "gold",
            ZakatKind::Fitrah => "fitrah",
        }
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == raw.trim())
            .ok_or_else(|| AppError::ValidationError(format!("Unknown zakat type: {raw}")))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZakatKind::Maal => "Zakat Maal",
            ZakatKind::Income => "Zakat Penghasilan",
            ZakatKind::Gold => "Zakat Emas",
            ZakatKind::Fitrah => "Zakat Fitrah",
        }
    }
}

/// Calculator input. Fields not used by `kind` are ignored; missing numbers count as zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZakatRequest {
    pub kind: ZakatKind,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub investments: f64,
    #[serde(default)]
    pub receivables: f64,
    #[serde(default)]
    pub gold_value: f64,
    #[serde(default)]
    pub debts: f64,
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub other_income: f64,
    #[serde(default)]
    pub monthly_expenses: f64,
    #[serde(default)]
    pub gold_grams: f64,
    pub people: Option<u32>,
    /// Overrides the configured rice price for fitrah
    pub rice_price_per_kg: Option<f64>,
    /// Overrides the configured gold price
    pub gold_price_per_gram: Option<f64>,
}

impl ZakatRequest {
    pub fn empty(kind: ZakatKind) -> Self {
        Self {
            kind,
            cash: 0.0,
            investments: 0.0,
            receivables: 0.0,
            gold_value: 0.0,
            debts: 0.0,
            monthly_income: 0.0,
            other_income: 0.0,
            monthly_expenses: 0.0,
            gold_grams: 0.0,
            people: None,
            rice_price_per_kg: None,
            gold_price_per_gram: None,
        }
    }

    /// Builds a request from the calculator form (`type="number"` inputs), where blank means zero.
    pub fn from_form(fields: &HashMap<String, String>) -> AppResult<Self> {
        let kind = ZakatKind::parse(fields.get("kind").map(String::as_str).unwrap_or("maal"))?;
        let number = |name: &str| -> AppResult<Option<f64>> {
            match fields.get(name).map(|v| v.trim().replace(',', ".")) {
                None => Ok(None),
                Some(v) if v.is_empty() => Ok(None),
                Some(v) => v.parse::<f64>().map(Some).map_err(|_| {
                    AppError::ValidationError(format!("{name} must be a number"))
                }),
            }
        };
        let amount = |name: &str| number(name).map(|v| v.unwrap_or(0.0));

        let people = match number("people")? {
            None => None,
            Some(p) if p >= 0.0 && p.fract() == 0.0 && p <= f64::from(u32::MAX) => Some(p as u32),
            Some(_) => {
                return Err(AppError::ValidationError(
                    "people must be a whole number".to_string(),
                ));
            }
        };

        Ok(Self {
            kind,
            cash: amount("cash")?,
            investments: amount("investments")?,
            receivables: amount("receivables")?,
            gold_value: amount("gold_value")?,
            debts: amount("debts")?,
            monthly_income: amount("monthly_income")?,
            other_income: amount("other_income")?,
            monthly_expenses: amount("monthly_expenses")?,
            gold_grams: amount("gold_grams")?,
            people,
            rice_price_per_kg: number("rice_price_per_kg")?,
            gold_price_per_gram: number("gold_price_per_gram")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ZakatResult {
    pub kind: ZakatKind,
    /// Amount the rate is applied to (net wealth, net income, gold value, or fitrah base)
    pub base_amount: f64,
    pub nisab: f64,
    pub is_obligatory: bool,
    pub rate_percent: f64,
    pub zakat_due: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_form_blank_means_zero() {
        let req = ZakatRequest::from_form(&form(&[
            ("kind", "gold"),
            ("gold_grams", "85.5"),
            ("cash", ""),
            ("gold_price_per_gram", ""),
        ]))
        .unwrap();
        assert_eq!(req.kind, ZakatKind::Gold);
        assert_eq!(req.gold_grams, 85.5);
        assert_eq!(req.cash, 0.0);
        assert_eq!(req.gold_price_per_gram, None);
    }

    #[test]
    fn test_from_form_rejects_bad_values() {
        assert!(ZakatRequest::from_form(&form(&[("kind", "emas")])).is_err());
        assert!(ZakatRequest::from_form(&form(&[("kind", "maal"), ("cash", "abc")])).is_err());
        assert!(ZakatRequest::from_form(&form(&[("kind", "fitrah"), ("people", "2.5")])).is_err());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ZakatKind::Income).unwrap();
        assert_eq!(json, "\"income\"");
        assert_eq!(ZakatKind::parse("fitrah").unwrap(), ZakatKind::Fitrah);
    }
}
