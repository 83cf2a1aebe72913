use crate::entities::{PaymentMethod, TransactionStatus, transaction_entity};
use crate::error::{AppError, AppResult};
use crate::utils::money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DonationRequest {
    #[schema(example = 100000.0)]
    pub amount: f64,
    pub campaign_id: Option<i64>,
    pub menu_item_id: Option<i64>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub message: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    pub amount: f64,
    pub campaign_id: Option<i64>,
    pub menu_item_id: Option<i64>,
    pub user_id: Option<i64>,
    pub donor_name: Option<String>,
    pub message: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<transaction_entity::Model> for TransactionResponse {
    fn from(m: transaction_entity::Model) -> Self {
        Self {
            id: m.id,
            amount: money::to_f64(m.amount),
            campaign_id: m.campaign_id,
            menu_item_id: m.menu_item_id,
            user_id: m.user_id,
            donor_name: m.donor_name,
            message: m.message,
            payment_method: m.payment_method,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TransactionQuery {
    pub status: Option<TransactionStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// HTML donation form. Browsers send every field as text, empty when left blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationForm {
    #[serde(default)]
    pub amount: String,
    pub campaign_id: Option<i64>,
    pub menu_item_id: Option<i64>,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub donor_email: String,
    #[serde(default)]
    pub message: String,
    pub payment_method: Option<PaymentMethod>,
}

impl DonationForm {
    pub fn into_request(self) -> AppResult<DonationRequest> {
        // "50.000" and "50000" both mean fifty thousand rupiah
        let digits: String = self
            .amount
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | ' ' | '_'))
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        let amount = digits
            .parse::<f64>()
            .map_err(|_| AppError::ValidationError("Amount must be a number".to_string()))?;
        let non_empty = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };
        Ok(DonationRequest {
            amount,
            campaign_id: self.campaign_id,
            menu_item_id: self.menu_item_id,
            donor_name: non_empty(self.donor_name),
            donor_email: non_empty(self.donor_email),
            message: non_empty(self.message),
            payment_method: self.payment_method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_form_amount_formats() {
        let form = DonationForm {
            amount: "50.000".to_string(),
            campaign_id: Some(1),
            ..Default::default()
        };
        let req = form.into_request().unwrap();
        assert_eq!(req.amount, 50_000.0);
        assert_eq!(req.donor_name, None);

        let form = DonationForm {
            amount: "12500,50".to_string(),
            ..Default::default()
        };
        assert_eq!(form.into_request().unwrap().amount, 12_500.5);

        let form = DonationForm {
            amount: "lima ribu".to_string(),
            ..Default::default()
        };
        assert!(form.into_request().is_err());
    }
}
