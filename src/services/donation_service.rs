use crate::entities::{
    PaymentMethod, TransactionStatus, campaign_entity as campaigns, menu_item_entity as menu_items,
    transaction_entity as transactions, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{SessionUser, money, normalize_email, require_text};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Donation intake and the admin review that turns pledges into campaign progress.
#[derive(Clone)]
pub struct DonationService {
    pool: DatabaseConnection,
}

impl DonationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn submit(
        &self,
        request: DonationRequest,
        donor: Option<&SessionUser>,
    ) -> AppResult<TransactionResponse> {
        let amount = money::parse_positive_amount(request.amount)?;

        match (request.campaign_id, request.menu_item_id) {
            (Some(campaign_id), None) => {
                let campaign = campaigns::Entity::find_by_id(campaign_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;
                if !campaign.is_open_at(Utc::now()) {
                    return Err(AppError::ValidationError(
                        "This campaign is no longer accepting donations".to_string(),
                    ));
                }
            }
            (None, Some(menu_item_id)) => {
                let item = menu_items::Entity::find_by_id(menu_item_id)
                    .one(&self.pool)
                    .await?
                    .filter(|m| m.is_active)
                    .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;
                log::debug!("Donation for menu item {}", item.href);
            }
            _ => {
                return Err(AppError::ValidationError(
                    "Choose either a campaign or a menu item".to_string(),
                ));
            }
        }

        let donor_name = match request.donor_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(require_text("donor_name", name, 100)?),
            _ => donor.map(|u| u.name.clone()),
        };
        let donor_email = match request.donor_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Some(normalize_email(email)?),
            _ => donor.map(|u| u.email.clone()),
        };
        let message = match request.message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => Some(require_text("message", m, 500)?),
            _ => None,
        };

        let now = Utc::now();
        let created = transactions::ActiveModel {
            amount: Set(amount),
            campaign_id: Set(request.campaign_id),
            menu_item_id: Set(request.menu_item_id),
            user_id: Set(donor.map(|u| u.id)),
            donor_name: Set(donor_name),
            donor_email: Set(donor_email),
            message: Set(message),
            payment_method: Set(request.payment_method.unwrap_or(PaymentMethod::Qris)),
            status: Set(TransactionStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Donation {} received: {} via {}",
            created.id,
            created.amount,
            created.payment_method
        );
        Ok(TransactionResponse::from(created))
    }

    pub async fn get(&self, id: i64) -> AppResult<TransactionResponse> {
        transactions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(TransactionResponse::from)
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<TransactionResponse>> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TransactionResponse::from).collect())
    }

    pub async fn admin_list(
        &self,
        query: &TransactionQuery,
    ) -> AppResult<PaginatedResponse<TransactionResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = transactions::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(transactions::Column::Status.eq(status));
        }
        let paginator = select
            .order_by_desc(transactions::Column::CreatedAt)
            .paginate(&self.pool, params.get_per_page());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.get_page() - 1).await?;
        Ok(PaginatedResponse::new(
            rows.into_iter().map(TransactionResponse::from).collect(),
            &params,
            total,
        ))
    }

    /// Marks a pending donation as received. The campaign total and the donor's
    /// contributor flag change in the same database transaction.
    pub async fn confirm(&self, id: i64) -> AppResult<TransactionResponse> {
        let txn = self.pool.begin().await?;

        let current = transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;
        if current.status != TransactionStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Transaction is already {}",
                current.status
            )));
        }

        if let Some(campaign_id) = current.campaign_id {
            campaigns::Entity::update_many()
                .col_expr(
                    campaigns::Column::CurrentAmount,
                    Expr::col(campaigns::Column::CurrentAmount).add(current.amount),
                )
                .col_expr(campaigns::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(campaigns::Column::Id.eq(campaign_id))
                .exec(&txn)
                .await?;
        }
        if let Some(user_id) = current.user_id {
            users::Entity::update_many()
                .col_expr(users::Column::IsContributor, Expr::value(true))
                .filter(users::Column::Id.eq(user_id))
                .exec(&txn)
                .await?;
        }

        let mut model = current.into_active_model();
        model.status = Set(TransactionStatus::Confirmed);
        model.updated_at = Set(Utc::now());
        let updated = model.update(&txn).await?;

        txn.commit().await?;
        log::info!("Donation {id} confirmed");
        Ok(TransactionResponse::from(updated))
    }

    pub async fn reject(&self, id: i64) -> AppResult<TransactionResponse> {
        let current = transactions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;
        if current.status != TransactionStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Transaction is already {}",
                current.status
            )));
        }
        let mut model = current.into_active_model();
        model.status = Set(TransactionStatus::Rejected);
        model.updated_at = Set(Utc::now());
        let updated = model.update(&self.pool).await?;
        log::info!("Donation {id} rejected");
        Ok(TransactionResponse::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn request() -> DonationRequest {
        DonationRequest {
            amount: 50_000.0,
            campaign_id: None,
            menu_item_id: None,
            donor_name: None,
            donor_email: None,
            message: None,
            payment_method: None,
        }
    }

    #[actix_web::test]
    async fn test_submit_needs_exactly_one_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = DonationService::new(db);

        let result = service.submit(request(), None).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let mut both = request();
        both.campaign_id = Some(1);
        both.menu_item_id = Some(2);
        let result = service.submit(both, None).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_submit_rejects_zero_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = DonationService::new(db);
        let mut req = request();
        req.amount = 0.0;
        req.campaign_id = Some(1);
        assert!(matches!(
            service.submit(req, None).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_confirm_only_pending() {
        let now = Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![transactions::Model {
                id: 5,
                amount: Decimal::new(100_000, 0),
                campaign_id: Some(1),
                menu_item_id: None,
                user_id: None,
                donor_name: None,
                donor_email: None,
                message: None,
                payment_method: PaymentMethod::Cash,
                status: TransactionStatus::Rejected,
                created_at: now,
                updated_at: now,
            }]])
            .into_connection();
        let service = DonationService::new(db);
        assert!(matches!(
            service.confirm(5).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
