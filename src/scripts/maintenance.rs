use crate::entities::{UserRole, transaction_entity as transactions, user_entity as users};
use crate::services::UserService;
use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[derive(Debug, Default)]
pub struct MigrationStatus {
    pub applied: Vec<String>,
    pub pending: Vec<String>,
}

pub async fn migration_status(db: &DatabaseConnection) -> Result<MigrationStatus> {
    let applied = Migrator::get_applied_migrations(db)
        .await
        .context("reading applied migrations")?
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    let pending = Migrator::get_pending_migrations(db)
        .await
        .context("reading pending migrations")?
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    Ok(MigrationStatus { applied, pending })
}

/// Applies pending migrations and returns the names that ran.
pub async fn migrate(db: &DatabaseConnection) -> Result<Vec<String>> {
    let pending = migration_status(db).await?.pending;
    Migrator::up(db, None).await.context("applying migrations")?;
    for name in &pending {
        log::info!("Applied migration {name}");
    }
    Ok(pending)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub transactions: u64,
    pub users: u64,
}

/// Deletes every transaction, then every non-admin user. The two deletes are
/// separate statements; a failure in the second leaves the first applied.
pub async fn reset_users(db: &DatabaseConnection) -> Result<ResetReport> {
    let deleted_transactions = transactions::Entity::delete_many()
        .exec(db)
        .await
        .context("deleting transactions")?
        .rows_affected;
    log::info!("Deleted {deleted_transactions} transactions");

    let deleted_users = users::Entity::delete_many()
        .filter(users::Column::Role.ne(UserRole::Admin))
        .exec(db)
        .await
        .context("deleting users")?
        .rows_affected;
    log::info!("Deleted {deleted_users} non-admin users");

    Ok(ResetReport {
        transactions: deleted_transactions,
        users: deleted_users,
    })
}

pub async fn promote_admin(db: &DatabaseConnection, email: &str) -> Result<()> {
    let user = UserService::new(db.clone())
        .promote_admin(&email.trim().to_lowercase())
        .await?;
    println!("{} <{}> is now an admin", user.name, user.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[actix_web::test]
    async fn test_reset_users_deletes_transactions_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
            ])
            .into_connection();

        let report = reset_users(&db).await.unwrap();
        assert_eq!(
            report,
            ResetReport {
                transactions: 4,
                users: 2
            }
        );

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        let first = format!("{:?}", log[0]);
        let second = format!("{:?}", log[1]);
        assert!(first.contains("transactions"), "{first}");
        assert!(!first.contains("users"), "{first}");
        assert!(second.contains("users"), "{second}");
    }
}
