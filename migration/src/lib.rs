pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_campaigns;
mod m20250301_000003_create_site_content;
mod m20250301_000004_create_transactions;
mod m20250412_000001_add_user_verification;
mod m20250520_000001_add_menu_item_pages;
mod m20250601_000001_add_verification_attempts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_campaigns::Migration),
            Box::new(m20250301_000003_create_site_content::Migration),
            Box::new(m20250301_000004_create_transactions::Migration),
            Box::new(m20250412_000001_add_user_verification::Migration),
            Box::new(m20250520_000001_add_menu_item_pages::Migration),
            Box::new(m20250601_000001_add_verification_attempts::Migration),
        ]
    }
}
