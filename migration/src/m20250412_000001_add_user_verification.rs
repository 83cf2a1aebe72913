use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    VerificationCode,
    VerificationExpiresAt,
    IsContributor,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // email registration + contributor badge, previously patched in by hand
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_column_if_not_exists(
                        ColumnDef::new(Users::VerificationCode).string_len(6).null(),
                    )
                    .add_column_if_not_exists(
                        ColumnDef::new(Users::VerificationExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .add_column_if_not_exists(
                        ColumnDef::new(Users::IsContributor)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .drop_column(Users::VerificationCode)
                    .drop_column(Users::VerificationExpiresAt)
                    .drop_column(Users::IsContributor)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
