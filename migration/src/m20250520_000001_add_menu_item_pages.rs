use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum MenuItems {
    Table,
    MenuType,
    Slug,
    Template,
    Content,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(MenuItems::Table)
                    .add_column_if_not_exists(
                        ColumnDef::new(MenuItems::MenuType)
                            .string_len(16)
                            .not_null()
                            .default("link"),
                    )
                    .add_column_if_not_exists(ColumnDef::new(MenuItems::Slug).string_len(120).null())
                    .add_column_if_not_exists(
                        ColumnDef::new(MenuItems::Template).string_len(32).null(),
                    )
                    .add_column_if_not_exists(ColumnDef::new(MenuItems::Content).text().null())
                    .to_owned(),
            )
            .await?;

        // NULL slugs (plain links) do not collide
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_menu_items_slug")
                    .table(MenuItems::Table)
                    .col(MenuItems::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_menu_items_slug")
                    .table(MenuItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(MenuItems::Table)
                    .drop_column(MenuItems::MenuType)
                    .drop_column(MenuItems::Slug)
                    .drop_column(MenuItems::Template)
                    .drop_column(MenuItems::Content)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
