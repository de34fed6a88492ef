use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::Name)
                            .string()
                            .not_null()
                            .default("default"),
                    )
                    .col(ColumnDef::new(Subscriptions::Plan).string().not_null())
                    .col(ColumnDef::new(Subscriptions::FastspringId).string())
                    .col(
                        ColumnDef::new(Subscriptions::State)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Subscriptions::TrialEndsAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Subscriptions::EndsAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_account_id")
                            .from(Subscriptions::Table, Subscriptions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // subscription_for: account_id + name で最新の1件を引く
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_account_name_created")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::AccountId)
                    .col(Subscriptions::Name)
                    .col(Subscriptions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_plan")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::Plan)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    AccountId,
    Name,
    Plan,
    FastspringId,
    State,
    TrialEndsAt,
    EndsAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}
