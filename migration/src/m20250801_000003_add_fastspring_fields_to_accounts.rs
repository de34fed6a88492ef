use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// SQLite only accepts one column per ALTER TABLE, so each column gets its own statement.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Accounts::Table)
                    .add_column(ColumnDef::new(Accounts::TrialEndsAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        for column in [
            Accounts::TrialPlan,
            Accounts::FastspringId,
            Accounts::FastspringCompany,
            Accounts::Phone,
            Accounts::Language,
            Accounts::Country,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Accounts::Table)
                        .add_column(ColumnDef::new(column).string())
                        .to_owned(),
                )
                .await?;
        }

        // FastSpring の account id から逆引きするためのインデックス
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Accounts::Table)
                    .name("idx_accounts_fastspring_id")
                    .col(Accounts::FastspringId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(Accounts::Table)
                    .name("idx_accounts_fastspring_id")
                    .to_owned(),
            )
            .await?;

        for column in [
            Accounts::TrialEndsAt,
            Accounts::TrialPlan,
            Accounts::FastspringId,
            Accounts::FastspringCompany,
            Accounts::Phone,
            Accounts::Language,
            Accounts::Country,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Accounts::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(DeriveIden)]
enum Accounts {
    Table,
    TrialEndsAt,
    TrialPlan,
    FastspringId,
    FastspringCompany,
    Phone,
    Language,
    Country,
}
