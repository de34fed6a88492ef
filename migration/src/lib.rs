// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// プラン・アカウント
mod m20250801_000001_create_plans_table;
mod m20250801_000002_create_accounts_table;
mod m20250801_000003_add_fastspring_fields_to_accounts;

// サブスクリプション
mod m20250801_000004_create_subscriptions_table;

// チーム
mod m20250801_000005_create_teams_table;
mod m20250801_000006_create_team_members_table;

// 請求書
mod m20250801_000007_create_invoices_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 依存関係のないテーブル
            Box::new(m20250801_000001_create_plans_table::Migration),
            // 2. アカウント (plans を参照) と FastSpring 用カラム
            Box::new(m20250801_000002_create_accounts_table::Migration),
            Box::new(m20250801_000003_add_fastspring_fields_to_accounts::Migration),
            // 3. accounts に依存するテーブル
            Box::new(m20250801_000004_create_subscriptions_table::Migration),
            Box::new(m20250801_000005_create_teams_table::Migration),
            Box::new(m20250801_000006_create_team_members_table::Migration),
            Box::new(m20250801_000007_create_invoices_table::Migration),
        ]
    }
}
