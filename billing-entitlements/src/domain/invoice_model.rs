// billing-entitlements/src/domain/invoice_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub account_id: Uuid,

    /// FastSpring order reference.
    pub fastspring_id: String,

    #[sea_orm(nullable)]
    pub subscription_display: Option<String>,

    /// Amount in minor currency units.
    pub total: i64,

    pub currency: String,

    pub status: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_model::Entity",
        from = "Column::AccountId",
        to = "super::account_model::Column::Id"
    )]
    Account,
}

impl Related<super::account_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
