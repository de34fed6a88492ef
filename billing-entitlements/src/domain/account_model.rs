// billing-entitlements/src/domain/account_model.rs

use super::entitlement_subject::EntitlementSubject;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 課金・エンタイトルメントの主体となるアカウント
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// The account's own plan, independent of any subscription row.
    #[sea_orm(nullable)]
    pub plan_id: Option<String>,

    #[sea_orm(nullable)]
    pub trial_ends_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub trial_plan: Option<String>,

    #[sea_orm(nullable)]
    pub fastspring_id: Option<String>,

    #[sea_orm(nullable)]
    pub fastspring_company: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub language: Option<String>,

    #[sea_orm(nullable)]
    pub country: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_model::Entity",
        from = "Column::PlanId",
        to = "super::plan_model::Column::Id"
    )]
    Plan,
}

impl Related<super::plan_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            // 更新の場合のみ updated_at を更新
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl EntitlementSubject for Model {
    fn subject_id(&self) -> Uuid {
        self.id
    }

    fn trial_ends_at(&self) -> Option<DateTime<Utc>> {
        self.trial_ends_at
    }

    fn trial_plan(&self) -> Option<&str> {
        self.trial_plan.as_deref()
    }

    fn own_plan_id(&self) -> Option<&str> {
        self.plan_id.as_deref()
    }

    fn fastspring_id(&self) -> Option<&str> {
        self.fastspring_id.as_deref()
    }
}
