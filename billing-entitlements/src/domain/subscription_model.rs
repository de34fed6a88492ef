// billing-entitlements/src/domain/subscription_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// FastSpring から同期されたサブスクリプション（読み取り専用）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub account_id: Uuid,

    /// Slot name, e.g. "default".
    pub name: String,

    pub plan: String,

    #[sea_orm(nullable)]
    pub fastspring_id: Option<String>,

    pub state: String,

    #[sea_orm(nullable)]
    pub trial_ends_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub ends_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
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

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

/// FastSpring のサブスクリプション状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    Active,
    Trial,
    Overdue,
    Canceled,
    Deactivated,
}

impl SubscriptionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trial => "trial",
            Self::Overdue => "overdue",
            Self::Canceled => "canceled",
            Self::Deactivated => "deactivated",
        }
    }
}

impl FromStr for SubscriptionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "trial" => Ok(Self::Trial),
            "overdue" => Ok(Self::Overdue),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "deactivated" => Ok(Self::Deactivated),
            _ => Err(format!("Invalid subscription state: {}", s)),
        }
    }
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Model {
    /// 状態文字列を解釈する。未知の状態は失効扱い
    pub fn subscription_state(&self) -> SubscriptionState {
        self.state
            .parse()
            .unwrap_or(SubscriptionState::Deactivated)
    }

    pub fn is_active(&self) -> bool {
        self.subscription_state() == SubscriptionState::Active
    }

    /// サブスクリプション自身のトライアル期間中か
    pub fn on_trial(&self, now: DateTime<Utc>) -> bool {
        self.subscription_state() == SubscriptionState::Trial
            && self.trial_ends_at.map_or(true, |ends_at| ends_at > now)
    }

    /// 支払い遅延中、またはキャンセル済みだが期間終了前
    pub fn on_grace_period(&self, now: DateTime<Utc>) -> bool {
        match self.subscription_state() {
            SubscriptionState::Overdue => true,
            SubscriptionState::Canceled => self.ends_at.is_some_and(|ends_at| ends_at > now),
            _ => false,
        }
    }

    /// 有効なサブスクリプションか（アクティブ・トライアル・猶予期間）
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active() || self.on_trial(now) || self.on_grace_period(now)
    }

    pub fn has_plan(&self, plan: &str) -> bool {
        self.plan == plan
    }
}
