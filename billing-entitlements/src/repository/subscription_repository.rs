// src/repository/subscription_repository.rs

use crate::domain::subscription_model::{
    self, ActiveModel as SubscriptionActiveModel, Entity as SubscriptionEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

/// FastSpring 同期済みサブスクリプションの読み取り
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    db: DbConn,
}

impl SubscriptionRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// スロット名ごとの最新サブスクリプション。作成日時が同じ場合は id の大きい方
    pub async fn subscription_for(
        &self,
        account_id: Uuid,
        name: &str,
    ) -> Result<Option<subscription_model::Model>, DbErr> {
        SubscriptionEntity::find()
            .filter(subscription_model::Column::AccountId.eq(account_id))
            .filter(subscription_model::Column::Name.eq(name))
            .order_by_desc(subscription_model::Column::CreatedAt)
            .order_by_desc(subscription_model::Column::Id)
            .one(&self.db)
            .await
    }

    /// アカウントの全サブスクリプション（新しい順）
    pub async fn find_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<subscription_model::Model>, DbErr> {
        SubscriptionEntity::find()
            .filter(subscription_model::Column::AccountId.eq(account_id))
            .order_by_desc(subscription_model::Column::CreatedAt)
            .order_by_desc(subscription_model::Column::Id)
            .all(&self.db)
            .await
    }

    /// 同期処理・テスト用の登録
    pub async fn create(
        &self,
        create_subscription: CreateSubscription,
    ) -> Result<subscription_model::Model, DbErr> {
        let now = Utc::now();
        let new_subscription = SubscriptionActiveModel {
            id: Set(create_subscription.id.unwrap_or_else(Uuid::new_v4)),
            account_id: Set(create_subscription.account_id),
            name: Set(create_subscription.name),
            plan: Set(create_subscription.plan),
            fastspring_id: Set(create_subscription.fastspring_id),
            state: Set(create_subscription.state),
            trial_ends_at: Set(create_subscription.trial_ends_at),
            ends_at: Set(create_subscription.ends_at),
            created_at: Set(create_subscription.created_at.unwrap_or(now)),
            updated_at: Set(now),
        };

        new_subscription.insert(&self.db).await
    }
}

/// サブスクリプション作成用構造体
#[derive(Debug)]
pub struct CreateSubscription {
    pub id: Option<Uuid>,
    pub account_id: Uuid,
    pub name: String,
    pub plan: String,
    pub fastspring_id: Option<String>,
    pub state: String,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}
