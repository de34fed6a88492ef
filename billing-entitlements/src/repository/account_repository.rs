// src/repository/account_repository.rs

use crate::domain::account_model::{self, ActiveModel as AccountActiveModel, Entity as AccountEntity};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, QueryFilter, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DbConn,
}

impl AccountRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<account_model::Model>, DbErr> {
        AccountEntity::find_by_id(id).one(&self.db).await
    }

    /// FastSpring の account id から逆引き
    pub async fn find_by_fastspring_id(
        &self,
        fastspring_id: &str,
    ) -> Result<Option<account_model::Model>, DbErr> {
        AccountEntity::find()
            .filter(account_model::Column::FastspringId.eq(fastspring_id))
            .one(&self.db)
            .await
    }

    /// アカウントを作成
    pub async fn create(&self, create_account: CreateAccount) -> Result<account_model::Model, DbErr> {
        let mut new_account = <AccountActiveModel as ActiveModelBehavior>::new();
        new_account.email = Set(create_account.email);
        new_account.first_name = Set(create_account.first_name);
        new_account.last_name = Set(create_account.last_name);
        new_account.plan_id = Set(create_account.plan_id);
        new_account.trial_ends_at = Set(create_account.trial_ends_at);
        new_account.trial_plan = Set(create_account.trial_plan);
        new_account.fastspring_company = Set(create_account.company);
        new_account.phone = Set(create_account.phone);
        new_account.language = Set(create_account.language);
        new_account.country = Set(create_account.country);

        new_account.insert(&self.db).await
    }

    /// FastSpring の account id を保存
    pub async fn update_fastspring_id(
        &self,
        id: Uuid,
        fastspring_id: &str,
    ) -> Result<account_model::Model, DbErr> {
        let mut active_model = self.find_active_model(id).await?;
        active_model.fastspring_id = Set(Some(fastspring_id.to_string()));
        active_model.update(&self.db).await
    }

    /// 汎用トライアルの対象プランを変更
    pub async fn update_trial_plan(
        &self,
        id: Uuid,
        trial_plan: &str,
    ) -> Result<account_model::Model, DbErr> {
        let mut active_model = self.find_active_model(id).await?;
        active_model.trial_plan = Set(Some(trial_plan.to_string()));
        active_model.update(&self.db).await
    }

    async fn find_active_model(&self, id: Uuid) -> Result<AccountActiveModel, DbErr> {
        let account = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DbErr::RecordNotFound("Account not found".to_string()))?;

        Ok(account.into())
    }
}

/// アカウント作成用構造体
#[derive(Debug, Default)]
pub struct CreateAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub plan_id: Option<String>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub trial_plan: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}
