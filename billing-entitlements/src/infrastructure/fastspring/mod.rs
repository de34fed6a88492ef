// src/infrastructure/fastspring/mod.rs

//! FastSpring アカウント API クライアント

mod http;
mod types;

pub use http::HttpFastspringClient;
pub use types::{
    AccountActionResponse, AccountContact, AccountManagementLink, AccountManagementResponse,
    AccountOptions, FastspringAccount,
};

use crate::config::FastspringConfig;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait FastspringClient: Send + Sync {
    async fn create_account(&self, options: &AccountOptions) -> AppResult<AccountActionResponse>;

    async fn update_account(
        &self,
        fastspring_id: &str,
        options: &AccountOptions,
    ) -> AppResult<AccountActionResponse>;

    async fn get_account(&self, fastspring_id: &str) -> AppResult<FastspringAccount>;

    async fn get_account_management_uri(
        &self,
        fastspring_id: &str,
    ) -> AppResult<AccountManagementResponse>;
}

/// 開発モード用。外部 API を呼ばずにモックレスポンスを返す
#[derive(Debug, Default, Clone)]
pub struct DevelopmentFastspringClient;

#[async_trait]
impl FastspringClient for DevelopmentFastspringClient {
    async fn create_account(&self, _options: &AccountOptions) -> AppResult<AccountActionResponse> {
        tracing::info!("Development mode: returning mock FastSpring account");
        Ok(AccountActionResponse {
            account: format!("dev-{}", Uuid::new_v4().simple()),
            action: "account.create".to_string(),
            result: "success".to_string(),
        })
    }

    async fn update_account(
        &self,
        fastspring_id: &str,
        _options: &AccountOptions,
    ) -> AppResult<AccountActionResponse> {
        Ok(AccountActionResponse {
            account: fastspring_id.to_string(),
            action: "account.update".to_string(),
            result: "success".to_string(),
        })
    }

    async fn get_account(&self, fastspring_id: &str) -> AppResult<FastspringAccount> {
        Ok(FastspringAccount {
            id: fastspring_id.to_string(),
            contact: AccountContact::default(),
            language: None,
            country: None,
            subscriptions: vec![],
            orders: vec![],
        })
    }

    async fn get_account_management_uri(
        &self,
        fastspring_id: &str,
    ) -> AppResult<AccountManagementResponse> {
        Ok(AccountManagementResponse {
            accounts: vec![AccountManagementLink {
                account: Some(fastspring_id.to_string()),
                url: format!("http://localhost:3000/mock-account?account={}", fastspring_id),
            }],
        })
    }
}

/// 設定に応じたクライアントを生成
pub fn client_from_config(config: &FastspringConfig) -> AppResult<Arc<dyn FastspringClient>> {
    if config.development_mode {
        return Ok(Arc::new(DevelopmentFastspringClient));
    }

    Ok(Arc::new(HttpFastspringClient::new(
        config.api_url.clone(),
        config.username.clone(),
        config.password.clone(),
    )?))
}
