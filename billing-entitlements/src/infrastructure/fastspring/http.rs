// src/infrastructure/fastspring/http.rs

use super::types::{
    AccountActionResponse, AccountManagementResponse, AccountOptions, FastspringAccount,
};
use super::FastspringClient;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// reqwest ベースの FastSpring API クライアント（Basic 認証）
pub struct HttpFastspringClient {
    client: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl HttpFastspringClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::InternalServerError(format!("Failed to build FastSpring client: {}", e))
            })?;

        let base_url = base_url.into();
        let base_url = Url::parse(&base_url).map_err(|e| {
            AppError::ValidationError(format!("Invalid FastSpring API URL {}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::ValidationError(format!(
                "Invalid FastSpring API URL: {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            username: username.into(),
            password: password.into(),
        })
    }

    /// パスセグメントはそれぞれエンコードされる（ID 内の `/` や `?` もそのまま 1 セグメント）
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<T> {
        let response = self.auth(request).send().await.map_err(|e| {
            tracing::error!(operation = operation, error = %e, "Failed to reach FastSpring");
            AppError::ExternalServiceError(format!("FastSpring {} failed: {}", operation, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(operation = operation, status = status.as_u16(), body = %body, "FastSpring rejected request");
            return Err(AppError::ExternalServiceError(format!(
                "FastSpring {} returned {}",
                operation, status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::ExternalServiceError(format!(
                "Failed to decode FastSpring {} response: {}",
                operation, e
            ))
        })
    }
}

#[async_trait]
impl FastspringClient for HttpFastspringClient {
    async fn create_account(&self, options: &AccountOptions) -> AppResult<AccountActionResponse> {
        self.send(
            "create_account",
            self.client.post(self.endpoint(&["accounts"])).json(options),
        )
        .await
    }

    async fn update_account(
        &self,
        fastspring_id: &str,
        options: &AccountOptions,
    ) -> AppResult<AccountActionResponse> {
        self.send(
            "update_account",
            self.client
                .post(self.endpoint(&["accounts", fastspring_id]))
                .json(options),
        )
        .await
    }

    async fn get_account(&self, fastspring_id: &str) -> AppResult<FastspringAccount> {
        self.send(
            "get_account",
            self.client.get(self.endpoint(&["accounts", fastspring_id])),
        )
        .await
    }

    async fn get_account_management_uri(
        &self,
        fastspring_id: &str,
    ) -> AppResult<AccountManagementResponse> {
        self.send(
            "get_account_management_uri",
            self.client
                .get(self.endpoint(&["accounts", fastspring_id, "authenticate"])),
        )
        .await
    }
}
