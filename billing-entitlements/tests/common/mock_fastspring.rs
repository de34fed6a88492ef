// tests/common/mock_fastspring.rs

use async_trait::async_trait;
use billing_entitlements::error::{AppError, AppResult};
use billing_entitlements::infrastructure::fastspring::{
    AccountActionResponse, AccountContact, AccountManagementLink, AccountManagementResponse,
    AccountOptions, FastspringAccount, FastspringClient,
};
use std::sync::{Arc, Mutex};

/// テスト用のモック FastSpring クライアント
#[derive(Clone, Default)]
pub struct MockFastspringClient {
    calls: Arc<Mutex<Vec<String>>>,
    payloads: Arc<Mutex<Vec<AccountOptions>>>,
    management_urls: Arc<Mutex<Vec<String>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockFastspringClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_management_urls(urls: &[&str]) -> Self {
        let client = Self::new();
        *client.management_urls.lock().unwrap() = urls.iter().map(|url| url.to_string()).collect();
        client
    }

    pub fn failing(message: &str) -> Self {
        let client = Self::new();
        *client.fail_with.lock().unwrap() = Some(message.to_string());
        client
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<AccountOptions> {
        self.payloads.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(AppError::ExternalServiceError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FastspringClient for MockFastspringClient {
    async fn create_account(&self, options: &AccountOptions) -> AppResult<AccountActionResponse> {
        self.record("create_account".to_string())?;
        self.payloads.lock().unwrap().push(options.clone());
        Ok(AccountActionResponse {
            account: "fs-account-1".to_string(),
            action: "account.create".to_string(),
            result: "success".to_string(),
        })
    }

    async fn update_account(
        &self,
        fastspring_id: &str,
        options: &AccountOptions,
    ) -> AppResult<AccountActionResponse> {
        self.record(format!("update_account:{}", fastspring_id))?;
        self.payloads.lock().unwrap().push(options.clone());
        Ok(AccountActionResponse {
            account: fastspring_id.to_string(),
            action: "account.update".to_string(),
            result: "success".to_string(),
        })
    }

    async fn get_account(&self, fastspring_id: &str) -> AppResult<FastspringAccount> {
        self.record(format!("get_account:{}", fastspring_id))?;
        Ok(FastspringAccount {
            id: fastspring_id.to_string(),
            contact: AccountContact::default(),
            language: Some("en".to_string()),
            country: Some("US".to_string()),
            subscriptions: vec![],
            orders: vec![],
        })
    }

    async fn get_account_management_uri(
        &self,
        fastspring_id: &str,
    ) -> AppResult<AccountManagementResponse> {
        self.record(format!("get_account_management_uri:{}", fastspring_id))?;
        let accounts = self
            .management_urls
            .lock()
            .unwrap()
            .iter()
            .map(|url| AccountManagementLink {
                account: Some(fastspring_id.to_string()),
                url: url.clone(),
            })
            .collect();
        Ok(AccountManagementResponse { accounts })
    }
}
