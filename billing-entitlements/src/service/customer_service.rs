// billing-entitlements/src/service/customer_service.rs

use crate::db::DbPool;
use crate::domain::account_model::Model as Account;
use crate::domain::invoice_model::Model as Invoice;
use crate::error::{AppError, AppResult};
use crate::infrastructure::fastspring::{
    AccountActionResponse, AccountContact, AccountOptions, FastspringAccount, FastspringClient,
};
use crate::repository::account_repository::AccountRepository;
use crate::repository::invoice_repository::InvoiceRepository;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// FastSpring 側の顧客アカウントと請求書を扱うサービス
#[derive(Clone)]
pub struct CustomerService {
    account_repo: Arc<AccountRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    client: Arc<dyn FastspringClient>,
}

impl CustomerService {
    pub fn new(db: DbPool, client: Arc<dyn FastspringClient>) -> Self {
        let account_repo = Arc::new(AccountRepository::new(db.clone()));
        let invoice_repo = Arc::new(InvoiceRepository::new(db));

        Self {
            account_repo,
            invoice_repo,
            client,
        }
    }

    /// アカウント情報から組み立てたデフォルトのペイロード
    pub fn default_account_options(account: &Account) -> AccountOptions {
        AccountOptions {
            contact: AccountContact {
                first: account.first_name.clone(),
                last: account.last_name.clone(),
                email: account.email.clone(),
                company: account.fastspring_company.clone(),
                phone: account.phone.clone(),
            },
            language: account.language.clone(),
            country: account.country.clone(),
        }
    }

    /// FastSpring にアカウントを作成し、返された id を保存する
    pub async fn create_as_fastspring_customer(
        &self,
        account: &Account,
        options: Option<AccountOptions>,
    ) -> AppResult<(Account, AccountActionResponse)> {
        let options = options.unwrap_or_else(|| Self::default_account_options(account));
        options.validate()?;

        let response = self.client.create_account(&options).await?;

        let updated = self
            .account_repo
            .update_fastspring_id(account.id, &response.account)
            .await?;

        tracing::info!(
            account_id = %account.id,
            fastspring_id = %response.account,
            "FastSpring customer created"
        );

        Ok((updated, response))
    }

    pub async fn update_as_fastspring_customer(
        &self,
        account: &Account,
        options: Option<AccountOptions>,
    ) -> AppResult<AccountActionResponse> {
        let fastspring_id = Self::require_fastspring_id(account)?;

        let options = options.unwrap_or_else(|| Self::default_account_options(account));
        options.validate()?;

        self.client.update_account(fastspring_id, &options).await
    }

    pub async fn as_fastspring_customer(&self, account: &Account) -> AppResult<FastspringAccount> {
        let fastspring_id = Self::require_fastspring_id(account)?;
        self.client.get_account(fastspring_id).await
    }

    /// 認証済みのアカウント管理画面 URL
    pub async fn account_management_uri(&self, account: &Account) -> AppResult<String> {
        let fastspring_id = Self::require_fastspring_id(account)?;

        let response = self.client.get_account_management_uri(fastspring_id).await?;

        response
            .accounts
            .into_iter()
            .next()
            .map(|link| link.url)
            .ok_or_else(|| {
                AppError::ExternalServiceError(
                    "FastSpring returned no account management link".to_string(),
                )
            })
    }

    /// 汎用トライアルの対象プランを差し替える
    pub async fn swap_trial_plan(&self, account: &Account, plan: &str) -> AppResult<Account> {
        if plan.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Trial plan must not be empty".to_string(),
            ));
        }

        Ok(self.account_repo.update_trial_plan(account.id, plan).await?)
    }

    /// 請求書一覧（新しい順）
    pub async fn invoices(&self, account: &Account) -> AppResult<Vec<Invoice>> {
        Ok(self.invoice_repo.find_by_account_id(account.id).await?)
    }

    /// 単発課金は FastSpring ストアフロント側で行うため未対応
    pub async fn charge(&self, _amount: i64, _options: &Value) -> AppResult<()> {
        Err(AppError::NotSupported(
            "One-off charges are not supported".to_string(),
        ))
    }

    pub async fn refund(&self, _charge: &str, _options: &Value) -> AppResult<()> {
        Err(AppError::NotSupported("Refunds are not supported".to_string()))
    }

    fn require_fastspring_id(account: &Account) -> AppResult<&str> {
        account.fastspring_id.as_deref().ok_or_else(|| {
            AppError::PreconditionFailed(format!(
                "Account {} has no FastSpring id",
                account.id
            ))
        })
    }
}
