use billing_entitlements::config::AppConfig;
use billing_entitlements::error::{AppError, AppResult, ErrorResponse};
use billing_entitlements::logging::init_tracing;
use billing_entitlements::repository::account_repository::AccountRepository;
use billing_entitlements::{db, EntitlementReport, EntitlementService};
use std::env;
use std::process::ExitCode;
use uuid::Uuid;

async fn run(account_id: Uuid) -> AppResult<EntitlementReport> {
    let config = AppConfig::from_env().map_err(AppError::InternalServerError)?;
    let pool = db::create_db_pool(&config).await?;

    let service = EntitlementService::from_config(pool.clone(), &config);
    let account = AccountRepository::new(pool)
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", account_id)))?;

    service.entitlement_report(&account).await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let Some(raw_id) = args.get(1) else {
        eprintln!("Usage: check-entitlement <account-uuid>");
        return ExitCode::from(2);
    };

    let result = match Uuid::parse_str(raw_id) {
        Ok(account_id) => run(account_id).await,
        Err(e) => Err(AppError::from(e)),
    };

    // 結果は常に JSON で標準出力へ
    let (output, code) = match result {
        Ok(report) => (serde_json::to_string_pretty(&report), ExitCode::SUCCESS),
        Err(err) => (
            serde_json::to_string_pretty(&ErrorResponse::from(&err)),
            ExitCode::FAILURE,
        ),
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            code
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}
