// src/logging/mod.rs

use crate::error::AppResult;
use std::fmt::Debug;
use std::time::Instant;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:expr => $value:expr),* $(,)?)?) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::error!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::WARN => {
                tracing::warn!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::INFO => {
                tracing::info!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::DEBUG => {
                tracing::debug!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            _ => {}
        }
    };
}

/// RUST_LOG が未設定の場合のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "billing_entitlements=info,sea_orm=warn";

/// tracing のグローバルサブスクライバを初期化（二重初期化は無視）
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer())
        .try_init();
}

// 判定処理のコンテキスト
#[derive(Clone, Debug)]
pub struct EvaluationContext {
    pub evaluation_id: String,
    pub account_id: Uuid,
    pub operation: &'static str,
    started: Instant,
}

impl EvaluationContext {
    pub fn start(operation: &'static str, account_id: Uuid) -> Self {
        let context = Self {
            evaluation_id: Uuid::new_v4().to_string(),
            account_id,
            operation,
            started: Instant::now(),
        };

        log_with_context!(
            tracing::Level::DEBUG,
            "Entitlement evaluation started",
            "evaluation_id" => &context.evaluation_id,
            "operation" => context.operation,
            "account_id" => context.account_id,
        );

        context
    }

    /// 結果と所要時間を記録して、結果をそのまま返す
    pub fn finish<T: Debug>(&self, result: AppResult<T>) -> AppResult<T> {
        let duration = self.started.elapsed();

        match &result {
            Ok(value) => {
                log_with_context!(
                    tracing::Level::INFO,
                    "Entitlement evaluation completed",
                    "evaluation_id" => &self.evaluation_id,
                    "operation" => self.operation,
                    "account_id" => self.account_id,
                    "result" => value,
                    "duration_ms" => duration.as_millis(),
                );
            }
            Err(err) => {
                log_with_context!(
                    if err.is_permanent() { tracing::Level::WARN } else { tracing::Level::ERROR },
                    "Entitlement evaluation failed",
                    "evaluation_id" => &self.evaluation_id,
                    "operation" => self.operation,
                    "account_id" => self.account_id,
                    "error_type" => err.error_type(),
                    "error" => err.to_string(),
                    "duration_ms" => duration.as_millis(),
                );
            }
        }

        result
    }
}
