// src/error.rs

use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Delegation cycle detected at account {account_id}")]
    CycleDetected { account_id: Uuid },

    #[error("Delegation depth exceeded the maximum of {max_depth}")]
    DelegationDepthExceeded { max_depth: usize },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Failed to parse UUID: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    /// 機械可読なエラー種別
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::DbErr(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::NotSupported(_) => "not_supported",
            AppError::PreconditionFailed(_) => "precondition_failed",
            AppError::CycleDetected { .. } => "delegation_cycle",
            AppError::DelegationDepthExceeded { .. } => "delegation_depth_exceeded",
            AppError::ValidationError(_) => "validation_error",
            AppError::ValidationFailure(_) => "validation_errors",
            AppError::UuidError(_) => "invalid_uuid",
            AppError::InternalServerError(_) => "internal_server_error",
            AppError::ExternalServiceError(_) => "external_service_error",
        }
    }

    /// 同じ呼び出しを繰り返しても結果が変わらないエラーか
    pub fn is_permanent(&self) -> bool {
        !matches!(
            self,
            AppError::DbErr(_) | AppError::ExternalServiceError(_)
        )
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    pub error_type: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let error_type = err.error_type().to_string();

        match err {
            AppError::DbErr(db_err) => {
                // 詳細はログにのみ出す
                tracing::error!(error = %db_err, "Database error");

                let details = match db_err {
                    DbErr::RecordNotFound(entity) => Some(json!({ "entity": entity })),
                    DbErr::Exec(_) => Some(json!({ "operation": "exec" })),
                    DbErr::Query(_) => Some(json!({ "operation": "query" })),
                    _ => None,
                };

                Self {
                    success: false,
                    error: "A database error occurred".to_string(),
                    message: "A database error occurred".to_string(),
                    details,
                    validation_errors: None,
                    error_type,
                }
            }
            AppError::CycleDetected { account_id } => Self {
                success: false,
                error: err.to_string(),
                message: err.to_string(),
                details: Some(json!({ "account_id": account_id })),
                validation_errors: None,
                error_type,
            },
            AppError::DelegationDepthExceeded { max_depth } => Self {
                success: false,
                error: err.to_string(),
                message: err.to_string(),
                details: Some(json!({ "max_depth": max_depth })),
                validation_errors: None,
                error_type,
            },
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| e.code.to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();

                Self {
                    success: false,
                    error: "Validation failed".to_string(),
                    message: "Validation failed".to_string(),
                    details: None,
                    validation_errors: Some(field_errors),
                    error_type,
                }
            }
            AppError::InternalServerError(message) => {
                tracing::error!(error = %message, "Internal server error");
                Self {
                    success: false,
                    error: "An internal server error occurred".to_string(),
                    message: "An internal server error occurred".to_string(),
                    details: None,
                    validation_errors: None,
                    error_type,
                }
            }
            AppError::ExternalServiceError(message) => {
                tracing::error!(error = %message, "External service error");
                Self {
                    success: false,
                    error: "External service error".to_string(),
                    message: message.clone(),
                    details: None,
                    validation_errors: None,
                    error_type,
                }
            }
            AppError::NotFound(message)
            | AppError::NotSupported(message)
            | AppError::PreconditionFailed(message)
            | AppError::ValidationError(message) => Self {
                success: false,
                error: message.clone(),
                message: message.clone(),
                details: None,
                validation_errors: None,
                error_type,
            },
            AppError::UuidError(uuid_err) => Self {
                success: false,
                error: format!("Invalid UUID: {}", uuid_err),
                message: format!("Invalid UUID: {}", uuid_err),
                details: None,
                validation_errors: None,
                error_type,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        assert_eq!(
            AppError::NotSupported("charge".to_string()).error_type(),
            "not_supported"
        );
        assert_eq!(
            AppError::CycleDetected {
                account_id: Uuid::nil()
            }
            .error_type(),
            "delegation_cycle"
        );
        assert_eq!(
            AppError::DelegationDepthExceeded { max_depth: 3 }.error_type(),
            "delegation_depth_exceeded"
        );
    }

    #[test]
    fn test_permanent_errors() {
        assert!(AppError::NotSupported("refund".to_string()).is_permanent());
        assert!(AppError::PreconditionFailed("no id".to_string()).is_permanent());
        assert!(!AppError::ExternalServiceError("timeout".to_string()).is_permanent());
    }

    #[test]
    fn test_error_response_for_cycle_includes_account() {
        let account_id = Uuid::new_v4();
        let err = AppError::CycleDetected { account_id };
        let response = ErrorResponse::from(&err);

        assert!(!response.success);
        assert_eq!(response.error_type, "delegation_cycle");
        assert_eq!(
            response.details,
            Some(json!({ "account_id": account_id }))
        );
    }

    #[test]
    fn test_error_response_hides_internal_details() {
        let err = AppError::InternalServerError("pool exhausted".to_string());
        let response = ErrorResponse::from(&err);
        assert_eq!(response.message, "An internal server error occurred");
    }
}
