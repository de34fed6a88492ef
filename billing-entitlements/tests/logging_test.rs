use billing_entitlements::error::AppError;
use billing_entitlements::logging::EvaluationContext;

#[tokio::test]
async fn test_each_evaluation_gets_its_own_id() {
    let account_id = uuid::Uuid::new_v4();

    let first = EvaluationContext::start("entitlement_report", account_id);
    let second = EvaluationContext::start("entitlement_report", account_id);
    assert_ne!(first.evaluation_id, second.evaluation_id);
    assert!(uuid::Uuid::parse_str(&first.evaluation_id).is_ok());

    // 一時的なエラーも結果はそのまま返る
    let result: Result<u64, AppError> = second.finish(Err(AppError::ExternalServiceError(
        "timeout".to_string(),
    )));
    assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    assert_eq!(first.finish(Ok(3_u64)).unwrap(), 3);
}

#[tokio::test]
async fn test_evaluation_context_passes_results_through() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("billing_entitlements=debug")
        .with_test_writer()
        .try_init();

    let account_id = uuid::Uuid::new_v4();

    let context = EvaluationContext::start("has_subscription", account_id);
    assert_eq!(context.account_id, account_id);
    assert_eq!(context.operation, "has_subscription");
    assert!(context.finish(Ok(true)).unwrap());

    let failing = EvaluationContext::start("has_piggyback_subscription", account_id);
    let result: Result<bool, AppError> =
        failing.finish(Err(AppError::CycleDetected { account_id }));
    assert!(matches!(result, Err(AppError::CycleDetected { .. })));
}
