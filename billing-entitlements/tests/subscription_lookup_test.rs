// tests/subscription_lookup_test.rs

mod common;

use billing_entitlements::domain::entitlement_rules::DEFAULT_SUBSCRIPTION;
use billing_entitlements::domain::subscription_model::SubscriptionState;
use billing_entitlements::repository::subscription_repository::{
    CreateSubscription, SubscriptionRepository,
};
use billing_entitlements::EntitlementService;
use chrono::{Duration, Utc};
use common::db::TestDatabase;
use common::test_data::*;
use uuid::Uuid;

#[tokio::test]
async fn test_most_recent_subscription_wins() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let account = create_account(&db.connection, "latest").await;
    let now = Utc::now();

    create_subscription_at(
        &db.connection,
        subscription_input(account.id, DEFAULT_SUBSCRIPTION, "pro", SubscriptionState::Active),
        now - Duration::days(30),
    )
    .await;
    let newest = create_subscription_at(
        &db.connection,
        subscription_input(
            account.id,
            DEFAULT_SUBSCRIPTION,
            "pro",
            SubscriptionState::Deactivated,
        ),
        now - Duration::days(1),
    )
    .await;

    let service = EntitlementService::new(db.connection.clone());
    let found = service.subscription(&account, None).await.unwrap().unwrap();
    assert_eq!(found.id, newest.id);

    // 古い active な行は参照されない
    assert!(!service.subscribed(&account, None, None).await.unwrap());
}

#[tokio::test]
async fn test_identical_created_at_breaks_tie_on_id() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let account = create_account(&db.connection, "tie").await;
    let created_at = Utc::now() - Duration::hours(1);

    for (id, plan) in [(1u128, "basic"), (2u128, "pro")] {
        create_subscription_at(
            &db.connection,
            CreateSubscription {
                id: Some(Uuid::from_u128(id)),
                ..subscription_input(account.id, DEFAULT_SUBSCRIPTION, plan, SubscriptionState::Active)
            },
            created_at,
        )
        .await;
    }

    let repo = SubscriptionRepository::new(db.connection.clone());
    let found = repo
        .subscription_for(account.id, DEFAULT_SUBSCRIPTION)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, Uuid::from_u128(2));
    assert_eq!(found.plan, "pro");
}

#[tokio::test]
async fn test_slots_are_looked_up_by_name() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let account = create_account(&db.connection, "slots").await;

    create_subscription(&db.connection, account.id, "pro", SubscriptionState::Active).await;
    SubscriptionRepository::new(db.connection.clone())
        .create(subscription_input(
            account.id,
            "storage",
            "storage-100",
            SubscriptionState::Canceled,
        ))
        .await
        .unwrap();

    let service = EntitlementService::new(db.connection.clone());

    assert!(service.subscribed(&account, None, Some("pro")).await.unwrap());
    assert!(!service
        .subscribed(&account, Some("storage"), None)
        .await
        .unwrap());
    assert!(service
        .subscription(&account, Some("missing"))
        .await
        .unwrap()
        .is_none());

    let all = service.subscriptions(&account).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_absent_subscription_is_not_an_error() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let account = create_account(&db.connection, "empty").await;
    let service = EntitlementService::new(db.connection.clone());

    assert!(service.subscription(&account, None).await.unwrap().is_none());
    assert!(!service.subscribed(&account, None, None).await.unwrap());
    assert!(!service.on_trial(&account, None, None).await.unwrap());
    assert!(!service.on_plan(&account, "pro").await.unwrap());
    assert!(!service
        .subscribed_to_plan(&account, &["pro"], None)
        .await
        .unwrap());
}
