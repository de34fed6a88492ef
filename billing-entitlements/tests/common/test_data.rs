// tests/common/test_data.rs

use billing_entitlements::domain::account_model::Model as Account;
use billing_entitlements::domain::entitlement_rules::DEFAULT_SUBSCRIPTION;
use billing_entitlements::domain::plan_model::Model as Plan;
use billing_entitlements::domain::subscription_model::{
    Model as Subscription, SubscriptionState,
};
use billing_entitlements::domain::team_member_model::Model as TeamMember;
use billing_entitlements::domain::team_model::Model as Team;
use billing_entitlements::repository::account_repository::{AccountRepository, CreateAccount};
use billing_entitlements::repository::plan_repository::{CreatePlan, PlanRepository};
use billing_entitlements::repository::subscription_repository::{
    CreateSubscription, SubscriptionRepository,
};
use billing_entitlements::repository::team_repository::TeamRepository;
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub fn account_input(label: &str) -> CreateAccount {
    CreateAccount {
        email: format!("{}_{}@example.com", label, Uuid::new_v4().simple()),
        first_name: label.to_string(),
        last_name: "Tester".to_string(),
        ..Default::default()
    }
}

pub async fn create_account(db: &DatabaseConnection, label: &str) -> Account {
    AccountRepository::new(db.clone())
        .create(account_input(label))
        .await
        .unwrap()
}

/// 汎用トライアル中のアカウント（7 日後に終了）
pub async fn create_trial_account(db: &DatabaseConnection, label: &str, plan: &str) -> Account {
    AccountRepository::new(db.clone())
        .create(CreateAccount {
            trial_ends_at: Some(Utc::now() + Duration::days(7)),
            trial_plan: Some(plan.to_string()),
            ..account_input(label)
        })
        .await
        .unwrap()
}

pub async fn create_plan(
    db: &DatabaseConnection,
    id: &str,
    is_for_teams: bool,
    teams_limit: i32,
) -> Plan {
    PlanRepository::new(db.clone())
        .create(CreatePlan {
            id: id.to_string(),
            name: id.to_string(),
            is_for_teams,
            teams_limit,
        })
        .await
        .unwrap()
}

pub fn subscription_input(
    account_id: Uuid,
    name: &str,
    plan: &str,
    state: SubscriptionState,
) -> CreateSubscription {
    CreateSubscription {
        id: None,
        account_id,
        name: name.to_string(),
        plan: plan.to_string(),
        fastspring_id: Some(format!("fs-sub-{}", Uuid::new_v4().simple())),
        state: state.to_string(),
        trial_ends_at: None,
        ends_at: None,
        created_at: None,
    }
}

pub async fn create_subscription(
    db: &DatabaseConnection,
    account_id: Uuid,
    plan: &str,
    state: SubscriptionState,
) -> Subscription {
    SubscriptionRepository::new(db.clone())
        .create(subscription_input(
            account_id,
            DEFAULT_SUBSCRIPTION,
            plan,
            state,
        ))
        .await
        .unwrap()
}

pub async fn create_subscription_at(
    db: &DatabaseConnection,
    input: CreateSubscription,
    created_at: DateTime<Utc>,
) -> Subscription {
    SubscriptionRepository::new(db.clone())
        .create(CreateSubscription {
            created_at: Some(created_at),
            ..input
        })
        .await
        .unwrap()
}

pub async fn create_team(db: &DatabaseConnection, owner: &Account, name: &str) -> Team {
    let team = Team::new_team(name.to_string(), owner.id, None);
    TeamRepository::new(db.clone())
        .create_team(&team)
        .await
        .unwrap()
}

pub async fn add_member(db: &DatabaseConnection, team: &Team, account: &Account) -> TeamMember {
    TeamRepository::new(db.clone())
        .add_member(&TeamMember::new_member(team.id, account.id))
        .await
        .unwrap()
}
