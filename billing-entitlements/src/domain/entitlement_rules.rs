// billing-entitlements/src/domain/entitlement_rules.rs

//! エンタイトルメント判定ルール
//!
//! DB に触れない純粋関数群。サブスクリプションは呼び出し側で取得済みのものを渡し、
//! 現在時刻も明示的に受け取る。

use super::entitlement_subject::EntitlementSubject;
use super::subscription_model::Model as Subscription;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};

/// 名前を指定しない場合のサブスクリプションスロット
pub const DEFAULT_SUBSCRIPTION: &str = "default";

/// アカウント単位のトライアル中か。`plan` 指定時はトライアル対象プランも一致すること
pub fn on_generic_trial<S>(subject: &S, plan: Option<&str>, now: DateTime<Utc>) -> bool
where
    S: EntitlementSubject + ?Sized,
{
    let in_window = subject
        .trial_ends_at()
        .is_some_and(|ends_at| ends_at > now);

    match plan {
        Some(plan) => in_window && subject.trial_plan() == Some(plan),
        None => in_window,
    }
}

/// スロットのサブスクリプション自体がトライアル中か
pub fn subscription_on_trial(
    subscription: Option<&Subscription>,
    plan: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    subscription.is_some_and(|subscription| {
        subscription.on_trial(now) && plan.map_or(true, |plan| subscription.has_plan(plan))
    })
}

/// `name` と `plan` がどちらも未指定の場合に限り、汎用トライアルも対象に含める
pub fn on_trial<S>(
    subject: &S,
    name: Option<&str>,
    plan: Option<&str>,
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> bool
where
    S: EntitlementSubject + ?Sized,
{
    if name.is_none() && plan.is_none() && on_generic_trial(subject, None, now) {
        return true;
    }

    subscription_on_trial(subscription, plan, now)
}

/// サブスクリプションが有効で、指定があればプランも一致するか
pub fn subscription_grants(
    subscription: &Subscription,
    plan: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    subscription.is_valid(now) && plan.map_or(true, |plan| subscription.has_plan(plan))
}

pub fn subscribed<S>(
    subject: &S,
    plan: Option<&str>,
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> bool
where
    S: EntitlementSubject + ?Sized,
{
    if on_generic_trial(subject, plan, now) {
        return true;
    }

    subscription.is_some_and(|subscription| subscription_grants(subscription, plan, now))
}

/// いずれかのプランに対して有効な契約があるか。空のプラン集合は呼び出し側の誤り
pub fn subscribed_to_plan<S, P>(
    subject: &S,
    plans: &[P],
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> AppResult<bool>
where
    S: EntitlementSubject + ?Sized,
    P: AsRef<str>,
{
    if plans.is_empty() {
        return Err(AppError::ValidationError(
            "At least one plan must be given".to_string(),
        ));
    }

    if plans
        .iter()
        .any(|plan| on_generic_trial(subject, Some(plan.as_ref()), now))
    {
        return Ok(true);
    }

    let Some(subscription) = subscription.filter(|subscription| subscription.is_valid(now)) else {
        return Ok(false);
    };

    Ok(plans
        .iter()
        .any(|plan| subscription.has_plan(plan.as_ref())))
}

/// スロット名を問わず、指定プランの有効なサブスクリプションを持つか
pub fn on_plan<S>(
    subject: &S,
    plan: &str,
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
) -> bool
where
    S: EntitlementSubject + ?Sized,
{
    if on_generic_trial(subject, Some(plan), now) {
        return true;
    }

    subscriptions
        .iter()
        .any(|subscription| subscription.has_plan(plan) && subscription.is_valid(now))
}
