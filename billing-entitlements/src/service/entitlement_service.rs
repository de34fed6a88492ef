// billing-entitlements/src/service/entitlement_service.rs

use crate::config::app::DEFAULT_MAX_DELEGATION_DEPTH;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::domain::entitlement_rules::{self, DEFAULT_SUBSCRIPTION};
use crate::domain::entitlement_subject::EntitlementSubject;
use crate::domain::subscription_model::Model as Subscription;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::logging::EvaluationContext;
use crate::repository::account_repository::AccountRepository;
use crate::repository::plan_repository::PlanRepository;
use crate::repository::subscription_repository::SubscriptionRepository;
use crate::repository::team_repository::TeamRepository;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// `reset_team_members` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TeamResetOutcome {
    /// 所有チームなし
    NoTeam,
    WithinLimit {
        team_id: Uuid,
        member_count: u64,
        teams_limit: i32,
    },
    /// 上限超過のため全メンバーを削除した
    Reset {
        team_id: Uuid,
        member_count: u64,
        teams_limit: i32,
        removed_members: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionSummary {
    pub plan: String,
    pub state: String,
    pub valid: bool,
    pub on_trial: bool,
    pub on_grace_period: bool,
}

/// アカウントのエンタイトルメント状況のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitlementReport {
    pub account_id: Uuid,
    pub on_generic_trial: bool,
    pub trial_plan: Option<String>,
    pub subscribed: bool,
    pub has_piggyback_subscription: bool,
    pub has_subscription: bool,
    pub has_team_subscription: bool,
    pub has_fastspring_id: bool,
    pub default_subscription: Option<SubscriptionSummary>,
    pub evaluated_at: DateTime<Utc>,
}

// 委譲探索のスタックフレーム
struct Frame {
    account_id: Uuid,
    owners: Vec<Uuid>,
    next: usize,
}

#[derive(Clone)]
pub struct EntitlementService {
    account_repo: Arc<AccountRepository>,
    subscription_repo: Arc<SubscriptionRepository>,
    plan_repo: Arc<PlanRepository>,
    team_repo: Arc<TeamRepository>,
    max_delegation_depth: usize,
}

impl EntitlementService {
    pub fn new(db: DbPool) -> Self {
        let account_repo = Arc::new(AccountRepository::new(db.clone()));
        let subscription_repo = Arc::new(SubscriptionRepository::new(db.clone()));
        let plan_repo = Arc::new(PlanRepository::new(db.clone()));
        let team_repo = Arc::new(TeamRepository::new(db));

        Self {
            account_repo,
            subscription_repo,
            plan_repo,
            team_repo,
            max_delegation_depth: DEFAULT_MAX_DELEGATION_DEPTH,
        }
    }

    pub fn from_config(db: DbPool, config: &AppConfig) -> Self {
        Self::new(db).with_max_delegation_depth(config.entitlement.max_delegation_depth)
    }

    pub fn with_max_delegation_depth(mut self, max_delegation_depth: usize) -> Self {
        self.max_delegation_depth = max_delegation_depth;
        self
    }

    pub fn max_delegation_depth(&self) -> usize {
        self.max_delegation_depth
    }

    // --- サブスクリプション参照 ---

    /// スロットの最新サブスクリプション。未指定なら "default"
    pub async fn subscription<S>(
        &self,
        subject: &S,
        name: Option<&str>,
    ) -> AppResult<Option<Subscription>>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let name = name.unwrap_or(DEFAULT_SUBSCRIPTION);
        Ok(self
            .subscription_repo
            .subscription_for(subject.subject_id(), name)
            .await?)
    }

    pub async fn subscriptions<S>(&self, subject: &S) -> AppResult<Vec<Subscription>>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        Ok(self
            .subscription_repo
            .find_by_account(subject.subject_id())
            .await?)
    }

    // --- 直接の判定 ---

    pub fn on_generic_trial<S>(&self, subject: &S, plan: Option<&str>) -> bool
    where
        S: EntitlementSubject + ?Sized,
    {
        entitlement_rules::on_generic_trial(subject, plan, Utc::now())
    }

    pub async fn on_trial<S>(
        &self,
        subject: &S,
        name: Option<&str>,
        plan: Option<&str>,
    ) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let now = Utc::now();
        if name.is_none() && plan.is_none() && entitlement_rules::on_generic_trial(subject, None, now)
        {
            return Ok(true);
        }

        let subscription = self.subscription(subject, name).await?;
        Ok(entitlement_rules::on_trial(
            subject,
            name,
            plan,
            subscription.as_ref(),
            now,
        ))
    }

    pub async fn subscribed<S>(
        &self,
        subject: &S,
        name: Option<&str>,
        plan: Option<&str>,
    ) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        self.subscribed_at(subject, name, plan, Utc::now()).await
    }

    async fn subscribed_at<S>(
        &self,
        subject: &S,
        name: Option<&str>,
        plan: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        // トライアル中なら DB を引かない
        if entitlement_rules::on_generic_trial(subject, plan, now) {
            return Ok(true);
        }

        let subscription = self.subscription(subject, name).await?;
        Ok(entitlement_rules::subscribed(
            subject,
            plan,
            subscription.as_ref(),
            now,
        ))
    }

    pub async fn subscribed_to_plan<S, P>(
        &self,
        subject: &S,
        plans: &[P],
        name: Option<&str>,
    ) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
        P: AsRef<str> + Sync,
    {
        let subscription = self.subscription(subject, name).await?;
        entitlement_rules::subscribed_to_plan(subject, plans, subscription.as_ref(), Utc::now())
    }

    pub async fn on_plan<S>(&self, subject: &S, plan: &str) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let now = Utc::now();
        if entitlement_rules::on_generic_trial(subject, Some(plan), now) {
            return Ok(true);
        }

        let subscriptions = self.subscriptions(subject).await?;
        Ok(entitlement_rules::on_plan(subject, plan, &subscriptions, now))
    }

    pub fn has_fastspring_id<S>(&self, subject: &S) -> bool
    where
        S: EntitlementSubject + ?Sized,
    {
        subject.has_fastspring_id()
    }

    // --- チーム経由の判定 ---

    /// 直接の契約、またはチームオーナー経由の契約があるか
    pub async fn has_subscription<S>(&self, subject: &S) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let context = EvaluationContext::start("has_subscription", subject.subject_id());
        let now = Utc::now();

        let result = match self.subscribed_at(subject, None, None, now).await {
            Ok(true) => Ok(true),
            Ok(false) => self.piggyback_at(subject.subject_id(), now).await,
            Err(err) => Err(err),
        };

        context.finish(result)
    }

    /// 所属チームのオーナー（推移的）が契約しているか
    pub async fn has_piggyback_subscription<S>(&self, subject: &S) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let context = EvaluationContext::start("has_piggyback_subscription", subject.subject_id());
        let result = self.piggyback_at(subject.subject_id(), Utc::now()).await;
        context.finish(result)
    }

    /// チームオーナーを深さ優先で辿る。経路上のアカウントへの再到達は循環としてエラー、
    /// 探索済みで契約なしと判明したアカウントは再探索しない。
    async fn piggyback_at(&self, root_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut on_path: HashSet<Uuid> = HashSet::from([root_id]);
        let mut exhausted: HashSet<Uuid> = HashSet::new();
        let mut stack = vec![Frame {
            account_id: root_id,
            owners: self.delegating_owners(root_id).await?,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.owners.len() {
                let finished = frame.account_id;
                stack.pop();
                on_path.remove(&finished);
                exhausted.insert(finished);
                continue;
            }

            let owner_id = frame.owners[frame.next];
            frame.next += 1;

            if on_path.contains(&owner_id) {
                log_with_context!(
                    tracing::Level::WARN,
                    "Delegation cycle detected",
                    "root_account_id" => root_id,
                    "account_id" => owner_id,
                    "depth" => stack.len(),
                );
                return Err(AppError::CycleDetected {
                    account_id: owner_id,
                });
            }

            if exhausted.contains(&owner_id) {
                continue;
            }

            // owner はルートから stack.len() 段目
            if stack.len() > self.max_delegation_depth {
                return Err(AppError::DelegationDepthExceeded {
                    max_depth: self.max_delegation_depth,
                });
            }

            let Some(owner) = self.account_repo.find_by_id(owner_id).await? else {
                exhausted.insert(owner_id);
                continue;
            };

            if self.subscribed_at(&owner, None, None, now).await? {
                log_with_context!(
                    tracing::Level::DEBUG,
                    "Piggyback subscription found",
                    "root_account_id" => root_id,
                    "owner_id" => owner_id,
                    "depth" => stack.len(),
                );
                return Ok(true);
            }

            let owners = self.delegating_owners(owner_id).await?;
            on_path.insert(owner_id);
            stack.push(Frame {
                account_id: owner_id,
                owners,
                next: 0,
            });
        }

        Ok(false)
    }

    /// 所属チームのオーナー一覧（チーム作成順、自分自身と重複は除外）
    async fn delegating_owners(&self, account_id: Uuid) -> AppResult<Vec<Uuid>> {
        let teams = self.team_repo.find_teams_by_member(account_id).await?;

        let mut seen = HashSet::new();
        Ok(teams
            .into_iter()
            .map(|team| team.owner_id)
            .filter(|owner_id| *owner_id != account_id && seen.insert(*owner_id))
            .collect())
    }

    /// アカウント自身のプランがチーム向けか
    pub async fn has_team_subscription<S>(&self, subject: &S) -> AppResult<bool>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let Some(plan_id) = subject.own_plan_id() else {
            return Ok(false);
        };

        Ok(self
            .plan_repo
            .find_by_id(plan_id)
            .await?
            .is_some_and(|plan| plan.is_for_teams()))
    }

    /// 所有チームのメンバー数が default サブスクリプションのプラン上限を超えていれば全員を外す
    pub async fn reset_team_members<S>(&self, subject: &S) -> AppResult<TeamResetOutcome>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let context = EvaluationContext::start("reset_team_members", subject.subject_id());
        let result = self.reset_owned_team(subject).await;
        context.finish(result)
    }

    async fn reset_owned_team<S>(&self, subject: &S) -> AppResult<TeamResetOutcome>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let account_id = subject.subject_id();

        let Some(team) = self.team_repo.find_owned_team(account_id).await? else {
            return Ok(TeamResetOutcome::NoTeam);
        };

        let subscription = self
            .subscription(subject, None)
            .await?
            .ok_or_else(|| {
                AppError::PreconditionFailed(format!(
                    "Account {} has no default subscription",
                    account_id
                ))
            })?;

        let plan = self
            .plan_repo
            .find_by_id(&subscription.plan)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", subscription.plan)))?;

        let reset = self
            .team_repo
            .reset_members_if_over_limit(team.id, &plan)
            .await?;

        if !plan.exceeds_teams_limit(reset.member_count) {
            return Ok(TeamResetOutcome::WithinLimit {
                team_id: team.id,
                member_count: reset.member_count,
                teams_limit: plan.teams_limit,
            });
        }

        log_with_context!(
            tracing::Level::INFO,
            "Team members reset",
            "team_id" => team.id,
            "owner_id" => account_id,
            "plan_id" => &plan.id,
            "teams_limit" => plan.teams_limit,
            "removed_members" => reset.removed_members,
        );

        Ok(TeamResetOutcome::Reset {
            team_id: team.id,
            member_count: reset.member_count,
            teams_limit: plan.teams_limit,
            removed_members: reset.removed_members,
        })
    }

    /// 判定結果をまとめたレポート
    pub async fn entitlement_report<S>(&self, subject: &S) -> AppResult<EntitlementReport>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let context = EvaluationContext::start("entitlement_report", subject.subject_id());
        let result = self.build_report(subject).await;
        context.finish(result)
    }

    async fn build_report<S>(&self, subject: &S) -> AppResult<EntitlementReport>
    where
        S: EntitlementSubject + Sync + ?Sized,
    {
        let now = Utc::now();
        let default_subscription = self.subscription(subject, None).await?;

        let subscribed = entitlement_rules::subscribed(
            subject,
            None,
            default_subscription.as_ref(),
            now,
        );
        let has_piggyback_subscription = self.piggyback_at(subject.subject_id(), now).await?;

        Ok(EntitlementReport {
            account_id: subject.subject_id(),
            on_generic_trial: entitlement_rules::on_generic_trial(subject, None, now),
            trial_plan: subject.trial_plan().map(str::to_string),
            subscribed,
            has_piggyback_subscription,
            has_subscription: subscribed || has_piggyback_subscription,
            has_team_subscription: self.has_team_subscription(subject).await?,
            has_fastspring_id: subject.has_fastspring_id(),
            default_subscription: default_subscription.map(|subscription| SubscriptionSummary {
                valid: subscription.is_valid(now),
                on_trial: subscription.on_trial(now),
                on_grace_period: subscription.on_grace_period(now),
                plan: subscription.plan,
                state: subscription.state,
            }),
            evaluated_at: now,
        })
    }
}
