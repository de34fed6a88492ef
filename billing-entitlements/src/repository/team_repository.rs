// src/repository/team_repository.rs

use crate::domain::plan_model::Model as Plan;
use crate::domain::team_member_model::{
    ActiveModel as TeamMemberActiveModel, Column as TeamMemberColumn, Entity as TeamMemberEntity,
    Model as TeamMember,
};
use crate::domain::team_model::{
    ActiveModel as TeamActiveModel, Column as TeamColumn, Entity as TeamEntity, Model as Team,
};
use crate::error::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

// Helper function to convert SeaORM errors to AppError
fn map_db_error(err: DbErr) -> AppError {
    AppError::InternalServerError(err.to_string())
}

/// メンバー数チェックと削除の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberReset {
    pub member_count: u64,
    pub removed_members: u64,
}

pub struct TeamRepository {
    db: DatabaseConnection,
}

impl TeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// チームを作成
    pub async fn create_team(&self, team: &Team) -> AppResult<Team> {
        let active_model = TeamActiveModel {
            id: Set(team.id),
            name: Set(team.name.clone()),
            owner_id: Set(team.owner_id),
            plan_id: Set(team.plan_id.clone()),
            created_at: Set(team.created_at),
            updated_at: Set(team.updated_at),
        };

        let _result = active_model.insert(&self.db).await.map_err(map_db_error)?;
        Ok(team.clone())
    }

    /// チームをIDで取得
    pub async fn find_by_id(&self, team_id: Uuid) -> AppResult<Option<Team>> {
        let model = TeamEntity::find_by_id(team_id)
            .one(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model)
    }

    /// アカウントが所有する最初のチーム
    pub async fn find_owned_team(&self, owner_id: Uuid) -> AppResult<Option<Team>> {
        let model = TeamEntity::find()
            .filter(TeamColumn::OwnerId.eq(owner_id))
            .order_by_asc(TeamColumn::CreatedAt)
            .order_by_asc(TeamColumn::Id)
            .one(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model)
    }

    /// チームメンバーを追加
    pub async fn add_member(&self, member: &TeamMember) -> AppResult<TeamMember> {
        let active_model = TeamMemberActiveModel {
            id: Set(member.id),
            team_id: Set(member.team_id),
            account_id: Set(member.account_id),
            joined_at: Set(member.joined_at),
        };

        let _result = active_model.insert(&self.db).await.map_err(map_db_error)?;
        Ok(member.clone())
    }

    /// チームのメンバー一覧を取得
    pub async fn find_members_by_team_id(&self, team_id: Uuid) -> AppResult<Vec<TeamMember>> {
        let models = TeamMemberEntity::find()
            .filter(TeamMemberColumn::TeamId.eq(team_id))
            .order_by_asc(TeamMemberColumn::JoinedAt)
            .all(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(models)
    }

    /// アカウントが参加しているチーム一覧を取得（作成日時の昇順）
    pub async fn find_teams_by_member(&self, account_id: Uuid) -> AppResult<Vec<Team>> {
        let team_ids: Vec<Uuid> = TeamMemberEntity::find()
            .filter(TeamMemberColumn::AccountId.eq(account_id))
            .all(&self.db)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|model| model.team_id)
            .collect();

        if team_ids.is_empty() {
            return Ok(vec![]);
        }

        let models = TeamEntity::find()
            .filter(TeamColumn::Id.is_in(team_ids))
            .order_by_asc(TeamColumn::CreatedAt)
            .order_by_asc(TeamColumn::Id)
            .all(&self.db)
            .await
            .map_err(map_db_error)?;

        Ok(models)
    }

    /// チームのメンバー数を取得
    pub async fn count_members(&self, team_id: Uuid) -> AppResult<u64> {
        TeamMemberEntity::find()
            .filter(TeamMemberColumn::TeamId.eq(team_id))
            .count(&self.db)
            .await
            .map_err(map_db_error)
    }

    /// メンバー数がプラン上限を超えていれば全メンバーを削除する
    ///
    /// カウントと削除は同一トランザクション内で行い、PostgreSQL ではチーム行をロックする。
    pub async fn reset_members_if_over_limit(
        &self,
        team_id: Uuid,
        plan: &Plan,
    ) -> AppResult<MemberReset> {
        let txn = self.db.begin().await.map_err(map_db_error)?;

        if txn.get_database_backend() == DbBackend::Postgres {
            TeamEntity::find_by_id(team_id)
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;
        }

        let member_count = TeamMemberEntity::find()
            .filter(TeamMemberColumn::TeamId.eq(team_id))
            .count(&txn)
            .await
            .map_err(map_db_error)?;

        let removed_members = if plan.exceeds_teams_limit(member_count) {
            TeamMemberEntity::delete_many()
                .filter(TeamMemberColumn::TeamId.eq(team_id))
                .exec(&txn)
                .await
                .map_err(map_db_error)?
                .rows_affected
        } else {
            0
        };

        txn.commit().await.map_err(map_db_error)?;

        Ok(MemberReset {
            member_count,
            removed_members,
        })
    }
}
