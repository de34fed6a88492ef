// src/repository/plan_repository.rs

use crate::domain::plan_model::{self, ActiveModel as PlanActiveModel, Entity as PlanEntity};
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Set};

#[derive(Debug, Clone)]
pub struct PlanRepository {
    db: DbConn,
}

impl PlanRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<plan_model::Model>, DbErr> {
        PlanEntity::find_by_id(id.to_string()).one(&self.db).await
    }

    pub async fn create(&self, create_plan: CreatePlan) -> Result<plan_model::Model, DbErr> {
        let now = Utc::now();
        let new_plan = PlanActiveModel {
            id: Set(create_plan.id),
            name: Set(create_plan.name),
            is_for_teams: Set(create_plan.is_for_teams),
            teams_limit: Set(create_plan.teams_limit),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_plan.insert(&self.db).await
    }
}

#[derive(Debug)]
pub struct CreatePlan {
    pub id: String,
    pub name: String,
    pub is_for_teams: bool,
    pub teams_limit: i32,
}
