// billing-entitlements/src/domain/plan_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// プラン定義。識別子は FastSpring の product path と同じ文字列
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub is_for_teams: bool,
    /// Maximum number of team members the plan pays for.
    pub teams_limit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// チーム向けプランか
    pub fn is_for_teams(&self) -> bool {
        self.is_for_teams
    }

    /// メンバー数が上限を超えているか（上限ちょうどは超過ではない）
    pub fn exceeds_teams_limit(&self, member_count: u64) -> bool {
        i64::try_from(member_count).map_or(true, |count| count > i64::from(self.teams_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(teams_limit: i32) -> Model {
        let now = Utc::now();
        Model {
            id: "team-monthly".to_string(),
            name: "Team Monthly".to_string(),
            is_for_teams: true,
            teams_limit,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_teams_limit_boundary() {
        let plan = plan(5);
        assert!(!plan.exceeds_teams_limit(0));
        assert!(!plan.exceeds_teams_limit(5));
        assert!(plan.exceeds_teams_limit(6));
    }

    #[test]
    fn test_zero_limit_plan() {
        let plan = plan(0);
        assert!(!plan.exceeds_teams_limit(0));
        assert!(plan.exceeds_teams_limit(1));
    }
}
