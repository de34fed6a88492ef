use std::env;

/// 委譲（ピギーバック）探索のデフォルト最大深さ
pub const DEFAULT_MAX_DELEGATION_DEPTH: usize = 32;

#[derive(Clone, Debug)]
pub struct EntitlementConfig {
    /// チームオーナーを辿る最大段数
    pub max_delegation_depth: usize,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            max_delegation_depth: DEFAULT_MAX_DELEGATION_DEPTH,
        }
    }
}

/// 0 だとチーム経由の判定がすべて失敗するため 1 以上を要求する
fn parse_max_delegation_depth(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(depth) if depth >= 1 => Ok(depth),
        Ok(_) => Err("ENTITLEMENT_MAX_DELEGATION_DEPTH must be at least 1".to_string()),
        Err(_) => Err("Invalid ENTITLEMENT_MAX_DELEGATION_DEPTH value".to_string()),
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub entitlement: EntitlementConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let max_delegation_depth = match env::var("ENTITLEMENT_MAX_DELEGATION_DEPTH") {
            Ok(value) => parse_max_delegation_depth(&value)?,
            Err(_) => DEFAULT_MAX_DELEGATION_DEPTH,
        };

        Ok(Self {
            environment,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            entitlement: EntitlementConfig {
                max_delegation_depth,
            },
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    #[allow(dead_code)]
    pub fn is_test(&self) -> bool {
        self.environment == "test"
    }

    #[allow(dead_code)]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string()),
            entitlement: EntitlementConfig::default(),
        }
    }
}
