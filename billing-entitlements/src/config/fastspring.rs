use std::env;

pub const DEFAULT_FASTSPRING_API_URL: &str = "https://api.fastspring.com";

#[derive(Clone, Debug)]
pub struct FastspringConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub development_mode: bool,
}

impl FastspringConfig {
    pub fn from_env() -> Result<Self, String> {
        let development_mode = env::var("FASTSPRING_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        if development_mode {
            tracing::info!("FastSpring development mode enabled - using mock responses");
            return Ok(Self::development());
        }

        // 本番/テストモードの設定
        let username = env::var("FASTSPRING_USERNAME")
            .map_err(|_| "FASTSPRING_USERNAME must be set when not in development mode")?;
        let password = env::var("FASTSPRING_PASSWORD")
            .map_err(|_| "FASTSPRING_PASSWORD must be set when not in development mode")?;

        let api_url = env::var("FASTSPRING_API_URL")
            .unwrap_or_else(|_| DEFAULT_FASTSPRING_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            tracing::error!(api_url = %api_url, "FASTSPRING_API_URL must be an http(s) URL");
            return Err(format!("Invalid FASTSPRING_API_URL: {}", api_url));
        }

        Ok(Self {
            api_url,
            username,
            password,
            development_mode: false,
        })
    }

    /// 外部 API を呼ばない開発用設定
    pub fn development() -> Self {
        Self {
            api_url: DEFAULT_FASTSPRING_API_URL.to_string(),
            username: String::new(),
            password: String::new(),
            development_mode: true,
        }
    }
}
