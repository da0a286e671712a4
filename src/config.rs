use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Database connection URL. Required: startup fails when absent.
    pub database_url: String,

    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    /// Taste-graph API base URL
    #[serde(default = "default_qloo_api_base_url")]
    pub qloo_api_base_url: String,

    /// Taste-graph API key. Without it, search resolution and insights
    /// queries degrade to empty results instead of failing.
    pub qloo_api_key: Option<String>,

    /// Gemini API key for natural-language entity resolution
    pub gemini_api_key: Option<String>,

    /// Gemini model used for /convert
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Secret used to sign session tokens
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Session token lifetime in minutes
    #[serde(default = "default_token_ttl_minutes")]
    pub access_token_expire_minutes: i64,

    /// Widens the default log filter when set
    #[serde(default)]
    pub debug: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_allowed_origins() -> String {
    "http://localhost:5173,http://localhost:3000,http://127.0.0.1:5173,http://127.0.0.1:3000"
        .to_string()
}

fn default_qloo_api_base_url() -> String {
    "https://hackathon.api.qloo.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_secret_key() -> String {
    "dev-only-insecure-secret".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// True when the token secret was never configured
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == default_secret_key()
    }

    /// Origins split out of the comma-separated `ALLOWED_ORIGINS` value
    pub fn cors_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}
