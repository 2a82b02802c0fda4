use serde::Deserialize;

use crate::services::classifier::MatchPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// DeepSeek API key
    pub deepseek_api_key: String,

    /// DeepSeek API base URL (OpenAI-compatible)
    #[serde(default = "default_deepseek_api_url")]
    pub deepseek_api_url: String,

    /// Chat model requested from the completion service
    #[serde(default = "default_deepseek_model")]
    pub deepseek_model: String,

    #[serde(default = "default_completion_max_tokens")]
    pub completion_max_tokens: u32,

    #[serde(default = "default_completion_temperature")]
    pub completion_temperature: f32,

    /// Upper bound on a single completion round-trip
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,

    /// How history tokens map products onto buckets
    #[serde(default)]
    pub match_policy: MatchPolicy,

    /// Stock level below which a product counts as low stock
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// Idle seconds before a chat session expires
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_database_url() -> String {
    "sqlite://store.db?mode=rwc".to_string()
}

fn default_deepseek_api_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_completion_max_tokens() -> u32 {
    500
}

fn default_completion_temperature() -> f32 {
    0.7
}

fn default_completion_timeout_secs() -> u64 {
    30
}

fn default_low_stock_threshold() -> i64 {
    5
}

fn default_session_ttl_secs() -> u64 {
    3600
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.deepseek_api_key.trim().is_empty() {
            anyhow::bail!("DEEPSEEK_API_KEY is empty; set it in the environment or .env file");
        }
        Ok(())
    }
}
