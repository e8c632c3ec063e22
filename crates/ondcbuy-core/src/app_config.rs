use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Prefix prepended to a percent-encoded target URL when a request
    /// fails at the transport level.
    pub proxy_url: Option<String>,
    pub storage_path: PathBuf,
    pub context_path: PathBuf,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub confirm_settle_delay_ms: u64,
    pub confirm_max_retries: u32,
    pub confirm_backoff_base_ms: u64,
    pub confirm_deadline_ms: u64,
    pub mock_fallback: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("proxy_url", &self.proxy_url)
            .field("storage_path", &self.storage_path)
            .field("context_path", &self.context_path)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("confirm_settle_delay_ms", &self.confirm_settle_delay_ms)
            .field("confirm_max_retries", &self.confirm_max_retries)
            .field("confirm_backoff_base_ms", &self.confirm_backoff_base_ms)
            .field("confirm_deadline_ms", &self.confirm_deadline_ms)
            .field("mock_fallback", &self.mock_fallback)
            .finish()
    }
}
