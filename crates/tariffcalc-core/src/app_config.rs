use crate::types::Language;

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

impl Environment {
    /// Production only talks to the backend over TLS.
    #[must_use]
    pub fn requires_https(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Runtime settings for the tariff client and CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Root of the tariff backend; `/api/...` paths are joined onto it.
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Language used when a city carries per-language names.
    pub language: Language,
}
