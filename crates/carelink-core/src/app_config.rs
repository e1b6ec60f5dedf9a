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

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the coordination service API, e.g. `https://api.example.org/api/`.
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Upper bound on any single API call, including the body read.
    pub request_timeout_secs: u64,
    /// Maximum age of a fetched hospital snapshot before it must be refetched.
    pub hospitals_max_age_secs: u64,
    /// Where the CLI persists the session token pair between runs.
    pub credentials_path: PathBuf,
    pub user_agent: String,
}
