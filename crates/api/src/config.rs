/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Where records are stored.
    pub backend: BackendConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend: BackendConfig::from_env(),
        }
    }
}

/// Record backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// In-process store, optionally seeded from a JSON file.
    Memory { seed_file: Option<String> },
    /// Hosted record service.
    Http {
        base_url: String,
        project_id: String,
        public_key: String,
    },
}

impl BackendConfig {
    /// Load backend settings from environment variables.
    ///
    /// | Env Var              | Default  | Notes                        |
    /// |----------------------|----------|------------------------------|
    /// | `RECORD_BACKEND`     | `memory` | `memory` or `http`           |
    /// | `SEED_FILE`          | unset    | memory only                  |
    /// | `RECORD_BACKEND_URL` | required | http only                    |
    /// | `RECORD_PROJECT_ID`  | required | http only                    |
    /// | `RECORD_PUBLIC_KEY`  | required | http only                    |
    pub fn from_env() -> Self {
        let kind = std::env::var("RECORD_BACKEND").unwrap_or_else(|_| "memory".into());

        match kind.trim().to_ascii_lowercase().as_str() {
            "memory" => Self::Memory {
                seed_file: std::env::var("SEED_FILE").ok().filter(|s| !s.is_empty()),
            },
            "http" => Self::Http {
                base_url: std::env::var("RECORD_BACKEND_URL")
                    .expect("RECORD_BACKEND_URL must be set when RECORD_BACKEND=http"),
                project_id: std::env::var("RECORD_PROJECT_ID")
                    .expect("RECORD_PROJECT_ID must be set when RECORD_BACKEND=http"),
                public_key: std::env::var("RECORD_PUBLIC_KEY")
                    .expect("RECORD_PUBLIC_KEY must be set when RECORD_BACKEND=http"),
            },
            other => panic!("RECORD_BACKEND must be 'memory' or 'http', got '{other}'"),
        }
    }

    /// Short name reported by the health endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Http { .. } => "http",
        }
    }
}
