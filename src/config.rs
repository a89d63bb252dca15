use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    pub admin: AdminConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub session_ttl_seconds: i64,
}

// Keep the password out of debug logs
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackendKind {
    Json,
    Redb,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StateBackendKind,
    /// Directory holding the carousel state (JSON file or redb database)
    pub data_dir: String,
    /// Directory holding uploaded media
    pub uploads_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
            session_ttl_seconds: 12 * 60 * 60,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StateBackendKind::Json,
            data_dir: "./data".to_string(),
            uploads_dir: "./uploads".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .ok()
            .or_else(|| std::env::var("PORT").ok().map(|p| format!("0.0.0.0:{p}")))
            .unwrap_or_else(|| ServerConfig::default().bind_address);

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        let uploads_dir = std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let backend = match std::env::var("STATE_BACKEND")
            .unwrap_or_else(|_| "json".to_string())
            .to_lowercase()
            .as_str()
        {
            "redb" => StateBackendKind::Redb,
            "json" => StateBackendKind::Json,
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "STATE_BACKEND must be 'json' or 'redb', got '{other}'"
                )))
            }
        };

        let defaults = AdminConfig::default();
        let username = std::env::var("ADMIN_USER").unwrap_or(defaults.username);
        let password = std::env::var("ADMIN_PASS").unwrap_or(defaults.password);
        let session_ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.session_ttl_seconds);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let config = Config {
            admin: AdminConfig {
                username,
                password,
                session_ttl_seconds,
            },
            server: ServerConfig { bind_address },
            storage: StorageConfig {
                backend,
                data_dir,
                uploads_dir,
            },
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_USER cannot be empty".to_string(),
            ));
        }

        if self.admin.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_PASS cannot be empty".to_string(),
            ));
        }

        if self.admin.session_ttl_seconds <= 0 {
            return Err(ConfigError::ValidationError(
                "SESSION_TTL_SECONDS must be positive".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.admin.password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                "ADMIN_PASS is the built-in default. Set ADMIN_PASS before exposing this server."
            );
        }

        Ok(())
    }
}
