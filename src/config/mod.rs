use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cosmos: CosmosConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dashboard_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub filter: String,
    pub enable_request_logging: bool,
}

/// Document store connection settings. Every field is optional so the
/// service can start, and report what is missing, without them.
#[derive(Clone, Default)]
pub struct CosmosConfig {
    pub endpoint: Option<String>,
    pub key: Option<String>,
    pub database: Option<String>,
    pub container: Option<String>,
}

impl fmt::Debug for CosmosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("container", &self.container)
            .finish()
    }
}

impl CosmosConfig {
    /// Names of the required variables that are not set
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.endpoint.is_none() {
            missing.push("COSMOS_ENDPOINT");
        }
        if self.key.is_none() {
            missing.push("COSMOS_KEY");
        }
        if self.database.is_none() {
            missing.push("COSMOS_DATABASE");
        }
        if self.container.is_none() {
            missing.push("COSMOS_CONTAINER");
        }
        missing
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match var("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        // Server overrides
        if let Some(v) = var("HOST") {
            config.server.host = v;
        }
        if let Some(v) = var("PORT") {
            config.server.port = v.parse().unwrap_or(config.server.port);
        }
        if let Some(v) = var("DASHBOARD_DIR") {
            config.server.dashboard_dir = PathBuf::from(v);
        }

        // Logging overrides
        if let Some(v) = var("LOG_FILTER") {
            config.logging.filter = v;
        }
        if let Some(v) = var("API_ENABLE_REQUEST_LOGGING") {
            config.logging.enable_request_logging =
                v.parse().unwrap_or(config.logging.enable_request_logging);
        }

        config.cosmos = CosmosConfig {
            endpoint: var("COSMOS_ENDPOINT"),
            key: var("COSMOS_KEY"),
            database: var("COSMOS_DATABASE"),
            container: var("COSMOS_CONTAINER"),
        };

        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn server_defaults() -> ServerConfig {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            dashboard_dir: PathBuf::from("public"),
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: Self::server_defaults(),
            logging: LoggingConfig {
                filter: "debug,hyper=info,reqwest=info".to_string(),
                enable_request_logging: true,
            },
            cosmos: CosmosConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: Self::server_defaults(),
            logging: LoggingConfig {
                filter: "info,tower_http=debug".to_string(),
                enable_request_logging: true,
            },
            cosmos: CosmosConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: Self::server_defaults(),
            logging: LoggingConfig {
                filter: "info".to_string(),
                enable_request_logging: false,
            },
            cosmos: CosmosConfig::default(),
        }
    }
}
