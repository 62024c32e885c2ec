/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `DATABASE_URL`: SQLite connection string (default: sqlite://taskmanager.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `DEFAULT_OWNER_ID`: User that owns tasks created without a caller identity (default: 1)
/// - `DEFAULT_OWNER_EMAIL`: Email used when seeding that user (default: owner@taskmanager.local)
/// - `RUST_LOG`: Log filter (default: taskmanager_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskmanager_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use taskmanager_shared::db::pool::{self, DatabaseConfig as PoolConfig};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Default task owner configuration
    pub owner: OwnerConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Owner assigned to tasks when the request carries no caller identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// User ID of the default owner
    pub default_id: i64,

    /// Email the default owner is seeded with if the row is missing
    pub default_email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "sqlite://taskmanager.db".to_string(),
                max_connections: 10,
            },
            owner: OwnerConfig {
                default_id: 1,
                default_email: "owner@taskmanager.local".to_string(),
            },
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    ///
    /// Missing variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("API_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("API_PORT must be a port number: {}", e))?,
            None => defaults.api.port,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be an integer: {}", e))?,
            None => defaults.database.max_connections,
        };
        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let default_owner_id = match lookup("DEFAULT_OWNER_ID") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| anyhow::anyhow!("DEFAULT_OWNER_ID must be an integer: {}", e))?,
            None => defaults.owner.default_id,
        };

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.api.cors_origins,
        };

        Ok(Self {
            api: ApiConfig {
                host: lookup("API_HOST").unwrap_or(defaults.api.host),
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections,
            },
            owner: OwnerConfig {
                default_id: default_owner_id,
                default_email: lookup("DEFAULT_OWNER_EMAIL").unwrap_or(defaults.owner.default_email),
            },
        })
    }

    /// Configuration backed by a private in-memory database, bound to an
    /// ephemeral localhost port
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.api.host = "127.0.0.1".to_string();
        config.api.port = 0;
        config.database.url = pool::IN_MEMORY_URL.to_string();
        config.database.max_connections = 1;
        config
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }

    /// Connection pool settings for this configuration
    pub fn pool_config(&self) -> PoolConfig {
        let base = PoolConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            ..Default::default()
        };

        if base.is_in_memory() {
            PoolConfig {
                url: base.url,
                ..PoolConfig::in_memory()
            }
        } else {
            base
        }
    }
}
