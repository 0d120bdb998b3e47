use std::env;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and pulled
/// into handlers through `FromRef`, like the repository.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and which backends are allowed.
    pub env: Env,
    // Which `Repository` implementation backs the catalog.
    pub backend: Backend,
    // Database connection string (Postgres). Unused by the memory backend.
    pub db_url: Option<String>,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Upper bound of the Postgres connection pool.
    pub max_connections: u32,
}

/// Env
///
/// Runtime context: pretty logs and relaxed defaults locally, JSON logs and
/// strict requirements in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Backend
///
/// Persistence implementation selected through `CATALOG_BACKEND`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Backend {
    Postgres,
    Memory,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl Default for AppConfig {
    /// Safe, non-panicking configuration for tests: in-memory backend, no database.
    fn default() -> Self {
        Self {
            env: Env::Local,
            backend: Backend::Memory,
            db_url: None,
            bind_addr: "127.0.0.1:0".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables at startup.
    ///
    /// # Panics
    /// Panics when the selected backend is missing a required setting
    /// (`DATABASE_URL` for Postgres), when `DB_MAX_CONNECTIONS` is not a number,
    /// or when the memory backend is requested in production.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let backend = match env::var("CATALOG_BACKEND").as_deref() {
            Ok("memory") => Backend::Memory,
            _ => Backend::Postgres,
        };

        if env == Env::Production && backend == Backend::Memory {
            panic!("FATAL: CATALOG_BACKEND=memory is not allowed in production.");
        }

        let db_url = match backend {
            Backend::Postgres => Some(
                env::var("DATABASE_URL")
                    .expect("FATAL: DATABASE_URL required for the postgres backend"),
            ),
            Backend::Memory => env::var("DATABASE_URL").ok(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .map(|value| {
                value
                    .parse()
                    .expect("FATAL: DB_MAX_CONNECTIONS must be a positive integer")
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            env,
            backend,
            db_url,
            bind_addr,
            max_connections,
        }
    }
}
