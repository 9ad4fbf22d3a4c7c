use crate::auth::token::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

/// Secret used when none is configured. Only suitable for local development.
pub const DEV_SECRET_KEY: &str = "bucketlist-dev-secret-change-me";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub secret_key: String,
    pub token_ttl_secs: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Bucketlist API")]
pub struct Args {
    /// Host to bind to (overrides BUCKETLIST_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BUCKETLIST_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides BUCKETLIST_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Token signing secret (overrides BUCKETLIST_SECRET_KEY)
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Token lifetime in seconds (overrides BUCKETLIST_TOKEN_TTL_SECS)
    #[arg(long)]
    pub token_ttl_secs: Option<i64>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let cfg = Self::merge(
            args.host,
            args.port,
            args.database_url,
            args.secret_key,
            args.token_ttl_secs,
        )?;
        Ok((cfg, args.migrate))
    }

    fn merge(
        host: Option<String>,
        port: Option<u16>,
        database_url: Option<String>,
        secret_key: Option<String>,
        token_ttl_secs: Option<i64>,
    ) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("BUCKETLIST_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_env("BUCKETLIST_PORT", 3000)?;
        let env_db = env::var("BUCKETLIST_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/bucketlist.db".into());
        let env_secret = env::var("BUCKETLIST_SECRET_KEY").ok();
        let env_ttl = parse_env("BUCKETLIST_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;

        let secret_key = match secret_key.or(env_secret) {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("BUCKETLIST_SECRET_KEY is not set; using the development secret");
                DEV_SECRET_KEY.to_string()
            }
        };

        let token_ttl_secs = token_ttl_secs.unwrap_or(env_ttl);
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            anyhow::bail!(
                "token lifetime must be between 1 and {} seconds, got {}",
                MAX_TOKEN_TTL_SECS,
                token_ttl_secs
            );
        }

        // --- Merge ---
        Ok(Self {
            host: host.unwrap_or(env_host),
            port: port.unwrap_or(env_port),
            database_url: database_url.unwrap_or(env_db),
            secret_key,
            token_ttl_secs,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse an optional environment variable, falling back to `default`.
fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
