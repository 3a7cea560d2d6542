use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PG_PORT: u16 = 5432;
const DEFAULT_POOL_SIZE: usize = 16;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown STORE_BACKEND '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
    pub pool_size: usize,
}

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub backend: StoreBackend,
    /// Present only when `backend` is postgres.
    pub postgres: Option<PgSettings>,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::Postgres,
        };

        let postgres = match backend {
            StoreBackend::Memory => None,
            StoreBackend::Postgres => Some(PgSettings {
                host: lookup("PG_HOST").context("PG_HOST not set")?,
                port: parse_or(&lookup, "PG_PORT", DEFAULT_PG_PORT)?,
                user: lookup("PG_USER").context("PG_USER not set")?,
                password: lookup("PG_PASS"),
                dbname: lookup("PG_DB").context("PG_DB not set")?,
                pool_size: parse_or(&lookup, "PG_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            }),
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Settings {
            port,
            backend,
            postgres,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(e) => bail!("invalid {} '{}': {}", key, raw, e),
        },
    }
}

pub fn get_pg_pool(settings: &PgSettings) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(settings.host.clone());
    cfg.port = Some(settings.port);
    cfg.user = Some(settings.user.clone());
    cfg.password = settings.password.clone();
    cfg.dbname = Some(settings.dbname.clone());

    let mut pool = PoolConfig::default();
    pool.max_size = settings.pool_size;
    cfg.pool = Some(pool);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}
