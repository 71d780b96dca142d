use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub drafts: DraftConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
    /// Origin браузерного фронтенда; `*` разрешает любой.
    pub cors_allow_origin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{other}', expected 'pretty' or 'json'"),
        }
    }
}

// Внешний бэкенд кинотеатра
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// Настройки Circuit Breaker
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout_seconds: u64,
}

// Черновики броней
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    pub idle_ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl DraftConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Собирает конфигурацию из произвольного источника переменных.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            app: AppConfig {
                host: string("HOST", "0.0.0.0"),
                port: parsed(&lookup, "PORT", 8000)?,
                environment: string("ENVIRONMENT", "development"),
                rust_log: string("RUST_LOG", "cinema_admin=debug,tower_http=debug"),
                log_format: parsed(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
                cors_allow_origin: string("CORS_ALLOW_ORIGIN", "*"),
            },
            backend: BackendConfig {
                base_url: string("BACKEND_URL", "http://localhost:3000"),
                timeout_seconds: parsed(&lookup, "BACKEND_TIMEOUT_SECONDS", 30)?,
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: parsed(&lookup, "CIRCUIT_BREAKER_FAILURE_THRESHOLD", 5)?,
                timeout_seconds: parsed(&lookup, "CIRCUIT_BREAKER_TIMEOUT_SECONDS", 60)?,
            },
            drafts: DraftConfig {
                idle_ttl_seconds: parsed(&lookup, "DRAFT_IDLE_TTL_SECONDS", 1800)?,
                sweep_interval_seconds: parsed(&lookup, "DRAFT_SWEEP_INTERVAL_SECONDS", 300)?,
            },
        })
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        None => Ok(default),
    }
}
