use axum::http::HeaderValue;
use rewards_core::lock_keys::DEFAULT_LOCK_CLEANUP_INTERVAL_SECS;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Interval between expired-lease housekeeping passes (default: `60`).
    pub lock_cleanup_interval_secs: u64,
    /// Optional webhook receiving every committed economic event.
    pub notify_webhook_url: Option<String>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `LOCK_CLEANUP_INTERVAL_SECS` | `60`                    |
    /// | `NOTIFY_WEBHOOK_URL`         | unset                   |
    /// | `LOG_FORMAT`                 | `text`                  |
    pub fn from_env() -> Result<Self, String> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", 3000)?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| format!("Invalid CORS origin '{o}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", 30)?;

        let lock_cleanup_interval_secs: u64 =
            parse_var("LOCK_CLEANUP_INTERVAL_SECS", DEFAULT_LOCK_CLEANUP_INTERVAL_SECS)?;
        if lock_cleanup_interval_secs == 0 {
            return Err("LOCK_CLEANUP_INTERVAL_SECS must be greater than 0".into());
        }

        let notify_webhook_url = std::env::var("NOTIFY_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => {
                return Err(format!("LOG_FORMAT must be 'text' or 'json', got '{other}'"));
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            lock_cleanup_interval_secs,
            notify_webhook_url,
            log_format,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            let expected = std::any::type_name::<T>();
            format!("{name} must be a valid {expected}, got '{raw}'")
        }),
        Err(_) => Ok(default),
    }
}
