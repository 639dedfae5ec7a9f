//! Server configuration
//!
//! Everything comes from environment variables with working defaults,
//! so a bare `inkstone serve` starts against a local database. The CLI
//! can override the bind address and database URL per invocation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_JWT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Postgres connection string
    pub database_url: String,
    /// HMAC secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_ttl: Duration,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Directory for locally stored uploads, served under /uploads
    pub uploads_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Recognized variables: `HOST`, `PORT`, `DATABASE_URL`,
    /// `JWT_SECRET`, `JWT_EXPIRES_IN`, `CORS_ORIGIN` (comma-separated),
    /// `UPLOADS_DIR`. Unparseable values fall back to the default with
    /// a warning rather than refusing to start.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| match p.parse::<u16>() {
                Ok(p) => Some(p),
                Err(_) => {
                    tracing::warn!(value = %p, "unparseable PORT, using 4000");
                    None
                }
            })
            .unwrap_or(4000);

        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .unwrap_or_else(|_| {
                tracing::warn!(%host, port, "unparseable HOST, binding 127.0.0.1");
                SocketAddr::from(([127, 0, 0, 1], port))
            });

        let jwt_ttl = std::env::var("JWT_EXPIRES_IN")
            .ok()
            .and_then(|v| match parse_duration(&v) {
                Some(d) => Some(d),
                None => {
                    tracing::warn!(value = %v, "unparseable JWT_EXPIRES_IN, using 7d");
                    None
                }
            })
            .unwrap_or(DEFAULT_JWT_TTL);

        let cors_origins = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            bind_addr,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/inkstone".to_string()),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| "changeme".to_string()),
            jwt_ttl,
            cors_origins,
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
        }
    }

    /// True while the token secret is still the placeholder default.
    pub fn has_default_secret(&self) -> bool {
        self.jwt_secret == "changeme"
    }
}

/// Parse a token lifetime such as `7d`, `12h`, `30m`, `45s`, or a
/// plain number of seconds.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (digits, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => value.split_at(idx),
        None => (value, ""),
    };

    let amount: u64 = digits.parse().ok()?;
    let secs = match unit {
        "" | "s" => amount,
        "m" => amount.checked_mul(60)?,
        "h" => amount.checked_mul(60 * 60)?,
        "d" => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };

    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_suffixes() {
        assert_eq!(parse_duration("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("30m"), Some(Duration::from_secs(1800)));
        assert_eq!(parse_duration("12h"), Some(Duration::from_secs(43200)));
        assert_eq!(parse_duration("7d"), Some(Duration::from_secs(604800)));
    }

    #[test]
    fn duration_plain_seconds() {
        assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
    }

    #[test]
    fn duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("d"), None);
        assert_eq!(parse_duration("7w"), None);
        assert_eq!(parse_duration("later"), None);
    }
}
