use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) db_max_connections: u32,
    pub(crate) jwt_secret: String,
    pub(crate) jwt_audience: Option<String>,
    pub(crate) jwt_issuer: Option<String>,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) http_request_timeout_secs: u64,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = get_required(&lookup, "DATABASE_URL")?;
        let jwt_secret = get_required(&lookup, "JWT_SECRET")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        let jwt_audience = get_optional(&lookup, "JWT_AUDIENCE");
        let jwt_issuer = get_optional(&lookup, "JWT_ISSUER");

        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let db_max_connections = parse_positive(&lookup, "DB_MAX_CONNECTIONS", 10u32)?;
        let http_request_body_limit_bytes =
            parse_positive(&lookup, "HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024usize)?;
        let http_concurrency_limit = parse_positive(&lookup, "HTTP_CONCURRENCY_LIMIT", 256usize)?;
        let http_request_timeout_secs =
            parse_positive(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", 10u64)?;

        Ok(Self {
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_audience,
            jwt_issuer,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
        })
    }
}

fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get_optional(lookup, key).ok_or_else(|| anyhow!("{key} is required and must not be empty"))
}

fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default + Copy,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?,
        None => default,
    };

    if value <= T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Settings, parse_cors_origins};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_are_applied() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/marketplace"),
            ("JWT_SECRET", SECRET),
        ])
        .expect("settings must load");

        assert_eq!(settings.http_addr, "0.0.0.0:8080");
        assert_eq!(settings.db_max_connections, 10);
        assert_eq!(settings.http_request_timeout_secs, 10);
        assert_eq!(settings.http_request_body_limit_bytes, 1024 * 1024);
        assert!(settings.jwt_audience.is_none());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn database_url_is_required() {
        let err = settings_from(&[("JWT_SECRET", SECRET)]).expect_err("must fail");
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/marketplace"),
            ("JWT_SECRET", "short"),
        ])
        .expect_err("must fail");
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let result = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/marketplace"),
            ("JWT_SECRET", SECRET),
            ("HTTP_CONCURRENCY_LIMIT", "0"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn blank_audience_is_treated_as_absent() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/marketplace"),
            ("JWT_SECRET", SECRET),
            ("JWT_AUDIENCE", "   "),
            ("JWT_ISSUER", "https://example.auth0.com/"),
        ])
        .expect("settings must load");

        assert!(settings.jwt_audience.is_none());
        assert_eq!(
            settings.jwt_issuer.as_deref(),
            Some("https://example.auth0.com/")
        );
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let origins = parse_cors_origins(" http://a.test , ,http://b.test".to_string());
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
