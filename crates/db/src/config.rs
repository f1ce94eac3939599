//! Database connection settings.

use std::time::Duration;

use bulletin_core::config::{env_lookup, parse_or, required, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Connection and pool settings for the store.
///
/// | Env Var                   | Default                      |
/// |---------------------------|------------------------------|
/// | `DATABASE_URL`            | built from `DB_*` below      |
/// | `DB_HOST`                 | required without URL         |
/// | `DB_PORT`                 | `5432`                       |
/// | `DB_USER`                 | required without URL         |
/// | `DB_PASSWORD`             | empty                        |
/// | `DB_NAME`                 | required without URL         |
/// | `DB_SSL`                  | `disable`                    |
/// | `DB_MIN_CONNECTIONS`      | `2`                          |
/// | `DB_MAX_CONNECTIONS`      | `10`                         |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`                          |
/// | `DB_IDLE_TIMEOUT_SECS`    | `30`                         |
/// | `DB_TX_TIMEOUT_SECS`      | `10`                         |
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Parsed connection target. Credentials are kept as given, never
    /// spliced into a URL.
    pub connect_options: PgConnectOptions,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Longest wait for a free connection before an operation fails.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Deadline applied to each transactional operation.
    pub transaction_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let connect_options = match lookup("DATABASE_URL") {
            Some(url) => url.parse::<PgConnectOptions>().map_err(|e| ConfigError::Invalid {
                name: "DATABASE_URL",
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            })?,
            None => options_from_parts(&lookup)?,
        };

        let min_connections: u32 = parse_or(&lookup, "DB_MIN_CONNECTIONS", 2)?;
        let max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        if max_connections == 0 || min_connections > max_connections {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value: max_connections.to_string(),
                reason: format!("must be at least 1 and >= DB_MIN_CONNECTIONS ({min_connections})"),
            });
        }

        Ok(Self {
            connect_options,
            min_connections,
            max_connections,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            idle_timeout: Duration::from_secs(parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", 30)?),
            transaction_timeout: Duration::from_secs(parse_or(&lookup, "DB_TX_TIMEOUT_SECS", 10)?),
        })
    }
}

/// Build connection options from the discrete `DB_*` variables.
fn options_from_parts<L>(lookup: &L) -> Result<PgConnectOptions, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    let host = required(lookup, "DB_HOST")?;
    let port: u16 = parse_or(lookup, "DB_PORT", 5432)?;
    let user = required(lookup, "DB_USER")?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let name = required(lookup, "DB_NAME")?;
    let ssl = lookup("DB_SSL").unwrap_or_else(|| "disable".to_string());
    let ssl_mode = ssl.parse::<PgSslMode>().map_err(|e| ConfigError::Invalid {
        name: "DB_SSL",
        value: ssl.clone(),
        reason: e.to_string(),
    })?;

    Ok(PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&user)
        .password(&password)
        .database(&name)
        .ssl_mode(ssl_mode))
}
