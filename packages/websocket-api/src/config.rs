use std::net::SocketAddr;
use std::time::Duration;

use shared::models::chat::MAX_MESSAGE_LENGTH;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;
const DEFAULT_PERSISTENCE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Upper bound on a single `get_history` page.
pub const MAX_HISTORY_LIMIT: usize = 200;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} environment variable must be set", name),
            ConfigError::Invalid { name, value } => {
                write!(f, "Invalid value for {}: {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceBackend {
    Memory,
    DynamoDb {
        presence_table: String,
        messages_table: String,
        reports_table: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub backend: PersistenceBackend,
    pub settle_delay: Duration,
    pub persistence_timeout: Duration,
    pub max_message_length: usize,
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            backend: PersistenceBackend::Memory,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            persistence_timeout: Duration::from_millis(DEFAULT_PERSISTENCE_TIMEOUT_MS),
            max_message_length: MAX_MESSAGE_LENGTH,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDRESS",
                value: bind_address.clone(),
            })?;

        let backend = match lookup("PERSISTENCE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => PersistenceBackend::Memory,
            "dynamodb" => PersistenceBackend::DynamoDb {
                presence_table: required(&lookup, "PRESENCE_TABLE")?,
                messages_table: required(&lookup, "MESSAGES_TABLE")?,
                reports_table: required(&lookup, "REPORTS_TABLE")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "PERSISTENCE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let max_message_length = parse_or(&lookup, "MAX_MESSAGE_LENGTH", MAX_MESSAGE_LENGTH)?;
        if max_message_length == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_MESSAGE_LENGTH",
                value: "0".to_string(),
            });
        }

        let history_limit = parse_or(&lookup, "HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?;
        if history_limit == 0 || history_limit > MAX_HISTORY_LIMIT {
            return Err(ConfigError::Invalid {
                name: "HISTORY_LIMIT",
                value: history_limit.to_string(),
            });
        }

        Ok(Config {
            bind_address,
            backend,
            settle_delay: Duration::from_millis(parse_or(
                &lookup,
                "SKIP_SETTLE_DELAY_MS",
                DEFAULT_SETTLE_DELAY_MS,
            )?),
            persistence_timeout: Duration::from_millis(parse_or(
                &lookup,
                "PERSISTENCE_TIMEOUT_MS",
                DEFAULT_PERSISTENCE_TIMEOUT_MS,
            )?),
            max_message_length,
            history_limit,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_address.port(), 5000);
        assert_eq!(config.backend, PersistenceBackend::Memory);
        assert_eq!(config.settle_delay, Duration::from_millis(1000));
        assert_eq!(config.persistence_timeout, Duration::from_millis(5000));
        assert_eq!(config.max_message_length, 1000);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn test_dynamodb_backend_requires_tables() {
        let result = Config::from_lookup(lookup(&[
            ("PERSISTENCE_BACKEND", "dynamodb"),
            ("PRESENCE_TABLE", "presence"),
        ]));
        assert!(matches!(result, Err(ConfigError::Missing("MESSAGES_TABLE"))));

        let config = Config::from_lookup(lookup(&[
            ("PERSISTENCE_BACKEND", "DynamoDB"),
            ("PRESENCE_TABLE", "presence"),
            ("MESSAGES_TABLE", "messages"),
            ("REPORTS_TABLE", "reports"),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            PersistenceBackend::DynamoDb {
                presence_table: "presence".to_string(),
                messages_table: "messages".to_string(),
                reports_table: "reports".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("SKIP_SETTLE_DELAY_MS", "soon")])),
            Err(ConfigError::Invalid {
                name: "SKIP_SETTLE_DELAY_MS",
                ..
            })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("BIND_ADDRESS", "localhost")])),
            Err(ConfigError::Invalid {
                name: "BIND_ADDRESS",
                ..
            })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("HISTORY_LIMIT", "500")])),
            Err(ConfigError::Invalid {
                name: "HISTORY_LIMIT",
                ..
            })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("PERSISTENCE_BACKEND", "redis")])),
            Err(ConfigError::Invalid {
                name: "PERSISTENCE_BACKEND",
                ..
            })
        ));
    }
}
