//! Runtime configuration read from the environment.
//!
//! | Variable                 | Default |
//! |--------------------------|---------|
//! | `STORE_SHIP_DELAY_MS`    | 5000    |
//! | `STORE_DELIVER_DELAY_MS` | 5000    |
//! | `STORE_ACTOR_BUFFER`     | 32      |

use crate::fulfillment::FulfillmentDelays;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub ship_delay: Duration,
    pub deliver_delay: Duration,
    /// Mailbox size for every actor.
    pub actor_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ship_delay: Duration::from_millis(5000),
            deliver_delay: Duration::from_millis(5000),
            actor_buffer: 32,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ship_ms = read(
            &lookup,
            "STORE_SHIP_DELAY_MS",
            defaults.ship_delay.as_millis() as u64,
        )?;
        let deliver_ms = read(
            &lookup,
            "STORE_DELIVER_DELAY_MS",
            defaults.deliver_delay.as_millis() as u64,
        )?;
        let actor_buffer = read(&lookup, "STORE_ACTOR_BUFFER", defaults.actor_buffer)?;
        if actor_buffer == 0 {
            return Err(ConfigError::Invalid {
                name: "STORE_ACTOR_BUFFER",
                value: "0".into(),
            });
        }

        Ok(Self {
            ship_delay: Duration::from_millis(ship_ms),
            deliver_delay: Duration::from_millis(deliver_ms),
            actor_buffer,
        })
    }

    pub fn fulfillment_delays(&self) -> FulfillmentDelays {
        FulfillmentDelays {
            ship: self.ship_delay,
            deliver: self.deliver_delay,
        }
    }
}

fn read<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        None => {
            info!(var = name, %default, "Not set, using default");
            Ok(default)
        }
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
    fn missing_values_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.fulfillment_delays(), FulfillmentDelays::default());
    }

    #[test]
    fn reads_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("STORE_SHIP_DELAY_MS", "100"),
            ("STORE_DELIVER_DELAY_MS", " 250 "),
            ("STORE_ACTOR_BUFFER", "4"),
        ]))
        .unwrap();
        assert_eq!(config.ship_delay, Duration::from_millis(100));
        assert_eq!(config.deliver_delay, Duration::from_millis(250));
        assert_eq!(config.actor_buffer, 4);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[("STORE_SHIP_DELAY_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "STORE_SHIP_DELAY_MS",
                value: "soon".into()
            }
        );

        let err = StoreConfig::from_lookup(lookup(&[("STORE_ACTOR_BUFFER", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "STORE_ACTOR_BUFFER", .. }));
    }
}
