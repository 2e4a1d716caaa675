/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Typed configuration read from the environment at startup. Every field has
//! a default matching the tunable table, so the server runs with zero
//! environment variables set.

use std::time::Duration;

use crate::constants::{CLIENT_TIMEOUT, HEARTBEAT_INTERVAL, HOST_GRACE_PERIOD};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub allowed_origins: Vec<String>,
    pub heartbeat_interval: Duration,
    pub client_timeout: Duration,
    pub host_grace_period: Duration,
}

impl AppConfig {
    /// Reads every field from the environment, falling back to the
    /// documented defaults when a variable is unset or unparseable.
    pub fn from_env() -> Self {
        AppConfig {
            bind_host: env_or("BIND_HOST", "0.0.0.0"),
            bind_port: env_parsed("BIND_PORT", 8080),
            allowed_origins: env_list("ALLOWED_ORIGINS"),
            heartbeat_interval: env_secs("HEARTBEAT_INTERVAL_SECS", HEARTBEAT_INTERVAL),
            client_timeout: env_secs("CLIENT_TIMEOUT_SECS", CLIENT_TIMEOUT),
            host_grace_period: env_secs("HOST_GRACE_PERIOD_SECS", HOST_GRACE_PERIOD),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// A comma-separated allow-list. Empty/unset means "allow no cross-origin
/// requests", not "allow any" — permissive-by-default CORS is the teacher's
/// prototype behavior, not something worth carrying into a multi-tenant
/// room server.
fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane_when_env_unset() {
        std::env::remove_var("BIND_PORT");
        std::env::remove_var("ALLOWED_ORIGINS");
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.bind_port, 8080);
        assert!(cfg.allowed_origins.is_empty());
        assert_eq!(cfg.heartbeat_interval, HEARTBEAT_INTERVAL);
    }

    #[test]
    fn allowed_origins_splits_and_trims() {
        std::env::set_var("ALLOWED_ORIGINS", "https://a.example, https://b.example");
        let cfg = AppConfig::from_env();
        assert_eq!(
            cfg.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        std::env::remove_var("ALLOWED_ORIGINS");
    }
}
