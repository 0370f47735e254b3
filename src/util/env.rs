// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Process environment.
//!
//! Everything that reads environment variables or host state lives here and
//! runs once at startup. The values are then handed to the rest of the
//! application.

use std::{env, fs};

use log::LevelFilter;

use crate::config::AppConfig;

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const LOG_LEVEL_DEFAULT: LevelFilter = LevelFilter::Info;

const HOSTNAME_FILE: &str = "/proc/sys/kernel/hostname";
const UNKNOWN: &str = "unknown";

fn parse_log_level(log_level: &str) -> Option<LevelFilter> {
    match log_level.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => {
            if !log_level.is_empty() {
                // Logging is not up yet
                eprintln!("Invalid log level: '{}'", log_level);
            }
            None
        }
    }
}

/// Initialises the logger.
///
/// The level comes from `LOG_LEVEL` when set, then from the usual
/// `RUST_LOG` filters, and defaults to `info`.
pub(crate) fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();

    let level = env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| parse_log_level(&level));

    match (level, verbose) {
        (_, true) => {
            builder.filter_level(LevelFilter::Debug);
        }
        (Some(level), false) => {
            builder.filter_level(level);
        }
        (None, false) => {
            if env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
                builder.filter_level(LOG_LEVEL_DEFAULT);
            }
        }
    }

    builder.init();
}

/// Who is asking. CDDB servers want a user and host name with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) user: String,
    pub(crate) host: String,
}

impl Identity {
    /// Works out the identity once, preferring values from the configuration.
    pub(crate) fn detect(config: &AppConfig) -> Self {
        let user = config
            .user
            .clone()
            .or_else(|| non_empty_var("USER"))
            .or_else(|| non_empty_var("LOGNAME"))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let host = config
            .host
            .clone()
            .or_else(|| non_empty_var("HOSTNAME"))
            .or_else(read_hostname_file)
            .unwrap_or_else(|| {
                log::warn!("Unable to determine the host name, using '{}'", UNKNOWN);
                UNKNOWN.to_string()
            });

        Self { user, host }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn read_hostname_file() -> Option<String> {
    fs::read_to_string(HOSTNAME_FILE)
        .ok()
        .map(|host| host.trim().to_string())
        .filter(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_levels() {
        assert_eq!(parse_log_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_log_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level("loud"), None);
        assert_eq!(parse_log_level(""), None);
    }

    #[test]
    fn configured_identity_wins() {
        let config = AppConfig {
            user: Some("pmvarsa".to_string()),
            host: Some("pumpkin".to_string()),
            ..Default::default()
        };

        assert_eq!(
            Identity::detect(&config),
            Identity {
                user: "pmvarsa".to_string(),
                host: "pumpkin".to_string(),
            }
        );
    }

    #[test]
    fn detected_identity_is_never_empty() {
        let identity = Identity::detect(&AppConfig::default());
        assert!(!identity.user.is_empty());
        assert!(!identity.host.is_empty());
    }
}
