// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration, decided once at startup.
//!
//! The only knob is a capability flag for record synthesis: some type
//! construction backends mishandle placeholder (non-exported) fields unless
//! their names are stripped first. The flag is read from the environment the
//! first time the process-wide converter is used and then threaded into the
//! record-transform algorithm as plain configuration.
//!
//! ```
//! use retag::Config;
//!
//! let config = Config::new().with_strip_placeholder_names(true);
//! assert!(config.strip_placeholder_names());
//! ```

/// Environment variable controlling [`Config::strip_placeholder_names`].
///
/// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off` (case-insensitive).
pub const STRIP_PLACEHOLDER_NAMES_ENV: &str = "RETAG_STRIP_PLACEHOLDER_NAMES";

/// Configuration for a [`Converter`](crate::Converter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    strip_placeholder_names: bool,
}

impl Config {
    /// Default configuration (placeholder names preserved).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strip_placeholder_names: false,
        }
    }

    /// Strip names from non-exported fields copied into synthesized records.
    #[must_use]
    pub const fn with_strip_placeholder_names(mut self, strip: bool) -> Self {
        self.strip_placeholder_names = strip;
        self
    }

    #[must_use]
    pub const fn strip_placeholder_names(&self) -> bool {
        self.strip_placeholder_names
    }

    /// Build the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(raw) = lookup(STRIP_PLACEHOLDER_NAMES_ENV) {
            match parse_flag(&raw) {
                Some(flag) => config.strip_placeholder_names = flag,
                None => log::warn!(
                    "[retag] ignoring {}={:?}: expected a boolean",
                    STRIP_PLACEHOLDER_NAMES_ENV,
                    raw
                ),
            }
        }
        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
