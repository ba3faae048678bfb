//! Configuration for the stack manager.
//!
//! Settings come from [`StackManagerConfig::default`], builder methods, or
//! the environment via [`StackManagerConfig::from_env`].

use crate::stack::domain::DEFAULT_MAX_STACK_NAME_LENGTH;
use std::env;
use tracing::warn;

/// Environment variable overriding [`StackManagerConfig::default_analytics_enabled`].
pub const DEFAULT_ANALYTICS_ENV: &str = "TOOLROUTER_DEFAULT_ANALYTICS";

/// Environment variable overriding [`StackManagerConfig::max_stack_name_length`].
pub const MAX_STACK_NAME_LENGTH_ENV: &str = "TOOLROUTER_MAX_STACK_NAME_LENGTH";

/// Settings applied by [`crate::stack::services::StackManager`].
///
/// # Examples
///
/// ```
/// use toolrouter::config::StackManagerConfig;
///
/// let config = StackManagerConfig::default().with_default_analytics(false);
/// assert!(!config.default_analytics_enabled);
/// assert_eq!(config.max_stack_name_length, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackManagerConfig {
    /// Analytics flag used when a create request does not set one.
    pub default_analytics_enabled: bool,
    /// Maximum stack name length in characters.
    pub max_stack_name_length: usize,
}

impl Default for StackManagerConfig {
    fn default() -> Self {
        Self {
            default_analytics_enabled: true,
            max_stack_name_length: DEFAULT_MAX_STACK_NAME_LENGTH,
        }
    }
}

impl StackManagerConfig {
    /// Sets the analytics flag applied when a request leaves it unset.
    #[must_use]
    pub const fn with_default_analytics(mut self, enabled: bool) -> Self {
        self.default_analytics_enabled = enabled;
        self
    }

    /// Sets the maximum stack name length.
    #[must_use]
    pub const fn with_max_stack_name_length(mut self, max_length: usize) -> Self {
        self.max_stack_name_length = max_length;
        self
    }

    /// Loads configuration from `TOOLROUTER_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable values are logged
    /// and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(DEFAULT_ANALYTICS_ENV) {
            match parse_flag(&raw) {
                Some(enabled) => config.default_analytics_enabled = enabled,
                None => warn!(
                    variable = DEFAULT_ANALYTICS_ENV,
                    value = %raw,
                    "ignoring unparseable analytics flag"
                ),
            }
        }

        if let Ok(raw) = env::var(MAX_STACK_NAME_LENGTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(max_length) if max_length > 0 => config.max_stack_name_length = max_length,
                _ => warn!(
                    variable = MAX_STACK_NAME_LENGTH_ENV,
                    value = %raw,
                    "ignoring invalid stack name length limit"
                ),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
