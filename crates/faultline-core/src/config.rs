use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::exception::OVERSIZED_ENTITY_KIND;

/// Invalid filter configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `request_timeout` is not a parseable duration
    #[error("invalid request timeout '{value}': {reason}")]
    InvalidTimeout {
        /// Configured value
        value: String,
        /// Parser diagnostic
        reason: String,
    },
}

/// Process-wide, read-only filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Marker value identifying oversized-request-entity exceptions
    #[serde(default = "default_oversized_entity_marker")]
    pub oversized_entity_marker: String,
    /// Request body cap in bytes, enforced by the transport layer and
    /// advertised in oversized-entity messages
    #[serde(default)]
    pub body_limit: Option<u64>,
    /// Request timeout (e.g. "30s", "1m"); expiry surfaces as an
    /// opaque internal error
    #[serde(default)]
    pub request_timeout: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            oversized_entity_marker: default_oversized_entity_marker(),
            body_limit: None,
            request_timeout: None,
        }
    }
}

impl FilterConfig {
    /// Parse the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a parseable
    /// duration
    pub fn request_timeout_duration(&self) -> Result<Option<Duration>, ConfigError> {
        self.request_timeout
            .as_deref()
            .map(|value| {
                duration_str::parse(value).map_err(|e| ConfigError::InvalidTimeout {
                    value: value.to_owned(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if any configured value fails to parse
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.request_timeout_duration().map(|_| ())
    }
}

fn default_oversized_entity_marker() -> String {
    OVERSIZED_ENTITY_KIND.to_owned()
}
