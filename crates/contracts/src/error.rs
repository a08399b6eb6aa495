//! Layered error definitions
//!
//! Categorized by source: config / fetch / transport

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum RelayError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Market Data Errors =====
    /// Snapshot retrieval failed (network or non-2xx status)
    #[error("fetch error from '{url}': {message}")]
    Fetch { url: String, message: String },

    /// Snapshot body could not be decoded
    #[error("snapshot decode error: {message}")]
    Decode { message: String },

    // ===== Transport Errors =====
    /// Chat transport send/edit failed
    #[error("transport error for destination '{destination}': {message}")]
    Transport {
        destination: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create snapshot decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport(destination: impl ToString, message: impl Into<String>) -> Self {
        Self::Transport {
            destination: destination.to_string(),
            message: message.into(),
        }
    }
}
