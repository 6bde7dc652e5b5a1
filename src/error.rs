//! Error types for the layout engine
//!
//! Missing context (no viewport, partial element records, unknown strategy
//! names) is never an error: those paths degrade to defaults and log a
//! warning. The variants here cover contract violations by the caller and
//! configuration loading.

use thiserror::Error;

/// Errors raised when the caller violates the engine's input contract
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A size with a negative or non-finite component
    #[error("invalid size for '{element}': {width} x {height}")]
    InvalidSize {
        element: String,
        width: f64,
        height: f64,
    },
}

impl LayoutError {
    /// Create an invalid size error
    pub fn invalid_size(element: impl Into<String>, width: f64, height: f64) -> Self {
        Self::InvalidSize {
            element: element.into(),
            width,
            height,
        }
    }

    /// Identifier of the offending element
    pub fn element(&self) -> &str {
        match self {
            Self::InvalidSize { element, .. } => element,
        }
    }
}

/// Errors that can occur when loading a layout configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse layout config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid layout config value '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
