//! Error types for template rendering

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// Errors produced while configuring, loading or rendering templates
///
/// Engine errors are carried unchanged so callers can inspect the
/// line and column information handlebars reports.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required configuration or request field is missing or empty,
    /// or the partials directory has no entries
    #[error("Validation error: {0}")]
    Validation(String),

    /// A template, layout or partial file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A template, layout or partial failed to compile
    #[error("Template compile error: {0}")]
    Compile(#[from] handlebars::TemplateError),

    /// A compiled template failed while rendering
    #[error("Template render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The render context could not be turned into a JSON object
    #[error("Context serialization error: {0}")]
    Serialization(String),
}

impl RenderError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an I/O error for the given path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether this error was raised before any file was touched
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Errors produced while loading a [`RendererConfig`](crate::RendererConfig)
/// from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variables could not be deserialized
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
}
