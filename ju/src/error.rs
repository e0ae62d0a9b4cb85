//! Error types shared by every utility in the crate

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, UtilError>;

/// Errors raised by the path, template, codec and filesystem helpers
#[derive(Debug, Error)]
pub enum UtilError {
    #[error("{file_name} not found in parent directory hierarchy")]
    NotFound { file_name: String },

    #[error("YAML: key {key} is type '{actual}', require 'string'")]
    TypeMismatch { key: String, actual: &'static str },

    #[error("{helper}: unsupported type '{actual}'")]
    UnsupportedType { helper: &'static str, actual: &'static str },

    #[error("Failed to parse template: {0}")]
    TemplateParse(#[source] Box<handlebars::TemplateError>),

    #[error("Failed to execute template: {0}")]
    TemplateExec(#[source] Box<handlebars::RenderError>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid timestamp {input:?}: {source}")]
    Timestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid timestamp {input:?}: expected YYYY-MM-DDTHH:MM:SS.mmm±HHMM")]
    TimestampLayout { input: String },

    #[error("{helper}: count {count} is too large")]
    CountTooLarge { helper: &'static str, count: usize },

    #[error("Invalid date layout {layout:?}")]
    InvalidLayout { layout: String },

    #[error("Filesystem error on {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exists and is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UtilError {
    /// Wrap an IO error with the path it happened on
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UtilError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Check if this is a missing-file lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, UtilError::NotFound { .. })
    }

    /// Check if this error came from the template engine
    pub fn is_template(&self) -> bool {
        matches!(self, UtilError::TemplateParse(_) | UtilError::TemplateExec(_))
    }
}

impl From<handlebars::TemplateError> for UtilError {
    fn from(err: handlebars::TemplateError) -> Self {
        UtilError::TemplateParse(Box::new(err))
    }
}

impl From<handlebars::RenderError> for UtilError {
    fn from(err: handlebars::RenderError) -> Self {
        UtilError::TemplateExec(Box::new(err))
    }
}
