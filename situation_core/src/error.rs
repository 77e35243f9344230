//! Error types for settings and template handling.

use thiserror::Error;

/// Errors that can occur while loading or writing settings and template files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Reasons a single compression step could not run.
///
/// These never reach pipeline callers; the engine logs them and falls back.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("template has no segments")]
    EmptyTemplate,

    #[error("no description rule starts with {0}")]
    MissingRule(String),

    #[error("token [{0}] not found in rule output")]
    TokenNotFound(String),

    #[error("token [{0}] lacks a literal on one side")]
    MissingAnchor(String),

    #[error("anchors for [{0}] not found in resolved text")]
    AnchorsNotInText(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
