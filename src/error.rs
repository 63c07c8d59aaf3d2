// error.rs

//! # Error Handling Module
//!
//! Errors raised by this crate's own machinery (encoding, configuration loading and
//! diagnostic rendering), plus [`PipelineError`], the umbrella a template pipeline
//! driver can return from its top level.
//!
//! [`TemplateError`] itself lives in [`crate::template`]; it is the value being
//! transported and reported, while the types below describe failures of doing so.
//!
//! # Usage Example
//! ```rust
//! use iac_template_errors::error::{CodecError, PipelineError};
//! use iac_template_errors::template::TemplateError;
//!
//! fn decode(raw: &str) -> Result<TemplateError, PipelineError> {
//!     Ok(TemplateError::from_json(raw)?)
//! }
//! ```

use crate::template::TemplateError;

// ============================
// Codec Errors
// ============================

/// Failures while encoding or decoding a serialized template error.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// No serialization container was supplied (absent or null).
    #[error("serialization container is missing")]
    MissingContainer,

    /// The container is present but is not a key/value object.
    #[error("serialization container must be an object, found {0}")]
    NotAnObject(&'static str),

    /// A required field is absent from the record.
    #[error("serialized record is missing field '{0}'")]
    MissingField(&'static str),

    /// The record was written by an unsupported encoder version.
    #[error("unsupported record version {found} (supported: {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    /// The kind tag is not one this version understands.
    #[error("unknown error kind '{0}'")]
    UnknownKind(String),

    /// The function error kind tag is not one this version understands.
    #[error("unknown function error kind '{0}'")]
    UnknownFunctionErrorKind(String),

    #[error("malformed JSON record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML record: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// ============================
// Configuration Errors
// ============================

/// Failures while loading reporter configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

// ============================
// Rendering Errors
// ============================

/// Failures while rendering a diagnostic record.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to render JSON diagnostic: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML diagnostic: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// ============================
// Pipeline Umbrella
// ============================

/// Any failure surfaced by a template processing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// The template error carried by this failure, if any.
    pub fn as_template(&self) -> Option<&TemplateError> {
        match self {
            PipelineError::Template(err) => Some(err),
            _ => None,
        }
    }
}

/// Unit tests for error conversions.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ErrorKind;

    #[test]
    fn test_template_error_converts_into_pipeline_error() {
        fn bind() -> Result<(), PipelineError> {
            let resolved: Result<(), TemplateError> = Err(TemplateError::parameter(
                "location",
                "parameter could not be resolved",
            ));
            resolved?;
            Ok(())
        }

        let err = bind().unwrap_err();
        let template = err.as_template().unwrap();
        assert_eq!(template.kind(), ErrorKind::Parameter);
        assert_eq!(err.to_string(), "template error: parameter could not be resolved");
    }

    #[test]
    fn test_codec_error_messages() {
        assert_eq!(
            CodecError::MissingContainer.to_string(),
            "serialization container is missing"
        );
        assert_eq!(
            CodecError::UnsupportedVersion { found: 7, supported: 2 }.to_string(),
            "unsupported record version 7 (supported: 2)"
        );
        assert!(PipelineError::from(CodecError::MissingContainer)
            .as_template()
            .is_none());
    }
}
