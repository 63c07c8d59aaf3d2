// diagnostic/mod.rs

//! # Diagnostic Module
//!
//! Converts template errors into diagnostics: a structured [`DiagnosticRecord`] with
//! `kind`, `message`, `detail` and `causeChain` fields, rendered as text, `key=value`
//! pairs, JSON or YAML according to a [`ReportConfig`].
//!
//! ## Example Usage
//! ```rust
//! use iac_template_errors::core::config::{OutputFormat, ReportConfig};
//! use iac_template_errors::diagnostic::DiagnosticReporter;
//! use iac_template_errors::template::TemplateError;
//!
//! let reporter = DiagnosticReporter::new(ReportConfig {
//!     format: OutputFormat::KeyValue,
//!     ..ReportConfig::default()
//! });
//! let err = TemplateError::parameter("location", "parameter could not be resolved");
//! println!("{}", reporter.render(&err).unwrap());
//! ```

pub mod record;
pub mod render;

pub use record::{CauseEntry, DiagnosticRecord};

use log::debug;

use crate::core::config::ReportConfig;
use crate::error::RenderError;
use crate::template::TemplateError;

/// Builds and renders diagnostics with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticReporter {
    config: ReportConfig,
}

impl DiagnosticReporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// The structured record for `error`, with the cause chain bounded by the
    /// configured depth.
    pub fn record(&self, error: &TemplateError) -> DiagnosticRecord {
        DiagnosticRecord::build(
            error,
            self.config.max_chain_depth,
            self.config.include_detail,
        )
    }

    /// The rendered diagnostic for `error` in the configured format.
    pub fn render(&self, error: &TemplateError) -> Result<String, RenderError> {
        debug!(
            "Rendering {} diagnostic as {}",
            error.kind(),
            self.config.format
        );
        render::render_record(&self.record(error), self.config.format, self.config.color)
    }
}

/// Unit tests for the reporter.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OutputFormat;
    use crate::template::{ErrorKind, FunctionErrorKind};

    fn reporter(format: OutputFormat, max_chain_depth: usize) -> DiagnosticReporter {
        DiagnosticReporter::new(ReportConfig {
            format,
            max_chain_depth,
            color: false,
            include_detail: true,
        })
    }

    #[test]
    fn test_render_text_for_wrapped_error() {
        let err = TemplateError::with_cause(
            ErrorKind::Function,
            "could not evaluate resourceId",
            TemplateError::expression_parse("concat(a,b", "unterminated function call"),
        );

        let text = reporter(OutputFormat::Text, 8).render(&err).unwrap();
        assert_eq!(
            text,
            "error[FunctionError]: could not evaluate resourceId\n\
             caused by[ExpressionParseError]: unterminated function call\n\
             \x20 expression: concat(a,b"
        );
    }

    #[test]
    fn test_record_respects_depth() {
        let err = TemplateError::function(
            "resourceId",
            FunctionErrorKind::MismatchingResourceSegments,
            "outer",
        )
        .caused_by(TemplateError::parameter("a", "middle").caused_by(TemplateError::parameter("b", "inner")));

        let record = reporter(OutputFormat::Json, 1).record(&err);
        assert_eq!(record.cause_chain.len(), 1);
        assert!(record.truncated);
    }

    #[test]
    fn test_render_json_for_every_kind() {
        let reporter = reporter(OutputFormat::Json, 8);
        for kind in ErrorKind::ALL {
            let json = reporter
                .render(&TemplateError::with_message(kind, "failed"))
                .unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["kind"], kind.tag());
            assert_eq!(value["message"], "failed");
        }
    }
}
