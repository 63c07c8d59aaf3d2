// lib.rs

//! # IaC Template Errors
//!
//! The error-reporting contract of an infrastructure-as-code template pipeline.
//!
//! A template pipeline (parameter binder, function evaluator, expression parser)
//! raises a [`template::TemplateError`] when it fails. The error carries a message,
//! the variant-specific identifier that caused the failure, and an optional cause
//! chain. This crate provides:
//!
//! - [`template`]: the error model, its cause chain and a versioned wire encoding.
//! - [`diagnostic`]: conversion of an error into a structured or rendered diagnostic.
//! - [`core`]: reporter configuration from YAML files and environment variables.
//! - [`utils`]: logger initialization and error logging for host programs.
//! - [`error`]: failures of the crate's own machinery and the [`error::PipelineError`]
//!   umbrella.
//!
//! ## Example Usage
//! ```rust
//! use iac_template_errors::diagnostic::DiagnosticReporter;
//! use iac_template_errors::template::{FunctionErrorKind, TemplateError};
//!
//! let err = TemplateError::function(
//!     "resourceId",
//!     FunctionErrorKind::MismatchingResourceSegments,
//!     "expected 3 segments, got 2",
//! )
//! .caused_by(TemplateError::parameter("vnetName", "parameter could not be resolved"));
//!
//! let wire = err.to_json().unwrap();
//! assert_eq!(TemplateError::from_json(&wire).unwrap(), err);
//!
//! let text = DiagnosticReporter::default().render(&err).unwrap();
//! eprintln!("{}", text);
//! ```

pub mod core;
pub mod diagnostic;
pub mod error;
pub mod template;
pub mod utils;

pub use error::PipelineError;
pub use template::{ErrorKind, FunctionErrorKind, TemplateError};
