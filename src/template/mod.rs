// template/mod.rs

//! # Template Module
//!
//! The error model raised by a template processing pipeline: parameter binding
//! failures, template function failures and expression parse failures.
//!
//! - [`error`] defines [`TemplateError`] and its kind tags.
//! - [`cause`] defines the cause chain and its traversal.
//! - [`codec`] provides the versioned cross-boundary encoding.

pub mod cause;
pub mod codec;
pub mod error;

pub use cause::{Cause, CauseChain, ChainLink, ExternalCause, EXTERNAL_TAG};
pub use codec::WIRE_VERSION;
pub use error::{Detail, ErrorKind, FunctionErrorKind, TemplateError, UnknownTag};
