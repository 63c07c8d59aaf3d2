// template/error.rs

//! # Template Error Model
//!
//! Defines [`TemplateError`], the single error value raised while binding parameters,
//! evaluating template functions, or parsing template expressions.
//!
//! The error is a tagged union: every instance carries the same message and optional
//! cause payload, and a [`Detail`] describing which of the three failure kinds it is
//! along with the identifier or source text that triggered it.
//!
//! ## Example Usage
//! ```rust
//! use iac_template_errors::template::{FunctionErrorKind, TemplateError};
//!
//! let err = TemplateError::function(
//!     "resourceId",
//!     FunctionErrorKind::MismatchingResourceSegments,
//!     "expected 3 segments, got 2",
//! );
//! assert_eq!(err.function_name(), Some("resourceId"));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::template::cause::{Cause, CauseChain, ChainLink};

/// Wire/log field carrying the parameter name of a parameter failure.
pub const PARAMETER_NAME_FIELD: &str = "parameterName";
/// Wire/log field carrying the function name of a function failure.
pub const FUNCTION_NAME_FIELD: &str = "functionName";
/// Wire/log field carrying the [`FunctionErrorKind`] tag of a function failure.
pub const ERROR_KIND_FIELD: &str = "errorKind";
/// Wire/log field carrying the raw source text of an expression parse failure.
pub const EXPRESSION_FIELD: &str = "expression";

// ============================
// Kind Tags
// ============================

/// The closed set of template failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter could not be resolved, was missing, or failed validation.
    Parameter,
    /// A template function was invoked with invalid arguments.
    Function,
    /// An expression could not be tokenized or parsed.
    ExpressionParse,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 3] = [
        ErrorKind::Parameter,
        ErrorKind::Function,
        ErrorKind::ExpressionParse,
    ];

    /// The stable tag used in serialized records and diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            ErrorKind::Parameter => "ParameterError",
            ErrorKind::Function => "FunctionError",
            ErrorKind::ExpressionParse => "ExpressionParseError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Sub-classification of function failures.
///
/// New members may be appended; the tag of an existing member never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FunctionErrorKind {
    /// The function received a resource reference whose segment count or
    /// structure does not match what it expects.
    MismatchingResourceSegments,
}

impl FunctionErrorKind {
    pub const ALL: [FunctionErrorKind; 1] = [FunctionErrorKind::MismatchingResourceSegments];

    pub fn tag(self) -> &'static str {
        match self {
            FunctionErrorKind::MismatchingResourceSegments => "MismatchingResourceSegments",
        }
    }
}

impl fmt::Display for FunctionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FunctionErrorKind {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionErrorKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Returned when a string is not a known kind tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

// ============================
// Variant Detail
// ============================

/// Variant-specific context of a [`TemplateError`].
///
/// `None` means the field was never supplied (the message-only forms), while
/// `Some(String::new())` is an explicitly supplied empty identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Parameter {
        parameter_name: Option<String>,
    },
    Function {
        function_name: Option<String>,
        error_kind: Option<FunctionErrorKind>,
    },
    ExpressionParse {
        expression: Option<String>,
    },
}

impl Detail {
    /// A detail of the given kind with every field unset.
    pub fn empty(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Parameter => Detail::Parameter {
                parameter_name: None,
            },
            ErrorKind::Function => Detail::Function {
                function_name: None,
                error_kind: None,
            },
            ErrorKind::ExpressionParse => Detail::ExpressionParse { expression: None },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Detail::Parameter { .. } => ErrorKind::Parameter,
            Detail::Function { .. } => ErrorKind::Function,
            Detail::ExpressionParse { .. } => ErrorKind::ExpressionParse,
        }
    }

    /// The detail as `(field name, value)` pairs in declaration order.
    pub fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        match self {
            Detail::Parameter { parameter_name } => {
                vec![(PARAMETER_NAME_FIELD, parameter_name.as_deref())]
            }
            Detail::Function {
                function_name,
                error_kind,
            } => vec![
                (FUNCTION_NAME_FIELD, function_name.as_deref()),
                (ERROR_KIND_FIELD, error_kind.map(FunctionErrorKind::tag)),
            ],
            Detail::ExpressionParse { expression } => {
                vec![(EXPRESSION_FIELD, expression.as_deref())]
            }
        }
    }
}

// ============================
// Template Error
// ============================

/// Something went wrong while processing a template.
///
/// Values are built once at the point of failure and never mutated afterwards.
/// Wrapping transfers ownership of the wrapped error into the new one, so the
/// cause chain is always finite and acyclic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TemplateError {
    message: String,
    detail: Detail,
    #[source]
    cause: Option<Box<Cause>>,
}

impl TemplateError {
    /// An error of `kind` with an empty message and no detail.
    pub fn new(kind: ErrorKind) -> Self {
        Self::from_parts(String::new(), Detail::empty(kind), None)
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::from_parts(message.into(), Detail::empty(kind), None)
    }

    /// Wraps a lower-level failure while adding template context.
    pub fn with_cause(kind: ErrorKind, message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self::from_parts(message.into(), Detail::empty(kind), Some(cause.into()))
    }

    /// A parameter failure naming the parameter exactly as it was referenced.
    pub fn parameter(parameter_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_parts(
            message.into(),
            Detail::Parameter {
                parameter_name: Some(parameter_name.into()),
            },
            None,
        )
    }

    /// A function failure naming the function and classifying what went wrong.
    pub fn function(
        function_name: impl Into<String>,
        error_kind: FunctionErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::from_parts(
            message.into(),
            Detail::Function {
                function_name: Some(function_name.into()),
                error_kind: Some(error_kind),
            },
            None,
        )
    }

    /// A parse failure carrying the raw expression text that failed.
    pub fn expression_parse(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_parts(
            message.into(),
            Detail::ExpressionParse {
                expression: Some(expression.into()),
            },
            None,
        )
    }

    /// Attaches the underlying cause, replacing any previously attached one.
    pub fn caused_by(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }

    pub(crate) fn from_parts(message: String, detail: Detail, cause: Option<Cause>) -> Self {
        Self {
            message,
            detail,
            cause: cause.map(Box::new),
        }
    }

    // ----------------------------
    // Accessors
    // ----------------------------

    pub fn kind(&self) -> ErrorKind {
        self.detail.kind()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_deref()
    }

    pub fn parameter_name(&self) -> Option<&str> {
        match &self.detail {
            Detail::Parameter { parameter_name } => parameter_name.as_deref(),
            _ => None,
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        match &self.detail {
            Detail::Function { function_name, .. } => function_name.as_deref(),
            _ => None,
        }
    }

    pub fn function_error_kind(&self) -> Option<FunctionErrorKind> {
        match &self.detail {
            Detail::Function { error_kind, .. } => *error_kind,
            _ => None,
        }
    }

    pub fn expression(&self) -> Option<&str> {
        match &self.detail {
            Detail::ExpressionParse { expression } => expression.as_deref(),
            _ => None,
        }
    }

    // ----------------------------
    // Cause Chain
    // ----------------------------

    /// Iterates the cause chain, outermost cause first. `self` is not included.
    pub fn causes(&self) -> CauseChain<'_> {
        CauseChain::new(self.cause())
    }

    /// Number of links in the cause chain.
    pub fn depth(&self) -> usize {
        self.causes().count()
    }

    /// The innermost cause, if any.
    pub fn root_cause(&self) -> Option<ChainLink<'_>> {
        self.causes().last()
    }

    /// The first template error of `kind`, searching `self` and then its causes.
    pub fn find_in_chain(&self, kind: ErrorKind) -> Option<&TemplateError> {
        if self.kind() == kind {
            return Some(self);
        }
        self.causes()
            .filter_map(|link| link.as_template())
            .find(|err| err.kind() == kind)
    }
}
