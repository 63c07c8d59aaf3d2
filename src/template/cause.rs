// template/cause.rs

//! # Cause Chain Module
//!
//! A [`Cause`] is the error wrapped by a [`TemplateError`]. It is either another
//! template error, kept fully structured, or an [`ExternalCause`] captured from any
//! other `std::error::Error` (its message and its own `source()` chain).
//!
//! Causes are owned through `Box`, so a chain can never contain itself and every walk
//! over it ends after exactly as many hops as there are wrapping levels.

use std::error::Error;

use crate::template::error::{Detail, TemplateError};

/// Tag used for causes that did not originate as template errors.
pub const EXTERNAL_TAG: &str = "External";

/// Foreign source chains deeper than this are cut when captured.
pub const MAX_CAPTURE_DEPTH: usize = 64;

/// An error wrapped by a [`TemplateError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Cause {
    #[error(transparent)]
    Template(Box<TemplateError>),

    #[error(transparent)]
    External(ExternalCause),
}

/// A non-template error reduced to its message and its own cause chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExternalCause {
    message: String,
    #[source]
    cause: Option<Box<Cause>>,
}

impl ExternalCause {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause.into())),
        }
    }

    pub(crate) fn from_parts(message: String, cause: Option<Cause>) -> Self {
        Self {
            message,
            cause: cause.map(Box::new),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_deref()
    }
}

impl Cause {
    /// A foreign cause with only a message.
    pub fn external(message: impl Into<String>) -> Self {
        Cause::External(ExternalCause::new(message))
    }

    /// Captures any error together with its `source()` chain.
    ///
    /// Template errors found along the way are cloned as-is rather than flattened to
    /// their message.
    pub fn capture(error: &(dyn Error + 'static)) -> Self {
        capture_bounded(error, 1)
    }

    pub fn message(&self) -> &str {
        self.link().message()
    }

    pub fn link(&self) -> ChainLink<'_> {
        match self {
            Cause::Template(err) => ChainLink::Template(err),
            Cause::External(ext) => ChainLink::External(ext),
        }
    }
}

fn capture_bounded(error: &(dyn Error + 'static), depth: usize) -> Cause {
    if let Some(err) = error.downcast_ref::<TemplateError>() {
        return Cause::Template(Box::new(err.clone()));
    }
    if let Some(cause) = error.downcast_ref::<Cause>() {
        return cause.clone();
    }
    if let Some(ext) = error.downcast_ref::<ExternalCause>() {
        return Cause::External(ext.clone());
    }

    let source = if depth < MAX_CAPTURE_DEPTH {
        error.source().map(|src| capture_bounded(src, depth + 1))
    } else {
        None
    };
    Cause::External(ExternalCause::from_parts(error.to_string(), source))
}

// ============================
// Conversions
// ============================

impl From<TemplateError> for Cause {
    fn from(error: TemplateError) -> Self {
        Cause::Template(Box::new(error))
    }
}

impl From<ExternalCause> for Cause {
    fn from(error: ExternalCause) -> Self {
        Cause::External(error)
    }
}

impl From<std::io::Error> for Cause {
    fn from(error: std::io::Error) -> Self {
        Cause::capture(&error)
    }
}

impl From<serde_json::Error> for Cause {
    fn from(error: serde_json::Error) -> Self {
        Cause::capture(&error)
    }
}

impl From<serde_yaml::Error> for Cause {
    fn from(error: serde_yaml::Error) -> Self {
        Cause::capture(&error)
    }
}

// ============================
// Chain Traversal
// ============================

/// A borrowed view of one link in a cause chain.
#[derive(Debug, Clone, Copy)]
pub enum ChainLink<'a> {
    Template(&'a TemplateError),
    External(&'a ExternalCause),
}

impl<'a> ChainLink<'a> {
    /// The kind tag of the link: a template kind tag or [`EXTERNAL_TAG`].
    pub fn kind_tag(&self) -> &'static str {
        match *self {
            ChainLink::Template(err) => err.kind().tag(),
            ChainLink::External(_) => EXTERNAL_TAG,
        }
    }

    pub fn message(&self) -> &'a str {
        match *self {
            ChainLink::Template(err) => err.message(),
            ChainLink::External(ext) => ext.message(),
        }
    }

    pub fn detail(&self) -> Option<&'a Detail> {
        match *self {
            ChainLink::Template(err) => Some(err.detail()),
            ChainLink::External(_) => None,
        }
    }

    pub fn as_template(&self) -> Option<&'a TemplateError> {
        match *self {
            ChainLink::Template(err) => Some(err),
            ChainLink::External(_) => None,
        }
    }

    pub fn cause(&self) -> Option<&'a Cause> {
        match *self {
            ChainLink::Template(err) => TemplateError::cause(err),
            ChainLink::External(ext) => ExternalCause::cause(ext),
        }
    }
}

/// Iterator over a cause chain, outermost link first.
#[derive(Debug, Clone)]
pub struct CauseChain<'a> {
    next: Option<&'a Cause>,
}

impl<'a> CauseChain<'a> {
    pub fn new(first: Option<&'a Cause>) -> Self {
        Self { next: first }
    }
}

impl<'a> Iterator for CauseChain<'a> {
    type Item = ChainLink<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?.link();
        self.next = link.cause();
        Some(link)
    }
}

/// Unit tests for cause capture and traversal.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::error::ErrorKind;

    #[derive(Debug, thiserror::Error)]
    #[error("resolver failed")]
    struct ResolverError {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn test_capture_keeps_foreign_source_chain() {
        let err = ResolverError {
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        };
        let cause = Cause::capture(&err);

        let links: Vec<(&str, &str)> = CauseChain::new(Some(&cause))
            .map(|link| (link.kind_tag(), link.message()))
            .collect();
        assert_eq!(
            links,
            vec![(EXTERNAL_TAG, "resolver failed"), (EXTERNAL_TAG, "disk on fire")]
        );
    }

    #[test]
    fn test_capture_keeps_template_errors_structured() {
        let err = TemplateError::parameter("sku", "not allowed");
        let cause = Cause::capture(&err);
        assert_eq!(cause, Cause::Template(Box::new(err)));
    }

    #[test]
    fn test_capture_finds_template_error_below_foreign_error() {
        #[derive(Debug, thiserror::Error)]
        #[error("binding failed")]
        struct Binder(#[source] TemplateError);

        let cause = Cause::capture(&Binder(TemplateError::parameter("sku", "not allowed")));
        let links: Vec<ChainLink<'_>> = CauseChain::new(Some(&cause)).collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].as_template().unwrap().parameter_name(), Some("sku"));
    }

    #[test]
    fn test_chain_of_external_and_template_links() {
        let inner = TemplateError::expression_parse("[concat(", "unterminated function call");
        let cause: Cause = ExternalCause::with_cause("plugin host failure", inner).into();

        let mut chain = CauseChain::new(Some(&cause));
        let first = chain.next().unwrap();
        assert_eq!(first.kind_tag(), EXTERNAL_TAG);
        assert!(first.detail().is_none());

        let second = chain.next().unwrap();
        assert_eq!(second.kind_tag(), ErrorKind::ExpressionParse.tag());
        assert!(chain.next().is_none());
    }

    #[test]
    fn test_link_cause_follows_inherent_chain() {
        let err = TemplateError::parameter("sku", "not allowed")
            .caused_by(ExternalCause::with_cause("lookup failed", Cause::external("timeout")));
        let cause = Cause::from(err);

        let top = cause.link();
        let lookup = top.cause().unwrap().link();
        assert_eq!(lookup.kind_tag(), EXTERNAL_TAG);
        assert_eq!(lookup.message(), "lookup failed");

        let timeout = lookup.cause().unwrap();
        assert_eq!(timeout, &Cause::external("timeout"));
        assert_eq!(timeout.message(), "timeout");
        assert!(timeout.link().cause().is_none());
    }

    #[derive(Debug)]
    struct Layer {
        level: usize,
        inner: Option<Box<Layer>>,
    }

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "layer {}", self.level)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.inner.as_deref().map(|layer| layer as &(dyn Error + 'static))
        }
    }

    fn layers(count: usize) -> Layer {
        let mut layer = Layer {
            level: count - 1,
            inner: None,
        };
        for level in (0..count - 1).rev() {
            layer = Layer {
                level,
                inner: Some(Box::new(layer)),
            };
        }
        layer
    }

    #[test]
    fn test_capture_cuts_long_foreign_chains() {
        let cause = Cause::capture(&layers(100));
        let messages: Vec<&str> = CauseChain::new(Some(&cause))
            .map(|link| link.message())
            .collect();

        assert_eq!(messages.len(), MAX_CAPTURE_DEPTH);
        assert_eq!(messages[0], "layer 0");
        assert_eq!(messages[MAX_CAPTURE_DEPTH - 1], "layer 63");
    }

    #[test]
    fn test_capture_keeps_chain_at_limit() {
        let cause = Cause::capture(&layers(MAX_CAPTURE_DEPTH));
        assert_eq!(CauseChain::new(Some(&cause)).count(), MAX_CAPTURE_DEPTH);
    }

    #[test]
    fn test_empty_chain() {
        assert_eq!(CauseChain::new(None).count(), 0);
    }
}
