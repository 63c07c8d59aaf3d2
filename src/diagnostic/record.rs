// diagnostic/record.rs

//! # Diagnostic Record
//!
//! A flattened, serializable view of a [`TemplateError`] and its cause chain, ready to
//! be shown to a user or written to a structured log.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::template::{ChainLink, Detail, TemplateError};

/// One entry of a record's cause chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseEntry {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detail: BTreeMap<String, String>,
}

/// A diagnostic for a single template error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    /// Kind tag of the reported error.
    pub kind: String,
    pub message: String,
    /// Variant-specific fields, keyed by their wire names.
    pub detail: BTreeMap<String, String>,
    /// Cause chain, outermost first.
    pub cause_chain: Vec<CauseEntry>,
    /// True when the chain was longer than the configured depth.
    #[serde(default)]
    pub truncated: bool,
}

impl DiagnosticRecord {
    /// Builds a record, listing at most `max_chain_depth` causes.
    pub fn build(error: &TemplateError, max_chain_depth: usize, include_detail: bool) -> Self {
        let detail_of = |detail: Option<&Detail>| {
            if include_detail {
                detail.map(detail_map).unwrap_or_default()
            } else {
                BTreeMap::new()
            }
        };

        let mut causes = error.causes();
        let cause_chain: Vec<CauseEntry> = causes
            .by_ref()
            .take(max_chain_depth)
            .map(|link: ChainLink<'_>| CauseEntry {
                kind: link.kind_tag().to_string(),
                message: link.message().to_string(),
                detail: detail_of(link.detail()),
            })
            .collect();

        let truncated = causes.next().is_some();
        if truncated {
            warn!(
                "Cause chain of {} error truncated after {} links",
                error.kind(),
                max_chain_depth
            );
        }

        Self {
            kind: error.kind().tag().to_string(),
            message: error.message().to_string(),
            detail: detail_of(Some(error.detail())),
            cause_chain,
            truncated,
        }
    }
}

/// Supplied fields of a detail, keyed by wire name. Explicitly empty values are kept.
pub fn detail_map(detail: &Detail) -> BTreeMap<String, String> {
    detail
        .fields()
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
        .collect()
}

/// Unit tests for record building.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ErrorKind, ExternalCause, FunctionErrorKind};

    #[test]
    fn test_record_fields() {
        let err = TemplateError::function(
            "resourceId",
            FunctionErrorKind::MismatchingResourceSegments,
            "expected 3 segments, got 2",
        )
        .caused_by(TemplateError::parameter("vnetName", "parameter could not be resolved"));

        let record = DiagnosticRecord::build(&err, 10, true);
        assert_eq!(record.kind, "FunctionError");
        assert_eq!(record.message, "expected 3 segments, got 2");
        assert_eq!(record.detail["functionName"], "resourceId");
        assert_eq!(record.detail["errorKind"], "MismatchingResourceSegments");
        assert_eq!(record.cause_chain.len(), 1);
        assert_eq!(record.cause_chain[0].kind, "ParameterError");
        assert_eq!(record.cause_chain[0].detail["parameterName"], "vnetName");
        assert!(!record.truncated);
    }

    #[test]
    fn test_unset_detail_is_omitted_and_empty_is_kept() {
        let unset = TemplateError::with_message(ErrorKind::ExpressionParse, "bad");
        assert!(DiagnosticRecord::build(&unset, 10, true).detail.is_empty());

        let empty = TemplateError::expression_parse("", "empty expression");
        let record = DiagnosticRecord::build(&empty, 10, true);
        assert_eq!(record.detail.get("expression"), Some(&String::new()));
    }

    #[test]
    fn test_chain_is_truncated_at_depth() {
        let mut err = TemplateError::parameter("p", "root");
        for i in 0..4 {
            err = TemplateError::with_cause(ErrorKind::Function, format!("wrap {}", i), err);
        }

        let full = DiagnosticRecord::build(&err, 4, true);
        assert_eq!(full.cause_chain.len(), 4);
        assert!(!full.truncated);

        let cut = DiagnosticRecord::build(&err, 2, true);
        assert_eq!(cut.cause_chain.len(), 2);
        assert_eq!(cut.cause_chain[0].message, "wrap 2");
        assert!(cut.truncated);
    }

    #[test]
    fn test_detail_can_be_excluded() {
        let err = TemplateError::parameter("p", "m").caused_by(ExternalCause::new("io"));
        let record = DiagnosticRecord::build(&err, 10, false);
        assert!(record.detail.is_empty());
        assert_eq!(record.cause_chain[0].kind, "External");
    }
}
