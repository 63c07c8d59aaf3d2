// diagnostic/render.rs

//! # Diagnostic Rendering
//!
//! Turns a [`DiagnosticRecord`] into text in one of the supported [`OutputFormat`]s.
//! Text output is optionally coloured with the `colored` crate.

use std::fmt::Write;

use colored::Colorize;

use crate::core::config::OutputFormat;
use crate::diagnostic::record::{CauseEntry, DiagnosticRecord};
use crate::error::RenderError;

/// Render a record in the requested format.
pub fn render_record(
    record: &DiagnosticRecord,
    format: OutputFormat,
    color: bool,
) -> Result<String, RenderError> {
    match format {
        OutputFormat::Text => Ok(render_text(record, color)),
        OutputFormat::KeyValue => Ok(render_key_value(record)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(record)?),
    }
}

// ============================
// Text
// ============================

/// Multi-line text:
///
/// ```text
/// error[FunctionError]: expected 3 segments, got 2
///   functionName: resourceId
/// caused by[ParameterError]: parameter could not be resolved
///   parameterName: vnetName
/// ```
pub fn render_text(record: &DiagnosticRecord, color: bool) -> String {
    let mut out = String::new();

    push_heading(&mut out, "error", &record.kind, &record.message, color);
    push_detail(&mut out, &record.detail);

    for CauseEntry {
        kind,
        message,
        detail,
    } in &record.cause_chain
    {
        push_heading(&mut out, "caused by", kind, message, color);
        push_detail(&mut out, detail);
    }

    if record.truncated {
        let note = "  ... further causes omitted";
        if color {
            let _ = writeln!(out, "{}", note.dimmed());
        } else {
            let _ = writeln!(out, "{}", note);
        }
    }

    out.trim_end().to_string()
}

fn push_heading(out: &mut String, label: &str, kind: &str, message: &str, color: bool) {
    if color {
        let label = if label == "error" {
            label.red().bold()
        } else {
            label.yellow()
        };
        let _ = writeln!(out, "{}[{}]: {}", label, kind.cyan(), message);
    } else {
        let _ = writeln!(out, "{}[{}]: {}", label, kind, message);
    }
}

fn push_detail<'a>(out: &mut String, detail: impl IntoIterator<Item = (&'a String, &'a String)>) {
    for (name, value) in detail {
        let _ = writeln!(out, "  {}: {}", name, value);
    }
}

// ============================
// Key/Value
// ============================

/// A single line of `key=value` pairs. Cause entries are keyed `cause.<index>.<field>`.
pub fn render_key_value(record: &DiagnosticRecord) -> String {
    let mut pairs: Vec<(String, String)> = vec![
        ("kind".to_string(), record.kind.clone()),
        ("message".to_string(), record.message.clone()),
    ];
    for (name, value) in &record.detail {
        pairs.push((format!("detail.{}", name), value.clone()));
    }
    for (index, entry) in record.cause_chain.iter().enumerate() {
        pairs.push((format!("cause.{}.kind", index), entry.kind.clone()));
        pairs.push((format!("cause.{}.message", index), entry.message.clone()));
        for (name, value) in &entry.detail {
            pairs.push((format!("cause.{}.{}", index, name), value.clone()));
        }
    }
    pairs.push(("truncated".to_string(), record.truncated.to_string()));

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, quote_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote values that would otherwise break `key=value` tokenization.
fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Unit tests for rendering.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FunctionErrorKind, TemplateError};

    fn sample_record() -> DiagnosticRecord {
        let err = TemplateError::function(
            "resourceId",
            FunctionErrorKind::MismatchingResourceSegments,
            "expected 3 segments, got 2",
        )
        .caused_by(TemplateError::parameter("vnetName", "parameter could not be resolved"));
        DiagnosticRecord::build(&err, 10, true)
    }

    #[test]
    fn test_plain_text() {
        let text = render_text(&sample_record(), false);
        assert_eq!(
            text,
            "error[FunctionError]: expected 3 segments, got 2\n\
             \x20 errorKind: MismatchingResourceSegments\n\
             \x20 functionName: resourceId\n\
             caused by[ParameterError]: parameter could not be resolved\n\
             \x20 parameterName: vnetName"
        );
    }

    #[test]
    fn test_coloured_text_keeps_content() {
        let text = render_text(&sample_record(), true);
        assert!(text.contains("expected 3 segments, got 2"));
        assert!(text.contains("parameterName: vnetName"));
    }

    #[test]
    fn test_truncated_note() {
        let mut record = sample_record();
        record.truncated = true;
        assert!(render_text(&record, false).ends_with("... further causes omitted"));
    }

    #[test]
    fn test_key_value_line() {
        let line = render_key_value(&sample_record());
        assert_eq!(
            line,
            "kind=FunctionError message=\"expected 3 segments, got 2\" \
             detail.errorKind=MismatchingResourceSegments detail.functionName=resourceId \
             cause.0.kind=ParameterError cause.0.message=\"parameter could not be resolved\" \
             cause.0.parameterName=vnetName truncated=false"
        );
    }

    #[test]
    fn test_quote_value() {
        assert_eq!(quote_value("plain"), "plain");
        assert_eq!(quote_value(""), "\"\"");
        assert_eq!(quote_value("a=\"b\""), "\"a=\\\"b\\\"\"");
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let json = render_record(&sample_record(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "FunctionError");
        assert_eq!(value["causeChain"][0]["detail"]["parameterName"], "vnetName");
        assert_eq!(value["truncated"], false);
    }

    #[test]
    fn test_yaml_parses_back_to_record() {
        let record = sample_record();
        let yaml = render_record(&record, OutputFormat::Yaml, false).unwrap();
        let parsed: DiagnosticRecord = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, record);
    }
}
