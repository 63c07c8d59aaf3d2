// template/codec.rs

//! # Template Error Codec
//!
//! Versioned structured encoding used to move a [`TemplateError`] across a process or
//! persistence boundary. The encoded form is a JSON object:
//!
//! ```text
//! {
//!   "version": 2,
//!   "kind": "FunctionError",
//!   "message": "expected 3 segments, got 2",
//!   "functionName": "resourceId",
//!   "errorKind": "MismatchingResourceSegments",
//!   "causes": [
//!     { "kind": "ParameterError", "message": "...", "parameterName": "p" },
//!     { "kind": "External", "message": "parameters.json missing" }
//!   ]
//! }
//! ```
//!
//! The cause chain is written as a flat `causes` array, outermost first, and relinked
//! on decode, so chains of any depth decode without nesting. Causes that were not
//! template errors are tagged `"External"`. Variant fields that were never supplied
//! are omitted; explicitly empty ones are written as `""`.
//!
//! Field names and kind tags are part of the wire contract. Changing them requires
//! bumping [`WIRE_VERSION`].

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::template::cause::{Cause, ChainLink, ExternalCause, EXTERNAL_TAG};
use crate::template::error::{
    Detail, ErrorKind, FunctionErrorKind, TemplateError, ERROR_KIND_FIELD, EXPRESSION_FIELD,
    FUNCTION_NAME_FIELD, PARAMETER_NAME_FIELD,
};

/// Current encoder version. Version 1 nested causes recursively and is not read.
pub const WIRE_VERSION: u32 = 2;

/// Variant fields that are only written when supplied.
const VARIANT_FIELDS: [&str; 4] = [
    PARAMETER_NAME_FIELD,
    FUNCTION_NAME_FIELD,
    ERROR_KIND_FIELD,
    EXPRESSION_FIELD,
];

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: Option<u64>,
    #[serde(flatten)]
    head: Entry,
    #[serde(default)]
    causes: Vec<Entry>,
}

/// One link of the chain without its cause.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    kind: Option<String>,
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
}

enum Decoded {
    Template { message: String, detail: Detail },
    External { message: String },
}

impl Entry {
    fn from_link(link: ChainLink<'_>) -> Self {
        let mut entry = Entry {
            kind: Some(link.kind_tag().to_string()),
            message: Some(link.message().to_string()),
            ..Entry::default()
        };
        match link.detail() {
            Some(Detail::Parameter { parameter_name }) => {
                entry.parameter_name = parameter_name.clone();
            }
            Some(Detail::Function {
                function_name,
                error_kind,
            }) => {
                entry.function_name = function_name.clone();
                entry.error_kind = error_kind.map(|kind| kind.tag().to_string());
            }
            Some(Detail::ExpressionParse { expression }) => {
                entry.expression = expression.clone();
            }
            None => {}
        }
        entry
    }

    fn decode(self) -> Result<Decoded, CodecError> {
        let tag = self.kind.ok_or(CodecError::MissingField("kind"))?;
        let message = self.message.ok_or(CodecError::MissingField("message"))?;
        if tag == EXTERNAL_TAG {
            return Ok(Decoded::External { message });
        }

        let kind: ErrorKind = tag.parse().map_err(|_| CodecError::UnknownKind(tag.clone()))?;
        let detail = match kind {
            ErrorKind::Parameter => Detail::Parameter {
                parameter_name: self.parameter_name,
            },
            ErrorKind::Function => Detail::Function {
                function_name: self.function_name,
                error_kind: self
                    .error_kind
                    .map(|tag| {
                        tag.parse::<FunctionErrorKind>()
                            .map_err(|_| CodecError::UnknownFunctionErrorKind(tag))
                    })
                    .transpose()?,
            },
            ErrorKind::ExpressionParse => Detail::ExpressionParse {
                expression: self.expression,
            },
        };
        Ok(Decoded::Template { message, detail })
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TemplateError {
    // ============================
    // Encoding
    // ============================

    /// Encodes this error, including its whole cause chain.
    pub fn to_value(&self) -> Result<Value, CodecError> {
        let envelope = Envelope {
            version: Some(u64::from(WIRE_VERSION)),
            head: Entry::from_link(ChainLink::Template(self)),
            causes: self.causes().map(Entry::from_link).collect(),
        };
        Ok(serde_json::to_value(envelope)?)
    }

    /// Writes the encoded fields into an existing container.
    ///
    /// Variant fields already present in the container are removed first, so an
    /// unset field is never read back from unrelated host data.
    ///
    /// # Errors
    /// Returns [`CodecError::MissingContainer`] when no container is supplied.
    pub fn write_to(&self, container: Option<&mut Map<String, Value>>) -> Result<(), CodecError> {
        let container = container.ok_or(CodecError::MissingContainer)?;
        match self.to_value()? {
            Value::Object(fields) => {
                for field in VARIANT_FIELDS {
                    container.remove(field);
                }
                container.extend(fields);
                Ok(())
            }
            other => Err(CodecError::NotAnObject(value_type_name(&other))),
        }
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    pub fn to_yaml(&self) -> Result<String, CodecError> {
        Ok(serde_yaml::to_string(&self.to_value()?)?)
    }

    // ============================
    // Decoding
    // ============================

    /// Rebuilds an error from the fields of a container written by [`Self::write_to`].
    ///
    /// # Errors
    /// Returns [`CodecError::MissingContainer`] when no container is supplied, and a
    /// descriptive error for a missing or unsupported version, an unknown kind tag or a
    /// structurally invalid record.
    pub fn read_from(container: Option<&Map<String, Value>>) -> Result<Self, CodecError> {
        let container = container.ok_or(CodecError::MissingContainer)?;
        let envelope: Envelope = serde_json::from_value(Value::Object(container.clone()))?;

        let version = envelope.version.ok_or(CodecError::MissingField("version"))?;
        if version != u64::from(WIRE_VERSION) {
            return Err(CodecError::UnsupportedVersion {
                found: version,
                supported: WIRE_VERSION,
            });
        }
        debug!(
            "Decoding template error record (version {}, kind {:?}, {} causes)",
            version,
            envelope.head.kind,
            envelope.causes.len()
        );

        let (message, detail) = match envelope.head.decode()? {
            Decoded::Template { message, detail } => (message, detail),
            Decoded::External { .. } => {
                return Err(CodecError::UnknownKind(EXTERNAL_TAG.to_string()))
            }
        };

        // Relink innermost first.
        let mut cause: Option<Cause> = None;
        for entry in envelope.causes.into_iter().rev() {
            let link = match entry.decode()? {
                Decoded::Template { message, detail } => {
                    Cause::from(TemplateError::from_parts(message, detail, cause.take()))
                }
                Decoded::External { message } => {
                    Cause::External(ExternalCause::from_parts(message, cause.take()))
                }
            };
            cause = Some(link);
        }

        Ok(TemplateError::from_parts(message, detail, cause))
    }

    /// Rebuilds an error from an encoded value.
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Null => Err(CodecError::MissingContainer),
            Value::Object(fields) => Self::read_from(Some(fields)),
            other => Err(CodecError::NotAnObject(value_type_name(other))),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_yaml::from_str(raw)?;
        Self::from_value(&value)
    }
}
