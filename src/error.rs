//! Error type for the configuration boundary.
//!
//! Everything downstream of normalization is infallible; the only hard failure
//! is a structurally invalid flat configuration.

pub type EffectResult<T> = Result<T, EffectError>;

#[derive(thiserror::Error, Debug)]
pub enum EffectError {
    /// The configuration root was not a JSON object.
    #[error("configuration must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// A recognized field carried a value of the wrong JSON type.
    #[error("field `{field}` must be {expected}, found {found}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EffectError {
    pub fn field_type(field: &'static str, expected: &'static str, found: &serde_json::Value) -> Self {
        Self::FieldType {
            field,
            expected,
            found: json_type_name(found),
        }
    }

    /// Returns the offending field name for type errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::FieldType { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
