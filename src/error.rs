//! Contract violation errors and per-field validation reports

/// Malformed form configuration, raised at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The `validations` option is absent.
    #[error("validations is required")]
    ValidationsRequired,

    /// The `validations` option is present but not a map.
    #[error("validations must be a map")]
    ValidationsNotMap,

    /// The `initialValues` option is present but not a map.
    #[error("initialValues must be a map")]
    InitialValuesNotMap,

    /// A field's rule set is not a map, or one of its rules is malformed.
    #[error("validations for field '{field}' are malformed: {reason}")]
    InvalidRuleSet { field: String, reason: &'static str },

    /// A pattern rule could not be compiled.
    #[error("pattern for field '{field}' is not a valid regular expression: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// An initial value is present but not a string.
    #[error("initial value for field '{field}' must be a string")]
    InvalidInitialValue { field: String },

    /// The configuration text is not JSON.
    #[error("form configuration is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A field name key is empty.
    #[error("field names must not be empty")]
    EmptyFieldName,
}

/// Malformed argument passed to the binder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("name is required")]
    NameRequired,

    #[error("name must be a string")]
    NameNotString,
}

/// A field whose rules rejected its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation message.
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
