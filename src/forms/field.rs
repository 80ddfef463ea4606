//! Field names and input bindings

use std::fmt;

use serde_json::Value;

use super::form_state::FormState;
use super::rules::Validations;
use crate::error::ArgumentError;

/// A non-empty field key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: &str) -> Result<Self, ArgumentError> {
        if name.is_empty() {
            return Err(ArgumentError::NameRequired);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&Value> for FieldName {
    type Error = ArgumentError;

    /// Accepts names from untyped sources. Falsy values count as missing.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        if is_falsy(value) {
            return Err(ArgumentError::NameRequired);
        }
        match value {
            Value::String(name) => Self::new(name),
            _ => Err(ArgumentError::NameNotString),
        }
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `null`, `false`, zero and `""`
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// The value/change-handler pair an input widget attaches to.
///
/// Every write goes through [`FieldBinding::on_change`], which stores the
/// new value and its freshly computed error in one step. Other fields are
/// never touched.
pub struct FieldBinding<'a> {
    name: FieldName,
    validations: &'a Validations,
    state: &'a mut FormState,
}

impl<'a> FieldBinding<'a> {
    pub(crate) fn new(
        name: FieldName,
        validations: &'a Validations,
        state: &'a mut FormState,
    ) -> Self {
        Self {
            name,
            validations,
            state,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Current value, empty when the field was never set
    pub fn value(&self) -> &str {
        self.state.value(self.name.as_str())
    }

    /// Error stored by the last change to this field
    pub fn error(&self) -> &str {
        self.state.error(self.name.as_str())
    }

    /// Replace the field value with a raw value extracted from an input event
    pub fn on_change(&mut self, value: impl Into<String>) {
        self.state
            .apply_change(self.validations, self.name.as_str(), value.into());
    }

    /// Append a typed character
    pub fn push_char(&mut self, c: char) {
        let mut value = self.value().to_string();
        value.push(c);
        self.on_change(value);
    }

    /// Remove the last character
    pub fn pop_char(&mut self) {
        let mut value = self.value().to_string();
        value.pop();
        self.on_change(value);
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        self.on_change(String::new());
    }
}

impl fmt::Debug for FieldBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("value", &self.value())
            .finish()
    }
}
