//! Form configuration: rule sets and initial values

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use super::field::is_falsy;
use super::rules::{CustomRule, CustomValidator, ValidationRuleSet, Validations};
use crate::error::ConfigError;

/// Input to [`FormController::new`](super::FormController::new).
///
/// `validations` is mandatory; a configuration built by hand with
/// `validations: None` is rejected at construction.
#[derive(Debug, Clone)]
pub struct FormConfiguration {
    pub validations: Option<Validations>,
    pub initial_values: Option<BTreeMap<String, String>>,
}

impl FormConfiguration {
    /// Empty rule map, no initial values
    pub fn new() -> Self {
        Self {
            validations: Some(Validations::new()),
            initial_values: None,
        }
    }

    fn rules_mut(&mut self, field: &str) -> &mut ValidationRuleSet {
        self.validations
            .get_or_insert_with(Validations::new)
            .entry(field.to_string())
            .or_default()
    }

    /// Register a field with no rules; it is always valid
    pub fn field(mut self, field: &str) -> Self {
        self.rules_mut(field);
        self
    }

    pub fn rules(mut self, field: &str, rules: ValidationRuleSet) -> Self {
        self.validations
            .get_or_insert_with(Validations::new)
            .insert(field.to_string(), rules);
        self
    }

    pub fn required(mut self, field: &str) -> Self {
        let rules = self.rules_mut(field);
        *rules = std::mem::take(rules).required();
        self
    }

    pub fn required_with(mut self, field: &str, message: impl Into<String>) -> Self {
        let rules = self.rules_mut(field);
        *rules = std::mem::take(rules).required_with(message);
        self
    }

    pub fn pattern(mut self, field: &str, expression: Regex) -> Self {
        let rules = self.rules_mut(field);
        *rules = std::mem::take(rules).pattern(expression);
        self
    }

    pub fn pattern_with(
        mut self,
        field: &str,
        expression: Regex,
        message: impl Into<String>,
    ) -> Self {
        let rules = self.rules_mut(field);
        *rules = std::mem::take(rules).pattern_with(expression, message);
        self
    }

    /// Attach a custom check written as a closure
    pub fn validate<F>(self, field: &str, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.custom(field, CustomRule::from_fn(f))
    }

    /// Attach a custom check implemented as a [`CustomValidator`]
    pub fn validator(self, field: &str, validator: impl CustomValidator + 'static) -> Self {
        self.custom(field, CustomRule::new(validator))
    }

    fn custom(mut self, field: &str, rule: CustomRule) -> Self {
        self.rules_mut(field).custom = Some(rule);
        self
    }

    pub fn initial_value(mut self, field: &str, value: impl Into<String>) -> Self {
        self.initial_values
            .get_or_insert_with(BTreeMap::new)
            .insert(field.to_string(), value.into());
        self
    }

    /// Read a configuration from an untyped JSON document:
    /// `{"validations": {...}, "initialValues": {...}}`.
    ///
    /// The shape is checked before anything else so that malformed
    /// settings fail with the same errors as a hand-built configuration.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let validations = match value.get("validations") {
            None => return Err(ConfigError::ValidationsRequired),
            Some(v) if is_falsy(v) => return Err(ConfigError::ValidationsRequired),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ConfigError::ValidationsNotMap),
        };

        let initial_values = match value.get("initialValues") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => return Err(ConfigError::InitialValuesNotMap),
        };

        let mut rules = Validations::new();
        for (field, def) in validations {
            rules.insert(field.clone(), ValidationRuleSet::from_json(field, def)?);
        }

        let initial_values = match initial_values {
            Some(map) => {
                let mut values = BTreeMap::new();
                for (field, value) in map {
                    match value {
                        Value::String(s) => {
                            values.insert(field.clone(), s.clone());
                        }
                        Value::Null => {}
                        _ => {
                            return Err(ConfigError::InvalidInitialValue {
                                field: field.clone(),
                            })
                        }
                    }
                }
                Some(values)
            }
            None => None,
        };

        Ok(Self {
            validations: Some(rules),
            initial_values,
        })
    }

    /// Parse a JSON document from text and read it with [`Self::from_json`]
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text).map_err(ConfigError::Malformed)?;
        Self::from_json(&value)
    }
}

impl Default for FormConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
