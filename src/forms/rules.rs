//! Per-field validation rule sets

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::field::is_falsy;
use crate::error::ConfigError;

/// Message returned by a required rule without its own message
pub const DEFAULT_REQUIRED_MESSAGE: &str = "required";

/// Message returned by a pattern rule without its own message
pub const DEFAULT_PATTERN_MESSAGE: &str = "invalid";

/// Rule sets keyed by field name. Its keys are the fields the aggregate
/// check walks over.
pub type Validations = BTreeMap<String, ValidationRuleSet>;

/// Caller-supplied check. An empty return means the value passed; anything
/// else is the error message shown to the user.
#[cfg_attr(test, mockall::automock)]
pub trait CustomValidator: Send + Sync {
    fn validate(&self, value: &str) -> String;
}

struct FnValidator<F>(F);

impl<F> CustomValidator for FnValidator<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn validate(&self, value: &str) -> String {
        (self.0)(value)
    }
}

/// Fails when the trimmed value is empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRule {
    pub message: Option<String>,
}

impl RequiredRule {
    pub fn message(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => DEFAULT_REQUIRED_MESSAGE,
        }
    }
}

/// Fails when the raw value does not match the expression
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub expression: Regex,
    pub message: Option<String>,
}

impl PatternRule {
    pub fn message(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => DEFAULT_PATTERN_MESSAGE,
        }
    }
}

/// Delegates to a [`CustomValidator`]; the returned string is the message.
#[derive(Clone)]
pub struct CustomRule(Arc<dyn CustomValidator>);

impl CustomRule {
    pub fn new(validator: impl CustomValidator + 'static) -> Self {
        Self(Arc::new(validator))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::new(FnValidator(f))
    }

    pub fn evaluate(&self, value: &str) -> String {
        self.0.validate(value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

/// At most one rule of each kind. Evaluation order is always
/// required, then pattern, then custom.
#[derive(Debug, Clone, Default)]
pub struct ValidationRuleSet {
    pub required: Option<RequiredRule>,
    pub pattern: Option<PatternRule>,
    pub custom: Option<CustomRule>,
}

impl ValidationRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = Some(RequiredRule::default());
        self
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = Some(RequiredRule {
            message: Some(message.into()),
        });
        self
    }

    pub fn pattern(mut self, expression: Regex) -> Self {
        self.pattern = Some(PatternRule {
            expression,
            message: None,
        });
        self
    }

    pub fn pattern_with(mut self, expression: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(PatternRule {
            expression,
            message: Some(message.into()),
        });
        self
    }

    pub fn custom(mut self, rule: CustomRule) -> Self {
        self.custom = Some(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.pattern.is_none() && self.custom.is_none()
    }

    /// Parse the JSON shape of a rule set:
    /// `{"required": true | "msg", "pattern": {"value": "re", "message": "msg"}}`.
    ///
    /// A falsy rule set, or a falsy `required`/`pattern`, registers no rule.
    /// Any other truthy `required` uses the default message. Unknown keys
    /// are ignored, which lets a `validate` placeholder sit in the file.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidRuleSet {
            field: field.to_string(),
            reason,
        };

        if is_falsy(value) {
            return Ok(Self::new());
        }
        let Value::Object(def) = value else {
            return Err(invalid("rule set must be a map"));
        };

        let required = match def.get("required") {
            Some(v) if !is_falsy(v) => Some(RequiredRule {
                message: v.as_str().map(str::to_string),
            }),
            _ => None,
        };

        let pattern = match def.get("pattern") {
            Some(v) if !is_falsy(v) => {
                let source = v
                    .get("value")
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid("pattern.value must be a string"))?;
                let expression =
                    Regex::new(source).map_err(|source| ConfigError::InvalidPattern {
                        field: field.to_string(),
                        source,
                    })?;
                Some(PatternRule {
                    expression,
                    message: v.get("message").and_then(Value::as_str).map(str::to_string),
                })
            }
            _ => None,
        };

        Ok(Self {
            required,
            pattern,
            custom: None,
        })
    }
}
