//! Field validator

use super::rules::{Validations, ValidationRuleSet};

/// Check a candidate value against one field's rules.
///
/// Returns the first failing rule's message, or an empty string when the
/// value passes or the field has no rules. The value is passed in rather
/// than read from the store, so hypothetical values can be checked.
pub fn validate_field(validations: &Validations, name: &str, value: &str) -> String {
    match validations.get(name) {
        Some(rules) => {
            let error = evaluate(rules, value);
            if error.is_empty() {
                tracing::trace!(field = name, "value accepted");
            } else {
                tracing::debug!(field = name, %error, "value rejected");
            }
            error
        }
        None => String::new(),
    }
}

/// Required, then pattern, then custom; stops at the first failure.
pub fn evaluate(rules: &ValidationRuleSet, value: &str) -> String {
    if let Some(required) = &rules.required {
        if value.trim().is_empty() {
            return required.message().to_string();
        }
    }

    if let Some(pattern) = &rules.pattern {
        // matched against the untrimmed value
        if !pattern.expression.is_match(value) {
            return pattern.message().to_string();
        }
    }

    if let Some(custom) = &rules.custom {
        let error = custom.evaluate(value);
        if !error.is_empty() {
            return error;
        }
    }

    String::new()
}
