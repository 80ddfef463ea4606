//! Form state store and the controller that owns it

use std::collections::BTreeMap;

use serde_json::Value;

use super::configuration::FormConfiguration;
use super::field::{FieldBinding, FieldName};
use super::rules::Validations;
use super::validator::validate_field;
use crate::error::{ArgumentError, ConfigError, FieldValidationError};

/// Current values and the last computed error for each field.
///
/// `errors` only holds entries for fields changed through a binding; an
/// empty message means no known error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
}

impl FormState {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            errors: BTreeMap::new(),
        }
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, name: &str) -> &str {
        self.errors.get(name).map(String::as_str).unwrap_or("")
    }

    /// The only mutation: store the value together with its error.
    pub(crate) fn apply_change(&mut self, validations: &Validations, name: &str, value: String) {
        let error = validate_field(validations, name, &value);
        tracing::debug!(field = name, has_error = !error.is_empty(), "field changed");
        self.values.insert(name.to_string(), value);
        self.errors.insert(name.to_string(), error);
    }
}

/// Tracks a form's values, validates them against per-field rules and
/// hands out bindings for input widgets.
#[derive(Debug, Clone)]
pub struct FormController {
    validations: Validations,
    state: FormState,
}

impl FormController {
    pub fn new(config: FormConfiguration) -> Result<Self, ConfigError> {
        let validations = config.validations.ok_or(ConfigError::ValidationsRequired)?;
        let initial_values = config.initial_values.unwrap_or_default();

        if validations.contains_key("") || initial_values.contains_key("") {
            return Err(ConfigError::EmptyFieldName);
        }

        tracing::debug!(
            fields = validations.len(),
            initial_values = initial_values.len(),
            "form created"
        );

        Ok(Self {
            validations,
            state: FormState::new(initial_values),
        })
    }

    /// Build a controller from an untyped JSON configuration
    pub fn from_json(config: &Value) -> Result<Self, ConfigError> {
        Self::new(FormConfiguration::from_json(config)?)
    }

    pub fn validations(&self) -> &Validations {
        &self.validations
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        self.state.values()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        self.state.errors()
    }

    pub fn value(&self, name: &str) -> &str {
        self.state.value(name)
    }

    pub fn error(&self, name: &str) -> &str {
        self.state.error(name)
    }

    /// Check any value against a field's rules without storing it
    pub fn validate_field(&self, name: &str, value: &str) -> String {
        validate_field(&self.validations, name, value)
    }

    pub fn bind_field(&mut self, name: &str) -> Result<FieldBinding<'_>, ArgumentError> {
        let name = FieldName::new(name)?;
        Ok(FieldBinding::new(name, &self.validations, &mut self.state))
    }

    /// Like [`Self::bind_field`], for names read from untyped input
    pub fn bind_field_value(&mut self, name: &Value) -> Result<FieldBinding<'_>, ArgumentError> {
        let name = FieldName::try_from(name)?;
        Ok(FieldBinding::new(name, &self.validations, &mut self.state))
    }

    /// Re-run every configured field's rules against its current value.
    /// Stored errors are not consulted.
    pub fn is_valid(&self) -> bool {
        self.validations
            .keys()
            .all(|name| self.validate_field(name, self.value(name)).is_empty())
    }

    /// Every configured field currently failing, ordered by field name
    pub fn field_errors(&self) -> Vec<FieldValidationError> {
        self.validations
            .keys()
            .filter_map(|name| {
                let message = self.validate_field(name, self.value(name));
                (!message.is_empty()).then(|| FieldValidationError::new(name.as_str(), message))
            })
            .collect()
    }
}

impl TryFrom<FormConfiguration> for FormController {
    type Error = ConfigError;

    fn try_from(config: FormConfiguration) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::rules::MockCustomValidator;
    use regex::Regex;
    use serde_json::json;

    fn date_pattern() -> Regex {
        Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap()
    }

    // Helper: name and surname required, birthDate must look like a date
    fn person_config() -> FormConfiguration {
        FormConfiguration::new()
            .required("name")
            .required("surname")
            .pattern_with("birthDate", date_pattern(), "invalid date")
    }

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    mod construction {
        use super::*;

        #[test]
        fn test_requires_validations() {
            let config = FormConfiguration {
                validations: None,
                initial_values: None,
            };
            let err = FormController::new(config).unwrap_err();
            assert_eq!(err.to_string(), "validations is required");
        }

        #[test]
        fn test_from_json_requires_validations() {
            let err = FormController::from_json(&json!({})).unwrap_err();
            assert_eq!(err.to_string(), "validations is required");
        }

        #[test]
        fn test_from_json_validations_must_be_map() {
            let err = FormController::from_json(&json!({ "validations": true })).unwrap_err();
            assert_eq!(err.to_string(), "validations must be a map");
        }

        #[test]
        fn test_from_json_initial_values_must_be_map() {
            let err = FormController::from_json(&json!({
                "validations": {},
                "initialValues": true,
            }))
            .unwrap_err();
            assert_eq!(err.to_string(), "initialValues must be a map");
        }

        #[test]
        fn test_from_json_lenient_rule_values() {
            let form = FormController::from_json(&json!({
                "validations": {
                    "name": { "required": 1 },
                    "nickname": null,
                }
            }))
            .unwrap();
            assert_eq!(form.validate_field("name", ""), "required");
            assert_eq!(form.validate_field("nickname", ""), "");
            assert!(!form.is_valid());
        }

        #[test]
        fn test_rejects_empty_field_name() {
            let err = FormController::new(FormConfiguration::new().required("")).unwrap_err();
            assert!(matches!(err, ConfigError::EmptyFieldName));
        }

        #[test]
        fn test_seeds_initial_values() {
            let form = FormController::new(FormConfiguration::new().initial_value("name", "Carlos"))
                .unwrap();
            assert_eq!(form.values(), &map(&[("name", "Carlos")]));
            assert_eq!(form.value("name"), "Carlos");
            assert!(form.errors().is_empty());
        }

        #[test]
        fn test_try_from_configuration() {
            let form = FormController::try_from(person_config()).unwrap();
            assert_eq!(form.validations().len(), 3);
        }
    }

    mod validate_field {
        use super::*;

        #[test]
        fn test_does_not_touch_state() {
            let form = FormController::new(person_config()).unwrap();
            assert_eq!(form.validate_field("name", ""), "required");
            assert!(form.values().is_empty());
            assert!(form.errors().is_empty());
        }

        #[test]
        fn test_checks_hypothetical_value() {
            let form =
                FormController::new(person_config().initial_value("birthDate", "11")).unwrap();
            assert_eq!(form.validate_field("birthDate", "30/12/2020"), "");
            assert_eq!(form.value("birthDate"), "11");
        }

        #[test]
        fn test_custom_receives_raw_value() {
            let mut mock = MockCustomValidator::new();
            mock.expect_validate()
                .withf(|value| value == "10")
                .times(1)
                .returning(|_| "You are not able to get a drive permission".to_string());

            let form = FormController::new(FormConfiguration::new().validator("age", mock)).unwrap();
            assert_eq!(
                form.validate_field("age", "10"),
                "You are not able to get a drive permission"
            );
        }
    }

    mod bind_field {
        use super::*;

        #[test]
        fn test_rejects_empty_name() {
            let mut form = FormController::new(person_config()).unwrap();
            let err = form.bind_field("").unwrap_err();
            assert_eq!(err, ArgumentError::NameRequired);
        }

        #[test]
        fn test_rejects_untyped_names() {
            let mut form = FormController::new(person_config()).unwrap();
            assert_eq!(
                form.bind_field_value(&Value::Null).unwrap_err(),
                ArgumentError::NameRequired
            );
            assert_eq!(
                form.bind_field_value(&json!(42)).unwrap_err().to_string(),
                "name must be a string"
            );
            assert_eq!(
                form.bind_field_value(&json!(1)).unwrap_err().to_string(),
                "name must be a string"
            );
        }

        #[test]
        fn test_accepts_untyped_string_name() {
            let mut form = FormController::new(person_config()).unwrap();
            let mut binding = form.bind_field_value(&json!("name")).unwrap();
            binding.on_change("Ana");
            assert_eq!(form.value("name"), "Ana");
        }

        #[test]
        fn test_value_defaults_to_empty() {
            let mut form = FormController::new(person_config()).unwrap();
            let binding = form.bind_field("name").unwrap();
            assert_eq!(binding.value(), "");
        }

        #[test]
        fn test_value_reflects_initial_value() {
            let mut form =
                FormController::new(person_config().initial_value("name", "Carlos")).unwrap();
            assert_eq!(form.bind_field("name").unwrap().value(), "Carlos");
        }

        #[test]
        fn test_on_change_updates_value_and_error() {
            let mut form = FormController::new(person_config()).unwrap();

            form.bind_field("name").unwrap().on_change("John");
            assert_eq!(form.value("name"), "John");
            assert_eq!(form.error("name"), "");

            form.bind_field("name").unwrap().on_change("");
            assert_eq!(form.value("name"), "");
            assert_eq!(form.error("name"), "required");
        }

        #[test]
        fn test_on_change_leaves_other_fields_alone() {
            let mut form = FormController::new(
                person_config()
                    .initial_value("name", "Carlos")
                    .initial_value("birthDate", "11"),
            )
            .unwrap();
            form.bind_field("surname").unwrap().on_change("");

            form.bind_field("name").unwrap().on_change("Ana");

            assert_eq!(
                form.values(),
                &map(&[("birthDate", "11"), ("name", "Ana"), ("surname", "")])
            );
            assert_eq!(
                form.errors(),
                &map(&[("name", ""), ("surname", "required")])
            );
        }

        #[test]
        fn test_unconfigured_field_can_be_bound() {
            let mut form = FormController::new(person_config()).unwrap();
            form.bind_field("nickname").unwrap().on_change("");
            assert_eq!(form.error("nickname"), "");
            assert_eq!(form.value("nickname"), "");
            assert!(form.values().contains_key("nickname"));
        }
    }

    mod is_valid {
        use super::*;

        #[test]
        fn test_no_validations_is_valid() {
            let form = FormController::new(FormConfiguration::new()).unwrap();
            assert!(form.is_valid());
        }

        #[test]
        fn test_false_when_any_field_fails() {
            let form = FormController::new(
                person_config()
                    .initial_value("name", "Carlos")
                    .initial_value("surname", ""),
            )
            .unwrap();
            assert!(!form.is_valid());
        }

        #[test]
        fn test_true_when_all_fields_pass() {
            let form = FormController::new(
                person_config()
                    .initial_value("name", "Carlos")
                    .initial_value("surname", "Silva")
                    .initial_value("birthDate", "28/10/1990"),
            )
            .unwrap();
            assert!(form.is_valid());
        }

        #[test]
        fn test_unset_fields_validate_as_empty() {
            let form = FormController::new(FormConfiguration::new().required("name")).unwrap();
            assert!(!form.is_valid());

            let form = FormController::new(
                FormConfiguration::new().pattern("code", Regex::new("^$").unwrap()),
            )
            .unwrap();
            assert!(form.is_valid());
        }

        #[test]
        fn test_becomes_valid_through_bindings() {
            let mut form = FormController::new(
                person_config()
                    .initial_value("name", "Carlos")
                    .initial_value("surname", ""),
            )
            .unwrap();
            assert!(!form.is_valid());

            form.bind_field("surname").unwrap().on_change("Silva");
            assert!(!form.is_valid());

            form.bind_field("birthDate").unwrap().on_change("28/10/1990");
            assert!(form.is_valid());
        }

        #[test]
        fn test_recomputes_instead_of_reading_errors() {
            // seeded values never pass through a binding, so no error is stored
            let form = FormController::new(person_config().initial_value("surname", "")).unwrap();
            assert!(form.errors().is_empty());
            assert!(!form.is_valid());
        }

        #[test]
        fn test_repeated_calls_agree() {
            let form = FormController::new(person_config()).unwrap();
            assert_eq!(form.is_valid(), form.is_valid());
        }
    }

    mod field_errors {
        use super::*;

        #[test]
        fn test_lists_failing_fields_in_order() {
            let form = FormController::new(
                person_config()
                    .initial_value("name", "Carlos")
                    .initial_value("birthDate", "30/12"),
            )
            .unwrap();
            assert_eq!(
                form.field_errors(),
                vec![
                    FieldValidationError::new("birthDate", "invalid date"),
                    FieldValidationError::new("surname", "required"),
                ]
            );
        }

        #[test]
        fn test_empty_when_valid() {
            let form = FormController::new(
                person_config()
                    .initial_value("name", "Carlos")
                    .initial_value("surname", "Silva")
                    .initial_value("birthDate", "28/10/1990"),
            )
            .unwrap();
            assert!(form.field_errors().is_empty());
        }
    }

    mod form_state {
        use super::*;

        #[test]
        fn test_default_is_empty() {
            let state = FormState::default();
            assert!(state.values().is_empty());
            assert!(state.errors().is_empty());
            assert_eq!(state.value("x"), "");
            assert_eq!(state.error("x"), "");
        }

        #[test]
        fn test_apply_change_sets_both_maps() {
            let validations = person_config().validations.unwrap();
            let mut state = FormState::default();
            state.apply_change(&validations, "surname", "  ".to_string());
            assert_eq!(state.value("surname"), "  ");
            assert_eq!(state.error("surname"), "required");
        }
    }
}
