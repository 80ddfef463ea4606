//! Form domain layer
//!
//! Field rules, the validator that evaluates them, the state store and the
//! bindings input widgets use to change it.

mod configuration;
mod field;
mod form_state;
mod rules;
mod validator;

pub use configuration::FormConfiguration;
pub use field::{FieldBinding, FieldName};
pub use form_state::{FormController, FormState};
pub use rules::{
    CustomRule, CustomValidator, PatternRule, RequiredRule, ValidationRuleSet, Validations,
    DEFAULT_PATTERN_MESSAGE, DEFAULT_REQUIRED_MESSAGE,
};
pub use validator::validate_field;
