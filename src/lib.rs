//! Form validation state management
//!
//! A [`FormController`] holds a form's field values, checks them against
//! declarative per-field rules (required, pattern, custom) and keeps the
//! last error for each field. Input widgets change values only through a
//! [`FieldBinding`], which stores the value and its error together.

pub mod config;
pub mod error;
pub mod forms;

pub use error::{ArgumentError, ConfigError, FieldValidationError};
pub use forms::{
    CustomRule, CustomValidator, FieldBinding, FieldName, FormConfiguration, FormController,
    FormState, ValidationRuleSet, Validations,
};
