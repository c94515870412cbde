use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::fields::{FieldMap, FieldName};
use crate::steps::{StepId, definition};

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Format,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn required(message: &str) -> Self {
        Self {
            kind: FieldErrorKind::Required,
            message: message.to_string(),
        }
    }

    fn format(message: &str) -> Self {
        Self {
            kind: FieldErrorKind::Format,
            message: message.to_string(),
        }
    }

    fn mismatch(message: &str) -> Self {
        Self {
            kind: FieldErrorKind::Mismatch,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub field_errors: BTreeMap<FieldName, FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn error_for(&self, field: FieldName) -> Option<&FieldError> {
        self.field_errors.get(&field)
    }

    pub fn failed_fields(&self) -> Vec<FieldName> {
        self.field_errors.keys().copied().collect()
    }

    pub fn into_result(self, step: StepId) -> Result<(), StepIncomplete> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(StepIncomplete {
                step,
                field_errors: self.field_errors,
            })
        }
    }

    fn push(&mut self, field: FieldName, error: FieldError) {
        self.field_errors.insert(field, error);
    }
}

/// Raised when any field owned by a step failed its most recent check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} is incomplete: {}", step_title(.step), FieldList(.field_errors))]
pub struct StepIncomplete {
    pub step: StepId,
    pub field_errors: BTreeMap<FieldName, FieldError>,
}

fn step_title(step: &StepId) -> &'static str {
    definition(*step).title
}

struct FieldList<'a>(&'a BTreeMap<FieldName, FieldError>);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self
            .0
            .keys()
            .map(|field| field.key())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&keys)
    }
}

pub fn validate_step(step: StepId, fields: &FieldMap) -> ValidationResult {
    (definition(step).validate)(fields)
}

pub fn validate_identity(fields: &FieldMap) -> ValidationResult {
    let mut result = ValidationResult::default();

    if fields.text(FieldName::FirstName).trim().is_empty() {
        result.push(
            FieldName::FirstName,
            FieldError::required("First name is required"),
        );
    }

    if fields.text(FieldName::LastName).trim().is_empty() {
        result.push(
            FieldName::LastName,
            FieldError::required("Last name is required"),
        );
    }

    let email = fields.text(FieldName::Email).trim();
    if email.is_empty() {
        result.push(FieldName::Email, FieldError::required("Email is required"));
    } else if !is_email_shaped(email) {
        result.push(
            FieldName::Email,
            FieldError::format("Enter a valid email address"),
        );
    }

    result
}

pub fn validate_credential(fields: &FieldMap) -> ValidationResult {
    let mut result = ValidationResult::default();

    let password = fields.text(FieldName::Password);
    if password.is_empty() {
        result.push(
            FieldName::Password,
            FieldError::required("Password is required"),
        );
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        result.push(
            FieldName::Password,
            FieldError::format("Password must be at least 8 characters"),
        );
    } else if !has_required_composition(password) {
        result.push(
            FieldName::Password,
            FieldError::format(
                "Password must contain an uppercase letter, a lowercase letter and a digit",
            ),
        );
    }

    let confirm = fields.text(FieldName::ConfirmPassword);
    if confirm.is_empty() {
        result.push(
            FieldName::ConfirmPassword,
            FieldError::required("Please confirm your password"),
        );
    } else if confirm != password {
        result.push(
            FieldName::ConfirmPassword,
            FieldError::mismatch("Passwords do not match"),
        );
    }

    result
}

pub fn validate_confirmation(fields: &FieldMap) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !fields.flag(FieldName::AgreeTerms) {
        result.push(
            FieldName::AgreeTerms,
            FieldError::required("You must agree to the terms and conditions"),
        );
    }

    result
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

fn has_required_composition(password: &str) -> bool {
    password.chars().any(|character| character.is_ascii_lowercase())
        && password.chars().any(|character| character.is_ascii_uppercase())
        && password.chars().any(|character| character.is_ascii_digit())
}
