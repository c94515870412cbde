use crate::fields::{FieldMap, FieldName};
use crate::validate::{
    ValidationResult, validate_confirmation, validate_credential, validate_identity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    Identity,
    Credential,
    Confirmation,
}

#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldName],
    pub validate: fn(&FieldMap) -> ValidationResult,
}

pub static STEPS: [StepDefinition; 3] = [
    StepDefinition {
        id: StepId::Identity,
        title: "Your details",
        description: "Tell us who you are and where to reach you",
        fields: &[FieldName::FirstName, FieldName::LastName, FieldName::Email],
        validate: validate_identity,
    },
    StepDefinition {
        id: StepId::Credential,
        title: "Choose a password",
        description: "Use at least 8 characters with upper and lower case letters and a digit",
        fields: &[FieldName::Password, FieldName::ConfirmPassword],
        validate: validate_credential,
    },
    StepDefinition {
        id: StepId::Confirmation,
        title: "Confirm",
        description: "Review the terms and create your account",
        fields: &[FieldName::AgreeTerms],
        validate: validate_confirmation,
    },
];

pub fn step_count() -> usize {
    STEPS.len()
}

/// Looks up a step by its 1-based position.
pub fn step_at(number: usize) -> Option<&'static StepDefinition> {
    number.checked_sub(1).and_then(|index| STEPS.get(index))
}

pub fn definition(id: StepId) -> &'static StepDefinition {
    match id {
        StepId::Identity => &STEPS[0],
        StepId::Credential => &STEPS[1],
        StepId::Confirmation => &STEPS[2],
    }
}
