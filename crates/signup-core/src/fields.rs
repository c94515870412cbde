use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    AgreeTerms,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Email,
        FieldName::Password,
        FieldName::ConfirmPassword,
        FieldName::AgreeTerms,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::AgreeTerms => "agreeTerms",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::AgreeTerms => "I agree to the terms and conditions",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }

    pub fn is_flag(self) -> bool {
        matches!(self, Self::AgreeTerms)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Every value the user has entered so far, keyed by field.
///
/// Absent entries read as empty text or an unset flag, so validators never
/// need to distinguish "never touched" from "cleared".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    values: BTreeMap<FieldName, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: FieldName, value: impl Into<FieldValue>) {
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: FieldName) -> Option<&FieldValue> {
        self.values.get(&name)
    }

    pub fn text(&self, name: FieldName) -> &str {
        match self.values.get(&name) {
            Some(FieldValue::Text(value)) => value.as_str(),
            _ => "",
        }
    }

    pub fn flag(&self, name: FieldName) -> bool {
        matches!(self.values.get(&name), Some(FieldValue::Flag(true)))
    }
}
