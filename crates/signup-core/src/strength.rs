//! Password quality heuristic shown next to the password field.
//!
//! The score is advisory only. Whether a password may be used is decided by
//! the credential step validator, and the two are allowed to disagree: a
//! seven character `abcABC1` scores 3 but is still rejected for length.

use std::fmt;

pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    None,
    Weak,
    Medium,
    Strong,
    Excellent,
}

impl StrengthLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const LABELS: [StrengthLabel; 5] = [
    StrengthLabel::None,
    StrengthLabel::Weak,
    StrengthLabel::Medium,
    StrengthLabel::Strong,
    StrengthLabel::Excellent,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterTone {
    Danger,
    Warning,
    Primary,
    Success,
}

impl MeterTone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Primary => "primary",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: StrengthLabel,
}

impl PasswordStrength {
    pub fn meter_percent(&self) -> u16 {
        u16::from(self.score) * 100 / u16::from(MAX_SCORE)
    }

    // Thresholds are offset from the label table: a score of 3 reads
    // "strong" but is drawn in the neutral tone.
    pub fn tone(&self) -> MeterTone {
        match self.score {
            0..=1 => MeterTone::Danger,
            2 => MeterTone::Warning,
            3 => MeterTone::Primary,
            _ => MeterTone::Success,
        }
    }
}

pub fn score_password(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            label: StrengthLabel::None,
        };
    }

    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|character| character.is_ascii_lowercase()),
        password.chars().any(|character| character.is_ascii_uppercase()),
        password.chars().any(|character| character.is_ascii_digit()),
        password
            .chars()
            .any(|character| !character.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|passed| **passed).count() as u8;

    PasswordStrength {
        score,
        label: label_for(score),
    }
}

fn label_for(score: u8) -> StrengthLabel {
    let index = usize::from(score).min(LABELS.len() - 1);
    LABELS[index]
}
