use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use signup_core::fields::{FieldMap, FieldName, FieldValue};
use signup_core::steps::{STEPS, StepDefinition};
use signup_core::strength::{PasswordStrength, score_password};
use signup_core::validate::{FieldError, StepIncomplete};
use thiserror::Error;

use crate::services::{AccountCreationService, AccountRequest, NotificationSink, SocialProvider};
use crate::submission::{GateStart, SubmissionGate, SubmissionPhase, SubmissionResolution};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvanceError {
    #[error("the wizard is not accepting navigation right now")]
    Locked,
    #[error(transparent)]
    Incomplete(#[from] StepIncomplete),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("submit is only available on the last step (currently on step {current} of {total})")]
    NotOnFinalStep { current: usize, total: usize },
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("the account has already been created")]
    AlreadyCompleted,
    #[error("the wizard has been abandoned")]
    Abandoned,
    #[error(transparent)]
    Incomplete(#[from] StepIncomplete),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub token: u64,
}

pub struct WizardController {
    steps: &'static [StepDefinition],
    current_step: usize,
    fields: FieldMap,
    errors: BTreeMap<FieldName, FieldError>,
    gate: SubmissionGate,
    accounts: Arc<dyn AccountCreationService>,
    notifier: Arc<dyn NotificationSink>,
    abandoned: bool,
}

impl WizardController {
    pub fn new(
        accounts: Arc<dyn AccountCreationService>,
        notifier: Arc<dyn NotificationSink>,
        timeout: Duration,
    ) -> Self {
        Self::with_steps(&STEPS, accounts, notifier, timeout)
    }

    /// Builds a controller over a custom step table. `steps` must be non-empty.
    pub fn with_steps(
        steps: &'static [StepDefinition],
        accounts: Arc<dyn AccountCreationService>,
        notifier: Arc<dyn NotificationSink>,
        timeout: Duration,
    ) -> Self {
        assert!(!steps.is_empty(), "wizard needs at least one step");
        Self {
            steps,
            current_step: 1,
            fields: FieldMap::new(),
            errors: BTreeMap::new(),
            gate: SubmissionGate::new(timeout),
            accounts,
            notifier,
            abandoned: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_definition(&self) -> &'static StepDefinition {
        let steps: &'static [StepDefinition] = self.steps;
        &steps[self.current_step - 1]
    }

    pub fn steps(&self) -> &'static [StepDefinition] {
        self.steps
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.steps.len()
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn errors(&self) -> &BTreeMap<FieldName, FieldError> {
        &self.errors
    }

    pub fn error_for(&self, field: FieldName) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn phase(&self) -> &SubmissionPhase {
        self.gate.phase()
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_submitting()
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    fn is_locked(&self) -> bool {
        self.abandoned
            || self.gate.is_submitting()
            || matches!(self.gate.phase(), SubmissionPhase::Success(_))
    }

    /// Stores `value` and drops any error currently shown for `name`.
    ///
    /// Returns `false` when the wizard no longer accepts edits.
    pub fn set_field(&mut self, name: FieldName, value: impl Into<FieldValue>) -> bool {
        if self.is_locked() {
            return false;
        }

        self.fields.set(name, value);
        if self.errors.remove(&name).is_some() {
            log::debug!("cleared error for {name} after edit");
        }
        true
    }

    /// Validates the current step and moves forward when it passes.
    ///
    /// Returns the step number now showing. On the last step a passing
    /// validation leaves the step unchanged. Refused with
    /// [`AdvanceError::Locked`] while submitting, after success or after abandon.
    pub fn advance(&mut self) -> Result<usize, AdvanceError> {
        if self.is_locked() {
            return Err(AdvanceError::Locked);
        }

        let step = self.current_definition();
        let result = (step.validate)(&self.fields);
        if !result.is_valid() {
            log::debug!(
                "step {} rejected: {:?}",
                self.current_step,
                result.failed_fields()
            );
            self.errors = result.field_errors.clone();
            return Err(AdvanceError::Incomplete(StepIncomplete {
                step: step.id,
                field_errors: result.field_errors,
            }));
        }

        self.errors.retain(|field, _| !step.fields.contains(field));
        if self.current_step < self.steps.len() {
            self.current_step += 1;
            log::debug!("advanced to step {}", self.current_step);
        }
        Ok(self.current_step)
    }

    pub fn retreat(&mut self) -> usize {
        if self.is_locked() {
            return self.current_step;
        }

        if self.current_step > 1 {
            self.current_step -= 1;
            log::debug!("returned to step {}", self.current_step);
        }
        self.current_step
    }

    pub fn submit(&mut self, now: Instant) -> Result<SubmissionTicket, SubmitError> {
        if self.abandoned {
            return Err(SubmitError::Abandoned);
        }

        if !self.is_last_step() {
            return Err(SubmitError::NotOnFinalStep {
                current: self.current_step,
                total: self.steps.len(),
            });
        }

        match self.gate.phase() {
            SubmissionPhase::Submitting => return Err(SubmitError::AlreadySubmitting),
            SubmissionPhase::Success(_) => return Err(SubmitError::AlreadyCompleted),
            _ => {}
        }

        let step = self.current_definition();
        let validation = (step.validate)(&self.fields);
        let request = self.account_request();

        match self
            .gate
            .begin(validation, request, self.accounts.as_ref(), now)
        {
            GateStart::Started { token } => {
                self.errors.retain(|field, _| !step.fields.contains(field));
                log::info!("submitting account request (token {token})");
                Ok(SubmissionTicket { token })
            }
            GateStart::Rejected(result) => {
                self.errors = result.field_errors.clone();
                Err(SubmitError::Incomplete(StepIncomplete {
                    step: step.id,
                    field_errors: result.field_errors,
                }))
            }
            GateStart::AlreadySubmitting => Err(SubmitError::AlreadySubmitting),
            GateStart::AlreadyCompleted => Err(SubmitError::AlreadyCompleted),
        }
    }

    /// Applies a finished account-creation call, if one has arrived.
    pub fn poll(&mut self, now: Instant) -> Option<SubmissionResolution> {
        if self.abandoned {
            return None;
        }

        let resolution = self.gate.poll(now)?;
        if let SubmissionResolution::Succeeded(receipt) = &resolution {
            self.notifier
                .show(&format!("Account created for {}", receipt.email));
        }
        Some(resolution)
    }

    pub fn retry_after_failure(&mut self) -> bool {
        !self.abandoned && self.gate.reset_after_failure()
    }

    /// Tears the wizard down; a pending completion is discarded unapplied.
    pub fn abandon(&mut self) {
        if self.abandoned {
            return;
        }
        log::debug!("wizard abandoned on step {}", self.current_step);
        self.gate.dispose();
        self.abandoned = true;
    }

    pub fn social_login(&self, provider: SocialProvider) {
        self.notifier.show(&provider.pending_notice());
    }

    pub fn strength(&self) -> PasswordStrength {
        score_password(self.fields.text(FieldName::Password))
    }

    pub fn account_request(&self) -> AccountRequest {
        AccountRequest {
            first_name: self.fields.text(FieldName::FirstName).trim().to_string(),
            last_name: self.fields.text(FieldName::LastName).trim().to_string(),
            email: self.fields.text(FieldName::Email).trim().to_string(),
            password: self.fields.text(FieldName::Password).to_string(),
        }
    }
}
