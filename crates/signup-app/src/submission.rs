use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use signup_core::validate::ValidationResult;

use crate::services::{AccountCreationService, AccountReceipt, AccountRequest, CreationEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Success(AccountReceipt),
    Failure(String),
}

impl SubmissionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Submitting => "submitting",
            Self::Success(_) => "success",
            Self::Failure(_) => "failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStart {
    Started { token: u64 },
    Rejected(ValidationResult),
    AlreadySubmitting,
    AlreadyCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResolution {
    Succeeded(AccountReceipt),
    Failed(String),
}

/// Final-step state machine around the account-creation call.
///
/// Only one request is in flight at a time. Each request gets a fresh token
/// and completions carrying any other token are dropped.
#[derive(Debug)]
pub struct SubmissionGate {
    phase: SubmissionPhase,
    timeout: Duration,
    active_token: Option<u64>,
    next_token: u64,
    receiver: Option<Receiver<CreationEvent>>,
    started_at: Option<Instant>,
}

impl SubmissionGate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            timeout,
            active_token: None,
            next_token: 1,
            receiver: None,
            started_at: None,
        }
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn active_token(&self) -> Option<u64> {
        self.active_token
    }

    pub fn begin(
        &mut self,
        validation: ValidationResult,
        request: AccountRequest,
        service: &dyn AccountCreationService,
        now: Instant,
    ) -> GateStart {
        match self.phase {
            SubmissionPhase::Submitting => return GateStart::AlreadySubmitting,
            SubmissionPhase::Success(_) => return GateStart::AlreadyCompleted,
            _ => {}
        }

        self.transition(SubmissionPhase::Validating);
        if !validation.is_valid() {
            self.transition(SubmissionPhase::Invalid);
            self.transition(SubmissionPhase::Idle);
            return GateStart::Rejected(validation);
        }

        let token = self.next_token;
        self.next_token = self.next_token.saturating_add(1);
        self.active_token = Some(token);
        self.started_at = Some(now);
        self.receiver = Some(service.spawn_create(request, token));
        self.transition(SubmissionPhase::Submitting);

        GateStart::Started { token }
    }

    /// Drains pending completions; returns the resolution reached on this call.
    pub fn poll(&mut self, now: Instant) -> Option<SubmissionResolution> {
        if !self.is_submitting() {
            return None;
        }

        let mut events = Vec::<CreationEvent>::new();
        let mut disconnected = false;
        if let Some(receiver) = &self.receiver {
            loop {
                match receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for event in events {
            if Some(event.token) != self.active_token {
                log::debug!("ignoring stale account completion for token {}", event.token);
                continue;
            }

            return Some(match event.result {
                Ok(receipt) => self.succeed(receipt),
                Err(message) => self.fail(message),
            });
        }

        if disconnected {
            return Some(self.fail("account service ended unexpectedly".to_string()));
        }

        let elapsed = self
            .started_at
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or_default();
        if elapsed > self.timeout {
            return Some(self.fail(format!(
                "account creation timed out after {} ms",
                self.timeout.as_millis()
            )));
        }

        None
    }

    /// Discards the in-flight request so a late completion has nowhere to land.
    pub fn dispose(&mut self) {
        if self.is_submitting() {
            log::debug!(
                "discarding pending account completion for token {:?}",
                self.active_token
            );
            self.transition(SubmissionPhase::Idle);
        }
        self.clear_request();
    }

    pub fn reset_after_failure(&mut self) -> bool {
        if !matches!(self.phase, SubmissionPhase::Failure(_)) {
            return false;
        }
        self.transition(SubmissionPhase::Idle);
        true
    }

    fn succeed(&mut self, receipt: AccountReceipt) -> SubmissionResolution {
        log::info!("account created for {}", receipt.email);
        self.clear_request();
        self.transition(SubmissionPhase::Success(receipt.clone()));
        SubmissionResolution::Succeeded(receipt)
    }

    fn fail(&mut self, message: String) -> SubmissionResolution {
        log::warn!("account creation failed: {message}");
        self.clear_request();
        self.transition(SubmissionPhase::Failure(message.clone()));
        SubmissionResolution::Failed(message)
    }

    fn clear_request(&mut self) {
        self.active_token = None;
        self.receiver = None;
        self.started_at = None;
    }

    fn transition(&mut self, next: SubmissionPhase) {
        log::debug!("submission {} -> {}", self.phase.name(), next.name());
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::mpsc::{self, Sender};

    use signup_core::fields::FieldName;
    use signup_core::validate::validate_confirmation;

    use super::*;

    #[derive(Default)]
    struct ManualService {
        senders: Mutex<Vec<Sender<CreationEvent>>>,
        tokens: Mutex<Vec<u64>>,
    }

    impl ManualService {
        fn send(&self, event: CreationEvent) {
            let sender = self
                .senders
                .lock()
                .expect("senders lock")
                .last()
                .cloned()
                .expect("sender should exist");
            sender.send(event).expect("send creation event");
        }

        fn close(&self) {
            self.senders.lock().expect("senders lock").clear();
        }

        fn calls(&self) -> usize {
            self.tokens.lock().expect("tokens lock").len()
        }
    }

    impl AccountCreationService for ManualService {
        fn spawn_create(&self, _request: AccountRequest, token: u64) -> Receiver<CreationEvent> {
            self.tokens.lock().expect("tokens lock").push(token);
            let (sender, receiver) = mpsc::channel();
            self.senders.lock().expect("senders lock").push(sender);
            receiver
        }
    }

    fn request() -> AccountRequest {
        AccountRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Abcdefg1".to_string(),
        }
    }

    fn receipt() -> AccountReceipt {
        AccountReceipt {
            email: "ada@example.com".to_string(),
            created_at: "2026-10-14T09:00:00Z".to_string(),
        }
    }

    fn started(gate: &mut SubmissionGate, service: &ManualService, now: Instant) -> u64 {
        match gate.begin(ValidationResult::default(), request(), service, now) {
            GateStart::Started { token } => token,
            other => panic!("expected started gate, got {other:?}"),
        }
    }

    #[test]
    fn invalid_validation_returns_to_idle_without_calling_service() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let invalid = validate_confirmation(&Default::default());

        let outcome = gate.begin(invalid, request(), &service, Instant::now());

        let GateStart::Rejected(result) = outcome else {
            panic!("expected rejection");
        };
        assert!(result.error_for(FieldName::AgreeTerms).is_some());
        assert_eq!(gate.phase(), &SubmissionPhase::Idle);
        assert_eq!(service.calls(), 0);
    }

    #[test]
    fn second_begin_while_submitting_is_refused() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let now = Instant::now();

        started(&mut gate, &service, now);
        let again = gate.begin(ValidationResult::default(), request(), &service, now);

        assert_eq!(again, GateStart::AlreadySubmitting);
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn matching_completion_resolves_to_success() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let now = Instant::now();
        let token = started(&mut gate, &service, now);

        assert_eq!(gate.poll(now), None);
        service.send(CreationEvent {
            token,
            result: Ok(receipt()),
        });

        assert_eq!(
            gate.poll(now),
            Some(SubmissionResolution::Succeeded(receipt()))
        );
        assert_eq!(gate.phase(), &SubmissionPhase::Success(receipt()));
        assert_eq!(gate.active_token(), None);
        assert_eq!(
            gate.begin(ValidationResult::default(), request(), &service, now),
            GateStart::AlreadyCompleted
        );
    }

    #[test]
    fn stale_token_is_ignored() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let now = Instant::now();
        let token = started(&mut gate, &service, now);

        service.send(CreationEvent {
            token: token + 40,
            result: Ok(receipt()),
        });

        assert_eq!(gate.poll(now), None);
        assert!(gate.is_submitting());
    }

    #[test]
    fn service_error_resolves_to_failure_and_allows_retry() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let now = Instant::now();
        let token = started(&mut gate, &service, now);

        service.send(CreationEvent {
            token,
            result: Err("email already registered".to_string()),
        });

        assert_eq!(
            gate.poll(now),
            Some(SubmissionResolution::Failed(
                "email already registered".to_string()
            ))
        );
        assert!(gate.reset_after_failure());
        assert_eq!(gate.phase(), &SubmissionPhase::Idle);

        let retry = started(&mut gate, &service, now);
        assert!(retry > token);
    }

    #[test]
    fn disconnect_without_completion_fails() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let now = Instant::now();
        started(&mut gate, &service, now);

        service.close();

        let resolution = gate.poll(now).expect("resolution");
        assert!(matches!(
            resolution,
            SubmissionResolution::Failed(message) if message.contains("ended unexpectedly")
        ));
    }

    #[test]
    fn elapsed_time_past_timeout_fails() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_millis(100));
        let start = Instant::now();
        started(&mut gate, &service, start);

        assert_eq!(gate.poll(start + Duration::from_millis(100)), None);
        let resolution = gate
            .poll(start + Duration::from_millis(101))
            .expect("timeout resolution");

        assert_eq!(
            resolution,
            SubmissionResolution::Failed("account creation timed out after 100 ms".to_string())
        );
        assert!(matches!(gate.phase(), SubmissionPhase::Failure(_)));
    }

    #[test]
    fn dispose_discards_pending_completion() {
        let service = ManualService::default();
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        let now = Instant::now();
        let token = started(&mut gate, &service, now);

        gate.dispose();
        let _ = service
            .senders
            .lock()
            .expect("senders lock")
            .last()
            .cloned()
            .expect("sender")
            .send(CreationEvent {
                token,
                result: Ok(receipt()),
            });

        assert_eq!(gate.poll(now), None);
        assert_eq!(gate.phase(), &SubmissionPhase::Idle);
    }

    #[test]
    fn reset_after_failure_is_noop_outside_failure() {
        let mut gate = SubmissionGate::new(Duration::from_secs(5));
        assert!(!gate.reset_after_failure());
        assert_eq!(gate.phase(), &SubmissionPhase::Idle);
    }
}
