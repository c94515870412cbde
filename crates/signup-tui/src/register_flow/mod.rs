mod keys;
mod render;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crossterm::event::KeyEvent;
use signup_app::{
    App, LogNotificationSink, NotificationSink, SocialProvider, SubmissionPhase,
    SubmissionResolution, WizardController,
};
use signup_core::fields::FieldName;
use signup_core::steps::StepId;
use tui_input::Input;

use crate::UiExit;
use crate::ui::loading::LoadingState;

const SOCIAL_BUTTONS: [SocialProvider; 2] = [SocialProvider::Google, SocialProvider::GitHub];

/// Collects controller notifications until the next frame picks them up.
///
/// Every notice is also forwarded to the log.
#[derive(Debug, Default)]
pub(crate) struct TuiNotifier {
    messages: Mutex<Vec<String>>,
    log: LogNotificationSink,
}

impl TuiNotifier {
    fn drain(&self) -> Vec<String> {
        let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *messages)
    }
}

impl NotificationSink for TuiNotifier {
    fn show(&self, message: &str) {
        self.log.show(message);
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Field(FieldName),
    Social(SocialProvider),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Overlay {
    Notice(String),
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowSignal {
    Continue,
    Exit(UiExit),
}

pub(crate) struct RegisterScreen {
    flow: RegisterFlow,
}

impl RegisterScreen {
    pub(crate) fn new(app: &App) -> Self {
        Self {
            flow: RegisterFlow::from_app(app),
        }
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        self.flow.render(frame);
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, now: Instant) -> Option<UiExit> {
        match self.flow.on_key(key, now) {
            FlowSignal::Continue => None,
            FlowSignal::Exit(exit) => Some(exit),
        }
    }

    pub(crate) fn on_tick(&mut self, now: Instant) {
        self.flow.on_tick(now);
    }

    pub(crate) fn should_poll_after_input(&self) -> bool {
        self.flow.wizard.is_submitting()
    }

    pub(crate) fn leave(&mut self) {
        self.flow.leave();
    }
}

struct RegisterFlow {
    wizard: WizardController,
    notifier: Arc<TuiNotifier>,
    inputs: BTreeMap<FieldName, Input>,
    focus: usize,
    overlay: Option<Overlay>,
    loading: LoadingState,
}

impl RegisterFlow {
    fn from_app(app: &App) -> Self {
        let notifier = Arc::new(TuiNotifier::default());
        let wizard = app.start_wizard(notifier.clone());
        Self::new(wizard, notifier)
    }

    fn new(wizard: WizardController, notifier: Arc<TuiNotifier>) -> Self {
        let inputs = FieldName::ALL
            .into_iter()
            .filter(|field| !field.is_flag())
            .map(|field| (field, Input::default()))
            .collect();
        Self {
            wizard,
            notifier,
            inputs,
            focus: 0,
            overlay: None,
            loading: LoadingState::default(),
        }
    }

    fn focus_ring(&self) -> Vec<Focus> {
        let step = self.wizard.current_definition();
        let mut ring: Vec<Focus> = step.fields.iter().copied().map(Focus::Field).collect();
        if step.id == StepId::Identity {
            ring.extend(SOCIAL_BUTTONS.into_iter().map(Focus::Social));
        }
        ring
    }

    fn focused(&self) -> Option<Focus> {
        self.focus_ring().get(self.focus).copied()
    }

    fn focus_next(&mut self) {
        let len = self.focus_ring().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    fn focus_prev(&mut self) {
        let len = self.focus_ring().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    fn focus_first_error(&mut self) {
        let first_error = self.focus_ring().iter().position(|focus| {
            matches!(focus, Focus::Field(field) if self.wizard.error_for(*field).is_some())
        });
        if let Some(index) = first_error {
            self.focus = index;
        }
    }

    fn on_tick(&mut self, now: Instant) {
        if self.wizard.is_submitting() {
            self.loading.next_frame();
        }

        if let Some(SubmissionResolution::Failed(message)) = self.wizard.poll(now) {
            self.overlay = Some(Overlay::Failure(message));
        }
        self.collect_notices();
    }

    fn collect_notices(&mut self) {
        let Some(message) = self.notifier.drain().pop() else {
            return;
        };
        self.overlay = Some(match self.wizard.phase() {
            SubmissionPhase::Success(_) => Overlay::Success(message),
            _ => Overlay::Notice(message),
        });
    }

    fn leave(&mut self) {
        self.wizard.abandon();
    }
}

impl Drop for RegisterFlow {
    fn drop(&mut self) {
        self.leave();
    }
}
