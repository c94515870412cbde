use std::time::Instant;

use crossterm::event::{Event, KeyEvent};
use signup_app::{AdvanceError, SubmitError};
use signup_core::fields::FieldName;
use tui_input::backend::crossterm::EventHandler;

use super::{FlowSignal, Focus, Overlay, RegisterFlow};
use crate::UiExit;
use crate::keymap;

impl RegisterFlow {
    pub(super) fn on_key(&mut self, key: KeyEvent, now: Instant) -> FlowSignal {
        if let Some(overlay) = self.overlay.clone() {
            return self.on_key_overlay(key, overlay, now);
        }

        if self.wizard.is_submitting() {
            return FlowSignal::Continue;
        }

        if keymap::is_back(key) {
            return self.on_back();
        }

        if keymap::is_next_field(key) {
            self.focus_next();
            return FlowSignal::Continue;
        }

        if keymap::is_prev_field(key) {
            self.focus_prev();
            return FlowSignal::Continue;
        }

        if keymap::is_confirm(key) {
            self.on_confirm(now);
            return FlowSignal::Continue;
        }

        match self.focused() {
            Some(Focus::Field(field)) if field.is_flag() => {
                if keymap::is_toggle(key) {
                    let checked = self.wizard.fields().flag(field);
                    self.wizard.set_field(field, !checked);
                }
            }
            Some(Focus::Field(field)) => self.edit_text(field, key),
            Some(Focus::Social(provider)) => {
                if keymap::is_toggle(key) {
                    self.wizard.social_login(provider);
                    self.collect_notices();
                }
            }
            None => {}
        }

        FlowSignal::Continue
    }

    fn on_key_overlay(&mut self, key: KeyEvent, overlay: Overlay, now: Instant) -> FlowSignal {
        let confirm = keymap::is_confirm(key);
        if !confirm && !keymap::is_back(key) {
            return FlowSignal::Continue;
        }

        match overlay {
            Overlay::Success(_) => {
                self.leave();
                FlowSignal::Exit(UiExit::Completed)
            }
            Overlay::Failure(_) => {
                self.overlay = None;
                self.wizard.retry_after_failure();
                if confirm {
                    self.submit(now);
                }
                FlowSignal::Continue
            }
            Overlay::Notice(_) => {
                self.overlay = None;
                FlowSignal::Continue
            }
        }
    }

    fn on_back(&mut self) -> FlowSignal {
        if self.wizard.current_step() == 1 {
            self.leave();
            return FlowSignal::Exit(UiExit::Left);
        }

        self.wizard.retreat();
        self.focus = 0;
        FlowSignal::Continue
    }

    fn on_confirm(&mut self, now: Instant) {
        if self.wizard.is_last_step() {
            self.submit(now);
            return;
        }

        let before = self.wizard.current_step();
        match self.wizard.advance() {
            Ok(step) if step != before => self.focus = 0,
            Ok(_) => {}
            Err(AdvanceError::Incomplete(_)) => self.focus_first_error(),
            Err(AdvanceError::Locked) => log::debug!("advance refused while locked"),
        }
    }

    fn submit(&mut self, now: Instant) {
        match self.wizard.submit(now) {
            Ok(ticket) => {
                log::debug!("waiting on account creation token {}", ticket.token);
                self.loading = Default::default();
            }
            Err(SubmitError::Incomplete(_)) => self.focus_first_error(),
            Err(error) => log::warn!("submit refused: {error}"),
        }
    }

    fn edit_text(&mut self, field: FieldName, key: KeyEvent) {
        let Some(input) = self.inputs.get_mut(&field) else {
            return;
        };
        if input.handle_event(&Event::Key(key)).is_none() {
            return;
        }
        if input.value() != self.wizard.fields().text(field) {
            let value = input.value().to_string();
            self.wizard.set_field(field, value);
        }
    }
}
