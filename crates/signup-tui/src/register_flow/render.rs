use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Gauge;
use signup_core::fields::FieldName;
use signup_core::steps::StepId;
use signup_core::strength::MAX_SCORE;

use super::{Focus, Overlay, RegisterFlow, SOCIAL_BUTTONS};
use crate::theme;
use crate::ui::loading::render_loading_modal;
use crate::ui::modal::{render_error_modal, render_notice_modal, render_success_modal};
use crate::ui::text::{
    compact_hint, error_line, focus_line, key_hint_height, key_hint_paragraph, masked,
    wrapped_paragraph,
};

const VALUE_INDENT: u16 = 2;

struct CursorSpot {
    row: u16,
    column: usize,
}

impl RegisterFlow {
    pub(super) fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let step = self.wizard.current_definition();
        let key_text = self.key_hint(area.width);
        let footer_height = key_hint_height(area.width, key_text);
        let meter_height = if step.id == StepId::Credential { 3 } else { 0 };
        let [header, body, meter, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(6),
                Constraint::Length(meter_height),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            focus_line(format!(
                "Step {} of {}",
                self.wizard.current_step(),
                self.wizard.step_count()
            )),
            Line::from(step.title),
            Line::from(Span::styled(step.description, theme::secondary_text())),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::chrome("Create your account")),
            header,
        );

        let cursor = self.render_fields(frame, body);

        if meter_height > 0 {
            self.render_meter(frame, meter);
        }

        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);

        if self.wizard.is_submitting() {
            render_loading_modal(
                frame,
                "Submitting",
                "Creating your account...",
                "Please wait    Ctrl-C: cancel",
                &self.loading,
            );
            return;
        }

        match &self.overlay {
            Some(Overlay::Success(message)) => {
                render_success_modal(frame, message, "Enter/Esc: finish");
            }
            Some(Overlay::Failure(message)) => {
                let text = format!("Account creation failed.\n\n{message}");
                render_error_modal(frame, &text, "Enter: retry    Esc: edit details");
            }
            Some(Overlay::Notice(message)) => {
                render_notice_modal(frame, message, "Enter/Esc: dismiss");
            }
            None => {
                if let Some(spot) = cursor {
                    let inner_width = body.width.saturating_sub(2 + VALUE_INDENT) as usize;
                    let column = spot.column.min(inner_width.saturating_sub(1)) as u16;
                    frame.set_cursor_position((
                        body.x + 1 + VALUE_INDENT + column,
                        body.y + 1 + spot.row,
                    ));
                }
            }
        }
    }

    /// Draws the current step's controls; returns where the text cursor belongs.
    fn render_fields(&self, frame: &mut Frame<'_>, area: Rect) -> Option<CursorSpot> {
        let step = self.wizard.current_definition();
        let focused = self.focused();
        let value_width = area.width.saturating_sub(2 + VALUE_INDENT).max(1) as usize;
        let mut lines = Vec::<Line<'static>>::new();
        let mut cursor = None;

        for &field in step.fields {
            let is_focused = focused == Some(Focus::Field(field));
            if field.is_flag() {
                let mark = if self.wizard.fields().flag(field) { "x" } else { " " };
                lines.push(control_line(format!("[{mark}] {}", field.label()), is_focused));
            } else {
                lines.push(label_line(field, is_focused));
                let (value, column) = self.visible_value(field, value_width);
                if is_focused {
                    cursor = Some(CursorSpot {
                        row: lines.len() as u16,
                        column,
                    });
                }
                lines.push(Line::from(format!(
                    "{:indent$}{value}",
                    "",
                    indent = VALUE_INDENT as usize
                )));
            }

            if let Some(error) = self.wizard.error_for(field) {
                lines.push(error_line(error.message.clone()));
            }
            lines.push(Line::from(""));
        }

        if step.id == StepId::Identity {
            lines.push(Line::from(Span::styled("or", theme::secondary_text())));
            for provider in SOCIAL_BUTTONS {
                let is_focused = focused == Some(Focus::Social(provider));
                lines.push(control_line(
                    format!("[ Continue with {} ]", provider.title()),
                    is_focused,
                ));
            }
        }

        frame.render_widget(
            wrapped_paragraph(Text::from(lines)).block(theme::chrome(step.title)),
            area,
        );
        cursor
    }

    /// Returns the on-screen text for `field` and the cursor column within it.
    fn visible_value(&self, field: FieldName, width: usize) -> (String, usize) {
        let Some(input) = self.inputs.get(&field) else {
            return (String::new(), 0);
        };

        if field.is_secret() {
            let shown = masked(input.value());
            let cursor = input.cursor();
            let scroll = cursor.saturating_sub(width.saturating_sub(1));
            let visible: String = shown.chars().skip(scroll).take(width).collect();
            return (visible, cursor - scroll);
        }

        let scroll = input.visual_scroll(width);
        let visible: String = input.value().chars().skip(scroll).take(width).collect();
        (visible, input.visual_cursor().saturating_sub(scroll))
    }

    fn render_meter(&self, frame: &mut Frame<'_>, area: Rect) {
        let strength = self.wizard.strength();
        let label = if strength.label.as_str().is_empty() {
            format!("0/{MAX_SCORE}")
        } else {
            format!("{} ({}/{MAX_SCORE})", strength.label, strength.score)
        };
        let gauge = Gauge::default()
            .block(theme::chrome("Password strength"))
            .gauge_style(Style::default().fg(theme::tone_color(strength.tone())))
            .percent(strength.meter_percent())
            .label(label);
        frame.render_widget(gauge, area);
    }

    fn key_hint(&self, width: u16) -> &'static str {
        if self.wizard.is_last_step() {
            compact_hint(
                width,
                "Space: toggle    Enter: create account    Tab/Shift-Tab: move    Esc: back",
                "Space: toggle    Enter: submit    Tab: move    Esc: back",
                "Space toggle | Enter submit | Esc back",
            )
        } else if self.wizard.current_step() == 1 {
            compact_hint(
                width,
                "Type to edit    Tab/Shift-Tab: move    Space: social sign-in    Enter: next    Esc: leave",
                "Type    Tab: move    Enter: next    Esc: leave",
                "Tab move | Enter next | Esc leave",
            )
        } else {
            compact_hint(
                width,
                "Type to edit    Tab/Shift-Tab: move    Enter: next    Esc: back",
                "Type    Tab: move    Enter: next    Esc: back",
                "Tab move | Enter next | Esc back",
            )
        }
    }
}

fn label_line(field: FieldName, focused: bool) -> Line<'static> {
    if focused {
        focus_line(format!("> {}", field.label()))
    } else {
        Line::from(Span::styled(
            format!("  {}", field.label()),
            theme::secondary_text(),
        ))
    }
}

fn control_line(text: String, focused: bool) -> Line<'static> {
    if focused {
        Line::from(Span::styled(text, theme::focused_control()))
    } else {
        Line::from(text)
    }
}
