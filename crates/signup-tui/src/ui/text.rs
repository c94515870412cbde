use ratatui::layout::Alignment;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

const MASK: char = '•';

pub(crate) fn wrapped_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    Paragraph::new(text).wrap(Wrap { trim: false })
}

pub(crate) fn key_hint_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    wrapped_paragraph(text).alignment(Alignment::Center)
}

/// Rows needed for a bordered hint block of `total_width` columns.
pub(crate) fn key_hint_height(total_width: u16, text: &str) -> u16 {
    let content_width = total_width.saturating_sub(2).max(1) as usize;
    wrapped_line_count(text, content_width)
        .saturating_add(2)
        .max(3)
}

pub(crate) fn compact_hint<'a>(
    width: u16,
    full: &'a str,
    medium: &'a str,
    compact: &'a str,
) -> &'a str {
    if width >= 110 {
        full
    } else if width >= 78 {
        medium
    } else {
        compact
    }
}

pub(crate) fn focus_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(message.into(), theme::focus_prompt()))
}

pub(crate) fn error_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        format!("  ! {}", message.into()),
        theme::error_prompt(),
    ))
}

pub(crate) fn masked(value: &str) -> String {
    value.chars().map(|_| MASK).collect()
}

fn wrapped_line_count(text: &str, width: usize) -> u16 {
    let width = width.max(1);
    let lines: usize = text
        .split('\n')
        .map(|line| {
            let columns: usize = line.chars().map(|ch| if ch == '\t' { 4 } else { 1 }).sum();
            columns.div_ceil(width).max(1)
        })
        .sum();
    u16::try_from(lines).unwrap_or(u16::MAX).max(1)
}
