use crossterm::event::{KeyCode, KeyEvent};

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_next_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab | KeyCode::Down)
}

pub(crate) fn is_prev_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::BackTab | KeyCode::Up)
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' '))
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{is_back, is_confirm, is_next_field, is_prev_field, is_toggle};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn field_movement_uses_tab_and_arrows_only() {
        assert!(is_next_field(key(KeyCode::Tab)));
        assert!(is_next_field(key(KeyCode::Down)));
        assert!(is_prev_field(key(KeyCode::BackTab)));
        assert!(is_prev_field(key(KeyCode::Up)));
        assert!(!is_next_field(key(KeyCode::Char('j'))));
        assert!(!is_prev_field(key(KeyCode::Char('k'))));
    }

    #[test]
    fn confirm_back_and_toggle_match_contract() {
        assert!(is_confirm(key(KeyCode::Enter)));
        assert!(is_back(key(KeyCode::Esc)));
        assert!(is_toggle(key(KeyCode::Char(' '))));
        assert!(!is_toggle(key(KeyCode::Char('x'))));
        assert!(!is_back(key(KeyCode::Enter)));
    }
}
