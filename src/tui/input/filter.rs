use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

pub(super) fn handle_filter(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.filter_input.clear();
        }
        KeyCode::Enter => {
            if app.filter_input.is_empty() {
                app.last_filter = None;
            } else {
                app.last_filter = Some(std::mem::take(&mut app.filter_input));
            }
            app.mode = Mode::Navigate;
            jump_to_first_match(app);
        }
        KeyCode::Backspace => {
            if app.filter_input.pop().is_none() {
                app.mode = Mode::Navigate;
            }
        }
        KeyCode::Char(c) => app.filter_input.push(c),
        _ => {}
    }
}

/// Cursor to the first matching row at or after the cursor, wrapping.
fn jump_to_first_match(app: &mut App) {
    let Some(re) = app.active_filter_re() else {
        return;
    };
    let rows = app.rows();
    let count = rows.len();
    for step in 0..count {
        let idx = (app.cursor + step) % count;
        if re.is_match(&rows[idx].label) {
            app.cursor = idx;
            return;
        }
    }
    app.status_message = Some("no matching rows".to_string());
}

#[cfg(test)]
mod tests {
    use super::super::tests::{press, press_char};
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_then_enter_applies_filter() {
        let mut app = interactive_app_at("/");
        press_char(&mut app, '/');
        assert_eq!(app.mode, Mode::Filter);
        for c in "hr".chars() {
            press_char(&mut app, c);
        }
        assert_eq!(app.filter_input, "hr");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.last_filter.as_deref(), Some("hr"));
        assert_eq!(app.cursor_row().unwrap().label, "HRM");
    }

    #[test]
    fn escape_discards_input() {
        let mut app = interactive_app_at("/");
        app.last_filter = Some("crm".into());
        press_char(&mut app, '/');
        press_char(&mut app, 'x');
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.filter_input.is_empty());
        assert_eq!(app.last_filter.as_deref(), Some("crm"));
    }

    #[test]
    fn backspace_on_empty_leaves_filter_mode() {
        let mut app = interactive_app_at("/");
        press_char(&mut app, '/');
        press_char(&mut app, 'a');
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.mode, Mode::Filter);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn no_match_sets_status() {
        let mut app = interactive_app_at("/");
        press_char(&mut app, '/');
        press_char(&mut app, 'z');
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status_message.as_deref(), Some("no matching rows"));
        assert_eq!(app.cursor, 0);
    }
}
