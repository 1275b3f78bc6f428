mod drag;
mod filter;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};
use super::sidebar::RowKind;

use drag::handle_drag;
use filter::handle_filter;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Drag => handle_drag(app, key),
        Mode::Filter => handle_filter(app, key),
    }
}

/// Shift+letter arrives inconsistently across terminals; fold it to uppercase.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

/// Put the cursor on the row with this identity, if it is visible.
fn select_row(app: &mut App, kind: &RowKind) -> bool {
    match app.rows().iter().position(|r| &r.kind == kind) {
        Some(idx) => {
            app.cursor = idx;
            true
        }
        None => false,
    }
}

/// Report a failed preference write without interrupting the session.
fn report_save_error(app: &mut App, what: &str, err: impl std::fmt::Display) {
    log::warn!("could not save {}: {}", what, err);
    app.status_message = Some(format!("could not save {}", what));
}
