use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::{report_save_error, select_row};

/// Drag mode: the cursor is the pointer. Hovering only moves the drop
/// marker; nothing is reordered or written until the drop.
pub(super) fn handle_drag(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => hover(app, 1),
        KeyCode::Up | KeyCode::Char('k') => hover(app, -1),
        KeyCode::Enter | KeyCode::Char('m') => finish(app),
        KeyCode::Esc => {
            let moved = app.sidebar.drag().map(|d| d.moved_row());
            app.sidebar.cancel_drag();
            app.mode = Mode::Navigate;
            if let Some(kind) = moved {
                select_row(app, &kind);
            }
        }
        _ => {}
    }
}

fn hover(app: &mut App, delta: isize) {
    let count = app.rows().len();
    if count == 0 {
        return;
    }
    let next = (app.cursor as isize + delta).clamp(0, count as isize - 1) as usize;
    app.cursor = next;
    if let Some(row) = app.cursor_row() {
        app.sidebar.hover_drag(&row.kind);
    }
}

fn finish(app: &mut App) {
    let moved = app.sidebar.drag().map(|d| d.moved_row());
    match app.sidebar.end_drag() {
        Ok(true) => {}
        Ok(false) => app.status_message = Some("order unchanged".to_string()),
        Err(e) => report_save_error(app, "order", e),
    }
    app.mode = Mode::Navigate;
    if let Some(kind) = moved {
        select_row(app, &kind);
    }
}
