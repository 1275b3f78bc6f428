use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::tui::sidebar::{RowKind, drag_identity};

use super::{report_save_error, select_row};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => move_cursor(app, 1),
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => move_cursor(app, -1),
        (_, KeyCode::Home) | (_, KeyCode::Char('g')) => app.cursor = 0,
        (_, KeyCode::End) | (_, KeyCode::Char('G')) => {
            app.cursor = app.rows().len().saturating_sub(1);
        }

        (_, KeyCode::Enter) => activate(app),
        (_, KeyCode::Right) | (_, KeyCode::Char('l')) => expand_or_activate(app),
        (_, KeyCode::Left) | (_, KeyCode::Char('h')) => collapse_or_parent(app),
        (_, KeyCode::Backspace) => app.go_back(),

        (_, KeyCode::Char('s')) => toggle_star(app),
        (_, KeyCode::Char('m')) => {
            if let Some(row) = app.cursor_row()
                && app.sidebar.begin_drag(&row.kind)
            {
                app.mode = Mode::Drag;
            }
        }
        (_, KeyCode::Char('K')) => nudge(app, -1),
        (_, KeyCode::Char('J')) => nudge(app, 1),

        (_, KeyCode::Char('/')) => {
            app.mode = Mode::Filter;
            app.filter_input.clear();
        }
        (_, KeyCode::Char('n')) => jump_to_match(app, 1),
        (_, KeyCode::Char('N')) => jump_to_match(app, -1),
        (_, KeyCode::Esc) => app.last_filter = None,
        _ => {}
    }

    app.clamp_cursor();
}

fn move_cursor(app: &mut App, delta: isize) {
    let count = app.rows().len();
    if count == 0 {
        return;
    }
    let next = app.cursor as isize + delta;
    app.cursor = next.clamp(0, count as isize - 1) as usize;
}

/// Leaves navigate; modules and groups toggle.
fn activate(app: &mut App) {
    let Some(row) = app.cursor_row() else {
        return;
    };
    if let Some(request) = app.sidebar.activate(&row.kind) {
        app.navigate(request);
    }
    select_row(app, &row.kind);
}

fn expand_or_activate(app: &mut App) {
    let Some(row) = app.cursor_row() else {
        return;
    };
    match row.expanded {
        Some(false) => app.sidebar.set_expanded(&row.kind, true),
        Some(true) => move_cursor(app, 1),
        None => activate(app),
    }
}

fn collapse_or_parent(app: &mut App) {
    let Some(row) = app.cursor_row() else {
        return;
    };
    if row.expanded == Some(true) {
        app.sidebar.set_expanded(&row.kind, false);
        return;
    }
    // Nearest row above with a smaller depth
    let rows = app.rows();
    if let Some(parent) = rows[..app.cursor.min(rows.len())]
        .iter()
        .rposition(|r| r.depth < row.depth)
    {
        app.cursor = parent;
    }
}

fn toggle_star(app: &mut App) {
    let Some(href) = app
        .cursor_row()
        .and_then(|r| r.kind.href().map(str::to_string))
    else {
        return;
    };
    let cursor_kind = app.cursor_row().map(|r| r.kind);
    match app.sidebar.toggle_star(&href) {
        Ok(Some(true)) => app.status_message = Some(format!("starred {}", href)),
        Ok(Some(false)) => app.status_message = Some(format!("unstarred {}", href)),
        Ok(None) => {}
        Err(e) => report_save_error(app, "favorites", e),
    }
    // The favorites section may have appeared or gone above the cursor
    if let Some(kind) = cursor_kind
        && !matches!(kind, RowKind::Favorite { .. })
    {
        select_row(app, &kind);
    }
}

/// Keyboard reorder: a drag onto the adjacent sibling, committed at once.
fn nudge(app: &mut App, direction: isize) {
    let Some(row) = app.cursor_row() else {
        return;
    };
    let Some((scope, _)) = drag_identity(&row.kind) else {
        return;
    };
    let rows = app.rows();
    let sibling = if direction < 0 {
        rows[..app.cursor]
            .iter()
            .rev()
            .find(|r| drag_identity(&r.kind).is_some_and(|(s, _)| s == scope))
    } else {
        rows[app.cursor + 1..]
            .iter()
            .find(|r| drag_identity(&r.kind).is_some_and(|(s, _)| s == scope))
    };
    let Some(sibling) = sibling else {
        return;
    };

    if !app.sidebar.begin_drag(&row.kind) {
        return;
    }
    app.sidebar.hover_drag(&sibling.kind);
    if let Err(e) = app.sidebar.end_drag() {
        report_save_error(app, "order", e);
    }
    select_row(app, &row.kind);
}

/// Move to the next row (wrapping) whose label matches the last filter.
fn jump_to_match(app: &mut App, direction: isize) {
    let Some(re) = app.active_filter_re() else {
        return;
    };
    let rows = app.rows();
    let count = rows.len();
    if count == 0 {
        return;
    }
    for step in 1..=count {
        let idx = (app.cursor as isize + direction * step as isize).rem_euclid(count as isize);
        if re.is_match(&rows[idx as usize].label) {
            app.cursor = idx as usize;
            return;
        }
    }
    app.status_message = Some("no matching rows".to_string());
}
