use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::menu::MenuRegistry;
use crate::ops::enablement::EnabledModules;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

const SMALL_MENU: &str = r#"
[[module]]
key = "sales"
label = "Sales"
icon = "briefcase"

[[module.groups]]
key = "sales-deals"
label = "Deals"

[[module.groups.items]]
label = "Opportunities"
href = "/sales/opportunities"

[[module.groups.items]]
label = "Quotes"
href = "/sales/quotes"

[[module]]
key = "people"
label = "People"
icon = "users"

[[module.groups]]
key = "people-staff"
label = "Staff"

[[module.groups.items]]
label = "Employees"
href = "/people/employees"
"#;

/// Two modules with one group each; both in the fallback set.
pub fn small_app(path: &str) -> App {
    small_app_with_enabled(path, &["sales", "people"])
}

pub fn small_app_with_enabled(path: &str, enabled: &[&str]) -> App {
    let registry = MenuRegistry::from_toml(SMALL_MENU).unwrap();
    App::with_registry(
        registry,
        EnabledModules::fallback(enabled.iter().copied()),
        path,
    )
}

pub fn both_enabled() -> EnabledModules {
    EnabledModules::fallback(["sales", "people"])
}

/// Builtin menu with the default fallback set, still in the static phase.
pub fn app_at(path: &str) -> App {
    App::with_registry(
        MenuRegistry::builtin().unwrap(),
        EnabledModules::fallback(["crm", "hrm"]),
        path,
    )
}

/// Builtin menu, already interactive.
pub fn interactive_app_at(path: &str) -> App {
    let mut app = app_at(path);
    mount(&mut app);
    app
}

/// Run both mount steps: apply loaded state, then upgrade.
pub fn mount(app: &mut App) {
    assert!(app.poll_mount());
    assert!(app.poll_mount());
    assert!(app.is_interactive());
}
