use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

const SEPARATOR: &str = " \u{203A} "; // ›

/// Render the page area: breadcrumb for the current route plus its path.
pub fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width.saturating_sub(2) as usize;
    let trail = app.sidebar.active_trail();

    let mut lines: Vec<Line> = vec![Line::from("")];

    if trail.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width("No menu entry for this route", width)),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    } else {
        let crumb = trail.join(SEPARATOR);
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(&crumb, width)),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(Span::styled(
        format!(" {}", truncate_to_width(app.router.current(), width)),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    if app.router.can_go_back() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Backspace: previous page",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use crate::tui::sidebar::NavigationRequest;
    use pretty_assertions::assert_eq;

    fn content_text(app: &App) -> String {
        render_to_string(50, 6, |frame, area| render_content(frame, app, area))
    }

    #[test]
    fn breadcrumb_follows_active_leaf() {
        let app = app_at("/hrm/employees/42/edit");
        let output = content_text(&app);
        assert_eq!(
            output,
            [
                "",
                " HRM \u{203A} People \u{203A} Employees",
                " /hrm/employees/42/edit",
            ]
            .join("\n")
        );
    }

    #[test]
    fn unknown_route_has_no_breadcrumb() {
        let app = app_at("/reports");
        let output = content_text(&app);
        assert!(output.contains("No menu entry for this route"));
        assert!(output.contains("/reports"));
    }

    #[test]
    fn back_hint_after_navigation() {
        let mut app = app_at("/");
        app.navigate(NavigationRequest("/crm/quotes".into()));
        let output = content_text(&app);
        assert!(output.contains("CRM \u{203A} Sales \u{203A} Quotes"));
        assert!(output.contains("Backspace"));
    }
}
