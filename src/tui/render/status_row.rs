use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint): (Vec<Span>, String) = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(msg) = &app.status_message {
                spans.push(Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.yellow).bg(bg),
                ));
            } else if let Some(pattern) = &app.last_filter {
                spans.push(Span::styled(
                    format!("/{}", pattern),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
            let hint = if app.is_interactive() {
                let enabled = &app.sidebar.state().enabled;
                format!(
                    "modules: {}  favorites: {}  ? help",
                    enabled.origin.as_str(),
                    app.sidebar.state().favorites.starred_count()
                )
            } else {
                "loading\u{2026}".to_string()
            };
            (spans, hint)
        }
        Mode::Filter => {
            // Filter prompt: /pattern▌
            let spans = vec![
                Span::styled(
                    format!("/{}", app.filter_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            (spans, "Enter apply  Esc cancel".to_string())
        }
        Mode::Drag => {
            let label = app
                .sidebar
                .drag()
                .map(|d| format!(" -- MOVE -- {}", d.moved))
                .unwrap_or_else(|| " -- MOVE --".to_string());
            let spans = vec![Span::styled(
                label,
                Style::default().fg(app.theme.purple).bg(bg),
            )];
            (spans, "j/k target  Enter drop  Esc cancel".to_string())
        }
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(&hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
