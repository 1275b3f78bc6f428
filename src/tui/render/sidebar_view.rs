use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::tui::sidebar::{NavRow, RowKind};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

use super::push_highlighted_spans;

/// Cells reserved at the right edge of every row for the star toggle and
/// drag handle. Reserved in both phases so labels never shift.
pub const GUTTER: usize = 3;

/// Expand marker or icon, always two cells
fn marker(row: &NavRow) -> String {
    match row.expanded {
        Some(true) => "\u{25BE} ".to_string(),  // ▾
        Some(false) => "\u{25B8} ".to_string(), // ▸
        None => format!("{} ", Theme::icon_glyph(&row.icon)),
    }
}

/// Gutter text: blank in the static phase, star and handle once interactive.
pub fn gutter(row: &NavRow) -> String {
    let a = &row.affordances;
    let star = match a.star {
        Some(true) => "\u{2605}",  // ★
        Some(false) => "\u{2606}", // ☆
        None => " ",
    };
    let handle = if a.dragging {
        "\u{21C5}" // ⇅
    } else if a.drop_target {
        "\u{2190}" // ←
    } else if a.drag_handle {
        "\u{2261}" // ≡
    } else {
        " "
    };
    format!(" {}{}", star, handle)
}

/// Render the navigation tree
pub fn render_sidebar(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.rows();
    let height = inner.height as usize;

    // Keep the cursor on screen
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }

    let search_re = app.active_filter_re();
    let mut lines: Vec<Line> = Vec::new();
    for (i, row) in rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        lines.push(render_row(
            app,
            row,
            i == app.cursor,
            inner.width as usize,
            search_re.as_ref(),
        ));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " No modules enabled",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, inner);
}

fn render_row<'a>(
    app: &App,
    row: &NavRow,
    is_cursor: bool,
    width: usize,
    search_re: Option<&regex::Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let bg = if is_cursor {
        theme.cursor_bg
    } else {
        theme.background
    };

    let mut label_style = match (&row.kind, row.active) {
        (RowKind::FavoritesHeader, _) => Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        (_, true) => Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        (RowKind::Module { .. }, false) => Style::default().fg(theme.text_bright),
        _ => Style::default().fg(theme.text),
    }
    .bg(bg);
    if row.affordances.dragging {
        label_style = label_style.fg(theme.purple);
    }
    if row.affordances.drop_target {
        label_style = label_style.add_modifier(Modifier::UNDERLINED);
    }
    let hl_style = label_style
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);

    let indent = " ".repeat(1 + 2 * row.depth as usize);
    let marker = marker(row);
    let fixed = display_width(&indent) + display_width(&marker) + GUTTER;
    let label = truncate_to_width(&row.label, width.saturating_sub(fixed));

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(indent, Style::default().bg(bg)));
    spans.push(Span::styled(
        marker,
        Style::default().fg(if row.active { theme.highlight } else { theme.dim }).bg(bg),
    ));
    push_highlighted_spans(&mut spans, &label, label_style, hl_style, search_re);

    let used = fixed - GUTTER + display_width(&label);
    if used + GUTTER < width {
        spans.push(Span::styled(
            " ".repeat(width - used - GUTTER),
            Style::default().bg(bg),
        ));
    }

    let gutter_color = if row.affordances.drop_target {
        theme.cyan
    } else if row.affordances.dragging {
        theme.purple
    } else {
        theme.yellow
    };
    spans.push(Span::styled(
        gutter(row),
        Style::default().fg(gutter_color).bg(bg),
    ));

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::prefs::Preferences;
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    /// Drop the gutter column from every line
    fn strip_gutter(output: &str, width: usize) -> Vec<String> {
        output
            .lines()
            .map(|l| {
                let kept: String = l.chars().take(width - GUTTER).collect();
                kept.trim_end().to_string()
            })
            .collect()
    }

    fn render_sidebar_sized(app: &mut App, width: u16, height: u16) -> String {
        render_to_string(width, height, |frame, area| {
            render_sidebar(frame, app, area);
        })
    }

    fn render_sidebar_text(app: &mut App, width: u16) -> String {
        render_sidebar_sized(app, width, 12)
    }

    #[test]
    fn static_sidebar_shows_fallback_modules() {
        let mut app = small_app("/");
        let output = render_sidebar_sized(&mut app, 24, 2);
        let expected = [
            format!(" \u{25B8} Sales{}\u{2502}", " ".repeat(15)),
            format!(" \u{25B8} People{}\u{2502}", " ".repeat(14)),
        ]
        .join("\n");
        assert_eq!(output, expected);
    }

    #[test]
    fn interactive_upgrade_only_adds_gutter_glyphs() {
        let mut app = small_app("/sales/quotes/3");
        app.sidebar.toggle_module("sales");
        let width = 28;
        assert!(app.poll_mount());
        let before = render_sidebar_text(&mut app, width);

        assert!(app.poll_mount());
        let after = render_sidebar_text(&mut app, width);

        // Content columns match; the border sits in the last column
        assert_eq!(
            strip_gutter(&before, width as usize - 1),
            strip_gutter(&after, width as usize - 1)
        );
        assert_ne!(before, after);
        assert!(after.contains("\u{2261}"));
        assert!(after.contains("\u{2606}"));
        assert!(!before.contains("\u{2261}"));
    }

    #[test]
    fn active_group_is_open_and_labels_truncate() {
        let mut app = small_app("/sales/quotes");
        app.sidebar.toggle_module("sales");
        let output = render_sidebar_text(&mut app, 18);
        assert!(output.contains("\u{25BE} Sales"));
        assert!(output.contains("\u{25BE} Deals"));
        assert!(output.contains("Quotes"));
        // "Opportunities" does not fit in 18 columns
        assert!(output.contains("\u{2026}"));
    }

    #[test]
    fn drag_marks_moved_row_and_target() {
        let mut app = small_app("/");
        app.sidebar.complete_mount(Preferences::default(), both_enabled());
        let sales = RowKind::Module {
            key: "sales".into(),
        };
        let people = RowKind::Module {
            key: "people".into(),
        };
        app.sidebar.begin_drag(&sales);
        app.sidebar.hover_drag(&people);

        let output = render_sidebar_text(&mut app, 24);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("\u{21C5}"));
        assert!(lines[1].contains("\u{2190}"));
    }

    #[test]
    fn empty_tree_shows_placeholder() {
        let mut app = small_app_with_enabled("/", &[]);
        let output = render_sidebar_text(&mut app, 24);
        assert!(output.contains("No modules enabled"));
    }
}
