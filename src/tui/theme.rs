use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Active route and its ancestors
    pub highlight: Color,
    pub dim: Color,
    /// Star markers
    pub yellow: Color,
    /// Drop target marker
    pub cyan: Color,
    /// Row being dragged
    pub purple: Color,
    pub cursor_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            cursor_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let color = match parse_hex_color(value) {
                Some(c) => c,
                None => {
                    log::warn!("ignoring invalid color {} = {:?}", key, value);
                    continue;
                }
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "yellow" => theme.yellow = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "cursor_bg" => theme.cursor_bg = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => {}
            }
        }

        theme
    }

    /// Glyph for a symbolic icon name. Unknown names render as a bullet.
    pub fn icon_glyph(icon: &str) -> &'static str {
        match icon {
            "star" => "\u{2605}",      // ★
            "gauge" => "\u{25D4}",     // ◔
            "briefcase" => "\u{25A3}", // ▣
            "users" | "user" => "\u{263A}",
            "factory" | "warehouse" => "\u{2302}", // ⌂
            "globe" => "\u{25CE}",                 // ◎
            "gear" => "\u{2699}",                  // ⚙
            "file" => "\u{25A4}",                  // ▤
            "calendar" | "clock" => "\u{25F7}",    // ◷
            "" => " ",
            _ => "\u{2022}", // •
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("highlight".into(), "not-a-color".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        // Invalid values keep the default
        assert_eq!(theme.highlight, Color::Rgb(0xFB, 0x41, 0x96));
    }

    #[test]
    fn test_icon_glyph_fallback() {
        assert_eq!(Theme::icon_glyph("star"), "\u{2605}");
        assert_eq!(Theme::icon_glyph("no-such-icon"), "\u{2022}");
        assert_eq!(Theme::icon_glyph(""), " ");
    }
}
