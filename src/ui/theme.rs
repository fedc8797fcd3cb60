//! Color theme system
//!
//! Provides built-in presets (dark, light), per-color overrides and MIME
//! based tinting of file cards.

use ratatui::style::Color;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,

    // Breadcrumb bar
    pub breadcrumb_bg: Color,
    pub breadcrumb_fg: Color,
    pub breadcrumb_home: Color,
    pub breadcrumb_separator: Color,

    // Cards
    pub card_border: Color,
    pub card_cursor: Color,
    pub card_selected_bg: Color,
    pub card_text: Color,
    pub folder_icon: Color,
    pub file_icon: Color,
    pub draft_border: Color,

    // Body states
    pub spinner: Color,
    pub error_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,
    pub status_error_bg: Color,
    pub status_error_fg: Color,

    // Preview overlay
    pub preview_header_bg: Color,
    pub preview_header_fg: Color,
    pub preview_bg: Color,
    pub preview_fg: Color,
    pub preview_button: Color,

    // Options menu
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub menu_border: Color,
    pub menu_selected_bg: Color,
    pub menu_selected_fg: Color,

    // Help viewer
    pub help_header_bg: Color,
    pub help_header_fg: Color,
    pub help_content_bg: Color,
    pub help_content_fg: Color,
    pub help_highlight: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border: Color,
    pub dialog_delete_bg: Color,
    pub dialog_delete_border: Color,
    pub dialog_title: Color,
    pub dialog_text: Color,
    pub dialog_input_bg: Color,
    pub dialog_input_fg: Color,
    pub dialog_button_focused_bg: Color,
    pub dialog_button_focused_fg: Color,
    pub dialog_button_unfocused: Color,
    pub dialog_help: Color,

    /// Compiled MIME highlights, first match wins
    pub highlights: Vec<CompiledHighlight>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Reset,

            breadcrumb_bg: Color::Rgb(30, 34, 42),
            breadcrumb_fg: Color::Rgb(200, 205, 215),
            breadcrumb_home: Color::Rgb(120, 180, 255),
            breadcrumb_separator: Color::DarkGray,

            card_border: Color::DarkGray,
            card_cursor: Color::Rgb(120, 180, 255),
            card_selected_bg: Color::Rgb(45, 60, 90),
            card_text: Color::Rgb(220, 220, 220),
            folder_icon: Color::Rgb(240, 200, 90),
            file_icon: Color::Rgb(170, 170, 170),
            draft_border: Color::Green,

            spinner: Color::Cyan,
            error_fg: Color::LightRed,

            status_bg: Color::Rgb(30, 34, 42),
            status_fg: Color::Gray,
            status_error_bg: Color::Red,
            status_error_fg: Color::White,

            preview_header_bg: Color::Rgb(45, 50, 62),
            preview_header_fg: Color::White,
            preview_bg: Color::Rgb(18, 20, 26),
            preview_fg: Color::Rgb(210, 210, 210),
            preview_button: Color::Rgb(120, 180, 255),

            menu_bg: Color::Rgb(40, 44, 54),
            menu_fg: Color::Rgb(210, 210, 210),
            menu_border: Color::Gray,
            menu_selected_bg: Color::Rgb(120, 180, 255),
            menu_selected_fg: Color::Black,

            help_header_bg: Color::Rgb(45, 50, 62),
            help_header_fg: Color::White,
            help_content_bg: Color::Rgb(18, 20, 26),
            help_content_fg: Color::Rgb(210, 210, 210),
            help_highlight: Color::Yellow,

            dialog_bg: Color::Rgb(40, 44, 54),
            dialog_border: Color::Rgb(120, 180, 255),
            dialog_delete_bg: Color::Rgb(70, 20, 20),
            dialog_delete_border: Color::LightRed,
            dialog_title: Color::White,
            dialog_text: Color::Rgb(210, 210, 210),
            dialog_input_bg: Color::Rgb(20, 22, 28),
            dialog_input_fg: Color::White,
            dialog_button_focused_bg: Color::Rgb(120, 180, 255),
            dialog_button_focused_fg: Color::Black,
            dialog_button_unfocused: Color::Gray,
            dialog_help: Color::DarkGray,

            highlights: Vec::new(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),

            breadcrumb_bg: Color::Rgb(230, 232, 236),
            breadcrumb_fg: Color::Rgb(40, 40, 40),
            breadcrumb_home: Color::Rgb(20, 90, 200),
            breadcrumb_separator: Color::Gray,

            card_border: Color::Gray,
            card_cursor: Color::Rgb(20, 90, 200),
            card_selected_bg: Color::Rgb(200, 220, 250),
            card_text: Color::Black,
            folder_icon: Color::Rgb(200, 140, 0),
            file_icon: Color::DarkGray,
            draft_border: Color::Rgb(0, 140, 60),

            spinner: Color::Blue,
            error_fg: Color::Red,

            status_bg: Color::Rgb(230, 232, 236),
            status_fg: Color::Rgb(40, 40, 40),
            status_error_bg: Color::Red,
            status_error_fg: Color::White,

            preview_header_bg: Color::Rgb(210, 214, 222),
            preview_header_fg: Color::Black,
            preview_bg: Color::White,
            preview_fg: Color::Black,
            preview_button: Color::Rgb(20, 90, 200),

            menu_bg: Color::White,
            menu_fg: Color::Black,
            menu_border: Color::DarkGray,
            menu_selected_bg: Color::Rgb(20, 90, 200),
            menu_selected_fg: Color::White,

            help_header_bg: Color::Rgb(210, 214, 222),
            help_header_fg: Color::Black,
            help_content_bg: Color::White,
            help_content_fg: Color::Black,
            help_highlight: Color::Rgb(20, 90, 200),

            dialog_bg: Color::Rgb(240, 240, 240),
            dialog_border: Color::Rgb(20, 90, 200),
            dialog_delete_bg: Color::Rgb(255, 230, 230),
            dialog_delete_border: Color::Red,
            dialog_title: Color::Black,
            dialog_text: Color::Rgb(40, 40, 40),
            dialog_input_bg: Color::White,
            dialog_input_fg: Color::Black,
            dialog_button_focused_bg: Color::Rgb(20, 90, 200),
            dialog_button_focused_fg: Color::White,
            dialog_button_unfocused: Color::DarkGray,
            dialog_help: Color::Gray,

            highlights: Vec::new(),
        }
    }

    /// Get a theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Apply custom color overrides from config
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, value) in overrides {
            let Some(color) = parse_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut self.background,
                "breadcrumb_bg" => &mut self.breadcrumb_bg,
                "breadcrumb_fg" => &mut self.breadcrumb_fg,
                "breadcrumb_home" => &mut self.breadcrumb_home,
                "breadcrumb_separator" => &mut self.breadcrumb_separator,
                "card_border" => &mut self.card_border,
                "card_cursor" => &mut self.card_cursor,
                "card_selected_bg" => &mut self.card_selected_bg,
                "card_text" => &mut self.card_text,
                "folder_icon" => &mut self.folder_icon,
                "file_icon" => &mut self.file_icon,
                "draft_border" => &mut self.draft_border,
                "spinner" => &mut self.spinner,
                "error_fg" => &mut self.error_fg,
                "status_bg" => &mut self.status_bg,
                "status_fg" => &mut self.status_fg,
                "status_error_bg" => &mut self.status_error_bg,
                "status_error_fg" => &mut self.status_error_fg,
                "preview_header_bg" => &mut self.preview_header_bg,
                "preview_header_fg" => &mut self.preview_header_fg,
                "preview_bg" => &mut self.preview_bg,
                "preview_fg" => &mut self.preview_fg,
                "preview_button" => &mut self.preview_button,
                "menu_bg" => &mut self.menu_bg,
                "menu_fg" => &mut self.menu_fg,
                "menu_border" => &mut self.menu_border,
                "menu_selected_bg" => &mut self.menu_selected_bg,
                "menu_selected_fg" => &mut self.menu_selected_fg,
                "help_header_bg" => &mut self.help_header_bg,
                "help_header_fg" => &mut self.help_header_fg,
                "help_content_bg" => &mut self.help_content_bg,
                "help_content_fg" => &mut self.help_content_fg,
                "help_highlight" => &mut self.help_highlight,
                "dialog_bg" => &mut self.dialog_bg,
                "dialog_border" => &mut self.dialog_border,
                "dialog_delete_bg" => &mut self.dialog_delete_bg,
                "dialog_delete_border" => &mut self.dialog_delete_border,
                "dialog_title" => &mut self.dialog_title,
                "dialog_text" => &mut self.dialog_text,
                "dialog_input_bg" => &mut self.dialog_input_bg,
                "dialog_input_fg" => &mut self.dialog_input_fg,
                "dialog_button_focused_bg" => &mut self.dialog_button_focused_bg,
                "dialog_button_focused_fg" => &mut self.dialog_button_focused_fg,
                "dialog_button_unfocused" => &mut self.dialog_button_unfocused,
                "dialog_help" => &mut self.dialog_help,
                _ => continue,
            };
            *slot = color;
        }
        self
    }

    /// First highlight rule matching a MIME type
    pub fn find_highlight(&self, mime: &str) -> Option<&CompiledHighlight> {
        if mime.is_empty() {
            return None;
        }
        self.highlights.iter().find(|h| h.regex.is_match(mime))
    }
}

/// MIME highlighting rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MimeHighlight {
    /// Regex matched against the declared MIME type
    pub pattern: String,
    /// Color for matching cards (name, hex, or rgb)
    pub color: String,
    /// Short label drawn as the card icon, e.g. "IMG"
    #[serde(default)]
    pub label: Option<String>,
}

/// Compiled MIME highlighting rule
#[derive(Debug, Clone)]
pub struct CompiledHighlight {
    pub regex: Regex,
    pub color: Color,
    pub label: Option<String>,
}

/// Theme configuration for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Active preset: "dark" or "light"
    pub preset: String,
    /// Color overrides for the active preset
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// MIME highlighting rules (first match wins)
    #[serde(default = "default_highlights")]
    pub highlights: Vec<MimeHighlight>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            preset: "dark".to_string(),
            colors: HashMap::new(),
            highlights: default_highlights(),
        }
    }
}

fn highlight(pattern: &str, color: &str, label: &str) -> MimeHighlight {
    MimeHighlight {
        pattern: pattern.to_string(),
        color: color.to_string(),
        label: Some(label.to_string()),
    }
}

/// Default MIME highlighting rules
fn default_highlights() -> Vec<MimeHighlight> {
    vec![
        highlight(r"^image/", "light_magenta", "IMG"),
        highlight(r"^video/", "light_red", "VID"),
        highlight(r"^audio/", "light_cyan", "AUD"),
        highlight(r"^application/pdf", "red", "PDF"),
        highlight(r"(zip|tar|gzip|x-7z|x-rar|x-bzip|x-xz)", "yellow", "ARC"),
        highlight(r"^text/", "light_green", "TXT"),
    ]
}

impl ThemeConfig {
    /// Build a Theme from this config
    pub fn build_theme(&self) -> Theme {
        let mut theme = Theme::by_name(&self.preset)
            .unwrap_or_default()
            .with_overrides(&self.colors);
        theme.highlights = self.compile_highlights();
        theme
    }

    /// Compile highlighting rules, skipping invalid ones
    fn compile_highlights(&self) -> Vec<CompiledHighlight> {
        self.highlights
            .iter()
            .filter_map(|h| {
                let color = parse_color(&h.color)?;
                let regex = Regex::new(&format!("(?i){}", h.pattern)).ok()?;
                Some(CompiledHighlight {
                    regex,
                    color,
                    label: h.label.clone(),
                })
            })
            .collect()
    }
}

/// Parse a color string into a ratatui Color
///
/// Supports:
/// - Named colors: "black", "red", ..., "gray", plus "light_*" variants
/// - RGB hex: "#RRGGBB" or "RRGGBB"
/// - RGB decimal: "rgb(R,G,B)"
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    let named = match s.replace('_', "").as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        "reset" => Some(Color::Reset),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    let hex = s.strip_prefix('#').unwrap_or(&s);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<Vec<u8>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("BLUE"), Some(Color::Blue));
        assert_eq!(parse_color("dark_gray"), Some(Color::DarkGray));
        assert_eq!(parse_color("light_magenta"), Some(Color::LightMagenta));
    }

    #[test]
    fn test_parse_hex_and_rgb() {
        assert_eq!(parse_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("1a2b3c"), Some(Color::Rgb(26, 43, 60)));
        assert_eq!(parse_color("rgb(0, 128, 255)"), Some(Color::Rgb(0, 128, 255)));
        assert_eq!(parse_color("rgb(1,2)"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_presets_and_overrides() {
        assert!(Theme::by_name("LIGHT").is_some());
        assert!(Theme::by_name("classic").is_none());

        let mut colors = HashMap::new();
        colors.insert("card_cursor".to_string(), "#010203".to_string());
        colors.insert("no_such_key".to_string(), "red".to_string());
        let theme = Theme::dark().with_overrides(&colors);
        assert_eq!(theme.card_cursor, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_default_highlights_match_mime() {
        let theme = ThemeConfig::default().build_theme();
        assert_eq!(theme.find_highlight("image/png").and_then(|h| h.label.as_deref()), Some("IMG"));
        assert_eq!(theme.find_highlight("application/zip").and_then(|h| h.label.as_deref()), Some("ARC"));
        assert_eq!(theme.find_highlight("text/plain").map(|h| h.color), Some(Color::LightGreen));
        assert!(theme.find_highlight("application/octet-stream").is_none());
        assert!(theme.find_highlight("").is_none());
    }

    #[test]
    fn test_highlights_from_toml() {
        let config: ThemeConfig = toml_edit::de::from_str(r#"preset = "light""#).unwrap();
        assert_eq!(config.preset, "light");
        assert!(!config.highlights.is_empty());
    }

    #[test]
    fn test_invalid_highlight_skipped() {
        let config = ThemeConfig {
            highlights: vec![
                MimeHighlight { pattern: "(".into(), color: "red".into(), label: None },
                MimeHighlight { pattern: "^video/".into(), color: "nope".into(), label: None },
                MimeHighlight { pattern: "^video/".into(), color: "blue".into(), label: None },
            ],
            ..ThemeConfig::default()
        };
        assert_eq!(config.build_theme().highlights.len(), 1);
    }
}
