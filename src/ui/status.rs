//! Status bar and function key bar widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::config::KeyBindings;
use crate::view::{format_size, BrowserView};
use super::Theme;

/// Status bar showing counts, selection and the last notice
pub struct StatusBar<'a> {
    view: &'a BrowserView<'a>,
    busy: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(view: &'a BrowserView<'a>, theme: &'a Theme) -> Self {
        Self { view, busy: false, theme }
    }

    pub fn with_busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    fn summary(&self) -> String {
        let view = self.view;
        let mut text = format!(" {} folders, {} files", view.folders, view.files);
        if view.selected > 0 {
            text.push_str(&format!("  │ {} selected ({})", view.selected, format_size(view.selected_size)));
        }
        if self.busy {
            text.push_str("  │ working...");
        }
        text.push(' ');
        text
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let style = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_char(' ').set_style(style);
        }

        let summary = self.summary();
        let summary_width = summary.chars().count() as u16;
        buf.set_stringn(area.x, area.y, &summary, area.width as usize, style);

        // Notice on the right, errors highlighted
        let Some(notice) = self.view.notice else {
            return;
        };
        let notice_style = if notice.is_error {
            Style::default()
                .bg(self.theme.status_error_bg)
                .fg(self.theme.status_error_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::BOLD)
        };
        let room = area.width.saturating_sub(summary_width + 1) as usize;
        if room < 8 {
            return;
        }
        let mut text = format!(" {} ", notice.text);
        if text.chars().count() > room {
            text = text.chars().take(room.saturating_sub(1)).collect::<String>() + "…";
        }
        let x = area.x + area.width - text.chars().count() as u16;
        buf.set_string(x, area.y, &text, notice_style);
    }
}

/// Actions shown in the key bar, in order
const KEY_BAR: [(&str, &str); 8] = [
    ("help", "Help"),
    ("rename", "Rename"),
    ("preview", "View"),
    ("copy", "Copy"),
    ("new_folder", "MkDir"),
    ("delete", "Delete"),
    ("menu", "Menu"),
    ("quit", "Quit"),
];

/// Function key bar along the bottom edge
pub struct KeyBar<'a> {
    bindings: &'a KeyBindings,
    theme: &'a Theme,
}

impl<'a> KeyBar<'a> {
    pub fn new(bindings: &'a KeyBindings, theme: &'a Theme) -> Self {
        Self { bindings, theme }
    }
}

impl Widget for KeyBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 10 {
            return;
        }

        let text_style = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);
        let key_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.card_cursor)
            .add_modifier(Modifier::BOLD);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_char(' ').set_style(text_style);
        }

        let right = area.x + area.width;
        let mut x = area.x;
        for (action, label) in KEY_BAR {
            let key = self.bindings.get(action);
            if key.is_empty() {
                continue;
            }
            let needed = (key.chars().count() + label.len() + 2) as u16;
            if x + needed > right {
                break;
            }
            buf.set_string(x, area.y, key, key_style);
            x += key.chars().count() as u16;
            buf.set_string(x, area.y, label, text_style);
            x += label.len() as u16 + 2;
        }
    }
}
