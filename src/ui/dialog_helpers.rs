//! Dialog rendering helper utilities.
//!
//! Common drawing operations shared by the dialogs, the options menu and the
//! inline name editor.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use super::Theme;

/// Pre-computed styles for dialog rendering.
pub struct DialogStyles {
    pub border: Style,
    pub title: Style,
    pub label: Style,
    pub input: Style,
    pub cursor: Style,
    pub button_focused: Style,
    pub button_unfocused: Style,
    pub help: Style,
    pub bg: Style,
}

impl DialogStyles {
    /// Create dialog styles from theme with given background color.
    pub fn new(theme: &Theme, bg_color: Color, border_color: Color) -> Self {
        Self {
            border: Style::default().bg(bg_color).fg(border_color),
            title: Style::default().bg(bg_color).fg(theme.dialog_title).add_modifier(Modifier::BOLD),
            label: Style::default().bg(bg_color).fg(theme.dialog_text),
            input: Style::default().bg(theme.dialog_input_bg).fg(theme.dialog_input_fg),
            cursor: Style::default().bg(theme.dialog_input_fg).fg(theme.dialog_input_bg),
            button_focused: Style::default()
                .fg(theme.dialog_button_focused_fg)
                .bg(theme.dialog_button_focused_bg)
                .add_modifier(Modifier::BOLD),
            button_unfocused: Style::default().fg(theme.dialog_button_unfocused).bg(bg_color),
            help: Style::default().bg(bg_color).fg(theme.dialog_help),
            bg: Style::default().bg(bg_color),
        }
    }
}

/// Helper functions for dialog rendering.
pub struct DialogRenderer;

impl DialogRenderer {
    /// Calculate centered dialog position and return the dialog area.
    /// Returns None if the area is too small.
    pub fn center_dialog(area: Rect, width: u16, height: u16, min_width: u16) -> Option<Rect> {
        if area.width < min_width || area.height < height {
            return None;
        }

        let dialog_width = width.min(area.width.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;

        Some(Rect { x, y, width: dialog_width, height })
    }

    /// Fill dialog area with background color.
    pub fn fill_background(area: Rect, buf: &mut Buffer, style: Style) {
        let area = area.intersection(buf.area);
        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                buf[(col, row)].set_char(' ').set_style(style);
            }
        }
    }

    /// Draw a box-drawing border. Areas smaller than 2x2 are left alone.
    pub fn draw_border(area: Rect, buf: &mut Buffer, style: Style) {
        if area.width < 2 || area.height < 2 || area.intersection(buf.area) != area {
            return;
        }
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        buf[(area.x, area.y)].set_char('┌').set_style(style);
        buf[(right, area.y)].set_char('┐').set_style(style);
        buf[(area.x, bottom)].set_char('└').set_style(style);
        buf[(right, bottom)].set_char('┘').set_style(style);
        for col in area.x + 1..right {
            buf[(col, area.y)].set_char('─').set_style(style);
            buf[(col, bottom)].set_char('─').set_style(style);
        }
        for row in area.y + 1..bottom {
            buf[(area.x, row)].set_char('│').set_style(style);
            buf[(right, row)].set_char('│').set_style(style);
        }
    }

    /// Draw centered title on the top border.
    pub fn draw_title(area: Rect, buf: &mut Buffer, title: &str, style: Style) {
        let title_x = area.x + (area.width.saturating_sub(title.chars().count() as u16)) / 2;
        buf.set_stringn(title_x, area.y, title, area.width as usize, style);
    }

    /// Areas of a centered row of buttons, 2 columns apart
    pub fn button_areas(area: Rect, y_offset: u16, labels: &[&str]) -> Vec<Rect> {
        let button_y = area.y + y_offset;
        let total_width: usize = labels.iter()
            .map(|text| text.chars().count())
            .sum::<usize>() + (labels.len().saturating_sub(1)) * 2;

        let mut x = area.x + (area.width.saturating_sub(total_width as u16)) / 2;
        labels
            .iter()
            .map(|text| {
                let width = text.chars().count() as u16;
                let rect = Rect::new(x, button_y, width, 1);
                x += width + 2;
                rect
            })
            .collect()
    }

    /// Draw a horizontal row of buttons, centered.
    /// Returns the area of each button, for hit testing.
    pub fn draw_buttons(
        area: Rect,
        buf: &mut Buffer,
        y_offset: u16,
        buttons: &[(&str, bool)], // (text, is_focused)
        focused_style: Style,
        unfocused_style: Style,
    ) -> Vec<Rect> {
        let labels: Vec<&str> = buttons.iter().map(|(text, _)| *text).collect();
        let rects = Self::button_areas(area, y_offset, &labels);

        for ((text, is_focused), rect) in buttons.iter().zip(&rects) {
            let style = if *is_focused { focused_style } else { unfocused_style };
            buf.set_string(rect.x, rect.y, text, style);
        }
        rects
    }

    /// Draw a one-line input field with a block cursor at character `cursor`.
    /// Long inputs scroll so the cursor stays visible.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_input_field(
        buf: &mut Buffer,
        x: u16,
        y: u16,
        width: usize,
        text: &str,
        cursor: usize,
        style: Style,
        cursor_style: Style,
    ) {
        if width == 0 {
            return;
        }
        for col in x..x + width as u16 {
            buf[(col, y)].set_char(' ').set_style(style);
        }

        let skip = (cursor + 1).saturating_sub(width);
        let visible: String = text.chars().skip(skip).take(width).collect();
        buf.set_string(x, y, &visible, style);

        let cursor_x = x + (cursor - skip) as u16;
        let under = text.chars().nth(cursor).unwrap_or(' ');
        buf[(cursor_x, y)].set_char(under).set_style(cursor_style);
    }

    /// Draw help text centered at the bottom of dialog.
    pub fn draw_help(area: Rect, buf: &mut Buffer, text: &str, style: Style) {
        let help_x = area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2;
        buf.set_stringn(help_x, area.y + area.height - 2, text, area.width as usize, style);
    }
}
