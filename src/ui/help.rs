//! Key reference overlay

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::dialog_helpers::DialogRenderer;
use super::Theme;

const FOOTER_KEYS: &str = " q/Esc: Close  j/k: Scroll  PgUp/PgDn: Page ";

pub struct HelpViewer<'a> {
    text: &'a str,
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> HelpViewer<'a> {
    pub fn new(text: &'a str, scroll: usize, theme: &'a Theme) -> Self {
        Self { text, scroll, theme }
    }

    /// Text rows between the title and footer bars
    pub fn content_height(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }
}

/// Section titles and their underlines get the highlight color
fn is_heading(line: &str) -> bool {
    line.contains("===")
        || (!line.trim().is_empty() && line.chars().all(|c| c.is_uppercase() || c.is_whitespace()))
}

/// "Lines a-b of n (p%)" for a window of `height` rows starting at `scroll`
fn position_label(scroll: usize, height: usize, total: usize) -> String {
    if total == 0 {
        return " Empty ".to_string();
    }
    let first = scroll.min(total - 1) + 1;
    let last = (scroll + height).min(total);
    format!(" Lines {}-{} of {} ({}%) ", first, last, total, last * 100 / total)
}

impl Widget for HelpViewer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let theme = self.theme;
        let bar = Style::default()
            .bg(theme.help_header_bg)
            .fg(theme.help_header_fg)
            .add_modifier(Modifier::BOLD);
        let body_style = Style::default().bg(theme.help_content_bg).fg(theme.help_content_fg);
        let heading_style = body_style.fg(theme.help_highlight).add_modifier(Modifier::BOLD);

        let height = Self::content_height(area);
        let title_row = Rect::new(area.x, area.y, area.width, 1);
        let body = Rect::new(area.x, area.y + 1, area.width, height as u16);
        let footer_row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

        DialogRenderer::fill_background(title_row, buf, bar);
        let title = " Ferret Help ";
        buf.set_string(area.x + area.width.saturating_sub(title.len() as u16) / 2, area.y, title, bar);

        DialogRenderer::fill_background(body, buf, body_style);
        let lines: Vec<&str> = self.text.lines().collect();
        let text_width = area.width.saturating_sub(3) as usize;
        for (row, line) in lines.iter().skip(self.scroll).take(height).enumerate() {
            let style = if is_heading(line) { heading_style } else { body_style };
            buf.set_stringn(body.x + 1, body.y + row as u16, line, text_width, style);
        }

        // Scroll thumb on the right edge
        if lines.len() > height && height > 0 {
            let track = height as u16;
            let thumb = (track as usize * self.scroll / lines.len()) as u16;
            let thumb_x = area.x + area.width - 1;
            for y in 0..track {
                let symbol = if y == thumb.min(track - 1) { '█' } else { '│' };
                buf[(thumb_x, body.y + y)].set_char(symbol).set_style(body_style);
            }
        }

        DialogRenderer::fill_background(footer_row, buf, bar);
        let position = position_label(self.scroll, height, lines.len());
        buf.set_string(footer_row.x, footer_row.y, &position, bar);
        let keys_x = (footer_row.x + footer_row.width).saturating_sub(FOOTER_KEYS.len() as u16);
        if keys_x > footer_row.x + position.len() as u16 {
            buf.set_string(keys_x, footer_row.y, FOOTER_KEYS, bar);
        }
    }
}
