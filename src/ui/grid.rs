//! Card grid widget
//!
//! Entries are drawn as fixed-size cards flowing left to right. The layout is
//! computed separately so the same rectangles serve drawing and hit testing.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::view::{format_size, Card};
use super::dialog_helpers::DialogRenderer;
use super::Theme;

pub const CARD_W: u16 = 18;
pub const CARD_H: u16 = 4;
/// Columns between neighbouring cards
const GAP: u16 = 1;

/// Placement of cards in the body area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub area: Rect,
    pub columns: usize,
    /// Rows that fit in the area
    pub rows: usize,
    /// First visible row
    pub scroll: usize,
}

impl GridLayout {
    /// Lay out `count` cards in `area`, scrolling from `scroll` just enough
    /// to keep `cursor` visible
    pub fn new(area: Rect, count: usize, cursor: usize, scroll: usize) -> Self {
        let columns = ((area.width + GAP) / (CARD_W + GAP)).max(1) as usize;
        let rows = (area.height / CARD_H).max(1) as usize;
        let total_rows = count.div_ceil(columns);

        let cursor_row = cursor / columns;
        let mut scroll = scroll;
        if cursor_row < scroll {
            scroll = cursor_row;
        } else if cursor_row >= scroll + rows {
            scroll = cursor_row + 1 - rows;
        }
        scroll = scroll.min(total_rows.saturating_sub(rows));

        Self { area, columns, rows, scroll }
    }

    /// Screen area of card `index`, None when scrolled out of view
    pub fn card_area(&self, index: usize) -> Option<Rect> {
        let row = index / self.columns;
        if row < self.scroll || row >= self.scroll + self.rows {
            return None;
        }
        let column = (index % self.columns) as u16;
        let x = self.area.x + column * (CARD_W + GAP);
        let y = self.area.y + (row - self.scroll) as u16 * CARD_H;
        let rect = Rect::new(x, y, CARD_W, CARD_H).intersection(self.area);
        (!rect.is_empty()).then_some(rect)
    }

    /// Indices of the cards in view
    pub fn visible(&self, count: usize) -> std::ops::Range<usize> {
        let start = (self.scroll * self.columns).min(count);
        let end = ((self.scroll + self.rows) * self.columns).min(count);
        start..end
    }
}

/// Name line inside a card
pub fn name_area(card: Rect) -> Rect {
    Rect::new(card.x + 1, card.y + 2, card.width.saturating_sub(2), 1)
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub struct CardGrid<'a> {
    cards: &'a [Card],
    layout: GridLayout,
    cursor: usize,
    /// Inline editor: card index, text, cursor
    editing: Option<(usize, &'a str, usize)>,
    theme: &'a Theme,
}

impl<'a> CardGrid<'a> {
    pub fn new(cards: &'a [Card], layout: GridLayout, cursor: usize, theme: &'a Theme) -> Self {
        Self { cards, layout, cursor, editing: None, theme }
    }

    pub fn with_editing(mut self, editing: Option<(usize, &'a str, usize)>) -> Self {
        self.editing = editing;
        self
    }

    fn render_card(&self, index: usize, card: &Card, rect: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let bg = if card.selected { theme.card_selected_bg } else { theme.background };
        let base = Style::default().bg(bg).fg(theme.card_text);
        let border_color = if card.draft {
            theme.draft_border
        } else if index == self.cursor {
            theme.card_cursor
        } else {
            theme.card_border
        };
        let mut border = Style::default().bg(bg).fg(border_color);
        if index == self.cursor {
            border = border.add_modifier(Modifier::BOLD);
        }

        DialogRenderer::fill_background(rect, buf, base);
        DialogRenderer::draw_border(rect, buf, border);
        if rect.width < 4 || rect.height < CARD_H {
            return;
        }
        let inner_width = rect.width as usize - 2;

        if card.selected {
            buf.set_string(rect.x + 1, rect.y, "✓", border);
        }

        // Icon line: kind tag on the left, size on the right
        let highlight = theme.find_highlight(&card.mime);
        let (icon, tag, tag_color) = if card.is_dir {
            ("▶", "DIR".to_string(), theme.folder_icon)
        } else {
            let label = highlight
                .and_then(|h| h.label.clone())
                .unwrap_or_else(|| "FILE".to_string());
            ("■", label, highlight.map(|h| h.color).unwrap_or(theme.file_icon))
        };
        let tag_style = base.fg(tag_color).add_modifier(Modifier::BOLD);
        buf.set_stringn(rect.x + 1, rect.y + 1, format!("{} {}", icon, tag), inner_width, tag_style);
        if !card.is_dir {
            let size = format_size(card.size);
            let size_x = (rect.x + rect.width - 1).checked_sub(size.len() as u16);
            if let Some(size_x) = size_x.filter(|x| *x > rect.x + 7) {
                buf.set_string(size_x, rect.y + 1, &size, base.fg(theme.file_icon));
            }
        }

        // Name line, or the editor when this card is being named
        let name_rect = name_area(rect);
        match self.editing {
            Some((editing, text, cursor)) if editing == index => {
                let input = Style::default().bg(theme.dialog_input_bg).fg(theme.dialog_input_fg);
                let caret = Style::default().bg(theme.dialog_input_fg).fg(theme.dialog_input_bg);
                DialogRenderer::draw_input_field(
                    buf, name_rect.x, name_rect.y, name_rect.width as usize, text, cursor, input, caret,
                );
            }
            _ => {
                let mut style = base;
                if card.is_dir {
                    style = style.add_modifier(Modifier::BOLD);
                }
                buf.set_string(name_rect.x, name_rect.y, truncate(&card.label, inner_width), style);
            }
        }
    }
}

impl Widget for CardGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        DialogRenderer::fill_background(area, buf, Style::default().bg(self.theme.background));

        if self.cards.is_empty() {
            let message = "This folder is empty";
            let x = area.x + area.width.saturating_sub(message.len() as u16) / 2;
            let style = Style::default().bg(self.theme.background).fg(self.theme.card_border);
            buf.set_stringn(x, area.y + area.height / 2, message, area.width as usize, style);
            return;
        }

        for index in self.layout.visible(self.cards.len()) {
            if let Some(rect) = self.layout.card_area(index) {
                self.render_card(index, &self.cards[index], rect, buf);
            }
        }
    }
}

/// Error view body
pub struct ErrorView<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> ErrorView<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for ErrorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().bg(self.theme.background).fg(self.theme.error_fg);
        DialogRenderer::fill_background(area, buf, Style::default().bg(self.theme.background));
        if area.width < 4 || area.height < 1 {
            return;
        }

        let width = area.width as usize - 2;
        let mut lines = vec!["Error".to_string()];
        let chars: Vec<char> = self.message.chars().collect();
        lines.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));

        let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
        for (i, line) in lines.iter().enumerate().take(area.height as usize) {
            let x = area.x + area.width.saturating_sub(line.chars().count() as u16) / 2;
            let line_style = if i == 0 { style.add_modifier(Modifier::BOLD) } else { style };
            buf.set_string(x, top + i as u16, line, line_style);
        }
    }
}
