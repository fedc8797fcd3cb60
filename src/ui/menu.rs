//! Options menu popup

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::state::mode::{MenuItem, OptionsMenu};
use super::dialog_helpers::DialogRenderer;
use super::Theme;

const MENU_WIDTH: u16 = 18;

/// Where the menu opened at (`menu.x`, `menu.y`) lands inside `screen`,
/// pushed back in when it would overflow the right or bottom edge
pub fn menu_rect(menu: &OptionsMenu, screen: Rect) -> Rect {
    let height = MenuItem::ALL.len() as u16 + 2;
    let width = MENU_WIDTH.min(screen.width);
    let height = height.min(screen.height);
    let x = menu.x.min(screen.x + screen.width - width).max(screen.x);
    let y = menu.y.min(screen.y + screen.height - height).max(screen.y);
    Rect::new(x, y, width, height)
}

/// Row of item `index` inside a menu drawn at `rect`
pub fn item_area(rect: Rect, index: usize) -> Rect {
    Rect::new(rect.x + 1, rect.y + 1 + index as u16, rect.width.saturating_sub(2), 1)
}

pub struct OptionsMenuWidget<'a> {
    selected: usize,
    theme: &'a Theme,
}

impl<'a> OptionsMenuWidget<'a> {
    pub fn new(menu: &OptionsMenu, theme: &'a Theme) -> Self {
        Self { selected: menu.selected, theme }
    }
}

impl Widget for OptionsMenuWidget<'_> {
    /// `area` is the menu rectangle from `menu_rect`
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 6 || area.height < 3 {
            return;
        }
        let bg = Style::default().bg(self.theme.menu_bg);
        let item_style = bg.fg(self.theme.menu_fg);
        let selected_style = Style::default()
            .bg(self.theme.menu_selected_bg)
            .fg(self.theme.menu_selected_fg)
            .add_modifier(Modifier::BOLD);

        DialogRenderer::fill_background(area, buf, bg);
        DialogRenderer::draw_border(area, buf, bg.fg(self.theme.menu_border));

        for (i, item) in MenuItem::ALL.iter().enumerate() {
            let row = item_area(area, i);
            if row.y >= area.y + area.height - 1 {
                break;
            }
            let style = if i == self.selected { selected_style } else { item_style };
            for x in row.x..row.x + row.width {
                buf[(x, row.y)].set_char(' ').set_style(style);
            }
            buf.set_stringn(row.x + 1, row.y, item.label(), row.width.saturating_sub(1) as usize, style);
        }
    }
}
