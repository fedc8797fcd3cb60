//! Breadcrumb bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::view::Crumb;
use super::Theme;

const SEPARATOR: &str = " › ";
const HOME_ICON: &str = "⌂ ";

/// Text drawn for a segment
fn crumb_text(crumb: &Crumb) -> String {
    if crumb.is_home {
        format!("{}{}", HOME_ICON, crumb.label)
    } else {
        crumb.label.clone()
    }
}

/// Screen area of each segment in a bar drawn at `area`. Segments that don't
/// fit are left out from the front so the current folder stays visible.
pub fn crumb_areas(crumbs: &[Crumb], area: Rect) -> Vec<Option<Rect>> {
    let widths: Vec<u16> = crumbs.iter().map(|c| crumb_text(c).chars().count() as u16).collect();
    let sep = SEPARATOR.chars().count() as u16;
    let available = area.width.saturating_sub(2);

    // Drop leading segments (keeping home) until the rest fits
    let mut first = 1;
    let total = |from: usize| -> u16 {
        let tail: u16 = widths.iter().skip(from).map(|w| w + sep).sum();
        widths.first().copied().unwrap_or(0) + tail
    };
    while first < crumbs.len().saturating_sub(1) && total(first) > available {
        first += 1;
    }

    let mut x = area.x + 1;
    let right = area.x + area.width;
    crumbs
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i != 0 && i < first {
                return None;
            }
            if i != 0 {
                x += sep;
            }
            let width = widths[i].min(right.saturating_sub(x));
            let rect = Rect::new(x, area.y, width, 1);
            x = x.saturating_add(widths[i]);
            (width > 0).then_some(rect)
        })
        .collect()
}

pub struct BreadcrumbBar<'a> {
    crumbs: &'a [Crumb],
    theme: &'a Theme,
}

impl<'a> BreadcrumbBar<'a> {
    pub fn new(crumbs: &'a [Crumb], theme: &'a Theme) -> Self {
        Self { crumbs, theme }
    }
}

impl Widget for BreadcrumbBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 4 {
            return;
        }

        let bg = Style::default().bg(self.theme.breadcrumb_bg);
        let text_style = bg.fg(self.theme.breadcrumb_fg);
        let home_style = bg.fg(self.theme.breadcrumb_home).add_modifier(Modifier::BOLD);
        let last_style = text_style.add_modifier(Modifier::BOLD);
        let sep_style = bg.fg(self.theme.breadcrumb_separator);

        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_char(' ').set_style(bg);
        }

        let areas = crumb_areas(self.crumbs, area);
        let last = self.crumbs.len().saturating_sub(1);
        let mut skipped = false;
        for (i, (crumb, rect)) in self.crumbs.iter().zip(&areas).enumerate() {
            let Some(rect) = rect else {
                skipped = true;
                continue;
            };
            if i != 0 {
                let sep = if skipped { " …›" } else { SEPARATOR };
                skipped = false;
                buf.set_stringn(rect.x - 3, area.y, sep, 3, sep_style);
            }
            let style = if crumb.is_home {
                home_style
            } else if i == last {
                last_style
            } else {
                text_style
            };
            buf.set_stringn(rect.x, rect.y, crumb_text(crumb), rect.width as usize, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::breadcrumb;

    #[test]
    fn test_areas_are_laid_out_left_to_right() {
        let crumbs = breadcrumb("./docs/img");
        let areas = crumb_areas(&crumbs, Rect::new(0, 0, 80, 1));

        // "⌂ Home" at 1, " › " then "docs", " › " then "img"
        assert_eq!(areas[0], Some(Rect::new(1, 0, 6, 1)));
        assert_eq!(areas[1], Some(Rect::new(10, 0, 4, 1)));
        assert_eq!(areas[2], Some(Rect::new(17, 0, 3, 1)));
    }

    #[test]
    fn test_narrow_bar_drops_leading_segments() {
        let crumbs = breadcrumb("./alpha/beta/gamma");
        let areas = crumb_areas(&crumbs, Rect::new(0, 0, 24, 1));

        assert!(areas[0].is_some());
        assert!(areas[1].is_none());
        assert!(areas[3].is_some());
    }

    #[test]
    fn test_render_shows_current_folder() {
        let theme = Theme::default();
        let crumbs = breadcrumb("./docs");
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        BreadcrumbBar::new(&crumbs, &theme).render(area, &mut buf);

        let row: String = (0..30).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.contains("Home › docs"));
    }
}
