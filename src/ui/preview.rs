//! Full-screen preview overlay

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::state::preview::{Preview, PreviewBody, PreviewKind};
use crate::state::ui_state::Hit;
use super::dialog_helpers::DialogRenderer;
use super::Theme;

/// Footer buttons of an overlay drawn at `area`, with what they trigger
pub fn footer_buttons(area: Rect, kind: PreviewKind) -> Vec<(Rect, Hit, &'static str)> {
    let mut buttons = vec![
        (Hit::PreviewPrev, "[◀ Prev]"),
        (Hit::PreviewNext, "[Next ▶]"),
        (Hit::PreviewDownload, "[Download]"),
    ];
    if kind.opens_externally() {
        buttons.push((Hit::PreviewOpen, "[Open]"));
    }
    buttons.push((Hit::PreviewClose, "[Close]"));

    let y = area.y + area.height.saturating_sub(1);
    let mut x = area.x + 1;
    buttons
        .into_iter()
        .map(|(hit, label)| {
            let width = label.chars().count() as u16;
            let rect = Rect::new(x, y, width, 1).intersection(area);
            x += width + 1;
            (rect, hit, label)
        })
        .collect()
}

pub struct PreviewOverlay<'a> {
    preview: &'a Preview,
    /// Peek URL for kinds shown through an external viewer
    url: Option<&'a str>,
    /// 1-based position and file count
    position: (usize, usize),
    theme: &'a Theme,
}

impl<'a> PreviewOverlay<'a> {
    pub fn new(preview: &'a Preview, theme: &'a Theme) -> Self {
        Self { preview, url: None, position: (preview.index + 1, 0), theme }
    }

    pub fn with_url(mut self, url: Option<&'a str>) -> Self {
        self.url = url;
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.position.1 = total;
        self
    }

    /// Calculate the visible height (content area, excluding header and footer)
    pub fn content_height(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }

    fn body_lines(&self) -> Vec<(String, bool)> {
        let kind = self.preview.kind;
        match &self.preview.body {
            PreviewBody::Loading => vec![("Loading...".to_string(), false)],
            PreviewBody::Text(text) => text
                .lines()
                .skip(self.preview.scroll)
                .map(|line| (line.replace('\t', "    "), false))
                .collect(),
            PreviewBody::Failed(message) => vec![
                ("Could not load preview".to_string(), true),
                (message.clone(), true),
            ],
            PreviewBody::External => {
                let mut lines = vec![
                    (format!("{} file", kind.label()), true),
                    (String::new(), false),
                ];
                if let Some(url) = self.url {
                    lines.push((url.to_string(), false));
                    lines.push((String::new(), false));
                }
                let hint = if kind.is_media() {
                    "Press o or Enter to play it with the external player"
                } else {
                    "Press o or Enter to open it in the external viewer"
                };
                lines.push((hint.to_string(), false));
                lines
            }
            PreviewBody::DownloadOnly => vec![
                ("No preview available for this file type".to_string(), true),
                (String::new(), false),
                ("Press d to download it".to_string(), false),
            ],
        }
    }
}

impl Widget for PreviewOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let theme = self.theme;
        let header_style = Style::default()
            .bg(theme.preview_header_bg)
            .fg(theme.preview_header_fg)
            .add_modifier(Modifier::BOLD);
        let content_style = Style::default().bg(theme.preview_bg).fg(theme.preview_fg);
        let emphasis_style = content_style.add_modifier(Modifier::BOLD);
        let button_style = Style::default().bg(theme.preview_header_bg).fg(theme.preview_button);

        // Header row
        let header = Rect::new(area.x, area.y, area.width, 1);
        DialogRenderer::fill_background(header, buf, header_style);
        let title = if self.preview.mime.is_empty() {
            format!(" {} ", self.preview.name)
        } else {
            format!(" {}  ({}) ", self.preview.name, self.preview.mime)
        };
        buf.set_stringn(area.x, area.y, &title, area.width as usize, header_style);
        let (index, total) = self.position;
        if total > 0 {
            let counter = format!(" {}/{} ", index, total);
            let counter_x = (area.x + area.width).saturating_sub(counter.len() as u16);
            if counter_x > area.x + title.chars().count() as u16 {
                buf.set_string(counter_x, area.y, &counter, header_style);
            }
        }

        // Body
        let body = Rect::new(area.x, area.y + 1, area.width, Self::content_height(area) as u16);
        DialogRenderer::fill_background(body, buf, content_style);
        let lines = self.body_lines();
        let width = area.width.saturating_sub(2) as usize;
        let centered = !matches!(self.preview.body, PreviewBody::Text(_));
        let top = if centered {
            body.y + body.height.saturating_sub(lines.len() as u16) / 2
        } else {
            body.y
        };
        for (i, (line, emphasis)) in lines.iter().take(body.height as usize).enumerate() {
            let shown: String = line.chars().take(width).collect();
            let x = if centered {
                area.x + area.width.saturating_sub(shown.chars().count() as u16) / 2
            } else {
                area.x + 1
            };
            let style = if *emphasis { emphasis_style } else { content_style };
            buf.set_string(x, top + i as u16, &shown, style);
        }

        // Footer with buttons
        let footer_y = area.y + area.height - 1;
        let footer = Rect::new(area.x, footer_y, area.width, 1);
        DialogRenderer::fill_background(footer, buf, Style::default().bg(theme.preview_header_bg));
        for (rect, _, label) in footer_buttons(area, self.preview.kind) {
            buf.set_stringn(rect.x, rect.y, label, rect.width as usize, button_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(kind: PreviewKind, body: PreviewBody) -> Preview {
        Preview {
            index: 1,
            name: "clip.mp4".into(),
            mime: "video/mp4".into(),
            kind,
            body,
            path: "./clip.mp4".into(),
            scroll: 0,
        }
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.y + area.height)
            .map(|y| (area.x..area.x + area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_footer_buttons_depend_on_kind() {
        let area = Rect::new(0, 0, 80, 20);
        let hits: Vec<Hit> = footer_buttons(area, PreviewKind::Video).into_iter().map(|(_, h, _)| h).collect();
        assert!(hits.contains(&Hit::PreviewOpen));

        let hits: Vec<Hit> = footer_buttons(area, PreviewKind::Text).into_iter().map(|(_, h, _)| h).collect();
        assert!(!hits.contains(&Hit::PreviewOpen));
        assert_eq!(hits.last(), Some(&Hit::PreviewClose));

        let first = footer_buttons(area, PreviewKind::Text)[0].0;
        assert_eq!(first, Rect::new(1, 19, 8, 1));
    }

    #[test]
    fn test_external_body_shows_url() {
        let theme = Theme::default();
        let preview = preview(PreviewKind::Video, PreviewBody::External);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        PreviewOverlay::new(&preview, &theme)
            .with_url(Some("http://h/api/v1/download?path=./clip.mp4&peek=true"))
            .with_total(3)
            .render(area, &mut buf);

        let text = screen_text(&buf);
        assert!(text.contains("clip.mp4  (video/mp4)"));
        assert!(text.contains("2/3"));
        assert!(text.contains("peek=true"));
        assert!(text.contains("external player"));
    }

    #[test]
    fn test_text_body_scrolls() {
        let theme = Theme::default();
        let mut preview = preview(PreviewKind::Text, PreviewBody::Text("one\ntwo\nthree".into()));
        preview.scroll = 1;
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        PreviewOverlay::new(&preview, &theme).render(area, &mut buf);

        let text = screen_text(&buf);
        assert!(!text.contains("one"));
        assert!(text.contains("two"));
    }
}
