//! Spinner widget for the loading view

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

/// Spinner animation frames (Braille dots pattern)
const SPINNER_FRAMES_UNICODE: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// ASCII-safe spinner frames for legacy Windows consoles
#[cfg(windows)]
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

fn spinner_frames() -> &'static [&'static str] {
    #[cfg(windows)]
    if std::env::var_os("WT_SESSION").is_none() {
        return SPINNER_FRAMES_ASCII;
    }
    SPINNER_FRAMES_UNICODE
}

/// An animated indicator with a message, centered in its area
pub struct Spinner<'a> {
    frame: usize,
    message: &'a str,
    spinner_style: Style,
    message_style: Style,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, message: &'a str) -> Self {
        Self {
            frame: frame % spinner_frames().len(),
            message,
            spinner_style: Style::default(),
            message_style: Style::default(),
        }
    }

    pub fn spinner_style(mut self, style: Style) -> Self {
        self.spinner_style = style;
        self
    }

    pub fn message_style(mut self, style: Style) -> Self {
        self.message_style = style;
        self
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let message: String = self.message.chars().take(area.width as usize - 2).collect();
        let width = message.chars().count() as u16 + 2;
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height / 2;

        buf.set_string(x, y, spinner_frames()[self.frame], self.spinner_style);
        buf.set_string(x + 2, y, &message, self.message_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_wraps() {
        let spinner = Spinner::new(spinner_frames().len() + 1, "x");
        assert_eq!(spinner.frame, 1);
    }

    #[test]
    fn test_renders_centered_message() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        Spinner::new(0, "Loading").render(area, &mut buf);

        let row: String = (0..20).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("Loading"));
        assert_eq!(buf[(5, 1)].symbol(), spinner_frames()[0]);
    }
}
