//! Dialog widgets: delete confirmation and one-line prompts

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
};

use super::dialog_helpers::{DialogRenderer, DialogStyles};
use super::Theme;

const CONFIRM_BUTTONS: [&str; 2] = ["[ Delete ]", "[ Cancel ]"];
const PROMPT_BUTTONS: [&str; 2] = ["[ OK ]", "[ Cancel ]"];

/// Delete confirmation dialog
pub struct ConfirmDeleteDialog<'a> {
    count: usize,
    /// Name shown when a single entry is deleted
    single: Option<&'a str>,
    /// 0 = Delete, 1 = Cancel
    focus: usize,
    theme: &'a Theme,
}

impl<'a> ConfirmDeleteDialog<'a> {
    pub fn new(count: usize, focus: usize, theme: &'a Theme) -> Self {
        Self { count, single: None, focus, theme }
    }

    pub fn with_name(mut self, name: Option<&'a str>) -> Self {
        self.single = name;
        self
    }

    /// Dialog rectangle inside `screen`
    pub fn area(screen: Rect) -> Option<Rect> {
        DialogRenderer::center_dialog(screen, 50, 8, 24)
    }

    /// Delete and Cancel button areas of a dialog drawn at `area`
    pub fn button_areas(area: Rect) -> Vec<Rect> {
        DialogRenderer::button_areas(area, 5, &CONFIRM_BUTTONS)
    }

    fn message(&self) -> String {
        format!("Are you sure you want to delete {} file(s)?", self.count)
    }
}

impl Widget for ConfirmDeleteDialog<'_> {
    /// `area` is the whole screen
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(dialog) = Self::area(area) else {
            return;
        };
        let styles = DialogStyles::new(self.theme, self.theme.dialog_delete_bg, self.theme.dialog_delete_border);

        DialogRenderer::fill_background(dialog, buf, styles.bg);
        DialogRenderer::draw_border(dialog, buf, styles.border);
        DialogRenderer::draw_title(dialog, buf, " Delete ", styles.title);

        let width = dialog.width.saturating_sub(4) as usize;
        let message = self.message();
        buf.set_stringn(dialog.x + 2, dialog.y + 2, &message, width, styles.label);
        if let Some(name) = self.single {
            buf.set_stringn(dialog.x + 2, dialog.y + 3, name, width, styles.title);
        }

        DialogRenderer::draw_buttons(
            dialog,
            buf,
            5,
            &[(CONFIRM_BUTTONS[0], self.focus == 0), (CONFIRM_BUTTONS[1], self.focus == 1)],
            styles.button_focused,
            styles.button_unfocused,
        );
        DialogRenderer::draw_help(dialog, buf, "Y: Delete  N/Esc: Cancel  Tab: Switch", styles.help);
    }
}

/// One-line text prompt (upload paths, copy target)
pub struct PromptDialog<'a> {
    title: &'a str,
    label: &'a str,
    input: &'a str,
    cursor: usize,
    help: &'a str,
    theme: &'a Theme,
}

impl<'a> PromptDialog<'a> {
    pub fn new(title: &'a str, label: &'a str, input: &'a str, cursor: usize, theme: &'a Theme) -> Self {
        Self { title, label, input, cursor, help: "Enter: OK  Esc: Cancel", theme }
    }

    pub fn with_help(mut self, help: &'a str) -> Self {
        self.help = help;
        self
    }

    pub fn area(screen: Rect) -> Option<Rect> {
        DialogRenderer::center_dialog(screen, 64, 9, 24)
    }

    /// OK and Cancel button areas of a dialog drawn at `area`
    pub fn button_areas(area: Rect) -> Vec<Rect> {
        DialogRenderer::button_areas(area, 5, &PROMPT_BUTTONS)
    }
}

impl Widget for PromptDialog<'_> {
    /// `area` is the whole screen
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(dialog) = Self::area(area) else {
            return;
        };
        let styles = DialogStyles::new(self.theme, self.theme.dialog_bg, self.theme.dialog_border);

        DialogRenderer::fill_background(dialog, buf, styles.bg);
        DialogRenderer::draw_border(dialog, buf, styles.border);
        DialogRenderer::draw_title(dialog, buf, &format!(" {} ", self.title), styles.title);

        let width = dialog.width.saturating_sub(4) as usize;
        buf.set_stringn(dialog.x + 2, dialog.y + 2, self.label, width, styles.label);
        DialogRenderer::draw_input_field(
            buf, dialog.x + 2, dialog.y + 3, width, self.input, self.cursor, styles.input, styles.cursor,
        );

        DialogRenderer::draw_buttons(
            dialog,
            buf,
            5,
            &[(PROMPT_BUTTONS[0], true), (PROMPT_BUTTONS[1], false)],
            styles.button_focused,
            styles.button_unfocused,
        );
        DialogRenderer::draw_help(dialog, buf, self.help, styles.help);
    }
}
