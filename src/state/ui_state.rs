//! UI-related state that changes during rendering.

use std::time::Instant;

use ratatui::layout::{Position, Rect};

/// Something the mouse can land on. Recorded while drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// Whole card at this entry index
    Card(usize),
    /// Name line of a card
    CardName(usize),
    /// Breadcrumb segment, with the path it lists
    Crumb(String),
    MenuItem(usize),
    PreviewPrev,
    PreviewNext,
    PreviewDownload,
    PreviewOpen,
    PreviewClose,
    DialogConfirm,
    DialogCancel,
}

/// Left button held down, waiting to become a click or a long press
#[derive(Debug, Clone, Copy)]
pub struct Press {
    pub at: Instant,
    pub column: u16,
    pub row: u16,
    /// Long press already opened the menu
    pub fired: bool,
}

/// State related to terminal dimensions and layout.
///
/// These values are updated during rendering and read back by the input
/// handlers.
#[derive(Debug, Clone)]
pub struct UiState {
    pub terminal_width: u16,
    pub terminal_height: u16,
    /// Cards per row in the grid (updated during rendering)
    pub grid_columns: usize,
    /// First visible grid row
    pub grid_scroll: usize,
    /// Grid rows that fit on screen
    pub grid_rows: usize,
    /// Visible text lines in the preview or help body
    pub page_height: usize,
    /// Clickable regions of the last frame, topmost first
    pub hits: Vec<(Rect, Hit)>,
    /// Area of the options menu when shown
    pub menu_area: Option<Rect>,
    pub press: Option<Press>,
    /// Last click, for double-click detection
    pub last_click: Option<(Instant, Hit)>,
    pub spinner_frame: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            terminal_width: 80,
            terminal_height: 24,
            grid_columns: 1,
            grid_scroll: 0,
            grid_rows: 1,
            page_height: 20,
            hits: Vec::new(),
            menu_area: None,
            press: None,
            last_click: None,
            spinner_frame: 0,
        }
    }
}

impl UiState {
    /// Forget the regions of the previous frame
    pub fn begin_frame(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.hits.clear();
        self.menu_area = None;
    }

    pub fn push_hit(&mut self, area: Rect, hit: Hit) {
        if area.width > 0 && area.height > 0 {
            self.hits.push((area, hit));
        }
    }

    /// Topmost region under the pointer
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&Hit> {
        let position = Position::new(column, row);
        self.hits
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, hit)| hit)
    }

    pub fn in_menu(&self, column: u16, row: u16) -> bool {
        self.menu_area.is_some_and(|area| area.contains(Position::new(column, row)))
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}
