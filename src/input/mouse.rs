//! Mouse handling
//!
//! Events are resolved against the hit regions recorded by the last frame.

use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::state::app::{Action, App};
use crate::state::mode::{MenuItem, Mode};
use crate::state::ui_state::{Hit, Press};

/// Two clicks on the same target within this window make a double-click
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// Lines moved per wheel step in text views
const WHEEL_LINES: isize = 3;

pub fn handle_mouse(app: &mut App, event: MouseEvent) {
    let (column, row) = (event.column, event.row);

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.menu.is_some() && !app.ui.in_menu(column, row) {
                app.dispatch(Action::CloseMenu);
                return;
            }
            app.ui.press = Some(Press { at: Instant::now(), column, row, fired: false });
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(press) = app.ui.press.take() else {
                return;
            };
            if !press.fired {
                click(app, column, row, Instant::now());
            }
        }
        MouseEventKind::Down(MouseButton::Right) => {
            if !matches!(app.mode, Mode::Normal) || app.session.preview().is_some() {
                return;
            }
            if let Some(Hit::Card(index) | Hit::CardName(index)) = app.ui.hit_test(column, row).cloned() {
                app.dispatch(Action::SetCursor(index));
            }
            app.dispatch(Action::OpenMenu { column, row });
        }
        MouseEventKind::Moved | MouseEventKind::Drag(_) => hover(app, column, row),
        MouseEventKind::ScrollUp => scroll(app, -1),
        MouseEventKind::ScrollDown => scroll(app, 1),
        _ => {}
    }
}

/// Pointer movement: highlight menu items, close the menu when leaving it
fn hover(app: &mut App, column: u16, row: u16) {
    if app.menu.is_none() {
        return;
    }
    if !app.ui.in_menu(column, row) {
        app.dispatch(Action::CloseMenu);
        return;
    }
    if let Some(Hit::MenuItem(index)) = app.ui.hit_test(column, row).cloned()
        && let Some(menu) = app.menu.as_mut()
    {
        menu.selected = index;
    }
}

fn scroll(app: &mut App, direction: isize) {
    if let Mode::Help { scroll } = &mut app.mode {
        *scroll = scroll.saturating_add_signed(direction * WHEEL_LINES);
        return;
    }
    if app.session.preview().is_some() {
        app.dispatch(Action::ScrollPreview(direction * WHEEL_LINES));
        return;
    }
    if matches!(app.mode, Mode::Normal) && app.menu.is_none() {
        let columns = app.ui.grid_columns.max(1) as isize;
        app.dispatch(Action::MoveCursor(direction * columns));
    }
}

/// A completed left click at `column`, `row`
pub(crate) fn click(app: &mut App, column: u16, row: u16, now: Instant) {
    let hit = app.ui.hit_test(column, row).cloned();

    let double = match (&app.ui.last_click, &hit) {
        (Some((at, last)), Some(hit)) => last == hit && now.duration_since(*at) <= DOUBLE_CLICK,
        _ => false,
    };
    // A double-click consumes the pair, a third click starts over
    app.ui.last_click = if double { None } else { hit.clone().map(|h| (now, h)) };

    if app.menu.is_some() {
        match hit {
            Some(Hit::MenuItem(index)) if index < MenuItem::ALL.len() => {
                app.dispatch(Action::MenuChoose(MenuItem::ALL[index]));
            }
            _ => app.dispatch(Action::CloseMenu),
        }
        return;
    }

    match &app.mode {
        Mode::ConfirmDelete { .. } => {
            match hit {
                Some(Hit::DialogConfirm) => app.dispatch(Action::ConfirmDelete),
                Some(Hit::DialogCancel) => app.mode = Mode::Normal,
                _ => {}
            }
            return;
        }
        Mode::Prompt { .. } => {
            match hit {
                Some(Hit::DialogConfirm) => app.submit_prompt(),
                Some(Hit::DialogCancel) => app.mode = Mode::Normal,
                _ => {}
            }
            return;
        }
        Mode::Renaming { index, .. } | Mode::NamingFolder { index, .. } => {
            // Clicking away from the editor commits it
            if hit != Some(Hit::CardName(*index)) {
                app.commit_edit();
            }
            return;
        }
        Mode::Help { .. } => {
            app.mode = Mode::Normal;
            return;
        }
        Mode::Normal => {}
    }

    if app.session.preview().is_some() {
        let action = match hit {
            Some(Hit::PreviewPrev) => Action::PreviewPrev,
            Some(Hit::PreviewNext) => Action::PreviewNext,
            Some(Hit::PreviewDownload) => Action::Download,
            Some(Hit::PreviewOpen) => Action::OpenExternal,
            Some(Hit::PreviewClose) => Action::ClosePreview,
            _ => return,
        };
        app.dispatch(action);
        return;
    }

    match hit {
        Some(Hit::Card(index)) => {
            app.dispatch(Action::SetCursor(index));
            app.dispatch(Action::ToggleSelect(index));
            if double {
                app.dispatch(Action::Activate(index));
            }
        }
        Some(Hit::CardName(index)) => {
            app.dispatch(Action::SetCursor(index));
            app.dispatch(Action::ToggleSelect(index));
            if double {
                app.dispatch(Action::StartRename(index));
            }
        }
        Some(Hit::Crumb(target)) => app.dispatch(Action::Navigate(target)),
        _ => {}
    }
}
