//! Normal mode: the card grid has focus

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::app::{Action, App};
use crate::state::ui_state::Hit;

pub fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    if let Some(action) = normal_action(app, &key) {
        app.dispatch(action);
    }
}

fn normal_action(app: &App, key: &KeyEvent) -> Option<Action> {
    // Configurable keybindings first
    if app.key_matches("quit", key) || app.key_matches("quit_alt", key) {
        return Some(Action::Quit);
    }
    if app.key_matches("help", key) {
        return Some(Action::Help);
    }
    if app.key_matches("menu", key) {
        let (column, row) = menu_anchor(app);
        return Some(Action::OpenMenu { column, row });
    }
    if app.key_matches("refresh", key) {
        return Some(Action::Refresh);
    }
    if app.key_matches("go_up", key) {
        return Some(Action::GoUp);
    }
    if app.key_matches("rename", key) {
        return Some(Action::StartRename(app.session.cursor()));
    }
    if app.key_matches("preview", key) {
        return Some(Action::Activate(app.session.cursor()));
    }
    if app.key_matches("copy", key) {
        return Some(Action::Copy);
    }
    if app.key_matches("new_folder", key) {
        return Some(Action::NewFolder);
    }
    if app.key_matches("delete", key) {
        return Some(Action::Delete);
    }
    if app.key_matches("upload", key) {
        return Some(Action::Upload);
    }
    if app.key_matches("download", key) {
        return Some(Action::Download);
    }
    if app.key_matches("select", key) {
        let cursor = app.session.cursor();
        return Some(Action::ToggleSelect(cursor));
    }

    // Alt+digit jumps to a breadcrumb segment, 0 is home
    if key.modifiers.contains(KeyModifiers::ALT)
        && let KeyCode::Char(c) = key.code
        && let Some(digit) = c.to_digit(10)
    {
        let crumbs = crate::view::breadcrumb(app.session.current_path());
        return crumbs
            .into_iter()
            .nth(digit as usize)
            .map(|crumb| Action::Navigate(crumb.target));
    }

    let columns = app.ui.grid_columns.max(1) as isize;
    let page = columns * app.ui.grid_rows.max(1) as isize;
    let last = app.session.entries().len().saturating_sub(1);

    let action = match key.code {
        KeyCode::Left => Action::MoveCursor(-1),
        KeyCode::Right => Action::MoveCursor(1),
        KeyCode::Up => Action::MoveCursor(-columns),
        KeyCode::Down => Action::MoveCursor(columns),
        KeyCode::PageUp => Action::MoveCursor(-page),
        KeyCode::PageDown => Action::MoveCursor(page),
        KeyCode::Home => Action::SetCursor(0),
        KeyCode::End => Action::SetCursor(last),
        KeyCode::Enter => Action::Activate(app.session.cursor()),
        KeyCode::Char(' ') => Action::ToggleSelect(app.session.cursor()),
        KeyCode::Char('r') if key.modifiers.is_empty() => Action::StartRename(app.session.cursor()),
        _ => return None,
    };
    Some(action)
}

/// Where the keyboard-opened menu appears: next to the cursor card
fn menu_anchor(app: &App) -> (u16, u16) {
    let cursor = app.session.cursor();
    app.ui
        .hits
        .iter()
        .find(|(_, hit)| *hit == Hit::Card(cursor))
        .map(|(area, _)| (area.x + 2, area.y + 1))
        .unwrap_or((2, 2))
}
