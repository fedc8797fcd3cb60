//! Dialog mode handlers: inline name editor, prompts, delete confirmation
//! and the options menu

use crossterm::event::{KeyCode, KeyEvent};

use crate::input::TextField;
use crate::state::app::{Action, App};
use crate::state::mode::Mode;

/// Inline rename or new-folder editor on a card
pub fn handle_name_editor_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            if let Mode::Renaming { input, cursor, .. } | Mode::NamingFolder { input, cursor, .. } =
                &mut app.mode
            {
                TextField::handle_key(input, cursor, &key);
            }
        }
    }
}

pub fn handle_prompt_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.mode = Mode::Normal,
        _ => {
            if let Mode::Prompt { input, cursor, .. } = &mut app.mode {
                TextField::handle_key(input, cursor, &key);
            }
        }
    }
}

pub fn handle_confirm_delete_mode(app: &mut App, key: KeyEvent) {
    let Mode::ConfirmDelete { focus, .. } = &mut app.mode else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.mode = Mode::Normal,
        KeyCode::Char('y') | KeyCode::Char('Y') => app.dispatch(Action::ConfirmDelete),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            *focus = 1 - (*focus).min(1);
        }
        KeyCode::Enter => {
            if *focus == 0 {
                app.dispatch(Action::ConfirmDelete);
            } else {
                app.mode = Mode::Normal;
            }
        }
        _ => {}
    }
}

/// Keys while the options menu is open
pub fn handle_menu(app: &mut App, key: KeyEvent) {
    let Some(menu) = app.menu.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Up => menu.up(),
        KeyCode::Down | KeyCode::Tab => menu.down(),
        KeyCode::Enter => {
            let item = menu.item();
            app.dispatch(Action::MenuChoose(item));
        }
        KeyCode::Esc => app.dispatch(Action::CloseMenu),
        _ => {
            if app.key_matches("menu", &key) {
                app.dispatch(Action::CloseMenu);
            }
        }
    }
}
