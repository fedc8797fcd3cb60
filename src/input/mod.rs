//! Input handling
//!
//! This module handles keyboard and mouse dispatching based on the current
//! application mode.

mod dialogs;
mod mouse;
mod normal;
mod text_field;
mod viewing;

pub use mouse::handle_mouse;
pub use text_field::TextField;
pub use viewing::help_text;

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::state::app::App;
use crate::state::mode::Mode;

/// Handle a key event based on current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    if app.menu.is_some() {
        dialogs::handle_menu(app, key);
        return;
    }

    match &app.mode {
        Mode::Normal if app.session.preview().is_some() => viewing::handle_preview_mode(app, key),
        Mode::Normal => normal::handle_normal_mode(app, key),
        Mode::Renaming { .. } | Mode::NamingFolder { .. } => dialogs::handle_name_editor_mode(app, key),
        Mode::ConfirmDelete { .. } => dialogs::handle_confirm_delete_mode(app, key),
        Mode::Prompt { .. } => dialogs::handle_prompt_mode(app, key),
        Mode::Help { .. } => viewing::handle_help_mode(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Arc;

    use crate::api::mock::MockApi;
    use crate::config::Config;
    use crate::state::mode::OptionsMenu;

    #[test]
    fn test_menu_takes_keys_first() {
        let mut app = App::new(Config::default(), None, Arc::new(MockApi::new()));
        app.menu = Some(OptionsMenu::at(0, 0));

        handle_key(&mut app, KeyEvent::new(KeyCode::F(10), KeyModifiers::NONE));
        assert!(!app.should_quit);
        handle_key(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.menu.is_none());

        handle_key(&mut app, KeyEvent::new(KeyCode::F(10), KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = App::new(Config::default(), None, Arc::new(MockApi::new()));
        let mut key = KeyEvent::new(KeyCode::F(10), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;

        handle_key(&mut app, key);
        assert!(!app.should_quit);
    }
}
