//! Preview overlay and help screen input handling

use crossterm::event::{KeyCode, KeyEvent};

use crate::config::KeyBindings;
use crate::state::app::{Action, App};
use crate::state::mode::Mode;

pub fn handle_preview_mode(app: &mut App, key: KeyEvent) {
    let page = app.ui.page_height.max(1) as isize;

    let action = if app.key_matches("quit", &key) || app.key_matches("quit_alt", &key) {
        Action::Quit
    } else if app.key_matches("download", &key) {
        Action::Download
    } else if app.key_matches("preview", &key) {
        Action::ClosePreview
    } else {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::ClosePreview,
            KeyCode::Left | KeyCode::Char('h') => Action::PreviewPrev,
            KeyCode::Right | KeyCode::Char('l') => Action::PreviewNext,
            KeyCode::Up | KeyCode::Char('k') => Action::ScrollPreview(-1),
            KeyCode::Down | KeyCode::Char('j') => Action::ScrollPreview(1),
            KeyCode::PageUp => Action::ScrollPreview(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => Action::ScrollPreview(page),
            KeyCode::Home | KeyCode::Char('g') => Action::ScrollPreview(isize::MIN),
            KeyCode::End | KeyCode::Char('G') => Action::ScrollPreview(isize::MAX),
            KeyCode::Enter | KeyCode::Char('o') => Action::OpenExternal,
            KeyCode::Char('d') => Action::Download,
            _ => return,
        }
    };
    app.dispatch(action);
}

pub fn handle_help_mode(app: &mut App, key: KeyEvent) {
    let visible_height = app.ui.page_height.max(1);
    let line_count = help_text(&app.config.keybindings).lines().count();
    let max_scroll = line_count.saturating_sub(visible_height);
    let close = app.key_matches("help", &key);

    let Mode::Help { scroll } = &mut app.mode else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.mode = Mode::Normal,
        _ if close => app.mode = Mode::Normal,
        KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => *scroll = (*scroll + 1).min(max_scroll),
        KeyCode::PageUp => *scroll = scroll.saturating_sub(visible_height),
        KeyCode::PageDown => *scroll = (*scroll + visible_height).min(max_scroll),
        KeyCode::Home | KeyCode::Char('g') => *scroll = 0,
        KeyCode::End | KeyCode::Char('G') => *scroll = max_scroll,
        _ => {}
    }
}

/// Help screen text, showing the keys currently bound
pub fn help_text(bindings: &KeyBindings) -> String {
    let key = |action: &str| bindings.get(action).to_string();
    format!(
        r##"Ferret - Help

BROWSING
========
  Arrows       Move between cards
  PageUp/Dn    Move a screen of cards
  Home/End     First / last card
  Alt+0..9     Jump to breadcrumb segment
  Enter        Open folder / preview file
  Space, {select:<7} Select / deselect card
  {go_up:<12} Go to parent folder
  {refresh:<12} Reload the listing

FILE OPERATIONS
===============
  {new_folder:<12} New folder
  {rename:<12} Rename, also r (Enter saves, Esc cancels)
  {copy:<12} Copy under a new name
  {delete:<12} Delete selected (or current) entries
  {upload:<12} Upload local files
  {download:<12} Download current file
  {menu:<12} Options menu

PREVIEW
=======
  {preview:<12} Preview current file
  Left/Right   Previous / next file
  Up/Down      Scroll text
  Enter, o     Open in external viewer
  d            Download previewed file
  Esc, q       Close preview

MOUSE
=====
  Click        Select card
  Click twice  Open folder / preview file
  Double-click name   Rename
  Right-click, hold   Options menu
  Breadcrumb   Jump to that folder

OTHER
=====
  {help:<12} Show this help
  {quit:<12} Quit ({quit_alt})
"##,
        select = key("select"),
        go_up = key("go_up"),
        refresh = key("refresh"),
        new_folder = key("new_folder"),
        rename = key("rename"),
        copy = key("copy"),
        delete = key("delete"),
        upload = key("upload"),
        download = key("download"),
        menu = key("menu"),
        preview = key("preview"),
        help = key("help"),
        quit = key("quit"),
        quit_alt = key("quit_alt"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::api::mock::MockApi;
    use crate::api::DirectoryEntry;
    use crate::async_io::IoResponse;
    use crate::config::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn previewing_app() -> App {
        let mut app = App::new(Config::default(), None, Arc::new(MockApi::new()));
        app.session.take_requests();
        app.session.apply(IoResponse::Listed {
            path: ".".into(),
            generation: app.session.generation(),
            result: Ok(vec![
                DirectoryEntry::file("a.png", "image/png", 1),
                DirectoryEntry::file("b.pdf", "application/pdf", 1),
            ]),
        });
        app.dispatch(Action::Activate(0));
        app
    }

    #[test]
    fn test_preview_arrows_cycle_files() {
        let mut app = previewing_app();
        handle_preview_mode(&mut app, key(KeyCode::Left));
        assert_eq!(app.session.preview().unwrap().name, "b.pdf");
        handle_preview_mode(&mut app, key(KeyCode::Right));
        assert_eq!(app.session.preview().unwrap().name, "a.png");
    }

    #[test]
    fn test_preview_escape_closes() {
        let mut app = previewing_app();
        handle_preview_mode(&mut app, key(KeyCode::Esc));
        assert!(app.session.preview().is_none());
    }

    #[test]
    fn test_help_scroll_is_clamped() {
        let mut app = App::new(Config::default(), None, Arc::new(MockApi::new()));
        app.ui.page_height = 10;
        app.mode = Mode::Help { scroll: 0 };

        handle_help_mode(&mut app, key(KeyCode::End));
        let max = help_text(&app.config.keybindings).lines().count() - 10;
        assert!(matches!(app.mode, Mode::Help { scroll } if scroll == max));

        handle_help_mode(&mut app, key(KeyCode::F(1)));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn test_help_text_shows_custom_keys() {
        let bindings = KeyBindings {
            bindings: HashMap::from([("refresh".to_string(), "F5".to_string())]),
        };
        let text = help_text(&bindings);
        assert!(text.contains("F5           Reload the listing"));
        assert!(text.contains("F10          Quit (Ctrl+Q)"));
    }
}
