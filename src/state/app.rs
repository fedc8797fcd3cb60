use std::path::PathBuf;
use std::process::Child;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::api::FileApi;
use crate::async_io::manager::IoManager;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::Theme;
use crate::view::Activation;
use super::media::{self, MediaPlayer};
use super::mode::{parse_upload_paths, MenuItem, Mode, OptionsMenu, PromptKind};
use super::preview::PreviewKind;
use super::session::{Notice, Session, SessionOptions, View, NEW_FOLDER_NAME};
use super::UiState;

/// Held left button turns into a menu after this long
pub const LONG_PRESS: Duration = Duration::from_millis(250);

/// Something the user asked for, from the keyboard or the mouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Refresh,
    GoUp,
    /// Open the card at this index (folder: navigate, file: preview)
    Activate(usize),
    ToggleSelect(usize),
    SetCursor(usize),
    MoveCursor(isize),
    StartRename(usize),
    NewFolder,
    Delete,
    ConfirmDelete,
    Upload,
    Copy,
    Download,
    PreviewNext,
    PreviewPrev,
    ClosePreview,
    ScrollPreview(isize),
    OpenExternal,
    OpenMenu { column: u16, row: u16 },
    CloseMenu,
    MenuChoose(MenuItem),
    Help,
    Quit,
}

pub struct App {
    pub session: Session,
    pub mode: Mode,
    pub menu: Option<OptionsMenu>,
    pub should_quit: bool,
    pub ui: UiState,
    pub config: Config,
    /// File the configuration came from, for remember_path
    pub config_path: Option<PathBuf>,
    pub theme: Theme,
    io: IoManager,
    player: MediaPlayer,
    /// Non-media viewers, reaped when they exit
    viewers: Vec<Child>,
}

impl App {
    pub fn new(config: Config, config_path: Option<PathBuf>, api: Arc<dyn FileApi>) -> Self {
        let options = SessionOptions {
            refresh_after_each_upload: config.browser.refresh_after_each_upload,
            download_dir: config.browser.download_dir(),
        };
        let session = Session::new(config.browser.initial_path(), options);
        let theme = config.theme.build_theme();

        Self {
            session,
            mode: Mode::Normal,
            menu: None,
            should_quit: false,
            ui: UiState::default(),
            config,
            config_path,
            theme,
            io: IoManager::new(api),
            player: MediaPlayer::new(),
            viewers: Vec::new(),
        }
    }

    /// Check if a key matches a configured action
    pub fn key_matches(&self, action: &str, key: &crossterm::event::KeyEvent) -> bool {
        self.config.keybindings.matches(action, key)
    }

    /// Requests are running in the background
    pub fn is_busy(&self) -> bool {
        self.io.in_flight() > 0
    }

    /// Hand queued requests to the workers and apply finished ones.
    /// Returns true when a completion was applied.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        self.flush_requests();
        while let Some(response) = self.io.try_recv() {
            self.session.apply(response);
            changed = true;
        }
        self.flush_requests();

        if changed {
            if self.session.preview().is_none() {
                self.player.stop();
            }
            self.reconcile_mode();
        }
        changed
    }

    fn flush_requests(&mut self) {
        for request in self.session.take_requests() {
            self.io.send(request);
        }
    }

    /// Drop an inline editor whose card went away under it
    fn reconcile_mode(&mut self) {
        let stale = match &self.mode {
            Mode::NamingFolder { index, .. } => !self.session.is_draft(*index),
            Mode::Renaming { index, original, .. } => self
                .session
                .entry(*index)
                .is_none_or(|e| &e.name != original),
            _ => false,
        };
        if stale {
            self.mode = Mode::Normal;
        }
    }

    /// Periodic work: spinner, long press, finished viewers
    pub fn tick(&mut self) {
        self.ui.tick_spinner();

        if let Some(press) = self.ui.press.as_mut()
            && !press.fired
            && press.at.elapsed() >= LONG_PRESS
        {
            press.fired = true;
            let (column, row) = (press.column, press.row);
            self.dispatch(Action::OpenMenu { column, row });
        }

        self.viewers.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Navigate(path) => self.session.list_directory(&path),
            Action::Refresh => self.session.refresh(),
            Action::GoUp => self.session.go_up(),
            Action::Activate(index) => self.activate(index),
            Action::ToggleSelect(index) => self.session.toggle_selected(index),
            Action::SetCursor(index) => self.session.set_cursor(index),
            Action::MoveCursor(delta) => self.session.move_cursor(delta),
            Action::StartRename(index) => self.start_rename(index),
            Action::NewFolder => self.start_new_folder(),
            Action::Delete => self.request_delete(),
            Action::ConfirmDelete => {
                if let Mode::ConfirmDelete { targets, .. } = std::mem::take(&mut self.mode) {
                    self.session.delete(&targets);
                }
            }
            Action::Upload => {
                self.mode = Mode::Prompt { kind: PromptKind::Upload, input: String::new(), cursor: 0 };
            }
            Action::Copy => self.start_copy(),
            Action::Download => self.download(),
            Action::PreviewNext => {
                self.player.stop();
                self.session.preview_next();
            }
            Action::PreviewPrev => {
                self.player.stop();
                self.session.preview_prev();
            }
            Action::ClosePreview => {
                self.player.stop();
                self.session.close_preview();
            }
            Action::ScrollPreview(delta) => {
                if let Some(preview) = self.session.preview_mut() {
                    preview.scroll_by(delta);
                }
            }
            Action::OpenExternal => {
                if let Err(e) = self.open_external() {
                    error!(error = %e, "external viewer failed");
                    self.session.set_notice(Notice::error(e.to_string()));
                }
            }
            Action::OpenMenu { column, row } => {
                if matches!(self.mode, Mode::Normal) && self.session.preview().is_none() {
                    self.menu = Some(OptionsMenu::at(column, row));
                }
            }
            Action::CloseMenu => self.menu = None,
            Action::MenuChoose(item) => {
                self.menu = None;
                let follow_up = match item {
                    MenuItem::NewFolder => Action::NewFolder,
                    MenuItem::Upload => Action::Upload,
                    MenuItem::Rename => Action::StartRename(self.session.cursor()),
                    MenuItem::Copy => Action::Copy,
                    MenuItem::Download => Action::Download,
                    MenuItem::Delete => Action::Delete,
                    MenuItem::Refresh => Action::Refresh,
                };
                self.dispatch(follow_up);
            }
            Action::Help => self.mode = Mode::Help { scroll: 0 },
            Action::Quit => self.should_quit = true,
        }
    }

    fn activate(&mut self, index: usize) {
        let Some(entry) = self.session.entry(index) else {
            return;
        };
        if self.session.is_draft(index) {
            return;
        }
        match crate::view::card(entry, self.session.current_path()).activation {
            Activation::Navigate(path) => self.session.list_directory(&path),
            Activation::Preview(name) => {
                self.player.stop();
                self.session.preview_file(&name);
            }
        }
    }

    fn start_rename(&mut self, index: usize) {
        if *self.session.view() != View::Content || self.session.is_draft(index) {
            return;
        }
        if let Some(entry) = self.session.entry(index) {
            let original = entry.name.clone();
            self.session.set_cursor(index);
            self.mode = Mode::Renaming {
                index,
                cursor: original.chars().count(),
                input: original.clone(),
                original,
            };
        }
    }

    fn start_new_folder(&mut self) {
        if let Some(index) = self.session.begin_create_folder() {
            self.mode = Mode::NamingFolder {
                index,
                input: NEW_FOLDER_NAME.to_string(),
                cursor: NEW_FOLDER_NAME.chars().count(),
            };
        }
    }

    /// Finish the inline name editor
    pub fn commit_edit(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Renaming { original, input, .. } => {
                self.session.rename(&original, &input);
            }
            Mode::NamingFolder { input, .. } => self.session.commit_create_folder(&input),
            other => self.mode = other,
        }
    }

    /// Abandon the inline name editor
    pub fn cancel_edit(&mut self) {
        if let Mode::NamingFolder { .. } = std::mem::take(&mut self.mode) {
            self.session.cancel_create_folder();
        }
    }

    fn request_delete(&mut self) {
        let targets = self.session.action_targets();
        if targets.is_empty() {
            return;
        }
        if self.config.confirmations.delete {
            self.mode = Mode::ConfirmDelete { targets, focus: 0 };
        } else {
            self.session.delete(&targets);
        }
    }

    fn start_copy(&mut self) {
        if *self.session.view() != View::Content {
            return;
        }
        let cursor = self.session.cursor();
        if self.session.is_draft(cursor) {
            return;
        }
        if let Some(entry) = self.session.entry(cursor) {
            let source = entry.name.clone();
            self.mode = Mode::Prompt {
                kind: PromptKind::Copy { source: source.clone() },
                cursor: source.chars().count(),
                input: source,
            };
        }
    }

    /// Finish a one-line prompt
    pub fn submit_prompt(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Prompt { kind: PromptKind::Upload, input, .. } => {
                self.session.upload(parse_upload_paths(&input));
            }
            Mode::Prompt { kind: PromptKind::Copy { source }, input, .. } => {
                self.session.copy(&source, &input);
            }
            other => self.mode = other,
        }
    }

    /// Save the previewed file, or the file under the cursor
    fn download(&mut self) {
        let name = match self.session.preview() {
            Some(preview) => Some(preview.name.clone()),
            None => self
                .session
                .entry(self.session.cursor())
                .filter(|e| !e.is_dir && *self.session.view() == View::Content)
                .map(|e| e.name.clone()),
        };
        match name {
            Some(name) => self.session.download(&name),
            None => self.session.set_notice(Notice::error("Only files can be downloaded")),
        }
    }

    /// Run the configured viewer for the open preview
    fn open_external(&mut self) -> AppResult<()> {
        let Some(preview) = self.session.preview() else {
            return Ok(());
        };
        let url = self.io.api().file_url(&preview.path, true);
        let command = self
            .config
            .find_handler(&preview.mime, &url)
            .ok_or_else(|| AppError::Operation(format!("No viewer configured for {}", display_mime(&preview.mime))))?;
        let kind = preview.kind;
        let name = preview.name.clone();

        if kind.is_media() {
            self.player.play(&command)?;
        } else {
            self.viewers.push(media::launch(&command)?);
        }
        info!(name, kind = kind.label(), "opened in external viewer");
        self.session.set_notice(Notice::info(format!("Opened {}", name)));
        Ok(())
    }

    /// URL of the open preview, for display
    pub fn preview_url(&self) -> Option<String> {
        self.session
            .preview()
            .filter(|p| p.kind != PreviewKind::Text)
            .map(|p| self.io.api().file_url(&p.path, true))
    }

    /// Stop media and remember the directory before exiting
    pub fn shutdown(&mut self) {
        self.player.stop();
        if let Some(path) = self.config_path.clone() {
            let current = self.session.current_path().to_string();
            if let Err(e) = self.config.save_last_path(&path, &current) {
                error!(error = %e, "could not save last path");
            }
        }
    }
}

fn display_mime(mime: &str) -> &str {
    if mime.is_empty() { "this file type" } else { mime }
}
