//! Browser session: current directory, listing, selection and the pending
//! server work.
//!
//! Every user operation is a synchronous state transition that may queue
//! [`IoRequest`]s. The app drains them with [`Session::take_requests`], runs
//! them in the background and feeds completions back through
//! [`Session::apply`].

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::api::{paths, ApiResult, DirectoryEntry};
use crate::async_io::{IoRequest, IoResponse};
use super::preview::{wrap_next, wrap_prev, Preview, PreviewBody, PreviewKind};

/// Name given to the placeholder card of a folder being created
pub const NEW_FOLDER_NAME: &str = "New Folder";

/// Body of the main view, exactly one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Content,
    Error(String),
}

/// One-line message for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// Behaviour switches taken from the configuration
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Re-list after every uploaded file instead of once per batch
    pub refresh_after_each_upload: bool,
    pub download_dir: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            refresh_after_each_upload: true,
            download_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug)]
struct DeleteBatch {
    remaining: usize,
    failed: bool,
}

pub struct Session {
    current_path: String,
    /// Everything listed, in server order (plus a draft folder card)
    entries: Vec<DirectoryEntry>,
    /// Files only, drives preview navigation
    file_list: Vec<DirectoryEntry>,
    selected: HashSet<String>,
    cursor: usize,
    view: View,
    preview: Option<Preview>,
    /// Names shown while a rename is in flight, keyed by the old name
    pending_renames: HashMap<String, String>,
    /// Index in `entries` of the placeholder folder being named
    draft: Option<usize>,
    notice: Option<Notice>,
    /// Newest listing issued; older completions are dropped
    generation: u64,
    batches: HashMap<u64, DeleteBatch>,
    next_batch: u64,
    options: SessionOptions,
    outbox: Vec<IoRequest>,
}

impl Session {
    /// New session that immediately lists `start_path`
    pub fn new(start_path: &str, options: SessionOptions) -> Self {
        let mut session = Self {
            current_path: start_path.to_string(),
            entries: Vec::new(),
            file_list: Vec::new(),
            selected: HashSet::new(),
            cursor: 0,
            view: View::Loading,
            preview: None,
            pending_renames: HashMap::new(),
            draft: None,
            notice: None,
            generation: 0,
            batches: HashMap::new(),
            next_batch: 0,
            options,
            outbox: Vec::new(),
        };
        session.list_directory(start_path);
        session
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DirectoryEntry> {
        self.entries.get(index)
    }

    pub fn file_list(&self) -> &[DirectoryEntry] {
        &self.file_list
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn preview_mut(&mut self) -> Option<&mut Preview> {
        self.preview.as_mut()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<IoRequest> {
        std::mem::take(&mut self.outbox)
    }

    // ---- navigation ----

    /// Ask for `path`; the view shows the spinner until the listing lands
    pub fn list_directory(&mut self, path: &str) {
        self.generation += 1;
        self.view = View::Loading;
        self.outbox.push(IoRequest::List {
            path: path.to_string(),
            generation: self.generation,
        });
    }

    pub fn refresh(&mut self) {
        let path = self.current_path.clone();
        self.list_directory(&path);
    }

    pub fn go_up(&mut self) {
        let parent = paths::parent(&self.current_path);
        self.list_directory(&parent);
    }

    // ---- cursor & selection ----

    pub fn set_cursor(&mut self, index: usize) {
        if !self.entries.is_empty() {
            self.cursor = index.min(self.entries.len() - 1);
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let target = self.cursor.saturating_add_signed(delta);
        self.cursor = target.min(self.entries.len() - 1);
    }

    pub fn toggle_selected(&mut self, index: usize) {
        if self.draft == Some(index) {
            return;
        }
        if let Some(entry) = self.entries.get(index) {
            let name = entry.name.clone();
            if !self.selected.remove(&name) {
                self.selected.insert(name);
            }
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_size(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| self.selected.contains(&e.name))
            .map(|e| e.size)
            .sum()
    }

    /// Entries a bulk action applies to: the selection, else the cursor entry
    pub fn action_targets(&self) -> Vec<DirectoryEntry> {
        let selected: Vec<DirectoryEntry> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, e)| self.draft != Some(*i) && self.selected.contains(&e.name))
            .map(|(_, e)| e.clone())
            .collect();
        if !selected.is_empty() {
            return selected;
        }
        match self.entries.get(self.cursor) {
            Some(entry) if self.draft != Some(self.cursor) && self.view == View::Content => vec![entry.clone()],
            _ => Vec::new(),
        }
    }

    /// Name to draw for an entry, taking in-flight renames into account
    pub fn display_name<'a>(&'a self, entry: &'a DirectoryEntry) -> &'a str {
        self.pending_renames
            .get(&entry.name)
            .map(String::as_str)
            .unwrap_or(&entry.name)
    }

    pub fn is_draft(&self, index: usize) -> bool {
        self.draft == Some(index)
    }

    // ---- mutations ----

    /// Rename `original` (in the current directory) to `new_name`.
    /// Returns false when nothing had to be sent.
    pub fn rename(&mut self, original: &str, new_name: &str) -> bool {
        if new_name == original || new_name.is_empty() {
            debug!(original, "rename skipped, name unchanged");
            return false;
        }
        self.pending_renames.insert(original.to_string(), new_name.to_string());
        self.outbox.push(IoRequest::Rename {
            from: paths::join(&self.current_path, original),
            to: paths::join(&self.current_path, new_name),
            original: original.to_string(),
        });
        true
    }

    /// Insert the placeholder folder card. Returns its index.
    pub fn begin_create_folder(&mut self) -> Option<usize> {
        if self.draft.is_some() || self.view != View::Content {
            return None;
        }
        self.entries.push(DirectoryEntry::dir(NEW_FOLDER_NAME));
        let index = self.entries.len() - 1;
        self.draft = Some(index);
        self.cursor = index;
        Some(index)
    }

    /// Commit the placeholder under `name` and ask the server to create it
    pub fn commit_create_folder(&mut self, name: &str) {
        if name.is_empty() {
            self.cancel_create_folder();
            return;
        }
        if let Some(index) = self.draft.take() {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.name = name.to_string();
            }
            self.outbox.push(IoRequest::Mkdir {
                path: paths::join(&self.current_path, name),
            });
        }
    }

    /// Drop the placeholder without contacting the server
    pub fn cancel_create_folder(&mut self) {
        if let Some(index) = self.draft.take() {
            if index < self.entries.len() {
                self.entries.remove(index);
            }
            self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        }
    }

    /// Delete every entry in `targets`, one independent request each
    pub fn delete(&mut self, targets: &[DirectoryEntry]) {
        if targets.is_empty() {
            return;
        }
        self.next_batch += 1;
        let batch = self.next_batch;
        self.batches.insert(batch, DeleteBatch { remaining: targets.len(), failed: false });
        for entry in targets {
            self.outbox.push(IoRequest::Delete {
                batch,
                name: entry.name.clone(),
                path: paths::join(&self.current_path, &entry.name),
                is_dir: entry.is_dir,
            });
        }
    }

    /// Upload local files into the current directory. Empty input does nothing.
    pub fn upload(&mut self, files: Vec<PathBuf>) -> bool {
        if files.is_empty() {
            return false;
        }
        self.view = View::Loading;
        self.outbox.push(IoRequest::Upload {
            dir: self.current_path.clone(),
            files,
        });
        true
    }

    pub fn copy(&mut self, source: &str, target_name: &str) -> bool {
        if target_name.is_empty() || target_name == source {
            return false;
        }
        self.outbox.push(IoRequest::Copy {
            from: paths::join(&self.current_path, source),
            to: paths::join(&self.current_path, target_name),
        });
        true
    }

    /// Save a file of the current directory into the download directory
    pub fn download(&mut self, name: &str) {
        let dest = self.options.download_dir.join(name);
        self.notice = Some(Notice::info(format!("Downloading {}...", name)));
        self.outbox.push(IoRequest::Download {
            name: name.to_string(),
            path: paths::join(&self.current_path, name),
            dest,
        });
    }

    // ---- preview ----

    /// Open the preview for a file of the current listing
    pub fn preview_file(&mut self, name: &str) -> bool {
        let Some(index) = self.file_list.iter().position(|e| e.name == name) else {
            error!(name, "file not found in file list");
            return false;
        };
        let mime = self.file_list[index].mime().to_string();
        let kind = PreviewKind::from_mime(&mime);
        let path = paths::join(&self.current_path, name);

        let body = match kind {
            PreviewKind::Text => {
                self.outbox.push(IoRequest::Peek { name: name.to_string(), path: path.clone() });
                PreviewBody::Loading
            }
            PreviewKind::Other => PreviewBody::DownloadOnly,
            _ => PreviewBody::External,
        };

        self.preview = Some(Preview {
            index,
            name: name.to_string(),
            mime,
            kind,
            body,
            path,
            scroll: 0,
        });
        true
    }

    pub fn preview_next(&mut self) {
        self.step_preview(wrap_next);
    }

    pub fn preview_prev(&mut self) {
        self.step_preview(wrap_prev);
    }

    fn step_preview(&mut self, step: fn(usize, usize) -> usize) {
        let Some(current) = self.preview.as_ref().map(|p| p.index) else {
            return;
        };
        let index = step(current, self.file_list.len());
        if let Some(name) = self.file_list.get(index).map(|e| e.name.clone()) {
            self.preview_file(&name);
        }
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    // ---- completions ----

    pub fn apply(&mut self, response: IoResponse) {
        match response {
            IoResponse::Listed { path, generation, result } => self.apply_listing(path, generation, result),
            IoResponse::Renamed { original, result } => {
                self.pending_renames.remove(&original);
                match result {
                    Ok(()) => {
                        info!(original, "renamed");
                        self.refresh();
                    }
                    Err(e) => {
                        error!(original, error = %e, "rename failed");
                        self.notice = Some(Notice::error(e.to_string()));
                    }
                }
            }
            IoResponse::Copied { to, result } => match result {
                Ok(()) => {
                    info!(to, "copied");
                    self.notice = Some(Notice::info(format!("Copied to {}", paths::file_name(&to))));
                    self.refresh();
                }
                Err(e) => {
                    error!(to, error = %e, "copy failed");
                    self.notice = Some(Notice::error(e.to_string()));
                }
            },
            IoResponse::FolderCreated { path, result } => {
                match result {
                    Ok(()) => info!(path, "folder created"),
                    Err(e) => warn!(path, error = %e, "failed to create folder"),
                }
                self.refresh();
            }
            IoResponse::Deleted { batch, name, result } => self.apply_delete(batch, name, result),
            IoResponse::Uploaded { name, result } => match result {
                Ok(()) => {
                    info!(name, "uploaded");
                    if self.options.refresh_after_each_upload {
                        self.refresh();
                    }
                }
                Err(e) => {
                    error!(name, error = %e, "upload failed");
                    self.generation += 1;
                    self.view = View::Error(format!("Upload of {} failed: {}", name, e));
                }
            },
            IoResponse::UploadsFinished { succeeded, failed } => {
                info!(succeeded, failed, "upload batch finished");
                if !self.options.refresh_after_each_upload && failed == 0 && succeeded > 0 {
                    self.refresh();
                }
            }
            IoResponse::Peeked { name, result } => {
                let Some(preview) = self.preview.as_mut().filter(|p| p.name == name) else {
                    debug!(name, "peek for a closed preview dropped");
                    return;
                };
                preview.body = match result {
                    Ok(text) => PreviewBody::Text(text),
                    Err(e) => {
                        error!(name, error = %e, "preview fetch failed");
                        PreviewBody::Failed(e.to_string())
                    }
                };
            }
            IoResponse::Downloaded { name, dest, result } => match result {
                Ok(()) => {
                    info!(name, dest = %dest.display(), "downloaded");
                    self.notice = Some(Notice::info(format!("Saved {}", dest.display())));
                }
                Err(e) => {
                    error!(name, error = %e, "download failed");
                    self.notice = Some(Notice::error(format!("Download of {} failed: {}", name, e)));
                }
            },
        }
    }

    fn apply_listing(&mut self, path: String, generation: u64, result: ApiResult<Vec<DirectoryEntry>>) {
        if generation != self.generation {
            debug!(path, generation, newest = self.generation, "stale listing dropped");
            return;
        }

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                error!(path, error = %e, "listing failed");
                self.view = View::Error(e.to_string());
                return;
            }
        };

        let same_dir = path == self.current_path;
        if !same_dir {
            self.pending_renames.clear();
            self.cursor = 0;
        }
        self.current_path = path;
        self.file_list = entries.iter().filter(|e| !e.is_dir).cloned().collect();
        self.entries = entries;
        self.selected.clear();
        self.draft = None;
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        self.view = View::Content;

        // Keep an open preview pointing at the same file, or close it
        if let Some(name) = self.preview.as_ref().map(|p| p.name.clone()) {
            match self.file_list.iter().position(|e| e.name == name) {
                Some(index) if same_dir => {
                    if let Some(preview) = self.preview.as_mut() {
                        preview.index = index;
                    }
                }
                _ => self.preview = None,
            }
        }
    }

    fn apply_delete(&mut self, batch: u64, name: String, result: ApiResult<()>) {
        let failed_before = self.batches.get(&batch).is_some_and(|b| b.failed);

        match result {
            Ok(()) => {
                info!(name, "deleted");
                if !failed_before {
                    self.refresh();
                }
            }
            Err(e) => {
                error!(name, error = %e, "delete failed");
                if let Some(state) = self.batches.get_mut(&batch) {
                    state.failed = true;
                }
                // Listings already in flight must not hide the error
                self.generation += 1;
                self.view = View::Error(format!("Failed to delete {}: {}", name, e));
            }
        }

        if let Some(state) = self.batches.get_mut(&batch) {
            state.remaining = state.remaining.saturating_sub(1);
            if state.remaining == 0 {
                self.batches.remove(&batch);
            }
        }
    }
}
