use crate::api::DirectoryEntry;

/// Entries of the options menu, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    NewFolder,
    Upload,
    Rename,
    Copy,
    Download,
    Delete,
    Refresh,
}

impl MenuItem {
    pub const ALL: [MenuItem; 7] = [
        MenuItem::NewFolder,
        MenuItem::Upload,
        MenuItem::Rename,
        MenuItem::Copy,
        MenuItem::Download,
        MenuItem::Delete,
        MenuItem::Refresh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewFolder => "New folder",
            MenuItem::Upload => "Upload...",
            MenuItem::Rename => "Rename",
            MenuItem::Copy => "Copy...",
            MenuItem::Download => "Download",
            MenuItem::Delete => "Delete",
            MenuItem::Refresh => "Refresh",
        }
    }
}

/// Options menu, anchored where it was opened
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionsMenu {
    pub x: u16,
    pub y: u16,
    pub selected: usize,
}

impl OptionsMenu {
    pub fn at(x: u16, y: u16) -> Self {
        Self { x, y, selected: 0 }
    }

    pub fn item(&self) -> MenuItem {
        MenuItem::ALL[self.selected.min(MenuItem::ALL.len() - 1)]
    }

    pub fn up(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(MenuItem::ALL.len() - 1);
    }

    pub fn down(&mut self) {
        self.selected = (self.selected + 1) % MenuItem::ALL.len();
    }
}

/// What a one-line prompt is asking for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    /// Local file paths to upload, separated by whitespace
    Upload,
    /// New name for a copy of `source`
    Copy { source: String },
}

/// Input mode of the application
#[derive(Clone, Debug, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Inline name editor on an existing card
    Renaming {
        index: usize,
        original: String,
        input: String,
        cursor: usize,
    },
    /// Inline name editor on the placeholder folder card
    NamingFolder {
        index: usize,
        input: String,
        cursor: usize,
    },
    ConfirmDelete {
        targets: Vec<DirectoryEntry>,
        /// 0 = Delete, 1 = Cancel
        focus: usize,
    },
    Prompt {
        kind: PromptKind,
        input: String,
        cursor: usize,
    },
    Help {
        scroll: usize,
    },
}

impl Mode {
    /// Card index and text of an inline name editor, if one is open
    pub fn editing(&self) -> Option<(usize, &str, usize)> {
        match self {
            Mode::Renaming { index, input, cursor, .. } | Mode::NamingFolder { index, input, cursor } => {
                Some((*index, input.as_str(), *cursor))
            }
            _ => None,
        }
    }
}

/// Split an upload prompt into paths. Quotes group a path containing spaces.
pub fn parse_upload_paths(input: &str) -> Vec<std::path::PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => quote = Some(c),
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current).into());
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(current.into());
    }
    paths
}
