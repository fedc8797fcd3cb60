//! Preview overlay state

/// How a file is presented, decided from its declared MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Text,
    Video,
    Audio,
    Pdf,
    /// Anything else only offers a download
    Other,
}

impl PreviewKind {
    /// Substring checks in a fixed order, so `text/x-image/...` still counts
    /// as an image.
    pub fn from_mime(mime: &str) -> Self {
        if mime.contains("image/") {
            Self::Image
        } else if mime.contains("text/") {
            Self::Text
        } else if mime.contains("video/") {
            Self::Video
        } else if mime.contains("audio/") {
            Self::Audio
        } else if mime.contains("application/pdf") {
            Self::Pdf
        } else {
            Self::Other
        }
    }

    /// Kinds that play, and so must be stopped when the preview changes
    pub fn is_media(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }

    /// Kinds that are handed to an external viewer
    pub fn opens_externally(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio | Self::Pdf)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Other => "file",
        }
    }
}

/// What the preview body currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    /// Waiting for the peek request
    Loading,
    Text(String),
    Failed(String),
    /// Shown through an external viewer, the overlay only carries the URL
    External,
    /// Nothing to show, download only
    DownloadOnly,
}

#[derive(Debug, Clone)]
pub struct Preview {
    /// Position in the session's file list
    pub index: usize,
    pub name: String,
    pub mime: String,
    pub kind: PreviewKind,
    pub body: PreviewBody,
    /// Remote path the preview was opened for
    pub path: String,
    /// First visible text line
    pub scroll: usize,
}

impl Preview {
    pub fn scroll_by(&mut self, delta: isize) {
        let lines = match &self.body {
            PreviewBody::Text(text) => text.lines().count(),
            _ => 0,
        };
        let max = lines.saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }
}

/// Index after `index` in a list of `len`, wrapping to the start
pub fn wrap_next(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1) % len }
}

/// Index before `index` in a list of `len`, wrapping to the end
pub fn wrap_prev(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if index == 0 {
        len - 1
    } else {
        (index - 1).min(len - 1)
    }
}
