//! Declarative view-model of the browser.
//!
//! Built from the session by pure functions; the widgets in `ui` only draw
//! what is here and never look at the session themselves.

use crate::api::{paths, DirectoryEntry};
use crate::state::preview::Preview;
use crate::state::session::{Notice, Session, View};

/// One breadcrumb segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    /// Path listed when the segment is activated
    pub target: String,
    pub is_home: bool,
}

/// Breadcrumb trail for `path`: home, then one segment per component.
/// `.` and `..` components get no segment of their own.
pub fn breadcrumb(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "Home".to_string(),
        target: paths::ROOT.to_string(),
        is_home: true,
    }];

    let parts: Vec<&str> = path.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || *part == "." || *part == ".." {
            continue;
        }
        crumbs.push(Crumb {
            label: part.to_string(),
            target: parts[..=i].join("/"),
            is_home: false,
        });
    }
    crumbs
}

/// What activating a card does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// List this path
    Navigate(String),
    /// Open the preview of this file name
    Preview(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Name as displayed (may differ from the entry while a rename is in flight)
    pub label: String,
    pub is_dir: bool,
    pub mime: String,
    pub size: u64,
    pub selected: bool,
    /// Placeholder folder not yet created on the server
    pub draft: bool,
    pub activation: Activation,
}

/// Map an entry of `current_path` to its card
pub fn card(entry: &DirectoryEntry, current_path: &str) -> Card {
    let activation = if entry.is_dir {
        Activation::Navigate(paths::join(current_path, &entry.name))
    } else {
        Activation::Preview(entry.name.clone())
    };
    Card {
        label: entry.name.clone(),
        is_dir: entry.is_dir,
        mime: entry.mime().to_string(),
        size: entry.size,
        selected: false,
        draft: false,
        activation,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading,
    Error(String),
    Cards(Vec<Card>),
}

pub struct BrowserView<'a> {
    pub breadcrumb: Vec<Crumb>,
    pub body: Body,
    pub cursor: usize,
    pub files: usize,
    pub folders: usize,
    pub selected: usize,
    pub selected_size: u64,
    pub notice: Option<&'a Notice>,
    pub preview: Option<&'a Preview>,
}

impl<'a> BrowserView<'a> {
    pub fn build(session: &'a Session) -> Self {
        let current = session.current_path();
        let body = match session.view() {
            View::Loading => Body::Loading,
            View::Error(message) => Body::Error(message.clone()),
            View::Content => Body::Cards(
                session
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| {
                        let mut card = card(entry, current);
                        card.label = session.display_name(entry).to_string();
                        card.selected = session.is_selected(&entry.name);
                        card.draft = session.is_draft(i);
                        card
                    })
                    .collect(),
            ),
        };
        let folders = session.entries().iter().filter(|e| e.is_dir).count();

        Self {
            breadcrumb: breadcrumb(current),
            body,
            cursor: session.cursor(),
            files: session.file_list().len(),
            folders,
            selected: session.selected_count(),
            selected_size: session.selected_size(),
            notice: session.notice(),
            preview: session.preview(),
        }
    }
}

/// Human readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}{}", bytes, UNITS[0])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_io::IoResponse;
    use crate::state::session::SessionOptions;

    #[test]
    fn test_breadcrumb_segments() {
        let crumbs = breadcrumb("a/b/c");
        let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", "a", "b", "c"]);
        assert_eq!(crumbs[2].target, "a/b");
        assert_eq!(crumbs[0].target, ".");
        assert!(crumbs[0].is_home);
    }

    #[test]
    fn test_breadcrumb_skips_dots() {
        let crumbs = breadcrumb("./sub/../x");
        let targets: Vec<&str> = crumbs.iter().map(|c| c.target.as_str()).collect();
        assert_eq!(targets, vec![".", "./sub", "./sub/../x"]);
        assert_eq!(breadcrumb(".").len(), 1);
    }

    #[test]
    fn test_card_mapping() {
        let folder = card(&DirectoryEntry::dir("sub"), "./a");
        assert_eq!(folder.activation, Activation::Navigate("./a/sub".into()));
        assert!(folder.is_dir);

        let file = card(&DirectoryEntry::file("x.pdf", "application/pdf", 10), "./a");
        assert_eq!(file.activation, Activation::Preview("x.pdf".into()));
        assert_eq!(file.mime, "application/pdf");
        assert!(!file.selected);
    }

    #[test]
    fn test_build_from_session() {
        let mut session = Session::new(".", SessionOptions::default());
        session.take_requests();
        assert_eq!(BrowserView::build(&session).body, Body::Loading);

        session.apply(IoResponse::Listed {
            path: "./docs".into(),
            generation: session.generation(),
            result: Ok(vec![
                DirectoryEntry::file("a.txt", "text/plain", 2048),
                DirectoryEntry::dir("sub"),
            ]),
        });
        session.toggle_selected(0);

        let view = BrowserView::build(&session);
        assert_eq!(view.breadcrumb.len(), 2);
        assert_eq!((view.files, view.folders, view.selected), (1, 1, 1));
        assert_eq!(view.selected_size, 2048);
        match view.body {
            Body::Cards(cards) => {
                assert_eq!(cards.len(), 2);
                assert!(cards[0].selected);
                assert_eq!(cards[1].activation, Activation::Navigate("./docs/sub".into()));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(2048), "2.0K");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0M");
    }
}
