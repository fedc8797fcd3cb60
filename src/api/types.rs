//! JSON payloads exchanged with the file store

use serde::{Deserialize, Serialize};

/// A file or directory as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl DirectoryEntry {
    #[cfg(test)]
    pub fn file(name: &str, mime: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
            mime: Some(mime.to_string()),
            size,
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
            mime: None,
            size: 0,
        }
    }

    /// Declared MIME type, empty when the server sent none
    pub fn mime(&self) -> &str {
        self.mime.as_deref().unwrap_or("")
    }
}

/// Body of `GET ls`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<DirectoryEntry>,
}

/// Body of every mutating endpoint, and of failed downloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_without_optional_fields() {
        let body = r#"{"success":true,"files":[{"name":"sub","is_dir":true},{"name":"a.txt","is_dir":false,"mime":"text/plain","size":12}]}"#;
        let parsed: ListResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.message, "");
        assert_eq!(parsed.files[0], DirectoryEntry::dir("sub"));
        assert_eq!(parsed.files[1], DirectoryEntry::file("a.txt", "text/plain", 12));
    }

    #[test]
    fn test_null_mime() {
        let body = r#"{"name":"blob","is_dir":false,"mime":null}"#;
        let entry: DirectoryEntry = serde_json::from_str(body).unwrap();
        assert_eq!(entry.mime(), "");
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn test_failure_payload() {
        let body = r#"{"success":false,"message":"Path not found"}"#;
        let parsed: ListResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message, "Path not found");
        assert!(parsed.files.is_empty());
    }
}
