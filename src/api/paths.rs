//! Remote path helpers
//!
//! Remote paths are plain strings built by concatenation. The root is `"."`
//! and a child of `dir` is always `dir + "/" + name`, so `"./a/b"` and
//! `"a/b"` are different strings that the server resolves to the same place.

/// Root of the remote tree
pub const ROOT: &str = ".";

/// Child path of `dir`
pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir, name)
}

/// Parent of `path`, dropping the last component (`.` stays `.`)
pub fn parent(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
        None => ROOT.to_string(),
    }
}

/// Last component of `path`
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Percent-encode a query value, leaving only unreserved characters
pub fn encode_query_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_literal() {
        assert_eq!(join(".", "a.txt"), "./a.txt");
        assert_eq!(join("./sub", "x y"), "./sub/x y");
        assert_eq!(join("a/b", "c"), "a/b/c");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("./a/b"), "./a");
        assert_eq!(parent("./a"), ".");
        assert_eq!(parent("a"), ".");
        assert_eq!(parent("."), ".");
        assert_eq!(parent("a/b/"), "a");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("./sub/a.txt"), "a.txt");
        assert_eq!(file_name("a.txt"), "a.txt");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("./a b/c&d"), ".%2Fa%20b%2Fc%26d");
        assert_eq!(encode_query_value("plain-name_1.txt"), "plain-name_1.txt");
        assert_eq!(encode_query_value("é"), "%C3%A9");
    }
}
