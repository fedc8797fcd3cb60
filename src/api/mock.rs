//! In-memory file store used by tests
//!
//! Keys are the literal path strings the browser builds (`"./sub/a.txt"`),
//! so a listing of `dir` returns every node whose key is `dir + "/" + name`.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ApiError, ApiResult, DirectoryEntry, FileApi};

/// One call received by the mock, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Download(String, bool),
    Upload(String),
    Rename(String, String),
    Copy(String, String),
    Mkdir(String),
    RemoveFile(String),
    RemoveDir(String),
}

#[derive(Debug, Clone)]
struct Node {
    is_dir: bool,
    mime: Option<String>,
    data: Vec<u8>,
}

#[derive(Default)]
struct Store {
    /// Insertion ordered so listings keep a stable server order
    nodes: Vec<(String, Node)>,
    calls: Vec<Call>,
    failures: HashMap<String, String>,
}

impl Store {
    fn position(&self, path: &str) -> Option<usize> {
        self.nodes.iter().position(|(key, _)| key == path)
    }

    fn check(&self, path: &str) -> ApiResult<()> {
        match self.failures.get(path) {
            Some(message) => Err(ApiError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MockApi {
    store: Mutex<Store>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.insert(path, Node { is_dir: true, mime: None, data: Vec::new() });
        self
    }

    pub fn with_file(self, path: &str, mime: &str, data: &[u8]) -> Self {
        self.insert(path, Node { is_dir: false, mime: Some(mime.to_string()), data: data.to_vec() });
        self
    }

    /// Every call touching `path` fails with `message`
    pub fn fail_on(self, path: &str, message: &str) -> Self {
        self.lock().failures.insert(path.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lock().position(path).is_some()
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        let store = self.lock();
        store.position(path).map(|idx| store.nodes[idx].1.data.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(&self, path: &str, node: Node) {
        let mut store = self.lock();
        match store.position(path) {
            Some(idx) => store.nodes[idx].1 = node,
            None => store.nodes.push((path.to_string(), node)),
        }
    }

    fn remove(&self, path: &str, want_dir: bool) -> ApiResult<()> {
        let mut store = self.lock();
        store.check(path)?;
        match store.position(path) {
            Some(idx) if store.nodes[idx].1.is_dir == want_dir => {
                store.nodes.remove(idx);
                let prefix = format!("{}/", path);
                store.nodes.retain(|(key, _)| !key.starts_with(&prefix));
                Ok(())
            }
            Some(_) => Err(ApiError::Rejected(format!("Wrong kind of entry: {}", path))),
            None => Err(ApiError::Rejected(format!("Path not found: {}", path))),
        }
    }
}

impl FileApi for MockApi {
    fn list(&self, path: &str) -> ApiResult<Vec<DirectoryEntry>> {
        let mut store = self.lock();
        store.calls.push(Call::List(path.to_string()));
        store.check(path)?;

        let is_root = path == super::paths::ROOT;
        if !is_root && !store.position(path).is_some_and(|idx| store.nodes[idx].1.is_dir) {
            return Err(ApiError::Rejected("Path not found".to_string()));
        }

        let prefix = format!("{}/", path);
        Ok(store
            .nodes
            .iter()
            .filter_map(|(key, node)| {
                let name = key.strip_prefix(&prefix)?;
                if name.contains('/') {
                    return None;
                }
                Some(DirectoryEntry {
                    name: name.to_string(),
                    is_dir: node.is_dir,
                    mime: node.mime.clone(),
                    size: node.data.len() as u64,
                })
            })
            .collect())
    }

    fn download(&self, path: &str, peek: bool) -> ApiResult<Vec<u8>> {
        let mut store = self.lock();
        store.calls.push(Call::Download(path.to_string(), peek));
        store.check(path)?;
        match store.position(path) {
            Some(idx) if !store.nodes[idx].1.is_dir => Ok(store.nodes[idx].1.data.clone()),
            _ => Err(ApiError::Status(404)),
        }
    }

    fn upload(&self, path: &str, data: Vec<u8>) -> ApiResult<()> {
        {
            let mut store = self.lock();
            store.calls.push(Call::Upload(path.to_string()));
            store.check(path)?;
        }
        self.insert(path, Node { is_dir: false, mime: Some("application/octet-stream".to_string()), data });
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> ApiResult<()> {
        let mut store = self.lock();
        store.calls.push(Call::Rename(from.to_string(), to.to_string()));
        store.check(from)?;
        store.check(to)?;
        if store.position(to).is_some() {
            return Err(ApiError::Rejected("Destination already exists".to_string()));
        }
        let Some(idx) = store.position(from) else {
            return Err(ApiError::Rejected("Source not found".to_string()));
        };
        store.nodes[idx].0 = to.to_string();
        let prefix = format!("{}/", from);
        for (key, _) in store.nodes.iter_mut() {
            if let Some(rest) = key.strip_prefix(&prefix) {
                *key = format!("{}/{}", to, rest);
            }
        }
        Ok(())
    }

    fn copy(&self, from: &str, to: &str) -> ApiResult<()> {
        let mut store = self.lock();
        store.calls.push(Call::Copy(from.to_string(), to.to_string()));
        store.check(from)?;
        store.check(to)?;
        let Some(idx) = store.position(from) else {
            return Err(ApiError::Rejected("Source not found".to_string()));
        };
        let node = store.nodes[idx].1.clone();
        store.nodes.push((to.to_string(), node));
        Ok(())
    }

    fn mkdir(&self, path: &str) -> ApiResult<()> {
        {
            let mut store = self.lock();
            store.calls.push(Call::Mkdir(path.to_string()));
            store.check(path)?;
            if store.position(path).is_some() {
                return Err(ApiError::Rejected("Folder already exists".to_string()));
            }
        }
        self.insert(path, Node { is_dir: true, mime: None, data: Vec::new() });
        Ok(())
    }

    fn remove_file(&self, path: &str) -> ApiResult<()> {
        self.lock().calls.push(Call::RemoveFile(path.to_string()));
        self.remove(path, false)
    }

    fn remove_dir(&self, path: &str) -> ApiResult<()> {
        self.lock().calls.push(Call::RemoveDir(path.to_string()));
        self.remove(path, true)
    }

    fn file_url(&self, path: &str, peek: bool) -> String {
        format!("mock://download?path={}&peek={}", path, peek)
    }
}
