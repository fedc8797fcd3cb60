//! Background execution of file store requests.
//!
//! The session never blocks on the network. It queues [`IoRequest`]s which
//! the [`manager::IoManager`] runs on worker threads; completions come back
//! as [`IoResponse`]s and are applied on the UI thread.

pub mod manager;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::api::{paths, ApiError, ApiResult, DirectoryEntry, FileApi};

/// Request for a file store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoRequest {
    /// List `path`, tagged with the listing generation that issued it
    List { path: String, generation: u64 },
    /// Rename `from` to `to`; `original` is the name shown before the edit
    Rename { from: String, to: String, original: String },
    Copy { from: String, to: String },
    Mkdir { path: String },
    /// One member of a delete batch
    Delete { batch: u64, name: String, path: String, is_dir: bool },
    /// Upload local `files` into the remote directory `dir`, one after another
    Upload { dir: String, files: Vec<PathBuf> },
    /// Fetch inline text content for the preview of `name`
    Peek { name: String, path: String },
    /// Save a remote file to `dest`
    Download { name: String, path: String, dest: PathBuf },
}

/// Completion of an [`IoRequest`]
#[derive(Debug)]
pub enum IoResponse {
    Listed { path: String, generation: u64, result: ApiResult<Vec<DirectoryEntry>> },
    Renamed { original: String, result: ApiResult<()> },
    Copied { to: String, result: ApiResult<()> },
    FolderCreated { path: String, result: ApiResult<()> },
    Deleted { batch: u64, name: String, result: ApiResult<()> },
    /// One file of an upload batch finished
    Uploaded { name: String, result: ApiResult<()> },
    /// Every file of an upload batch has been attempted
    UploadsFinished { succeeded: usize, failed: usize },
    Peeked { name: String, result: ApiResult<String> },
    Downloaded { name: String, dest: PathBuf, result: ApiResult<()> },
}

/// Run `request` to completion against `api`, handing each completion to `emit`.
///
/// Most requests emit exactly one response. Uploads emit one per file and
/// then [`IoResponse::UploadsFinished`].
pub fn execute(api: &dyn FileApi, request: IoRequest, emit: &mut dyn FnMut(IoResponse)) {
    debug!(?request, "executing");
    match request {
        IoRequest::List { path, generation } => {
            let result = api.list(&path);
            emit(IoResponse::Listed { path, generation, result });
        }
        IoRequest::Rename { from, to, original } => {
            let result = api.rename(&from, &to);
            emit(IoResponse::Renamed { original, result });
        }
        IoRequest::Copy { from, to } => {
            let result = api.copy(&from, &to);
            emit(IoResponse::Copied { to, result });
        }
        IoRequest::Mkdir { path } => {
            let result = api.mkdir(&path);
            emit(IoResponse::FolderCreated { path, result });
        }
        IoRequest::Delete { batch, name, path, is_dir } => {
            let result = if is_dir { api.remove_dir(&path) } else { api.remove_file(&path) };
            emit(IoResponse::Deleted { batch, name, result });
        }
        IoRequest::Upload { dir, files } => {
            let mut succeeded = 0;
            let mut failed = 0;
            for file in files {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| file.to_string_lossy().to_string());
                let result = fs::read(&file)
                    .map_err(ApiError::from)
                    .and_then(|data| api.upload(&paths::join(&dir, &name), data));
                if result.is_ok() {
                    succeeded += 1;
                } else {
                    failed += 1;
                }
                emit(IoResponse::Uploaded { name, result });
            }
            emit(IoResponse::UploadsFinished { succeeded, failed });
        }
        IoRequest::Peek { name, path } => {
            let result = api
                .download(&path, true)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
            emit(IoResponse::Peeked { name, result });
        }
        IoRequest::Download { name, path, dest } => {
            let result = api.download(&path, false).and_then(|bytes| {
                fs::write(&dest, bytes).map_err(|e| {
                    warn!(dest = %dest.display(), error = %e, "could not write download");
                    ApiError::from(e)
                })
            });
            emit(IoResponse::Downloaded { name, dest, result });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockApi};

    fn run(api: &MockApi, request: IoRequest) -> Vec<IoResponse> {
        let mut out = Vec::new();
        execute(api, request, &mut |r| out.push(r));
        out
    }

    #[test]
    fn test_delete_picks_route_by_kind() {
        let api = MockApi::new().with_dir("./sub").with_file("./a.txt", "text/plain", b"x");

        run(&api, IoRequest::Delete { batch: 1, name: "sub".into(), path: "./sub".into(), is_dir: true });
        run(&api, IoRequest::Delete { batch: 1, name: "a.txt".into(), path: "./a.txt".into(), is_dir: false });

        assert_eq!(api.calls(), vec![Call::RemoveDir("./sub".into()), Call::RemoveFile("./a.txt".into())]);
    }

    #[test]
    fn test_upload_is_sequential_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("one.txt");
        let two = dir.path().join("two.txt");
        std::fs::write(&one, b"1").unwrap();
        std::fs::write(&two, b"22").unwrap();
        let api = MockApi::new().with_dir("./up");

        let out = run(&api, IoRequest::Upload { dir: "./up".into(), files: vec![one, two] });

        assert_eq!(api.calls(), vec![Call::Upload("./up/one.txt".into()), Call::Upload("./up/two.txt".into())]);
        assert_eq!(api.contents("./up/two.txt").unwrap(), b"22");
        assert_eq!(out.len(), 3);
        assert!(matches!(out[2], IoResponse::UploadsFinished { succeeded: 2, failed: 0 }));
    }

    #[test]
    fn test_upload_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = MockApi::new();

        let out = run(&api, IoRequest::Upload { dir: ".".into(), files: vec![dir.path().join("nope.bin")] });

        assert!(api.calls().is_empty());
        match &out[0] {
            IoResponse::Uploaded { name, result: Err(ApiError::Io(_)) } => assert_eq!(name, "nope.bin"),
            other => panic!("unexpected response: {:?}", other),
        }
        assert!(matches!(out[1], IoResponse::UploadsFinished { succeeded: 0, failed: 1 }));
    }

    #[test]
    fn test_peek_decodes_text() {
        let api = MockApi::new().with_file("./a.txt", "text/plain", "héllo".as_bytes());

        let out = run(&api, IoRequest::Peek { name: "a.txt".into(), path: "./a.txt".into() });

        assert_eq!(api.calls(), vec![Call::Download("./a.txt".into(), true)]);
        match &out[0] {
            IoResponse::Peeked { result: Ok(text), .. } => assert_eq!(text, "héllo"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_download_writes_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.bin");
        let api = MockApi::new().with_file("./a.bin", "application/octet-stream", &[1, 2, 3]);

        let out = run(&api, IoRequest::Download { name: "a.bin".into(), path: "./a.bin".into(), dest: dest.clone() });

        assert!(matches!(out[0], IoResponse::Downloaded { result: Ok(()), .. }));
        assert_eq!(api.calls(), vec![Call::Download("./a.bin".into(), false)]);
        assert_eq!(std::fs::read(dest).unwrap(), vec![1, 2, 3]);
    }
}
