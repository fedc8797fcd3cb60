//! Client side of the `/api/v1` file store
//!
//! The browser never talks to the network directly. Everything goes through
//! the [`FileApi`] trait so the session can be driven by the real reqwest
//! client ([`HttpApi`]) or by an in-memory backend in tests.

mod http;
#[cfg(test)]
pub mod mock;
pub mod paths;
mod types;

pub use http::HttpApi;
pub use types::{DirectoryEntry, ListResponse, SimpleResponse};

use thiserror::Error;

/// Error type for file store operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),
    /// Non-2xx status without a readable body
    #[error("Server returned HTTP {0}")]
    Status(u16),
    /// `success: false` payload, carries the server message verbatim
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations offered by the remote file store.
///
/// All paths are the literal concatenation the browser builds
/// (`current_path + "/" + name`), they are never normalized here.
pub trait FileApi: Send + Sync {
    /// `GET ls?path=`
    fn list(&self, path: &str) -> ApiResult<Vec<DirectoryEntry>>;

    /// `GET download?path=&peek=`, returns the raw body
    fn download(&self, path: &str, peek: bool) -> ApiResult<Vec<u8>>;

    /// `PUT upload?path=` with the file contents as body
    fn upload(&self, path: &str, data: Vec<u8>) -> ApiResult<()>;

    /// `PUT mv?from=&to=`
    fn rename(&self, from: &str, to: &str) -> ApiResult<()>;

    /// `PUT cp?from=&to=`
    fn copy(&self, from: &str, to: &str) -> ApiResult<()>;

    /// `PUT mkdir?path=`
    fn mkdir(&self, path: &str) -> ApiResult<()>;

    /// `DELETE rm?path=`
    fn remove_file(&self, path: &str) -> ApiResult<()>;

    /// `DELETE rmdir?path=`
    fn remove_dir(&self, path: &str) -> ApiResult<()>;

    /// URL an external viewer can fetch the file from
    fn file_url(&self, path: &str, peek: bool) -> String;
}
