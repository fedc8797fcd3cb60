//! reqwest-backed implementation of [`FileApi`]

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::debug;

use super::paths::encode_query_value;
use super::{ApiError, ApiResult, DirectoryEntry, FileApi, ListResponse, SimpleResponse};

/// Blocking HTTP client for one file store
pub struct HttpApi {
    client: Client,
    base_url: String,
    /// Percent-encode query values instead of concatenating them verbatim
    escape_paths: bool,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration, escape_paths: bool) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            escape_paths,
        })
    }

    /// Full URL of an endpoint with its query string
    pub fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| {
                if self.escape_paths {
                    format!("{}={}", key, encode_query_value(value))
                } else {
                    format!("{}={}", key, value)
                }
            })
            .collect();
        format!("{}/api/v1/{}?{}", self.base_url, name, query.join("&"))
    }

    fn send(&self, request: RequestBuilder, what: &str) -> ApiResult<Response> {
        request
            .send()
            .map_err(|e| ApiError::Transport(format!("{} failed: {}", what, e)))
    }

    fn simple(&self, request: RequestBuilder, what: &str) -> ApiResult<()> {
        let response = self.send(request, what)?;
        let status = response.status();
        let body = read_body(response)?;

        match serde_json::from_slice::<SimpleResponse>(&body) {
            Ok(reply) if reply.success => Ok(()),
            Ok(reply) => Err(rejected(reply.message, status)),
            Err(_) if !status.is_success() => Err(ApiError::Status(status.as_u16())),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }
}

fn read_body(response: Response) -> ApiResult<Vec<u8>> {
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| ApiError::Transport(format!("Failed to read response: {}", e)))
}

fn rejected(message: String, status: StatusCode) -> ApiError {
    if message.trim().is_empty() {
        ApiError::Rejected(format!("Request rejected (HTTP {})", status.as_u16()))
    } else {
        ApiError::Rejected(message)
    }
}

impl FileApi for HttpApi {
    fn list(&self, path: &str) -> ApiResult<Vec<DirectoryEntry>> {
        let url = self.endpoint("ls", &[("path", path)]);
        debug!(%url, "GET ls");
        let response = self.send(self.client.get(&url), "Listing")?;
        let status = response.status();
        let body = read_body(response)?;

        match serde_json::from_slice::<ListResponse>(&body) {
            Ok(reply) if reply.success => Ok(reply.files),
            Ok(reply) => Err(rejected(reply.message, status)),
            Err(_) if !status.is_success() => Err(ApiError::Status(status.as_u16())),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    fn download(&self, path: &str, peek: bool) -> ApiResult<Vec<u8>> {
        let url = self.file_url(path, peek);
        debug!(%url, "GET download");
        let response = self.send(self.client.get(&url), "Download")?;
        let status = response.status();
        let body = read_body(response)?;

        if status.is_success() {
            return Ok(body);
        }
        if let Ok(reply) = serde_json::from_slice::<SimpleResponse>(&body) {
            return Err(rejected(reply.message, status));
        }
        let text = String::from_utf8_lossy(&body);
        if text.trim().is_empty() {
            Err(ApiError::Status(status.as_u16()))
        } else {
            Err(ApiError::Rejected(text.trim().to_string()))
        }
    }

    fn upload(&self, path: &str, data: Vec<u8>) -> ApiResult<()> {
        let url = self.endpoint("upload", &[("path", path)]);
        debug!(%url, bytes = data.len(), "PUT upload");
        let request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data);
        self.simple(request, "Upload")
    }

    fn rename(&self, from: &str, to: &str) -> ApiResult<()> {
        let url = self.endpoint("mv", &[("from", from), ("to", to)]);
        debug!(%url, "PUT mv");
        self.simple(self.client.put(&url), "Rename")
    }

    fn copy(&self, from: &str, to: &str) -> ApiResult<()> {
        let url = self.endpoint("cp", &[("from", from), ("to", to)]);
        debug!(%url, "PUT cp");
        self.simple(self.client.put(&url), "Copy")
    }

    fn mkdir(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint("mkdir", &[("path", path)]);
        debug!(%url, "PUT mkdir");
        self.simple(self.client.put(&url), "Create folder")
    }

    fn remove_file(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint("rm", &[("path", path)]);
        debug!(%url, "DELETE rm");
        self.simple(self.client.delete(&url), "Delete")
    }

    fn remove_dir(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint("rmdir", &[("path", path)]);
        debug!(%url, "DELETE rmdir");
        self.simple(self.client.delete(&url), "Delete folder")
    }

    fn file_url(&self, path: &str, peek: bool) -> String {
        let peek = if peek { "true" } else { "false" };
        self.endpoint("download", &[("path", path), ("peek", peek)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{Method, StatusCode as AxumStatus, Uri};
    use axum::Router;

    /// A request as seen by the stub server
    #[derive(Debug, Clone)]
    struct Seen {
        method: String,
        uri: String,
        body: Vec<u8>,
    }

    type Reply = fn(&str, &str) -> (u16, String);

    #[derive(Clone)]
    struct Stub {
        seen: Arc<Mutex<Vec<Seen>>>,
        reply: Reply,
    }

    async fn handle(State(stub): State<Stub>, method: Method, uri: Uri, body: Bytes) -> (AxumStatus, String) {
        let query = uri.query().unwrap_or("").to_string();
        stub.seen.lock().unwrap().push(Seen {
            method: method.to_string(),
            uri: uri.to_string(),
            body: body.to_vec(),
        });
        let (code, text) = (stub.reply)(uri.path(), &query);
        (AxumStatus::from_u16(code).unwrap(), text)
    }

    /// Start a stub server on a background runtime, returns its base URL
    fn spawn_stub(reply: Reply) -> (String, Arc<Mutex<Vec<Seen>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stub = Stub { seen: Arc::clone(&seen), reply };

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new().fallback(handle).with_state(stub);
                axum::serve(listener, app).await.unwrap();
            });
        });

        (format!("http://{}", addr), seen)
    }

    fn client(base: &str, escape: bool) -> HttpApi {
        HttpApi::new(base, Duration::from_secs(5), escape).unwrap()
    }

    fn ok_reply(path: &str, _query: &str) -> (u16, String) {
        match path {
            "/api/v1/ls" => (
                200,
                r#"{"success":true,"message":"","files":[{"name":"a.txt","is_dir":false,"mime":"text/plain","size":3},{"name":"sub","is_dir":true,"mime":null}]}"#.to_string(),
            ),
            "/api/v1/download" => (200, "abc".to_string()),
            _ => (200, r#"{"success":true,"message":"ok"}"#.to_string()),
        }
    }

    fn failing_reply(path: &str, _query: &str) -> (u16, String) {
        match path {
            "/api/v1/ls" => (404, r#"{"success":false,"message":"Path not found"}"#.to_string()),
            "/api/v1/download" => (404, "File not found".to_string()),
            "/api/v1/mkdir" => (500, String::new()),
            _ => (200, r#"{"success":false,"message":"Destination exists"}"#.to_string()),
        }
    }

    #[test]
    fn test_endpoint_literal() {
        let api = client("http://host:8080/", false);
        assert_eq!(
            api.endpoint("mv", &[("from", "./a b"), ("to", "./c&d")]),
            "http://host:8080/api/v1/mv?from=./a b&to=./c&d"
        );
    }

    #[test]
    fn test_endpoint_escaped() {
        let api = client("http://host:8080", true);
        assert_eq!(
            api.endpoint("mv", &[("from", "./a b"), ("to", "./c&d")]),
            "http://host:8080/api/v1/mv?from=.%2Fa%20b&to=.%2Fc%26d"
        );
    }

    #[test]
    fn test_file_url() {
        let api = client("http://host", false);
        assert_eq!(api.file_url("./a.png", true), "http://host/api/v1/download?path=./a.png&peek=true");
    }

    #[test]
    fn test_list_parses_entries() {
        let (base, seen) = spawn_stub(ok_reply);
        let api = client(&base, false);

        let files = api.list(".").unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], DirectoryEntry::file("a.txt", "text/plain", 3));
        assert!(files[1].is_dir);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, "GET");
        assert_eq!(seen[0].uri, "/api/v1/ls?path=.");
    }

    #[test]
    fn test_list_rejected_message() {
        let (base, _) = spawn_stub(failing_reply);
        let api = client(&base, false);

        match api.list("./missing") {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Path not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_upload_sends_body() {
        let (base, seen) = spawn_stub(ok_reply);
        let api = client(&base, false);

        api.upload("./notes.txt", b"hello".to_vec()).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, "PUT");
        assert_eq!(seen[0].uri, "/api/v1/upload?path=./notes.txt");
        assert_eq!(seen[0].body, b"hello");
    }

    #[test]
    fn test_mutations_use_expected_routes() {
        let (base, seen) = spawn_stub(ok_reply);
        let api = client(&base, false);

        api.rename("./a", "./b").unwrap();
        api.copy("./a", "./c").unwrap();
        api.mkdir("./new").unwrap();
        api.remove_file("./a").unwrap();
        api.remove_dir("./sub").unwrap();

        let seen = seen.lock().unwrap();
        let calls: Vec<(String, String)> = seen.iter().map(|s| (s.method.clone(), s.uri.clone())).collect();
        assert_eq!(
            calls,
            vec![
                ("PUT".to_string(), "/api/v1/mv?from=./a&to=./b".to_string()),
                ("PUT".to_string(), "/api/v1/cp?from=./a&to=./c".to_string()),
                ("PUT".to_string(), "/api/v1/mkdir?path=./new".to_string()),
                ("DELETE".to_string(), "/api/v1/rm?path=./a".to_string()),
                ("DELETE".to_string(), "/api/v1/rmdir?path=./sub".to_string()),
            ]
        );
    }

    #[test]
    fn test_literal_query_splits_on_ampersand() {
        let (base, seen) = spawn_stub(ok_reply);

        client(&base, false).mkdir("./x&y").unwrap();
        client(&base, true).mkdir("./x&y").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].uri, "/api/v1/mkdir?path=./x&y");
        assert_eq!(seen[1].uri, "/api/v1/mkdir?path=.%2Fx%26y");
    }

    #[test]
    fn test_download_and_peek() {
        let (base, seen) = spawn_stub(ok_reply);
        let api = client(&base, false);

        assert_eq!(api.download("./a.txt", true).unwrap(), b"abc");
        assert_eq!(seen.lock().unwrap()[0].uri, "/api/v1/download?path=./a.txt&peek=true");
    }

    #[test]
    fn test_failures() {
        let (base, _) = spawn_stub(failing_reply);
        let api = client(&base, false);

        match api.download("./gone", false) {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "File not found"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(api.mkdir("./x"), Err(ApiError::Status(500))));
        match api.rename("./a", "./b") {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Destination exists"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_transport_error() {
        // Bind and drop to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let api = client(&format!("http://127.0.0.1:{}", port), false);
        assert!(matches!(api.list("."), Err(ApiError::Transport(_))));
    }
}
