//! HTTP content store.
//!
//! Fetches `GET {base_url}/pages/{id}.md` with a synchronous `ureq` agent.

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use ureq::Agent;

use crate::store::{ContentStore, PageId, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Http";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Characters escaped when a page id is placed in a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Content store served over HTTP.
pub struct HttpStore {
    agent: Agent,
    base_url: String,
}

impl HttpStore {
    /// Create a store for the site rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create a store with a custom request timeout.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Full URL of a page's markdown.
    fn page_url(&self, page: &PageId) -> String {
        format!(
            "{}/pages/{}.md",
            self.base_url,
            utf8_percent_encode(page.as_str(), SEGMENT)
        )
    }
}

impl ContentStore for HttpStore {
    fn fetch(&self, page: &PageId) -> Result<String, StorageError> {
        let url = self.page_url(page);
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| transport_error(e, page))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(StorageError::fetching(status_kind(status), BACKEND, page));
        }

        let mut body = response.into_body();
        body.read_to_string().map_err(|e| transport_error(e, page))
    }
}

fn status_kind(status: u16) -> StorageErrorKind {
    match status {
        404 => StorageErrorKind::NotFound,
        code => StorageErrorKind::Status(code),
    }
}

/// Map a `ureq` failure to a storage error. The source carries the URL.
fn transport_error(err: ureq::Error, page: &PageId) -> StorageError {
    let kind = match &err {
        ureq::Error::Timeout(_) => StorageErrorKind::Timeout,
        ureq::Error::StatusCode(code) => status_kind(*code),
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed | ureq::Error::Io(_) => {
            StorageErrorKind::Unavailable
        }
        _ => StorageErrorKind::Other,
    };
    StorageError::fetching(kind, BACKEND, page).with_source(err)
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serve one canned HTTP response on a random local port.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request_line = String::new();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            reader.read_line(&mut request_line).unwrap();
            // Drain headers
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            request_line
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_page_url_trims_trailing_slash() {
        let store = HttpStore::new("http://localhost:8080/");
        assert_eq!(
            store.page_url(&PageId::new("quickstart")),
            "http://localhost:8080/pages/quickstart.md"
        );
    }

    #[test]
    fn test_page_url_encodes_segment() {
        let store = HttpStore::new("http://localhost:8080");
        assert_eq!(
            store.page_url(&PageId::new("a b?c")),
            "http://localhost:8080/pages/a%20b%3Fc.md"
        );
    }

    #[test]
    fn test_fetch_success_returns_body() {
        let (base, server) = serve_once("200 OK", "# Hi\n");
        let store = HttpStore::new(&base);

        let content = store.fetch(&PageId::new("quickstart")).unwrap();

        assert_eq!(content, "# Hi\n");
        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /pages/quickstart.md "));
    }

    #[test]
    fn test_fetch_404_is_not_found() {
        let (base, server) = serve_once("404 Not Found", "");
        let store = HttpStore::new(&base);

        let err = store.fetch(&PageId::new("missing")).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Http"));
        assert_eq!(err.page, Some(PageId::new("missing")));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_server_error_is_distinct_from_not_found() {
        let (base, server) = serve_once("500 Internal Server Error", "boom");
        let store = HttpStore::new(&base);

        let err = store.fetch(&PageId::new("quickstart")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::Status(500));
        assert_eq!(err.to_string(), "[Http] page `quickstart`: HTTP status 500");
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_connection_refused_is_unavailable() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let store = HttpStore::with_timeout(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2));

        let err = store.fetch(&PageId::new("quickstart")).unwrap_err();

        assert!(!err.is_not_found());
    }
}
