//! HTTP client for the file service.
//!
//! Stateless apart from the connection pool: every upload and search is an
//! independent request. Download links are only constructed, never fetched.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};

use crate::client::protocol::{
    download_url, parse_search_body, parse_upload_body, search_url, upload_url, FileId,
    SearchResult, UploadResponse, SEARCH_ENDPOINT, UPLOAD_ENDPOINT, UPLOAD_FIELD,
};
use crate::config::ClientConfig;
use crate::ui::selection::SelectedFile;
use crate::{FormError, Result};

/// Client for the upload/search/download endpoints.
#[derive(Clone)]
pub struct FormClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FormClient {
    /// Create a client for the configured server.
    ///
    /// # Errors
    /// Returns error if the server URL is invalid or the HTTP client can't be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.server_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| FormError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    /// Base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upload files as one multipart request, one `files` part per file.
    ///
    /// # Errors
    /// Returns error if a file can't be read, the request fails, the service
    /// answers non-2xx, or the body is not JSON.
    pub async fn upload(&self, files: &[SelectedFile]) -> Result<UploadResponse> {
        let form = build_upload_form(files).await?;
        let url = upload_url(&self.base_url)?;

        tracing::info!("Uploading {} file(s) to {}", files.len(), url);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FormError::Http(format!("Upload request failed: {}", e)))?;

        let body = checked_body(response, UPLOAD_ENDPOINT).await?;
        parse_upload_body(&body)
    }

    /// Search stored files by name. An empty query lists everything.
    ///
    /// # Errors
    /// Returns error if the request fails, the service answers non-2xx, or
    /// the body is not a JSON array of results.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = search_url(&self.base_url, query)?;

        tracing::debug!("Searching {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FormError::Http(format!("Search request failed: {}", e)))?;

        let body = checked_body(response, SEARCH_ENDPOINT).await?;
        parse_search_body(&body)
    }

    /// Direct download link for a stored file.
    pub fn download_url(&self, id: &FileId) -> Result<Url> {
        download_url(&self.base_url, id)
    }
}

/// Read every selected file into a multipart form.
async fn build_upload_form(files: &[SelectedFile]) -> Result<Form> {
    let mut form = Form::new();

    for file in files {
        let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
            FormError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {:?}: {}", file.path, e),
            ))
        })?;

        let part = Part::bytes(bytes).file_name(file.name.clone());
        form = form.part(UPLOAD_FIELD, part);
    }

    Ok(form)
}

/// Reject non-2xx responses, then return the full body.
async fn checked_body(response: Response, endpoint: &str) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        return Err(FormError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FormError::Http(format!("Failed to read {} response: {}", endpoint, e)))?;

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Read one HTTP request (headers plus body) from the socket.
    async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = find(&buf, b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());

            match content_length {
                Some(len) if buf.len() >= end + 4 + len => break,
                Some(_) => continue,
                None if head.contains("transfer-encoding: chunked") => {
                    if buf.ends_with(b"0\r\n\r\n") {
                        break;
                    }
                }
                None => break,
            }
        }

        buf
    }

    /// Serve a single canned response; the handle yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (ClientConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        let config = ClientConfig {
            server_url: format!("http://{}", addr),
            ..ClientConfig::default()
        };
        (config, handle)
    }

    /// Per-test scratch directory, removed by the test when done.
    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("form-upload-client-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn temp_file(dir: &std::path::Path, name: &str, contents: &str) -> SelectedFile {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        SelectedFile::new(path)
    }

    #[tokio::test]
    async fn test_search_parses_results() {
        let (config, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "original_name": "a.pdf", "upload_date": "2024-01-01T00:00:00Z"}]"#,
        )
        .await;
        let client = FormClient::new(&config).unwrap();

        let results = client.search("tax form").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].original_name, "a.pdf");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /search/?query=tax+form HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_search_non_2xx_is_failure() {
        let (config, server) = serve_once("500 Internal Server Error", r#"{"detail": "db locked"}"#).await;
        let client = FormClient::new(&config).unwrap();

        let err = client.search("").await.unwrap_err();
        assert!(matches!(err, FormError::Status { status: 500, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_search_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig {
            server_url: format!("http://{}", addr),
            ..ClientConfig::default()
        };
        let client = FormClient::new(&config).unwrap();
        assert!(matches!(client.search("a").await, Err(FormError::Http(_))));
    }

    #[tokio::test]
    async fn test_upload_repeats_files_field() {
        let (config, server) = serve_once(
            "200 OK",
            r#"{"message": "Files uploaded successfully", "files": []}"#,
        )
        .await;
        let client = FormClient::new(&config).unwrap();
        let dir = scratch_dir("multipart");
        let files = vec![temp_file(&dir, "first.txt", "one"), temp_file(&dir, "second.txt", "two")];

        let response = client.upload(&files).await.unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(response.message.as_deref(), Some("Files uploaded successfully"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /upload/ HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert_eq!(request.matches("name=\"files\"").count(), 2);
        assert!(request.contains("filename=\"first.txt\""));
        assert!(request.contains("filename=\"second.txt\""));
        assert!(request.find("first.txt") < request.find("second.txt"));
    }

    #[tokio::test]
    async fn test_upload_non_json_body_is_failure() {
        let (config, server) = serve_once("200 OK", "Internal Server Error").await;
        let client = FormClient::new(&config).unwrap();
        let dir = scratch_dir("non-json");
        let files = vec![temp_file(&dir, "third.txt", "three")];

        let result = client.upload(&files).await;
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(result, Err(FormError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let client = FormClient::new(&ClientConfig::default()).unwrap();
        let files = vec![SelectedFile::new(PathBuf::from("/nonexistent/form-upload/missing.pdf"))];

        assert!(matches!(client.upload(&files).await, Err(FormError::Io(_))));
    }

    #[test]
    fn test_download_url() {
        let client = FormClient::new(&ClientConfig::default()).unwrap();
        let url = client.download_url(&FileId::from(42)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/download/42");
    }

    #[test]
    fn test_invalid_server_url() {
        let config = ClientConfig {
            server_url: "localhost:8000".to_string(),
            ..ClientConfig::default()
        };
        assert!(FormClient::new(&config).is_err());
    }
}
