//! Wire types and endpoint URLs for the file service.
//!
//! Responses are plain JSON bodies. Search returns an array of
//! [`SearchResult`]; upload returns an object that is only inspected for
//! logging, any parseable JSON body counts as success.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{FormError, Result};

/// Multipart field name, repeated once per uploaded file.
pub const UPLOAD_FIELD: &str = "files";

/// Path segment of the upload endpoint (`POST <base>/upload/`).
pub const UPLOAD_ENDPOINT: &str = "upload";

/// Path segment of the search endpoint (`GET <base>/search/?query=`).
pub const SEARCH_ENDPOINT: &str = "search";

/// Path segment of the download endpoint (`GET <base>/download/<id>`).
pub const DOWNLOAD_ENDPOINT: &str = "download";

/// Opaque identifier of a stored file.
///
/// The service sends integer ids, but nothing here relies on that: the id is
/// only ever rendered back into a download URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for FileId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for FileId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => FileId(n.to_string()),
            RawId::Text(s) => FileId(s),
        })
    }
}

/// A single stored file returned from search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Service-side id, used for the download link
    pub id: FileId,
    /// Name the file had when it was uploaded
    pub original_name: String,
    /// ISO-8601 upload timestamp, rendered in local time
    pub upload_date: String,
}

/// Upload acknowledgement from the service.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

/// One stored file in an [`UploadResponse`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub original_name: String,
    /// Name the service stored the file under
    #[serde(default)]
    pub saved_as: String,
}

/// Decode an upload response body.
///
/// Any JSON value is accepted; bodies that do not have the usual
/// `{message, files}` shape decode to an empty [`UploadResponse`].
///
/// # Errors
/// Returns `FormError::Decode` if the body is not JSON at all.
pub fn parse_upload_body(body: &[u8]) -> Result<UploadResponse> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| FormError::Decode(format!("Upload response is not JSON: {}", e)))?;

    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a search response body (a JSON array of results).
///
/// # Errors
/// Returns `FormError::Decode` if the body is not a JSON array of results.
pub fn parse_search_body(body: &[u8]) -> Result<Vec<SearchResult>> {
    serde_json::from_slice(body)
        .map_err(|e| FormError::Decode(format!("Failed to parse search response: {}", e)))
}

/// Append path segments to a base URL, keeping any base path prefix.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FormError::Config(format!("Server URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `<base>/upload/`
pub fn upload_url(base: &Url) -> Result<Url> {
    endpoint(base, &[UPLOAD_ENDPOINT, ""])
}

/// `<base>/search/?query=<query>`, with the query percent-encoded.
pub fn search_url(base: &Url, query: &str) -> Result<Url> {
    let mut url = endpoint(base, &[SEARCH_ENDPOINT, ""])?;
    url.query_pairs_mut().append_pair("query", query);
    Ok(url)
}

/// `<base>/download/<id>`
pub fn download_url(base: &Url, id: &FileId) -> Result<Url> {
    endpoint(base, &[DOWNLOAD_ENDPOINT, id.as_str()])
}
