//! Client for the remote file service.
//!
//! The service exposes three HTTP endpoints beneath a base URL:
//! `POST upload/` (multipart), `GET search/?query=` (JSON) and
//! `GET download/<id>` (opened in the browser, never fetched here).

pub mod protocol;
pub mod http;

pub use protocol::*;
pub use http::FormClient;
