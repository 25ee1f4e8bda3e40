use std::borrow::Cow;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// The only method the server answers.
pub const METHOD_GET: &str = "GET";

/// The only protocol version the server answers.
pub const HTTP_1_1: &str = "HTTP/1.1";

/// A validated request line.
///
/// Headers and body are never parsed; only the first line of the request
/// matters for serving static files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Always `GET` once parsing succeeded
    pub method: String,
    /// Raw path bytes exactly as sent, not URL-decoded
    pub path: Vec<u8>,
    /// Always `HTTP/1.1` once parsing succeeded
    pub version: String,
}

impl Request {
    /// The path as an OS path fragment, byte for byte.
    pub fn os_path(&self) -> &OsStr {
        OsStr::from_bytes(&self.path)
    }

    /// Lossy rendering of the path for logs.
    pub fn display_path(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }
}
