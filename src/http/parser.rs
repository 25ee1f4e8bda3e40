use thiserror::Error;

use crate::config::MAX_REQUEST_LINE;
use crate::http::request::{HTTP_1_1, METHOD_GET, Request};
use crate::http::response::StatusCode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line has no space")]
    Malformed,
    #[error("request line too long")]
    LineTooLong,
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ParseError {
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::Malformed | ParseError::LineTooLong => StatusCode::BadRequest,
            ParseError::UnsupportedVersion => StatusCode::HttpVersionNotSupported,
            ParseError::MethodNotAllowed => StatusCode::MethodNotAllowed,
        }
    }
}

/// Cuts the first line out of whatever a single read returned.
///
/// Everything from the first CR, LF or NUL on is discarded. A buffer that filled
/// the whole read window without a line terminator is rejected, since the
/// rest of the line was never received.
pub fn request_line(buf: &[u8]) -> Result<&[u8], ParseError> {
    match buf.iter().position(|&b| matches!(b, b'\r' | b'\n' | 0)) {
        Some(end) => Ok(&buf[..end]),
        None if buf.len() >= MAX_REQUEST_LINE => Err(ParseError::LineTooLong),
        None => Ok(buf),
    }
}

/// Validates a request line as `GET <path> HTTP/1.1`.
///
/// The version is the text after the last space; the path is everything
/// between `GET ` and that space, spaces included.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let split = line
        .iter()
        .rposition(|&b| b == b' ')
        .ok_or(ParseError::Malformed)?;

    if &line[split + 1..] != HTTP_1_1.as_bytes() {
        return Err(ParseError::UnsupportedVersion);
    }

    let path = line[..split]
        .strip_prefix(b"GET ")
        .ok_or(ParseError::MethodNotAllowed)?;

    Ok(Request {
        method: METHOD_GET.to_string(),
        path: path.to_vec(),
        version: HTTP_1_1.to_string(),
    })
}

/// Parses the bytes of a single read into a request.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    parse_request_line(request_line(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_http_request(req).unwrap();

        assert_eq!(parsed.method, "GET");
        assert_eq!(parsed.path, b"/");
        assert_eq!(parsed.version, "HTTP/1.1");
    }

    #[test]
    fn bare_newline_ends_the_line() {
        let parsed = parse_http_request(b"GET /a HTTP/1.1\nHost: x\n\n").unwrap();
        assert_eq!(parsed.path, b"/a");
    }

    #[test]
    fn full_window_without_terminator_is_too_long() {
        let buf = vec![b'a'; MAX_REQUEST_LINE];
        assert_eq!(request_line(&buf), Err(ParseError::LineTooLong));
    }
}
