use bytes::Bytes;

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): file found and sent
/// - `BadRequest` (400): no space in the request line, or the line is too long
/// - `NotFound` (404): no regular file at the path or its index fallback
/// - `MethodNotAllowed` (405): anything other than `GET`
/// - `InternalServerError` (500): file too large or unreadable
/// - `HttpVersionNotSupported` (505): version token other than `HTTP/1.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use serv::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use serv::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
///
/// Only two shapes exist: a 200 carrying `Content-Length` and the file bytes,
/// or a bare status line with no headers and no body.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in emission order
    pub headers: Vec<(&'static str, String)>,
    /// Response body as bytes
    pub body: Bytes,
}

impl Response {
    /// Creates a 200 OK response carrying the whole file.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            status: StatusCode::Ok,
            headers: vec![("Content-Length", body.len().to_string())],
            body,
        }
    }

    /// Creates an error response: status line only.
    pub fn error(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
