use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::MAX_REQUEST_LINE;
use crate::console::log_status;
use crate::error::RequestError;
use crate::http::parser::{parse_http_request, request_line};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::resolver::Resolver;

/// How long a client may take to send its request line.
pub const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Connection<S> {
    stream: S,
    resolver: Resolver,
    read_timeout: Duration,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Vec<u8>),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Resolver) -> Self {
        Self {
            stream,
            resolver,
            read_timeout: REQUEST_READ_TIMEOUT,
            state: ConnectionState::Reading,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Serves exactly one request. The stream is dropped, and so closed,
    /// when the connection is.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(buf) => ConnectionState::Processing(buf),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(buf) => {
                    let response = handle_request(&self.resolver, &buf).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// One read, at most `MAX_REQUEST_LINE` bytes. Split or oversized request
    /// lines are not reassembled.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; MAX_REQUEST_LINE];

        let n = match timeout(self.read_timeout, self.stream.read(&mut buf)).await {
            Ok(read) => read?,
            Err(_) => {
                warn!("Timed out waiting for request line");
                return Ok(None);
            }
        };

        buf.truncate(n);
        Ok(Some(buf))
    }
}

/// Parses, resolves and builds the response for one read's worth of bytes.
pub async fn handle_request(resolver: &Resolver, buf: &[u8]) -> Response {
    let line = request_line(buf).unwrap_or(buf);

    let response = match serve(resolver, buf).await {
        Ok(body) => Response::ok(body),
        Err(e) => {
            debug!(error = %e, "Request failed");
            Response::error(e.status())
        }
    };

    log_status(response.status, &String::from_utf8_lossy(line));
    response
}

async fn serve(resolver: &Resolver, buf: &[u8]) -> Result<Bytes, RequestError> {
    let request = parse_http_request(buf)?;
    resolver.fetch(&request.path).await
}
