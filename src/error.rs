//! Error channels.
//!
//! `BootstrapError` is fatal: it ends the process before any request is served.
//! `RequestError` stays inside one connection and becomes an HTTP status.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;
use crate::jail::JailState;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to enter serve directory {path}")]
    ServeDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create listening socket")]
    Socket(#[source] io::Error),

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on {addr}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to create chroot jail at {root}")]
    Jail {
        root: PathBuf,
        #[source]
        source: Errno,
    },

    #[error("failed to getenv `{0}`")]
    MissingEnv(&'static str),

    #[error("`{var}` is not a numeric id: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("failed to {call}({id})")]
    SetId {
        call: &'static str,
        id: u32,
        #[source]
        source: Errno,
    },

    #[error("failed to drop privileges: {0} is still privileged")]
    ResidualPrivilege(&'static str),

    #[error("failed to drop privileges: {0}(0) succeeded")]
    Regainable(&'static str),

    #[error("jail step expected state {expected:?} but was {actual:?}")]
    OutOfOrder {
        expected: JailState,
        actual: JailState,
    },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no regular file at requested path")]
    NotFound,

    #[error("file is {size} bytes, limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("failed to read file")]
    Read(#[source] io::Error),
}

impl RequestError {
    /// Status code the client receives for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Parse(e) => e.status(),
            RequestError::NotFound => StatusCode::NotFound,
            RequestError::TooLarge { .. } | RequestError::Read(_) => {
                StatusCode::InternalServerError
            }
        }
    }
}
