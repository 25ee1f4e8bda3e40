use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

use clap::Parser;

/// Largest request line accepted, read in a single call.
pub const MAX_REQUEST_LINE: usize = 1024;

/// Largest file the server will load into memory and send.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Pending connection queue length passed to `listen`.
pub const LISTEN_BACKLOG: i32 = 10;

/// File served when a request names a directory.
pub const INDEX_FILE: &str = "index.html";

pub const DEFAULT_PORT: u16 = 80;

#[derive(Parser, Debug)]
#[command(name = "serv", version)]
#[command(about = "Serve a directory over HTTP/1.1 from inside a chroot jail", long_about = None)]
struct Cli {
    /// Directory to serve; becomes the root of the jail
    path: PathBuf,

    /// Specify the listening port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Expose the server to the external network
    #[arg(long)]
    host: bool,
}

/// Startup settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root_path: PathBuf,
    pub port: u16,
    pub expose_network: bool,
}

impl ServerConfig {
    /// Builds the configuration from a full argument list (program name first).
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;

        Ok(Self {
            root_path: cli.path,
            port: cli.port,
            expose_network: cli.host,
        })
    }

    /// Loopback unless the network is exposed, then the wildcard address.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = if self.expose_network {
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        SocketAddr::V4(SocketAddrV4::new(ip, self.port))
    }
}
