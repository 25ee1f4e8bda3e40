use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::LISTEN_BACKLOG;
use crate::error::BootstrapError;
use crate::http::connection::Connection;
use crate::resolver::Resolver;

/// The one listening socket of the process.
#[derive(Debug)]
pub struct BoundListener {
    socket: Socket,
    local_addr: SocketAddr,
}

impl BoundListener {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn into_tokio(self) -> io::Result<TcpListener> {
        TcpListener::from_std(self.socket.into())
    }
}

/// Creates, binds and listens on an IPv4 TCP socket.
pub fn bind(addr: SocketAddr) -> Result<BoundListener, BootstrapError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
        .map_err(BootstrapError::Socket)?;

    if let Err(e) = socket.set_reuse_port(true) {
        warn!(error = %e, "Failed to set socket to reuse port");
    }

    socket
        .bind(&addr.into())
        .map_err(|source| BootstrapError::Bind { addr, source })?;
    socket
        .listen(LISTEN_BACKLOG)
        .map_err(|source| BootstrapError::Listen { addr, source })?;
    socket
        .set_nonblocking(true)
        .map_err(BootstrapError::Socket)?;

    let local_addr = socket
        .local_addr()
        .ok()
        .and_then(|a| a.as_socket())
        .unwrap_or(addr);

    Ok(BoundListener { socket, local_addr })
}

/// Accepts connections forever, one task per connection.
pub async fn run(listener: BoundListener, resolver: Resolver) -> anyhow::Result<()> {
    let listener = listener.into_tokio()?;
    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Accept failed");
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let resolver = resolver.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, resolver);
            if let Err(e) = conn.run().await {
                warn!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
