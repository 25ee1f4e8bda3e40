use std::net::{Ipv4Addr, SocketAddrV4};

use nix::ifaddrs::getifaddrs;
use tracing::warn;

/// The host's first non-loopback IPv4 address, for the startup banner only.
pub fn public_ipv4() -> Option<Ipv4Addr> {
    let addrs = match getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            warn!(error = %e, "Failed to list interface addresses");
            return None;
        }
    };

    first_non_loopback(addrs.filter_map(|ifa| {
        ifa.address
            .as_ref()
            .and_then(|addr| addr.as_sockaddr_in())
            .map(|sin| *SocketAddrV4::from(*sin).ip())
    }))
}

pub fn first_non_loopback(addrs: impl IntoIterator<Item = Ipv4Addr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find(|ip| !ip.is_loopback())
}
