//! Startup banner and per-request status lines.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::http::response::StatusCode;
use crate::jail::Identity;

/// What the operator sees once the server is jailed and unprivileged.
#[derive(Debug, Clone)]
pub struct Banner {
    pub port: u16,
    pub expose_network: bool,
    /// Only looked up when the network is exposed
    pub public_ip: Option<Ipv4Addr>,
    pub identity: Identity,
    pub real_cwd: PathBuf,
    pub jail_cwd: PathBuf,
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, " ┃ Local      http://localhost:{}/", self.port)?;
        match (self.expose_network, self.public_ip) {
            (true, Some(ip)) => writeln!(f, " ┃ Network    http://{}:{}/", ip, self.port)?,
            (true, None) => writeln!(f, " ┃ Network    error")?,
            (false, _) => writeln!(f, " ┃ Network    use --host to expose")?,
        }
        writeln!(
            f,
            " ┃ User id    (real {}) (effective {})",
            self.identity.uid, self.identity.euid
        )?;
        writeln!(
            f,
            " ┃ Group id   (real {}) (effective {})",
            self.identity.gid, self.identity.egid
        )?;
        writeln!(f, " ┃ Real cwd   {}", self.real_cwd.display())?;
        writeln!(f, " ┃ Jail cwd   {}", self.jail_cwd.display())
    }
}

pub fn print_banner(banner: &Banner) {
    println!("{banner}");
}

/// Logs the outcome of one request before its response is written.
pub fn log_status(status: StatusCode, request_line: &str) {
    let code = status.as_u16();
    if code < 400 {
        info!(status = code, request = %request_line, "{}", status.reason_phrase());
    } else {
        warn!(status = code, request = %request_line, "{}", status.reason_phrase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::unistd::{Gid, Uid};

    fn banner(expose_network: bool, public_ip: Option<Ipv4Addr>) -> Banner {
        Banner {
            port: 8080,
            expose_network,
            public_ip,
            identity: Identity {
                uid: Uid::from_raw(1000),
                euid: Uid::from_raw(1000),
                gid: Gid::from_raw(100),
                egid: Gid::from_raw(100),
            },
            real_cwd: PathBuf::from("/home/me/site"),
            jail_cwd: PathBuf::from("/"),
        }
    }

    #[test]
    fn loopback_banner_hints_at_host_flag() {
        let text = banner(false, None).to_string();
        assert!(text.contains("http://localhost:8080/"));
        assert!(text.contains("use --host to expose"));
        assert!(text.contains("(real 1000) (effective 1000)"));
        assert!(text.contains("/home/me/site"));
    }

    #[test]
    fn exposed_banner_shows_network_url() {
        let text = banner(true, Some(Ipv4Addr::new(192, 168, 1, 20))).to_string();
        assert!(text.contains("http://192.168.1.20:8080/"));
    }

    #[test]
    fn exposed_banner_without_address_reports_error() {
        let text = banner(true, None).to_string();
        assert!(text.contains("Network    error"));
    }
}
