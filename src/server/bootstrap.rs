//! Startup sequence.
//!
//! Order matters: the serve directory is resolved and the socket bound while
//! the ordinary filesystem view is still available, then the process is
//! jailed, then privileges are dropped. Any failure is fatal.

use std::path::PathBuf;

use crate::config::ServerConfig;
use crate::console::Banner;
use crate::error::BootstrapError;
use crate::jail::{Credentials, Jail};
use crate::server::address;
use crate::server::listener::{self, BoundListener};

/// A bound, jailed, unprivileged server ready to accept.
#[derive(Debug)]
pub struct Bootstrapped {
    pub listener: BoundListener,
    pub banner: Banner,
}

pub fn bootstrap<C: Credentials>(
    cfg: &ServerConfig,
    creds: C,
) -> Result<Bootstrapped, BootstrapError> {
    std::env::set_current_dir(&cfg.root_path).map_err(|source| {
        BootstrapError::ServeDirectory {
            path: cfg.root_path.clone(),
            source,
        }
    })?;
    let real_cwd = current_dir()?;

    let listener = listener::bind(cfg.bind_addr())?;

    let mut jail = Jail::new(creds);
    let identity = jail.lock_down(&real_cwd)?;

    let jail_cwd = current_dir()?;
    let public_ip = if cfg.expose_network {
        address::public_ipv4()
    } else {
        None
    };

    Ok(Bootstrapped {
        listener,
        banner: Banner {
            port: cfg.port,
            expose_network: cfg.expose_network,
            public_ip,
            identity,
            real_cwd,
            jail_cwd,
        },
    })
}

fn current_dir() -> Result<PathBuf, BootstrapError> {
    std::env::current_dir().map_err(|source| BootstrapError::ServeDirectory {
        path: PathBuf::from("."),
        source,
    })
}
