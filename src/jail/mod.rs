//! Privilege jail bootstrap.
//!
//! The process confines itself to the served directory and then gives up
//! root for the identity that invoked it through sudo. The steps form a
//! one-way state machine:
//!
//! ```text
//!   Privileged ──enter──▶ Jailed ──drop_privileges──▶ Unprivileged ──verify──▶ Verified
//!        │                  │                              │
//!        └──────────────────┴──────────── any failure ─────┴──────▶ Aborted
//! ```
//!
//! `Aborted` is terminal; no step can be retried from it. All OS access goes
//! through [`Credentials`] so the sequence can be driven against a simulated
//! identity.

pub mod system;

use std::path::Path;

use nix::unistd::{Gid, Uid};
use tracing::{debug, info};

use crate::error::BootstrapError;

pub use system::SystemCredentials;

/// The id that grants elevated rights for both users and groups.
pub const PRIVILEGED_ID: u32 = 0;

/// Group the process was started from, set by sudo.
pub const SUDO_GID: &str = "SUDO_GID";

/// User the process was started from, set by sudo.
pub const SUDO_UID: &str = "SUDO_UID";

/// Real and effective user and group ids of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub uid: Uid,
    pub euid: Uid,
    pub gid: Gid,
    pub egid: Gid,
}

impl Identity {
    /// Name of the first id field that is still privileged, if any.
    pub fn residual_privilege(&self) -> Option<&'static str> {
        if self.uid.as_raw() == PRIVILEGED_ID {
            Some("real user id")
        } else if self.euid.as_raw() == PRIVILEGED_ID {
            Some("effective user id")
        } else if self.gid.as_raw() == PRIVILEGED_ID {
            Some("real group id")
        } else if self.egid.as_raw() == PRIVILEGED_ID {
            Some("effective group id")
        } else {
            None
        }
    }
}

/// The process-identity operations the jail needs.
pub trait Credentials {
    fn identity(&self) -> Identity;

    /// Environment lookup; `None` when unset or not unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Changes the filesystem root and moves the working directory to it.
    fn chroot(&mut self, root: &Path) -> nix::Result<()>;

    fn setgroups(&mut self, groups: &[Gid]) -> nix::Result<()>;
    fn setgid(&mut self, gid: Gid) -> nix::Result<()>;
    fn setuid(&mut self, uid: Uid) -> nix::Result<()>;
    fn setegid(&mut self, gid: Gid) -> nix::Result<()>;
    fn seteuid(&mut self, uid: Uid) -> nix::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JailState {
    Privileged,
    Jailed,
    Unprivileged,
    Verified,
    Aborted,
}

pub struct Jail<C> {
    creds: C,
    state: JailState,
}

impl<C: Credentials> Jail<C> {
    pub fn new(creds: C) -> Self {
        Self {
            creds,
            state: JailState::Privileged,
        }
    }

    pub fn state(&self) -> JailState {
        self.state
    }

    pub fn credentials(&self) -> &C {
        &self.creds
    }

    /// Runs every step in order and returns the final identity.
    pub fn lock_down(&mut self, root: &Path) -> Result<Identity, BootstrapError> {
        self.enter(root)?;
        self.drop_privileges()?;
        self.verify()
    }

    /// Confines the filesystem root. Must run while still privileged.
    pub fn enter(&mut self, root: &Path) -> Result<(), BootstrapError> {
        self.advance(JailState::Privileged, JailState::Jailed, |creds| {
            creds.chroot(root).map_err(|source| BootstrapError::Jail {
                root: root.to_path_buf(),
                source,
            })?;
            info!(root = %root.display(), "Entered chroot jail");
            Ok(())
        })
    }

    /// Switches group then user to the ids sudo recorded.
    pub fn drop_privileges(&mut self) -> Result<(), BootstrapError> {
        self.advance(JailState::Jailed, JailState::Unprivileged, |creds| {
            if creds.identity().gid.as_raw() == PRIVILEGED_ID {
                let gid = Gid::from_raw(sudo_id(creds, SUDO_GID)?);
                creds.setgid(gid).map_err(|source| BootstrapError::SetId {
                    call: "setgid",
                    id: gid.as_raw(),
                    source,
                })?;
                debug!(%gid, "Dropped group id");
            }

            if creds.identity().uid.as_raw() == PRIVILEGED_ID {
                let uid = Uid::from_raw(sudo_id(creds, SUDO_UID)?);

                // Only root may reset supplementary groups, so do it before setuid.
                let gid = creds.identity().gid;
                creds
                    .setgroups(&[gid])
                    .map_err(|source| BootstrapError::SetId {
                        call: "setgroups",
                        id: gid.as_raw(),
                        source,
                    })?;

                creds.setuid(uid).map_err(|source| BootstrapError::SetId {
                    call: "setuid",
                    id: uid.as_raw(),
                    source,
                })?;
                debug!(%uid, "Dropped user id");
            }

            Ok(())
        })
    }

    /// Confirms no id is privileged and none of the set*id calls can restore it.
    pub fn verify(&mut self) -> Result<Identity, BootstrapError> {
        self.advance(JailState::Unprivileged, JailState::Verified, |creds| {
            let identity = creds.identity();
            if let Some(field) = identity.residual_privilege() {
                return Err(BootstrapError::ResidualPrivilege(field));
            }

            let root_uid = Uid::from_raw(PRIVILEGED_ID);
            let root_gid = Gid::from_raw(PRIVILEGED_ID);

            if creds.setuid(root_uid).is_ok() {
                return Err(BootstrapError::Regainable("setuid"));
            }
            if creds.seteuid(root_uid).is_ok() {
                return Err(BootstrapError::Regainable("seteuid"));
            }
            if creds.setgid(root_gid).is_ok() {
                return Err(BootstrapError::Regainable("setgid"));
            }
            if creds.setegid(root_gid).is_ok() {
                return Err(BootstrapError::Regainable("setegid"));
            }

            info!(uid = %identity.uid, gid = %identity.gid, "Privileges dropped");
            Ok(identity)
        })
    }

    fn advance<T>(
        &mut self,
        expected: JailState,
        next: JailState,
        step: impl FnOnce(&mut C) -> Result<T, BootstrapError>,
    ) -> Result<T, BootstrapError> {
        if self.state != expected {
            let actual = self.state;
            self.state = JailState::Aborted;
            return Err(BootstrapError::OutOfOrder { expected, actual });
        }

        match step(&mut self.creds) {
            Ok(value) => {
                self.state = next;
                Ok(value)
            }
            Err(e) => {
                self.state = JailState::Aborted;
                Err(e)
            }
        }
    }
}

fn sudo_id<C: Credentials>(creds: &C, var: &'static str) -> Result<u32, BootstrapError> {
    let value = creds.var(var).ok_or(BootstrapError::MissingEnv(var))?;
    value
        .parse()
        .map_err(|_| BootstrapError::InvalidEnv { var, value })
}
