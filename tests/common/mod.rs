//! Shared test doubles.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::unistd::{Gid, Uid};
use serv::jail::{Credentials, Identity, SUDO_GID, SUDO_UID};

/// Follows the Linux set*id rules for a process without capabilities other
/// than those implied by an effective uid of 0.
#[derive(Debug, Clone)]
pub struct FakeCredentials {
    pub id: Identity,
    pub saved_uid: Uid,
    pub saved_gid: Gid,
    pub groups: Vec<Gid>,
    pub root: Option<PathBuf>,
    pub env: HashMap<String, String>,
    /// setuid leaves the saved uid alone, as a broken drop would
    pub keep_saved_uid: bool,
}

impl FakeCredentials {
    pub fn new(uid: u32, euid: u32, gid: u32, egid: u32) -> Self {
        Self {
            id: Identity {
                uid: Uid::from_raw(uid),
                euid: Uid::from_raw(euid),
                gid: Gid::from_raw(gid),
                egid: Gid::from_raw(egid),
            },
            saved_uid: Uid::from_raw(euid),
            saved_gid: Gid::from_raw(egid),
            groups: vec![Gid::from_raw(0), Gid::from_raw(4)],
            root: None,
            env: HashMap::new(),
            keep_saved_uid: false,
        }
    }

    /// Started by `sudo` from uid 1000, gid 100.
    pub fn sudo() -> Self {
        Self::new(0, 0, 0, 0)
            .with_env(SUDO_UID, "1000")
            .with_env(SUDO_GID, "100")
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    fn privileged(&self) -> bool {
        self.id.euid.is_root()
    }
}

impl Credentials for FakeCredentials {
    fn identity(&self) -> Identity {
        self.id
    }

    fn var(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }

    fn chroot(&mut self, root: &Path) -> nix::Result<()> {
        if !self.privileged() {
            return Err(Errno::EPERM);
        }
        self.root = Some(root.to_path_buf());
        Ok(())
    }

    fn setgroups(&mut self, groups: &[Gid]) -> nix::Result<()> {
        if !self.privileged() {
            return Err(Errno::EPERM);
        }
        self.groups = groups.to_vec();
        Ok(())
    }

    fn setgid(&mut self, gid: Gid) -> nix::Result<()> {
        if self.privileged() {
            self.id.gid = gid;
            self.id.egid = gid;
            self.saved_gid = gid;
        } else if gid == self.id.gid || gid == self.saved_gid {
            self.id.egid = gid;
        } else {
            return Err(Errno::EPERM);
        }
        Ok(())
    }

    fn setuid(&mut self, uid: Uid) -> nix::Result<()> {
        if self.privileged() {
            self.id.uid = uid;
            self.id.euid = uid;
            if !self.keep_saved_uid {
                self.saved_uid = uid;
            }
        } else if uid == self.id.uid || uid == self.saved_uid {
            self.id.euid = uid;
        } else {
            return Err(Errno::EPERM);
        }
        Ok(())
    }

    fn setegid(&mut self, gid: Gid) -> nix::Result<()> {
        if self.privileged()
            || gid == self.id.gid
            || gid == self.id.egid
            || gid == self.saved_gid
        {
            self.id.egid = gid;
            Ok(())
        } else {
            Err(Errno::EPERM)
        }
    }

    fn seteuid(&mut self, uid: Uid) -> nix::Result<()> {
        if self.privileged()
            || uid == self.id.uid
            || uid == self.id.euid
            || uid == self.saved_uid
        {
            self.id.euid = uid;
            Ok(())
        } else {
            Err(Errno::EPERM)
        }
    }
}
