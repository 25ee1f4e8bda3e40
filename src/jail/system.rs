use std::path::Path;

use nix::unistd::{self, Gid, Uid};

use super::{Credentials, Identity};

/// The real process identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCredentials;

impl Credentials for SystemCredentials {
    fn identity(&self) -> Identity {
        Identity {
            uid: unistd::getuid(),
            euid: unistd::geteuid(),
            gid: unistd::getgid(),
            egid: unistd::getegid(),
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn chroot(&mut self, root: &Path) -> nix::Result<()> {
        unistd::chroot(root)?;
        unistd::chdir("/")
    }

    fn setgroups(&mut self, groups: &[Gid]) -> nix::Result<()> {
        unistd::setgroups(groups)
    }

    fn setgid(&mut self, gid: Gid) -> nix::Result<()> {
        unistd::setgid(gid)
    }

    fn setuid(&mut self, uid: Uid) -> nix::Result<()> {
        unistd::setuid(uid)
    }

    fn setegid(&mut self, gid: Gid) -> nix::Result<()> {
        unistd::setegid(gid)
    }

    fn seteuid(&mut self, uid: Uid) -> nix::Result<()> {
        unistd::seteuid(uid)
    }
}
