//! Maps request paths to regular files under the document root.
//!
//! In production the root is `/` and the process is already chrooted, so the
//! kernel is what keeps lookups inside the served directory. Path segments are
//! handed to the kernel as given, `.` and `..` included, so a `..` after a
//! missing name or a regular file fails the stat. The only segment dropped is
//! a `..` that would climb above the root, which keeps unjailed roots
//! confined too.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use bytes::Bytes;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::config::{INDEX_FILE, MAX_FILE_SIZE};
use crate::error::RequestError;

/// A regular file a request path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    max_file_size: u64,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Resolver for a process whose filesystem root is the served directory.
    pub fn jailed() -> Self {
        Self::new("/")
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Filesystem path a raw request path names under the root.
    pub fn candidate(&self, raw_path: &[u8]) -> PathBuf {
        let mut path = self.root.clone();
        let mut depth = 0usize;

        for segment in raw_path.split(|&b| b == b'/') {
            match segment {
                b"" => {}
                b"." => path.push("."),
                b".." if depth == 0 => {}
                b".." => {
                    path.push("..");
                    depth -= 1;
                }
                name => {
                    path.push(OsStr::from_bytes(name));
                    depth += 1;
                }
            }
        }

        path
    }

    /// Finds the file for a request path, falling back to its `index.html`.
    pub async fn resolve(&self, raw_path: &[u8]) -> Result<ResolvedTarget, RequestError> {
        // A trailing slash can only name a directory.
        if !raw_path.ends_with(b"/") {
            if let Some(target) = self.regular_file(self.candidate(raw_path)).await {
                return Ok(target);
            }
        }

        let mut index = raw_path.to_vec();
        index.push(b'/');
        index.extend_from_slice(INDEX_FILE.as_bytes());

        self.regular_file(self.candidate(&index))
            .await
            .ok_or(RequestError::NotFound)
    }

    /// Reads a resolved file fully, refusing anything over the size limit.
    pub async fn load(&self, target: &ResolvedTarget) -> Result<Bytes, RequestError> {
        let file = File::open(&target.path)
            .await
            .map_err(|_| RequestError::NotFound)?;

        if target.size > self.max_file_size {
            return Err(RequestError::TooLarge {
                size: target.size,
                max: self.max_file_size,
            });
        }

        let mut body = Vec::with_capacity(target.size as usize);
        file.take(self.max_file_size + 1)
            .read_to_end(&mut body)
            .await
            .map_err(RequestError::Read)?;

        // The file may have grown since it was stat'ed.
        if body.len() as u64 > self.max_file_size {
            return Err(RequestError::TooLarge {
                size: body.len() as u64,
                max: self.max_file_size,
            });
        }

        Ok(Bytes::from(body))
    }

    pub async fn fetch(&self, raw_path: &[u8]) -> Result<Bytes, RequestError> {
        let target = self.resolve(raw_path).await?;
        self.load(&target).await
    }

    async fn regular_file(&self, path: PathBuf) -> Option<ResolvedTarget> {
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(ResolvedTarget {
                size: meta.len(),
                path,
            }),
            Ok(_) => {
                debug!(path = %path.display(), "Not a regular file");
                None
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Stat failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_joins_under_root() {
        let resolver = Resolver::new("/srv/www");
        assert_eq!(resolver.candidate(b"/a/b.txt"), PathBuf::from("/srv/www/a/b.txt"));
        assert_eq!(resolver.candidate(b"a//b.txt"), PathBuf::from("/srv/www/a/b.txt"));
        assert_eq!(resolver.candidate(b""), PathBuf::from("/srv/www"));
    }

    #[test]
    fn candidate_clamps_parent_dirs_at_root() {
        let resolver = Resolver::new("/srv/www");
        assert_eq!(resolver.candidate(b"/../../etc/passwd"), PathBuf::from("/srv/www/etc/passwd"));
        assert_eq!(resolver.candidate(b"/a/../b"), PathBuf::from("/srv/www/a/../b"));
        assert_eq!(resolver.candidate(b"/a/../../b"), PathBuf::from("/srv/www/a/../b"));
    }

    #[test]
    fn candidate_keeps_dot_segments() {
        let resolver = Resolver::new("/srv/www");
        // `Path` equality ignores interior `.`, so compare the raw text.
        assert_eq!(resolver.candidate(b"/file.txt/.").as_os_str(), "/srv/www/file.txt/.");
        assert_eq!(resolver.candidate(b"/./a").as_os_str(), "/srv/www/./a");
    }

    #[test]
    fn jailed_root_is_slash() {
        let resolver = Resolver::jailed();
        assert_eq!(resolver.candidate(b"/../index.html"), PathBuf::from("/index.html"));
    }
}
