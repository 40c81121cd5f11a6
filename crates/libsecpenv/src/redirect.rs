//! Scoped redirection of a standard stream to a file.
//!
//! Some of the tooling a build step runs (configure scripts, make) is
//! noisy on stdout or stderr. [`RedirectGuard`] swaps the stream's file
//! descriptor for one pointing at a destination file and swaps the
//! original back when dropped, so everything the process and its children
//! write in between lands in the file. Restoration runs on every exit
//! path, including unwinding.
//!
//! File descriptors 1 and 2 are process-global state: redirection affects
//! every thread, so this is for single-threaded build steps only.

use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::Path;

use log::warn;

use crate::error::Result;

/// A redirectable standard stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl StdStream {
    fn raw_fd(self) -> RawFd {
        match self {
            Self::Stdout => libc::STDOUT_FILENO,
            Self::Stderr => libc::STDERR_FILENO,
        }
    }

    /// Flush the Rust-side buffer so bytes land on the current descriptor.
    fn flush(self) {
        let _ = match self {
            Self::Stdout => io::stdout().flush(),
            Self::Stderr => io::stderr().flush(),
        };
    }
}

impl std::fmt::Display for StdStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        })
    }
}

/// Guard for a stream redirection scope.
///
/// Created by [`RedirectGuard::to_file`]; while alive, the stream's
/// descriptor points at the destination file. Dropping the guard restores
/// the saved descriptor and closes the destination.
#[derive(Debug)]
pub struct RedirectGuard {
    stream: StdStream,
    saved: OwnedFd,
    // Keeps the destination open for the scope; closed after restore.
    _dest: File,
}

impl RedirectGuard {
    /// Redirect `stream` into a file created at `dest`.
    pub fn to_file(stream: StdStream, dest: &Path) -> Result<Self> {
        stream.flush();
        let raw = stream.raw_fd();

        let saved = unsafe { libc::dup(raw) };
        if saved < 0 {
            return Err(io::Error::last_os_error().into());
        }
        // Safety: dup returned a fresh descriptor that we now own.
        let saved = unsafe { OwnedFd::from_raw_fd(saved) };

        let dest = File::create(dest)?;
        if unsafe { libc::dup2(dest.as_raw_fd(), raw) } < 0 {
            return Err(io::Error::last_os_error().into());
        }

        Ok(Self {
            stream,
            saved,
            _dest: dest,
        })
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        // Push anything still buffered into the destination before the
        // descriptor swap undoes the redirection.
        self.stream.flush();
        if unsafe { libc::dup2(self.saved.as_raw_fd(), self.stream.raw_fd()) } < 0 {
            warn!(
                "failed to restore {}: {}",
                self.stream,
                io::Error::last_os_error()
            );
        }
    }
}

/// Run `body` with `stream` redirected into a file at `dest`.
///
/// The original descriptor is restored and the destination closed whether
/// `body` succeeds, returns an error, or panics.
pub fn with_redirected<T, F>(stream: StdStream, dest: &Path, body: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _guard = RedirectGuard::to_file(stream, dest)?;
    body()
}
