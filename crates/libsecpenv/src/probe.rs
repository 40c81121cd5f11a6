//! Native library detection.
//!
//! The probe answers one question: can a usable system copy of the native
//! library be loaded? It first asks the dynamic loader for the canonical
//! platform soname; if that fails and `LIB_DIR` is set, it scans that
//! directory (non-recursively) for files whose names contain the library
//! name and tries to open each candidate in turn.
//!
//! A failed open is a signal, not an error: the loader leaves the process
//! intact and the probe moves on. The result feeds the build configuration
//! as a diagnostic; see [`crate::config`] for how linking is actually
//! decided.

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use libloading::{Library, library_filename};
use log::{debug, trace};

use crate::{ENV_LIB_DIR, LIBRARY_NAME};

/// Outcome of a native library probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The loader resolved the canonical soname on its default search path.
    System,
    /// A candidate from the `LIB_DIR` scan could be opened.
    LibDir(PathBuf),
    /// Neither the loader nor the scan produced an openable library.
    Unavailable,
}

impl Availability {
    /// Whether any library could be opened.
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// The path the scan opened, when that is how the library was found.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::LibDir(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "available via the system loader"),
            Self::LibDir(path) => write!(f, "available from {}", path.display()),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Probe for the native secp256k1 library, honoring `LIB_DIR` if set.
pub fn probe() -> Availability {
    let lib_dir = env::var(ENV_LIB_DIR).ok().map(PathBuf::from);
    probe_library(LIBRARY_NAME, lib_dir.as_deref())
}

/// Probe for `name`, scanning `lib_dir` when the loader comes up empty.
///
/// Each open attempt may pull native code into the process; a library that
/// opens is dropped again immediately, and one that fails to open leaves
/// the process unharmed.
pub fn probe_library(name: &str, lib_dir: Option<&Path>) -> Availability {
    let soname = library_filename(name);
    trace!("probing the loader for {}", soname.to_string_lossy());
    if try_open(&soname) {
        return Availability::System;
    }

    let Some(dir) = lib_dir else {
        debug!("{name}: not on the loader path and no override directory set");
        return Availability::Unavailable;
    };
    for candidate in candidates(dir, name) {
        trace!("trying candidate {}", candidate.display());
        if try_open(candidate.as_os_str()) {
            return Availability::LibDir(candidate);
        }
    }
    debug!("{name}: no openable candidate under {}", dir.display());
    Availability::Unavailable
}

/// Files directly under `dir` whose names contain `name`.
///
/// Enumeration order follows the underlying glob and is not part of the
/// contract beyond being deterministic for a given directory state.
pub fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let pattern = format!("{}/*{}*", dir.display(), name);
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
        Err(err) => {
            debug!("invalid candidate pattern {pattern}: {err}");
            Vec::new()
        }
    }
}

fn try_open(spec: &OsStr) -> bool {
    // Safety: the library is opened only to test loadability; no symbols
    // are resolved, and a successful handle is dropped right away.
    match unsafe { Library::new(spec) } {
        Ok(_) => true,
        Err(err) => {
            trace!("cannot open {}: {err}", spec.to_string_lossy());
            false
        }
    }
}
