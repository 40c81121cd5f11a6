//! Metadata search path construction.
//!
//! This module provides the [`SearchPath`] type: the ordered list of
//! directories handed to the metadata query tool via `PKG_CONFIG_PATH` when
//! extracting build flags.
//!
//! The path for a build root is assembled from, in order:
//!
//! 1. `<root>/lib/pkgconfig` (always present, always first)
//! 2. the entries of the `PKG_CONFIG_PATH` environment variable, if set
//! 3. the `LIB_DIR` environment variable, if set
//! 4. `<LIB_DIR>/pkgconfig`, if `LIB_DIR` is set
//!
//! Order is significant: earlier entries win when the tool resolves a
//! package. Empty entries are skipped; duplicates are kept as-is.

use std::env;
use std::path::{Path, PathBuf};

use crate::{ENV_LIB_DIR, ENV_PKG_CONFIG_PATH};

/// The path separator used in environment variables like `PKG_CONFIG_PATH`.
///
/// On Unix systems this is `:`, on Windows it is `;`.
#[cfg(unix)]
pub const PATH_SEPARATOR: char = ':';

#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';

/// An ordered list of directories to search for library metadata.
///
/// # Examples
///
/// ```
/// use libsecpenv::search::SearchPath;
/// use std::path::Path;
///
/// let sp = SearchPath::for_build_root(Path::new("/opt/x"), None, Some("/custom"));
/// assert_eq!(sp.to_env_value(), "/opt/x/lib/pkgconfig:/custom:/custom/pkgconfig");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Create an empty search path.
    pub fn new() -> Self {
        Self { dirs: Vec::new() }
    }

    /// Build the search path for a build rooted at `root`.
    ///
    /// `pkg_config_path` and `lib_dir` are the raw values of the
    /// corresponding environment variables; pass `None` when unset. The
    /// `<root>/lib/pkgconfig` entry always comes first, so metadata
    /// installed under the root shadows anything the environment adds.
    pub fn for_build_root(
        root: &Path,
        pkg_config_path: Option<&str>,
        lib_dir: Option<&str>,
    ) -> Self {
        let mut sp = Self::new();
        sp.add(root.join("lib").join("pkgconfig"));
        if let Some(value) = pkg_config_path {
            sp.add_delimited(value);
        }
        if let Some(dir) = lib_dir {
            sp.add(dir);
            sp.add(Path::new(dir).join("pkgconfig"));
        }
        sp
    }

    /// Build the search path for `root` from the process environment.
    ///
    /// Reads `PKG_CONFIG_PATH` and `LIB_DIR`; variables that are unset or
    /// not valid UTF-8 are treated as absent.
    pub fn from_build_env(root: &Path) -> Self {
        Self::for_build_root(
            root,
            env::var(ENV_PKG_CONFIG_PATH).ok().as_deref(),
            env::var(ENV_LIB_DIR).ok().as_deref(),
        )
    }

    /// Parse a search path from a delimited string (e.g. colon-separated).
    ///
    /// Empty segments are silently skipped.
    pub fn from_delimited(s: &str, separator: char) -> Self {
        let dirs = s
            .split(separator)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { dirs }
    }

    /// Add a directory to the end of the search path.
    ///
    /// Empty paths are skipped. Duplicates are not collapsed; the tool
    /// consults entries in order, so a repeated directory is harmless.
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if !path.as_os_str().is_empty() {
            self.dirs.push(path);
        }
    }

    /// Split a platform-delimited string and add all resulting entries.
    pub fn add_delimited(&mut self, s: &str) {
        for segment in s.split(PATH_SEPARATOR) {
            if !segment.is_empty() {
                self.add(PathBuf::from(segment));
            }
        }
    }

    /// Get the directories as a slice.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Iterate over the directories.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter()
    }

    /// The number of directories in this search path.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether this search path is empty.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Render the search path as a delimited string.
    pub fn to_delimited(&self, separator: char) -> String {
        self.dirs
            .iter()
            .map(|d| d.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(&separator.to_string())
    }

    /// Render the search path as an environment-variable value, using the
    /// platform separator.
    pub fn to_env_value(&self) -> String {
        self.to_delimited(PATH_SEPARATOR)
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

impl IntoIterator for SearchPath {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.into_iter()
    }
}

impl FromIterator<PathBuf> for SearchPath {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            dirs: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for SearchPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_delimited(PATH_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn new_is_empty() {
        let sp = SearchPath::new();
        assert!(sp.is_empty());
        assert_eq!(sp.len(), 0);
    }

    #[test]
    fn build_root_alone() {
        let sp = SearchPath::for_build_root(Path::new("/opt/x"), None, None);
        assert_eq!(sp.len(), 1);
        assert_eq!(sp.dirs()[0], PathBuf::from("/opt/x/lib/pkgconfig"));
    }

    #[test]
    fn build_root_comes_first() {
        let sp = SearchPath::for_build_root(
            Path::new("/opt/x"),
            Some("/env/pkgconfig"),
            Some("/custom"),
        );
        assert_eq!(sp.dirs()[0], PathBuf::from("/opt/x/lib/pkgconfig"));
    }

    #[test]
    fn lib_dir_contributes_itself_then_pkgconfig() {
        let sp = SearchPath::for_build_root(Path::new("/opt/x"), None, Some("/custom"));
        assert_eq!(
            sp.dirs(),
            &[
                PathBuf::from("/opt/x/lib/pkgconfig"),
                PathBuf::from("/custom"),
                PathBuf::from("/custom/pkgconfig"),
            ]
        );
    }

    #[test]
    fn env_path_precedes_lib_dir() {
        let sp = SearchPath::for_build_root(
            Path::new("/opt/x"),
            Some("/pcp1:/pcp2"),
            Some("/custom"),
        );
        assert_eq!(
            sp.dirs(),
            &[
                PathBuf::from("/opt/x/lib/pkgconfig"),
                PathBuf::from("/pcp1"),
                PathBuf::from("/pcp2"),
                PathBuf::from("/custom"),
                PathBuf::from("/custom/pkgconfig"),
            ]
        );
    }

    #[test]
    fn from_delimited_colon() {
        let sp = SearchPath::from_delimited("/a:/b:/c", ':');
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.dirs()[0], PathBuf::from("/a"));
        assert_eq!(sp.dirs()[2], PathBuf::from("/c"));
    }

    #[test]
    fn from_delimited_skips_empty() {
        let sp = SearchPath::from_delimited("/a::/b:", ':');
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.dirs()[0], PathBuf::from("/a"));
        assert_eq!(sp.dirs()[1], PathBuf::from("/b"));
    }

    #[test]
    fn from_delimited_empty_string() {
        let sp = SearchPath::from_delimited("", ':');
        assert!(sp.is_empty());
    }

    // ── Add ─────────────────────────────────────────────────────────

    #[test]
    fn add_appends_in_order() {
        let mut sp = SearchPath::new();
        sp.add("/first");
        sp.add("/second");
        assert_eq!(sp.dirs()[0], PathBuf::from("/first"));
        assert_eq!(sp.dirs()[1], PathBuf::from("/second"));
    }

    #[test]
    fn add_skips_empty() {
        let mut sp = SearchPath::new();
        sp.add("");
        assert!(sp.is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let mut sp = SearchPath::new();
        sp.add("/same");
        sp.add("/same");
        assert_eq!(sp.len(), 2);
    }

    #[test]
    fn add_delimited_appends_segments() {
        let mut sp = SearchPath::new();
        sp.add("/existing");
        sp.add_delimited("/a:/b");
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.dirs()[0], PathBuf::from("/existing"));
        assert_eq!(sp.dirs()[2], PathBuf::from("/b"));
    }

    // ── Rendering ───────────────────────────────────────────────────

    #[test]
    fn to_env_value_joins_with_separator() {
        let sp = SearchPath::for_build_root(Path::new("/opt/x"), None, Some("/custom"));
        assert_eq!(
            sp.to_env_value(),
            "/opt/x/lib/pkgconfig:/custom:/custom/pkgconfig"
        );
    }

    #[test]
    fn to_env_value_empty_path_is_empty_string() {
        let sp = SearchPath::new();
        assert_eq!(sp.to_env_value(), "");
    }

    #[test]
    fn display_matches_env_value() {
        let sp = SearchPath::from_delimited("/a:/b", ':');
        assert_eq!(format!("{sp}"), sp.to_env_value());
    }

    #[test]
    fn roundtrip_preserves_order_and_duplicates() {
        let sp = SearchPath::from_delimited("/a:/b:/a", ':');
        assert_eq!(sp.to_env_value(), "/a:/b:/a");
    }

    // ── Iteration ───────────────────────────────────────────────────

    #[test]
    fn iterates_in_order() {
        let sp = SearchPath::from_delimited("/a:/b", ':');
        let collected: Vec<&PathBuf> = sp.iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0], &PathBuf::from("/a"));
    }

    #[test]
    fn from_iterator_collects() {
        let sp: SearchPath = vec![PathBuf::from("/a"), PathBuf::from("/b")]
            .into_iter()
            .collect();
        assert_eq!(sp.len(), 2);
    }
}
