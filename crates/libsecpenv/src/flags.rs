//! Build flag extraction via the pkg-config metadata tool.
//!
//! Given a library name and a [`FlagKind`], this module invokes pkg-config
//! in static-linkage mode with a caller-constructed [`SearchPath`] and
//! decodes the whitespace-separated, prefix-carrying tokens it prints.
//!
//! The tool binary defaults to `pkg-config` and can be overridden through
//! the `PKG_CONFIG` environment variable, or explicitly with
//! [`PkgConfig::with_tool`].

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use log::trace;

use crate::error::{Error, Result};
use crate::search::SearchPath;
use crate::{ENV_PKG_CONFIG, ENV_PKG_CONFIG_PATH};

/// The metadata query tool invoked when no override is configured.
pub const DEFAULT_TOOL: &str = "pkg-config";

/// The three flag categories the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    /// Include directories (`-I`, queried with `--cflags-only-I`).
    IncludeDir,
    /// Library search directories (`-L`, queried with `--libs-only-L`).
    LibDir,
    /// Library names (`-l`, queried with `--libs-only-l`).
    LibName,
}

impl FlagKind {
    /// All flag kinds, in the order include / libdir / libname.
    pub const ALL: [FlagKind; 3] = [Self::IncludeDir, Self::LibDir, Self::LibName];

    /// The single-letter spelling used on the command line and in docs.
    pub const fn letter(self) -> char {
        match self {
            Self::IncludeDir => 'I',
            Self::LibDir => 'L',
            Self::LibName => 'l',
        }
    }

    /// The option prefix carried by each emitted token.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::IncludeDir => "-I",
            Self::LibDir => "-L",
            Self::LibName => "-l",
        }
    }

    /// The pkg-config option that selects this flag category.
    pub const fn pkg_config_option(self) -> &'static str {
        match self {
            Self::IncludeDir => "--cflags-only-I",
            Self::LibDir => "--libs-only-L",
            Self::LibName => "--libs-only-l",
        }
    }
}

impl FromStr for FlagKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "I" | "include" => Ok(Self::IncludeDir),
            "L" | "libdir" => Ok(Self::LibDir),
            "l" | "lib" => Ok(Self::LibName),
            _ => Err(Error::UnknownFlagKind {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A handle on the metadata query tool.
///
/// Construct with [`PkgConfig::from_env`] to honor the `PKG_CONFIG`
/// environment variable, or [`PkgConfig::with_tool`] to pin a specific
/// executable (tests use this to stay hermetic).
#[derive(Debug, Clone)]
pub struct PkgConfig {
    tool: PathBuf,
}

impl PkgConfig {
    /// Use the tool named by `PKG_CONFIG`, falling back to `pkg-config`.
    pub fn from_env() -> Self {
        let tool = env::var(ENV_PKG_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOOL));
        Self { tool }
    }

    /// Use a specific tool executable.
    pub fn with_tool<P: Into<PathBuf>>(tool: P) -> Self {
        Self { tool: tool.into() }
    }

    /// The tool executable this handle invokes.
    pub fn tool(&self) -> &Path {
        &self.tool
    }

    /// Query static-linkage flags of one kind for `library`.
    ///
    /// The constructed `search` path is passed to the child through
    /// `PKG_CONFIG_PATH`. A tool that cannot be spawned, exits non-zero, or
    /// prints non-UTF-8 output fails the query; flags are linkage
    /// information, so callers must treat that as fatal to their build step.
    pub fn query(&self, library: &str, kind: FlagKind, search: &SearchPath) -> Result<Vec<String>> {
        let mut command = Command::new(&self.tool);
        command
            .arg("--static")
            .arg(kind.pkg_config_option())
            .arg(library)
            .env(ENV_PKG_CONFIG_PATH, search.to_env_value());
        trace!("querying {kind} flags for {library}: {command:?}");

        let output = command.output().map_err(|source| Error::ToolSpawn {
            tool: self.tool.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            return Err(Error::ToolFailure {
                tool: self.tool.display().to_string(),
                library: library.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = std::str::from_utf8(&output.stdout).map_err(|_| Error::NonUtf8Output {
            tool: self.tool.display().to_string(),
        })?;
        Ok(strip_tokens(stdout, kind))
    }
}

/// Extract static-linkage flags of one kind for `library`, with metadata
/// under `root` consulted first.
///
/// Convenience wrapper that reads `PKG_CONFIG`, `PKG_CONFIG_PATH`, and
/// `LIB_DIR` from the process environment; see [`PkgConfig::query`] and
/// [`SearchPath::from_build_env`] for the moving parts.
pub fn build_flags(library: &str, kind: FlagKind, root: &Path) -> Result<Vec<String>> {
    let search = SearchPath::from_build_env(root);
    PkgConfig::from_env().query(library, kind, &search)
}

/// Split tool output on whitespace and strip each token's option prefix.
///
/// Stripping is prefix-only and happens at most once per token: `-lcurl`
/// becomes `curl`, while a token that merely contains or ends with the
/// option letter is left intact. Tokens without the prefix (pkg-config can
/// emit e.g. `-pthread` among libs) pass through unchanged, so callers see
/// them verbatim rather than corrupted.
///
/// # Examples
///
/// ```
/// use libsecpenv::flags::{FlagKind, strip_tokens};
///
/// let dirs = strip_tokens("-I/opt/x/include -I/usr/include", FlagKind::IncludeDir);
/// assert_eq!(dirs, ["/opt/x/include", "/usr/include"]);
/// ```
pub fn strip_tokens(output: &str, kind: FlagKind) -> Vec<String> {
    let prefix = kind.prefix();
    output
        .split_whitespace()
        .map(|token| token.strip_prefix(prefix).unwrap_or(token).to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Flag kinds ──────────────────────────────────────────────────

    #[test]
    fn kind_letters() {
        assert_eq!(FlagKind::IncludeDir.letter(), 'I');
        assert_eq!(FlagKind::LibDir.letter(), 'L');
        assert_eq!(FlagKind::LibName.letter(), 'l');
    }

    #[test]
    fn kind_options() {
        assert_eq!(FlagKind::IncludeDir.pkg_config_option(), "--cflags-only-I");
        assert_eq!(FlagKind::LibDir.pkg_config_option(), "--libs-only-L");
        assert_eq!(FlagKind::LibName.pkg_config_option(), "--libs-only-l");
    }

    #[test]
    fn kind_prefix_matches_letter() {
        for kind in FlagKind::ALL {
            assert_eq!(kind.prefix(), format!("-{}", kind.letter()));
        }
    }

    #[test]
    fn kind_parses_from_letters_and_words() {
        assert_eq!("I".parse::<FlagKind>().unwrap(), FlagKind::IncludeDir);
        assert_eq!("include".parse::<FlagKind>().unwrap(), FlagKind::IncludeDir);
        assert_eq!("L".parse::<FlagKind>().unwrap(), FlagKind::LibDir);
        assert_eq!("l".parse::<FlagKind>().unwrap(), FlagKind::LibName);
        assert_eq!("lib".parse::<FlagKind>().unwrap(), FlagKind::LibName);
    }

    #[test]
    fn kind_parse_rejects_unknown() {
        let err = "X".parse::<FlagKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownFlagKind { .. }));
    }

    // ── Token stripping ─────────────────────────────────────────────

    #[test]
    fn strips_include_prefixes_in_order() {
        let tokens = strip_tokens("-I/opt/x/include -I/usr/include", FlagKind::IncludeDir);
        assert_eq!(tokens, ["/opt/x/include", "/usr/include"]);
    }

    #[test]
    fn strips_lib_dir_prefixes() {
        let tokens = strip_tokens("-L/opt/x/lib -L/usr/lib", FlagKind::LibDir);
        assert_eq!(tokens, ["/opt/x/lib", "/usr/lib"]);
    }

    #[test]
    fn strips_lib_name_prefix_only_once_from_front() {
        // "-lcurl" keeps its trailing 'l'; both-end stripping would give "cur".
        let tokens = strip_tokens("-lsecp256k1 -lcurl -lgmp", FlagKind::LibName);
        assert_eq!(tokens, ["secp256k1", "curl", "gmp"]);
    }

    #[test]
    fn token_without_prefix_passes_through() {
        let tokens = strip_tokens("-pthread -lm", FlagKind::LibName);
        assert_eq!(tokens, ["-pthread", "m"]);
    }

    #[test]
    fn path_ending_in_option_letter_survives() {
        // Both-end stripping would turn "/opt/MPI" into "/opt/MP".
        let tokens = strip_tokens("-I/opt/MPI -I/vendor/blas-", FlagKind::IncludeDir);
        assert_eq!(tokens, ["/opt/MPI", "/vendor/blas-"]);
    }

    #[test]
    fn empty_output_yields_no_tokens() {
        assert!(strip_tokens("", FlagKind::IncludeDir).is_empty());
        assert!(strip_tokens("  \n\t ", FlagKind::LibName).is_empty());
    }

    #[test]
    fn splits_on_any_whitespace() {
        let tokens = strip_tokens("-I/a\t-I/b\n-I/c", FlagKind::IncludeDir);
        assert_eq!(tokens, ["/a", "/b", "/c"]);
    }

    // ── Tool handle ─────────────────────────────────────────────────

    #[test]
    fn with_tool_pins_the_executable() {
        let pc = PkgConfig::with_tool("/opt/bin/pkgconf");
        assert_eq!(pc.tool(), Path::new("/opt/bin/pkgconf"));
    }

    #[test]
    fn query_reports_unspawnable_tool() {
        let pc = PkgConfig::with_tool("/no/such/tool/anywhere");
        let err = pc
            .query("secp256k1", FlagKind::IncludeDir, &SearchPath::new())
            .unwrap_err();
        assert!(matches!(err, Error::ToolSpawn { .. }));
    }
}
