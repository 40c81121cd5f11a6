//! `libsecpenv` — build-environment support for libsecp256k1 bindings.
//!
//! Everything a binding's build step needs short of the cryptography
//! itself: probing for a usable native library, extracting compiler and
//! linker flags from pkg-config metadata, compiling the bundled sources,
//! and a pair of scoped helpers for build steps that mutate process-global
//! state (current directory, standard streams).
//!
//! # Architecture
//!
//! - [`config`] — the bundled-vs-system link decision, resolved once
//! - [`emit`] — rendering the decision as cargo build-script directives
//! - [`error`] — error types and result alias
//! - [`flags`] — static-linkage flag extraction via pkg-config
//! - [`probe`] — native library detection (loader probe + `LIB_DIR` scan)
//! - [`redirect`] — scoped stream-to-file redirection
//! - [`search`] — metadata search path construction
//! - [`vendored`] — compiling the bundled native sources
//! - [`workdir`] — scoped temporary working directories
//!
//! # Example
//!
//! A build script resolves the configuration once and prints what cargo
//! needs:
//!
//! ```rust,no_run
//! use libsecpenv::config::BuildConfig;
//! use libsecpenv::emit;
//! use libsecpenv::flags::PkgConfig;
//! use std::path::Path;
//!
//! let config = BuildConfig::resolve();
//! let directives = emit::build_script_directives(
//!     &PkgConfig::from_env(),
//!     &config,
//!     libsecpenv::LIBRARY_NAME,
//!     Path::new("/usr"),
//! )
//! .unwrap();
//! emit::print_directives(&directives);
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod flags;
pub mod probe;
pub mod redirect;
pub mod search;
pub mod vendored;
pub mod workdir;

/// The version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The canonical name of the native library this crate locates and builds.
pub const LIBRARY_NAME: &str = "secp256k1";

/// The `LIB_DIR` environment variable name.
///
/// When set, it is scanned for candidate library binaries and contributes
/// itself plus its `pkgconfig` subdirectory to the metadata search path.
pub const ENV_LIB_DIR: &str = "LIB_DIR";

/// The `PKG_CONFIG_PATH` environment variable name.
pub const ENV_PKG_CONFIG_PATH: &str = "PKG_CONFIG_PATH";

/// The `PKG_CONFIG` environment variable name.
///
/// Overrides which metadata query tool is invoked; defaults to
/// `pkg-config`.
pub const ENV_PKG_CONFIG: &str = "PKG_CONFIG";
