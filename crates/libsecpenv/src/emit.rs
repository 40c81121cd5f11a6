//! Build-script directive rendering.
//!
//! Turns the resolved [`BuildConfig`] into the `cargo:` lines a build
//! script prints: environment re-run triggers, a `link_mode` metadata
//! entry recording the bundled-vs-system decision, and, for system
//! linking, the search/link directives derived from the flag extractor.
//! Rendering is separated from printing so the lines can be inspected.

use std::path::Path;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::flags::{FlagKind, PkgConfig};
use crate::search::SearchPath;
use crate::{ENV_LIB_DIR, ENV_PKG_CONFIG, ENV_PKG_CONFIG_PATH};

/// Environment variables that invalidate a build when they change.
pub const TRACKED_ENV_VARS: &[&str] = &[ENV_LIB_DIR, ENV_PKG_CONFIG_PATH, ENV_PKG_CONFIG];

/// `rerun-if-env-changed` lines for every tracked variable.
pub fn rerun_directives() -> Vec<String> {
    TRACKED_ENV_VARS
        .iter()
        .map(|var| format!("cargo:rerun-if-env-changed={var}"))
        .collect()
}

/// The metadata line recording the resolved link mode.
///
/// Dependent build scripts see it as `DEP_<links>_LINK_MODE`.
pub fn link_mode_directive(config: &BuildConfig) -> String {
    format!("cargo:link_mode={}", config.link_mode())
}

/// Link directives for a system library: one `rustc-link-search` per
/// search directory, one static `rustc-link-lib` per library name.
pub fn system_link_directives(search_dirs: &[String], libs: &[String]) -> Vec<String> {
    search_dirs
        .iter()
        .map(|dir| format!("cargo:rustc-link-search=native={dir}"))
        .chain(libs.iter().map(|lib| format!("cargo:rustc-link-lib=static={lib}")))
        .collect()
}

/// All directives for one build-script run.
///
/// Under [`LinkMode::Bundled`](crate::config::LinkMode::Bundled) the
/// metadata tool is never invoked: the compile driver emits its own link
/// directives. Under system linking the extractor is queried for library
/// directories and names, and a failure there fails the build script.
pub fn build_script_directives(
    pc: &PkgConfig,
    config: &BuildConfig,
    library: &str,
    root: &Path,
) -> Result<Vec<String>> {
    let mut directives = rerun_directives();
    directives.push(link_mode_directive(config));
    if config.use_system_lib() {
        let search = SearchPath::from_build_env(root);
        let search_dirs = pc.query(library, FlagKind::LibDir, &search)?;
        let libs = pc.query(library, FlagKind::LibName, &search)?;
        directives.extend(system_link_directives(&search_dirs, &libs));
    }
    Ok(directives)
}

/// Print directives for cargo to pick up.
pub fn print_directives(directives: &[String]) {
    for directive in directives {
        println!("{directive}");
    }
}
