//! Building the bundled copy of the native library.
//!
//! Two drivers are provided. [`build_bundled`] compiles the vendored
//! sources directly with the platform C compiler from a cargo build
//! script, which is the path the binding takes by default.
//! [`autotools_build`] drives the upstream `autogen.sh` / `configure` /
//! `make` chain for a full source tree, running out-of-tree inside a
//! scoped temporary workdir with tool chatter optionally captured to a
//! log file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::LIBRARY_NAME;
use crate::error::{Error, Result};
use crate::redirect::{StdStream, with_redirected};
use crate::workdir::with_temp_workdir;

/// Preprocessor defines for compiling the vendored sources.
///
/// Builtin field/scalar implementations are selected in their portable
/// 32-bit representations, which are correct on 64-bit targets as well.
/// The module defines fix the API surface the binding was written against.
pub const BUNDLED_DEFINES: &[(&str, Option<&str>)] = &[
    ("USE_NUM_NONE", Some("1")),
    ("USE_FIELD_INV_BUILTIN", Some("1")),
    ("USE_SCALAR_INV_BUILTIN", Some("1")),
    ("USE_FIELD_10X26", Some("1")),
    ("USE_SCALAR_8X32", Some("1")),
    ("ENABLE_MODULE_ECDH", Some("1")),
    ("ENABLE_MODULE_RECOVERY", Some("1")),
    ("ENABLE_MODULE_SCHNORR", Some("1")),
];

/// Options passed to the upstream `configure` script.
///
/// Static, position-independent output with the same experimental modules
/// the compile driver enables; upstream's own benchmarks and test suites
/// are skipped.
pub const CONFIGURE_OPTIONS: &[&str] = &[
    "--disable-shared",
    "--enable-static",
    "--disable-dependency-tracking",
    "--with-pic",
    "--enable-experimental",
    "--enable-module-ecdh",
    "--enable-module-recovery",
    "--enable-module-schnorr",
    "--disable-benchmark",
    "--disable-tests",
    "--disable-exhaustive-tests",
];

/// Compile the vendored sources under `src_dir` into a static library.
///
/// Expects the usual upstream layout (`include/`, `src/secp256k1.c`).
/// Must run from a cargo build script: the compiler driver emits the
/// matching `rustc-link-lib`/`rustc-link-search` directives itself.
pub fn build_bundled(src_dir: &Path) -> Result<()> {
    info!("compiling bundled {} from {}", LIBRARY_NAME, src_dir.display());
    let mut build = cc::Build::new();
    build
        .include(src_dir)
        .include(src_dir.join("include"))
        .include(src_dir.join("src"))
        .file(src_dir.join("src").join("secp256k1.c"));
    for (name, value) in BUNDLED_DEFINES {
        build.define(name, *value);
    }
    build.try_compile(LIBRARY_NAME)?;
    Ok(())
}

/// Build and install a full upstream source tree with autotools.
///
/// `autogen.sh` runs in `src_dir`; `configure` and `make` run out-of-tree
/// in a scoped temporary workdir that is removed afterwards, and the
/// result is installed under `prefix` (created if missing). When
/// `build_log` is given, everything the tools print on stdout is captured
/// there; a relative log path is taken relative to the caller's directory,
/// not the scratch one.
pub fn autotools_build(src_dir: &Path, prefix: &Path, build_log: Option<&Path>) -> Result<()> {
    // The scope below changes the current directory, so nail every path
    // down first.
    let src_dir = src_dir.canonicalize()?;
    fs::create_dir_all(prefix)?;
    let prefix = prefix.canonicalize()?;
    let build_log = build_log.map(absolute_from_cwd).transpose()?;

    info!(
        "building bundled {} from {} into {}",
        LIBRARY_NAME,
        src_dir.display(),
        prefix.display()
    );
    let mut autogen = Command::new(src_dir.join("autogen.sh"));
    autogen.current_dir(&src_dir);
    run_step("autogen.sh", &mut autogen)?;

    with_temp_workdir(|_build_dir| {
        let steps = || -> Result<()> {
            let mut configure = Command::new(src_dir.join("configure"));
            configure.arg(format!("--prefix={}", prefix.display()));
            configure.args(CONFIGURE_OPTIONS);
            run_step("configure", &mut configure)?;
            run_step("make", &mut Command::new("make"))?;
            run_step("make install", Command::new("make").arg("install"))?;
            Ok(())
        };
        match &build_log {
            Some(path) => with_redirected(StdStream::Stdout, path, steps),
            None => steps(),
        }
    })
}

fn run_step(step: &str, command: &mut Command) -> Result<()> {
    debug!("running {step}: {command:?}");
    let status = command.status().map_err(|source| Error::ToolSpawn {
        tool: step.to_string(),
        source,
    })?;
    if !status.success() {
        return Err(Error::StepFailure {
            step: step.to_string(),
            status,
        });
    }
    Ok(())
}

fn absolute_from_cwd(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
