//! `secpenv` — diagnostics for the libsecp256k1 build environment.
//!
//! Answers, from the command line, the questions a binding's build step
//! asks through `libsecpenv`: whether a native library is loadable, what
//! flags the metadata tool would hand out, and which directories would be
//! searched for metadata.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use libsecpenv::flags::{FlagKind, PkgConfig};
use libsecpenv::probe;
use libsecpenv::search::SearchPath;
use libsecpenv::{ENV_LIB_DIR, LIBRARY_NAME};

/// Build-environment diagnostics for libsecp256k1 bindings.
#[derive(Parser, Debug)]
#[command(
    name = "secpenv",
    version,
    about = "libsecp256k1 build environment diagnostics"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe the dynamic loader, then LIB_DIR, for the native library.
    ///
    /// Exits 0 when a library could be opened, 1 otherwise.
    Probe {
        /// Library name to probe for.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Directory to scan for candidates (overrides LIB_DIR).
        #[arg(long = "lib-dir", value_name = "DIR")]
        lib_dir: Option<PathBuf>,
    },

    /// Print static-linkage flags of one kind, one per line.
    Flags {
        /// Flag kind: I (include dirs), L (library dirs), or l (library names).
        #[arg(long, value_name = "KIND", default_value = "I")]
        kind: String,

        /// Root whose lib/pkgconfig is consulted before everything else.
        #[arg(long, value_name = "PATH", default_value = "/usr")]
        root: PathBuf,

        /// Metadata tool to invoke (overrides PKG_CONFIG).
        #[arg(long = "pkg-config", value_name = "TOOL")]
        pkg_config: Option<PathBuf>,

        /// Library to query.
        #[arg(value_name = "LIBRARY")]
        library: Option<String>,
    },

    /// Print the metadata search path, one directory per line.
    Paths {
        /// Root whose lib/pkgconfig is consulted before everything else.
        #[arg(long, value_name = "PATH", default_value = "/usr")]
        root: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Probe { name, lib_dir } => run_probe(name.as_deref(), lib_dir.as_deref()),
        Commands::Flags {
            kind,
            root,
            pkg_config,
            library,
        } => run_flags(kind, root, pkg_config.as_deref(), library.as_deref()),
        Commands::Paths { root } => run_paths(root),
    }
}

fn run_probe(name: Option<&str>, lib_dir: Option<&Path>) -> Result<ExitCode> {
    let name = name.unwrap_or(LIBRARY_NAME);
    let env_dir = env::var(ENV_LIB_DIR).ok().map(PathBuf::from);
    let lib_dir = lib_dir.or(env_dir.as_deref());

    let availability = probe::probe_library(name, lib_dir);
    println!("{availability}");
    Ok(if availability.is_available() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_flags(
    kind: &str,
    root: &Path,
    tool: Option<&Path>,
    library: Option<&str>,
) -> Result<ExitCode> {
    let kind: FlagKind = kind.parse()?;
    let library = library.unwrap_or(LIBRARY_NAME);
    let pc = match tool {
        Some(tool) => PkgConfig::with_tool(tool),
        None => PkgConfig::from_env(),
    };

    let search = SearchPath::from_build_env(root);
    for flag in pc.query(library, kind, &search)? {
        println!("{flag}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_paths(root: &Path) -> Result<ExitCode> {
    let search = SearchPath::from_build_env(root);
    for dir in &search {
        println!("{}", dir.display());
    }
    Ok(ExitCode::SUCCESS)
}
