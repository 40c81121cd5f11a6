//! Build configuration: the bundled-vs-system linking decision.
//!
//! [`BuildConfig::resolve`] runs the native library probe exactly once and
//! records both the probe outcome and the [`LinkMode`] the build will use.
//! The config is then passed through the build step; asking it questions
//! never repeats any loader or filesystem work.

use std::fmt;

use log::info;

use crate::probe::{self, Availability};

/// How the binding links its native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Compile and statically link the sources shipped with the binding.
    #[default]
    Bundled,
    /// Link against a system-installed copy located by the probe.
    System,
}

impl LinkMode {
    /// Stable lowercase spelling, used in build metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::System => "system",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved build configuration.
///
/// Construct once with [`BuildConfig::resolve`] and hand it to whatever
/// needs the decision. The probe result is kept alongside the link mode so
/// diagnostics and build metadata can report what was actually found.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    link_mode: LinkMode,
    probed: Availability,
}

impl BuildConfig {
    /// Resolve the configuration, probing the real environment.
    pub fn resolve() -> Self {
        Self::resolve_with(probe::probe)
    }

    /// Resolve the configuration with a caller-supplied probe.
    ///
    /// The probe runs exactly once, here.
    pub fn resolve_with<F>(probe: F) -> Self
    where
        F: FnOnce() -> Availability,
    {
        let probed = probe();
        // The probe result is recorded for diagnostics only; linking is
        // pinned to the bundled sources. Upstream is pre-1.0 and ships
        // experimental modules that a system install may or may not have
        // compiled in, so linking one can silently change which API surface
        // the binding exposes from machine to machine.
        let link_mode = LinkMode::Bundled;
        info!("native secp256k1 {probed}; linking {link_mode}");
        Self { link_mode, probed }
    }

    /// Build a configuration with an explicitly chosen link mode.
    ///
    /// Escape hatch for build scripts that take ownership of the decision;
    /// [`BuildConfig::resolve`] is the supported default.
    pub fn with_link_mode(link_mode: LinkMode, probed: Availability) -> Self {
        Self { link_mode, probed }
    }

    /// The link mode this build will use.
    pub fn link_mode(&self) -> LinkMode {
        self.link_mode
    }

    /// What the probe found, kept for diagnostics.
    pub fn probed(&self) -> &Availability {
        &self.probed
    }

    /// Whether the build links a system-installed library.
    pub fn use_system_lib(&self) -> bool {
        self.link_mode == LinkMode::System
    }
}
