//! Error types for libsecpenv.

use std::io;
use std::process::ExitStatus;

/// Result type alias for libsecpenv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while probing the build environment or driving
/// external build tooling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The metadata query tool could not be started at all.
    #[error("failed to run `{tool}`: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The metadata query tool ran but reported failure. Flags are linkage
    /// information, so this is fatal to the build step that asked for them.
    #[error("`{tool}` exited with {status} while querying '{library}': {stderr}")]
    ToolFailure {
        tool: String,
        library: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The metadata query tool emitted output that is not valid UTF-8.
    #[error("`{tool}` produced non-UTF-8 output")]
    NonUtf8Output { tool: String },

    /// A flag kind outside of `I`, `L`, `l` was requested.
    #[error("unknown flag kind '{value}' (expected I, L, or l)")]
    UnknownFlagKind { value: String },

    /// A step of the bundled-library build chain failed.
    #[error("build step '{step}' exited with {status}")]
    StepFailure { step: String, status: ExitStatus },

    /// The C compiler driver failed on the bundled sources.
    #[error("failed to compile bundled sources: {0}")]
    Compile(#[from] cc::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn tool_failure_display_names_tool_and_library() {
        let err = Error::ToolFailure {
            tool: "pkg-config".to_string(),
            library: "secp256k1".to_string(),
            status: ExitStatus::from_raw(1 << 8),
            stderr: "Package secp256k1 was not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pkg-config"));
        assert!(msg.contains("secp256k1"));
        assert!(msg.contains("was not found"));
    }

    #[test]
    fn unknown_flag_kind_display() {
        let err = Error::UnknownFlagKind {
            value: "X".to_string(),
        };
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
