//! The closed set of pipeline failures.
//!
//! Callers branch on variants, not on message text. Every stage of the
//! pipeline maps its failures into exactly one of these.

use galley_core::ValidationReport;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between markup text and PDF bytes.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Structural validation rejected the input. No workspace was created
    /// and no compiler process was spawned.
    #[error("invalid LaTeX: {report}")]
    InvalidMarkup { report: ValidationReport },

    /// The per-attempt workspace directory could not be created.
    #[error("failed to create compile workspace: {source}")]
    Workspace {
        #[source]
        source: std::io::Error,
    },

    /// A filesystem operation inside the workspace failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler executable could not be launched at all. Distinct from
    /// a run that started and then exited non-zero.
    #[error("failed to launch compiler '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran to completion and reported failure.
    #[error("compiler failed ({}): {excerpt}", exit_label(.exit_code))]
    Engine {
        /// `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        /// Bounded diagnostic excerpt scanned out of the captured output.
        excerpt: String,
    },

    /// The compiler claimed success but the expected artifact is not on
    /// disk. Never retried; this is a compiler contract violation.
    #[error("compiler reported success but produced no artifact at {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// The remote compilation endpoint did not hand back a PDF.
    #[error("remote compile failed ({}): {message}", status_label(.status))]
    Remote {
        /// HTTP status of the response, or `None` for transport failures.
        status: Option<u16>,
        message: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => String::from("terminated by signal"),
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!("HTTP {status}"),
        None => String::from("transport error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_names_the_exit_code() {
        let err = CompileError::Engine {
            exit_code: Some(7),
            excerpt: String::from("! Emergency stop."),
        };
        assert_eq!(
            err.to_string(),
            "compiler failed (exit code 7): ! Emergency stop."
        );
    }

    #[test]
    fn signal_death_reads_differently_from_exit_codes() {
        let err = CompileError::Engine {
            exit_code: None,
            excerpt: String::from("(interrupted)"),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn remote_transport_failures_carry_no_status() {
        let err = CompileError::Remote {
            status: None,
            message: String::from("connection refused"),
        };
        assert_eq!(
            err.to_string(),
            "remote compile failed (transport error): connection refused"
        );
    }

    #[test]
    fn remote_http_failures_name_the_status() {
        let err = CompileError::Remote {
            status: Some(502),
            message: String::from("bad gateway"),
        };
        assert!(err.to_string().starts_with("remote compile failed (HTTP 502)"));
    }
}
