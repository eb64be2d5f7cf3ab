//! Per-attempt scratch directories.
//!
//! Every compile attempt gets its own temporary directory; uniqueness comes
//! from the random suffix `tempfile` appends to the prefix, so concurrent
//! attempts never collide. The directory is a scoped resource: dropping the
//! workspace removes it, `retain` detaches it so failed attempts stay on
//! disk for diagnosis.

use crate::error::CompileError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory prefix for standard compile attempts.
pub const STANDARD_PREFIX: &str = "galley-";
/// Directory prefix for debug compile attempts.
pub const DEBUG_PREFIX: &str = "galley-debug-";

/// Fixed name the markup is written to inside the workspace.
pub const INPUT_FILE: &str = "main.tex";
/// Fixed name of the compiled artifact.
pub const ARTIFACT_FILE: &str = "main.pdf";
/// Post-mortem copy of the input, written in debug mode only.
pub const DEBUG_INPUT_COPY: &str = "input.tex";
/// Captured compiler stdout, persisted on standard-mode failures.
pub const STDOUT_LOG: &str = "compiler-stdout.log";
/// Captured compiler stderr, persisted on standard-mode failures.
pub const STDERR_LOG: &str = "compiler-stderr.log";
/// Merged capture of both streams, written after every debug run.
pub const SESSION_LOG: &str = "session.log";

/// An isolated directory owning the files of one compile attempt.
#[derive(Debug)]
pub struct CompileWorkspace {
    dir: TempDir,
}

impl CompileWorkspace {
    /// Creates a fresh workspace under the system temp directory.
    pub fn create(prefix: &str) -> Result<Self, CompileError> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|source| CompileError::Workspace { source })?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the markup lives inside this workspace.
    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join(INPUT_FILE)
    }

    /// Where the compiler is expected to leave the artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.dir.path().join(ARTIFACT_FILE)
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact_path().is_file()
    }

    /// Persists the markup to `main.tex`.
    pub fn write_input(&self, markup: &str) -> Result<(), CompileError> {
        self.write_file(INPUT_FILE, markup)
    }

    /// Drops an `input.tex` copy next to the real input so failed debug
    /// attempts can be reproduced byte for byte.
    pub fn write_debug_copy(&self, markup: &str) -> Result<(), CompileError> {
        self.write_file(DEBUG_INPUT_COPY, markup)
    }

    /// Persists captured compiler output under the given log name.
    pub fn write_log(&self, name: &str, content: &str) -> Result<(), CompileError> {
        self.write_file(name, content)
    }

    fn write_file(&self, name: &str, content: &str) -> Result<(), CompileError> {
        let path = self.dir.path().join(name);
        fs::write(&path, content).map_err(|source| CompileError::Io {
            context: format!("failed to write {}", path.display()),
            source,
        })
    }

    /// Reads the compiled artifact into memory.
    ///
    /// Fails with [`CompileError::ArtifactMissing`] when the compiler
    /// claimed success without producing the file.
    pub fn read_artifact(&self) -> Result<Vec<u8>, CompileError> {
        let path = self.artifact_path();
        if !path.is_file() {
            return Err(CompileError::ArtifactMissing { path });
        }
        fs::read(&path).map_err(|source| CompileError::Io {
            context: format!("failed to read {}", path.display()),
            source,
        })
    }

    /// Detaches the directory so it outlives this value. Failed compiler
    /// runs are retained this way so their logs stay inspectable.
    pub fn retain(self) -> PathBuf {
        self.dir.keep()
    }

    /// Removes the workspace now. Removal failure is logged, never raised:
    /// by the time cleanup runs the compile result is already decided.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            log::warn!("failed to clean up workspace {}: {err}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspaces_never_share_a_directory() {
        let a = CompileWorkspace::create(STANDARD_PREFIX).unwrap();
        let b = CompileWorkspace::create(STANDARD_PREFIX).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn input_lands_in_main_tex() {
        let ws = CompileWorkspace::create(STANDARD_PREFIX).unwrap();
        ws.write_input("\\documentclass{article}").unwrap();
        let on_disk = fs::read_to_string(ws.input_path()).unwrap();
        assert_eq!(on_disk, "\\documentclass{article}");
    }

    #[test]
    fn debug_copy_sits_next_to_the_input() {
        let ws = CompileWorkspace::create(DEBUG_PREFIX).unwrap();
        ws.write_input("x").unwrap();
        ws.write_debug_copy("x").unwrap();
        assert!(ws.path().join(INPUT_FILE).is_file());
        assert!(ws.path().join(DEBUG_INPUT_COPY).is_file());
    }

    #[test]
    fn missing_artifact_is_its_own_error() {
        let ws = CompileWorkspace::create(STANDARD_PREFIX).unwrap();
        let err = ws.read_artifact().unwrap_err();
        assert!(matches!(err, CompileError::ArtifactMissing { .. }));
    }

    #[test]
    fn artifact_bytes_come_back_verbatim() {
        let ws = CompileWorkspace::create(STANDARD_PREFIX).unwrap();
        fs::write(ws.artifact_path(), b"%PDF-1.5 stub").unwrap();
        assert_eq!(ws.read_artifact().unwrap(), b"%PDF-1.5 stub");
    }

    #[test]
    fn close_removes_the_directory() {
        let ws = CompileWorkspace::create(STANDARD_PREFIX).unwrap();
        let path = ws.path().to_path_buf();
        ws.close();
        assert!(!path.exists());
    }

    #[test]
    fn retained_directories_survive() {
        let ws = CompileWorkspace::create(DEBUG_PREFIX).unwrap();
        ws.write_input("kept").unwrap();
        let kept = ws.retain();
        assert!(kept.join(INPUT_FILE).is_file());
        fs::remove_dir_all(&kept).unwrap();
    }
}
