//! Orchestration of a single markup-to-artifact compilation.
//!
//! One call to [`TexEngine::compile`] walks the whole pipeline: validate
//! the markup, prepare an isolated workspace, run the compiler, interpret
//! its exit, and collect the artifact. Failed compiler runs leave their
//! workspace on disk; successful ones hand it to the caller inside
//! [`CompileOutput`] so the artifact stays readable until the caller is
//! done with it.

use crate::error::CompileError;
use crate::runner::{run_compiler, ProcessOutcome};
use crate::workspace::{
    CompileWorkspace, ARTIFACT_FILE, DEBUG_PREFIX, SESSION_LOG, STANDARD_PREFIX, STDERR_LOG,
    STDOUT_LOG,
};
use galley_core::validator;
use std::ffi::OsString;
use std::path::PathBuf;

/// Compiler executable used when no explicit configuration is given.
pub const DEFAULT_ENGINE: &str = "pdflatex";

/// Which compilation variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Plain non-interactive run.
    Standard,
    /// Adds `-file-line-error` and `-recorder` and keeps extra files around
    /// for post-mortems.
    Debug,
}

impl CompileMode {
    fn workspace_prefix(self) -> &'static str {
        match self {
            CompileMode::Standard => STANDARD_PREFIX,
            CompileMode::Debug => DEBUG_PREFIX,
        }
    }
}

/// Configuration for the external compiler invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Compiler executable: an absolute path, or a bare name resolved via
    /// `PATH` at spawn time.
    pub program: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_ENGINE),
        }
    }
}

impl EngineConfig {
    /// Locates the default compiler on `PATH`.
    ///
    /// Falls back to the bare name when discovery fails; the spawn will
    /// then report the real error.
    pub fn discover() -> Self {
        match which::which(DEFAULT_ENGINE) {
            Ok(path) => {
                log::info!("Detected {} at {:?}", DEFAULT_ENGINE, path);
                Self { program: path }
            }
            Err(_) => {
                log::warn!("{} not found on PATH", DEFAULT_ENGINE);
                Self::default()
            }
        }
    }
}

/// A successful compile: the artifact path plus the workspace that owns it.
///
/// The workspace keeps the artifact alive. Read the bytes before closing
/// or retaining it.
#[derive(Debug)]
pub struct CompileOutput {
    pub workspace: CompileWorkspace,
    pub artifact: PathBuf,
}

/// Runs the external compiler against validated markup.
#[derive(Debug)]
pub struct TexEngine {
    config: EngineConfig,
}

impl TexEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compiles markup in the given mode.
    ///
    /// Structural validation runs first; invalid markup never reaches the
    /// compiler and never creates a workspace. On compiler failure the
    /// workspace is retained on disk with the captured logs inside it; a
    /// launch failure produces no logs and releases its workspace instead.
    pub async fn compile(
        &self,
        markup: &str,
        mode: CompileMode,
    ) -> Result<CompileOutput, CompileError> {
        let report = validator::validate(markup);
        if !report.is_valid() {
            log::error!("LaTeX validation failed: {report}");
            return Err(CompileError::InvalidMarkup { report });
        }

        let workspace = CompileWorkspace::create(mode.workspace_prefix())?;
        log::info!(
            "compiling in {} ({mode:?} mode)",
            workspace.path().display()
        );
        workspace.write_input(markup)?;
        if mode == CompileMode::Debug {
            workspace.write_debug_copy(markup)?;
        }

        let args = self.build_args(&workspace, mode);
        let outcome = match run_compiler(&self.config.program, &args, workspace.path()).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // Nothing ran, so there are no logs to keep.
                log::error!("compiler could not be launched: {err}");
                workspace.close();
                return Err(err);
            }
        };

        if mode == CompileMode::Debug {
            let mut session = String::with_capacity(outcome.stdout.len() + outcome.stderr.len());
            session.push_str(&outcome.stdout);
            session.push_str(&outcome.stderr);
            if let Err(err) = workspace.write_log(SESSION_LOG, &session) {
                log::warn!("failed to save compiler session log: {err}");
            }
        }

        if !outcome.success() {
            return Err(fail_attempt(workspace, outcome, mode));
        }

        if !workspace.has_artifact() {
            let kept = workspace.retain();
            log::error!(
                "compiler exited cleanly but produced no artifact; inputs kept in {}",
                kept.display()
            );
            return Err(CompileError::ArtifactMissing {
                path: kept.join(ARTIFACT_FILE),
            });
        }

        let artifact = workspace.artifact_path();
        Ok(CompileOutput { workspace, artifact })
    }

    /// Debug first for richer diagnostics, then one clean standard attempt.
    ///
    /// This is policy, not a correctness mechanism: each variant runs at
    /// most once in its own workspace, and a double failure surfaces the
    /// standard attempt's error. Both failed workspaces stay on disk.
    /// Invalid markup and launch failures surface immediately, without a
    /// second attempt.
    pub async fn compile_with_fallback(
        &self,
        markup: &str,
    ) -> Result<CompileOutput, CompileError> {
        match self.compile(markup, CompileMode::Debug).await {
            Ok(output) => Ok(output),
            // Validation and spawn failures are never retried.
            Err(err @ (CompileError::InvalidMarkup { .. } | CompileError::Spawn { .. })) => {
                Err(err)
            }
            Err(err) => {
                log::warn!("debug compilation failed, retrying in standard mode: {err}");
                self.compile(markup, CompileMode::Standard).await
            }
        }
    }

    fn build_args(&self, workspace: &CompileWorkspace, mode: CompileMode) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![OsString::from("-interaction=nonstopmode")];
        if mode == CompileMode::Debug {
            args.push(OsString::from("-file-line-error"));
        }
        args.push(OsString::from("-output-directory"));
        args.push(workspace.path().as_os_str().to_os_string());
        if mode == CompileMode::Debug {
            args.push(OsString::from("-recorder"));
        }
        args.push(workspace.input_path().into_os_string());
        args
    }
}

/// Persists the captured output, retains the workspace, and shapes the
/// terminal [`CompileError::Engine`] value.
fn fail_attempt(
    workspace: CompileWorkspace,
    outcome: ProcessOutcome,
    mode: CompileMode,
) -> CompileError {
    // Debug mode already persisted the merged session log.
    if mode == CompileMode::Standard {
        for (name, content) in [(STDOUT_LOG, &outcome.stdout), (STDERR_LOG, &outcome.stderr)] {
            if let Err(err) = workspace.write_log(name, content) {
                log::warn!("failed to save {name}: {err}");
            }
        }
    }
    let kept = workspace.retain();
    log::error!("compilation failed; logs kept in {}", kept.display());

    let excerpt = galley_log::excerpt(
        &outcome.stdout,
        &outcome.stderr,
        galley_log::DEFAULT_EXCERPT_LINES,
    );
    CompileError::Engine {
        exit_code: outcome.exit_code,
        excerpt: if excerpt.is_empty() {
            String::from("no compiler output captured")
        } else {
            excerpt
        },
    }
}
