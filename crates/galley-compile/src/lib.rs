//! The galley compilation pipeline.
//!
//! Turns LaTeX markup into PDF bytes in five stages: structural
//! validation, an isolated scratch workspace, a managed compiler process
//! with captured output, interpretation of the exit, and artifact
//! collection. A debug attempt with richer diagnostics runs before the
//! standard one, and deployments choose between compiling locally and
//! delegating to a remote endpoint.
//!
//! Most callers only need [`PdfService`]:
//!
//! ```no_run
//! # async fn demo() -> Result<(), galley_compile::CompileError> {
//! use galley_compile::{CompilationMode, PdfService};
//!
//! let service = PdfService::new(CompilationMode::from_env());
//! let pdf = service
//!     .compile_markup("\\documentclass{article}\\begin{document}hi\\end{document}")
//!     .await?;
//! # let _ = pdf;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod runner;
pub mod service;
pub mod workspace;

pub use engine::{CompileMode, CompileOutput, EngineConfig, TexEngine, DEFAULT_ENGINE};
pub use error::CompileError;
pub use runner::{run_compiler, ProcessOutcome};
pub use service::{CompilationMode, CompileBackend, PdfService};
pub use workspace::CompileWorkspace;
