//! # Galley Core
//!
//! Pre-flight validation for the galley compilation pipeline.
//!
//! ## Overview
//!
//! Before a LaTeX document is handed to an external engine, galley runs a
//! cheap structural check over the source text: every `\begin{name}` must be
//! balanced by an `\end{name}`. An unbalanced environment is by far the most
//! common way a programmatically assembled document breaks, and catching it
//! here is much cheaper than spawning a compiler that will grind through the
//! whole preamble before failing.
//!
//! ## Modules
//!
//! - [`validator`] - Balance check over environment open/close tags
//!
//! ## Examples
//!
//! ```
//! use galley_core::validator::validate;
//!
//! let report = validate("\\begin{document}Hello\\end{document}");
//! assert!(report.is_valid());
//!
//! let report = validate("\\begin{itemize}\\item x");
//! assert!(!report.is_valid());
//! for message in report.messages() {
//!     println!("{message}");
//! }
//! ```
//!
//! The check is intentionally shallow: it compares per-name counts and does
//! not verify nesting order. `\begin{a}\begin{b}\end{a}\end{b}` passes here
//! and is left for the engine to reject.

pub mod validator;

pub use validator::{validate, EnvironmentIssue, ValidationReport};
