//! # Galley Log Scanner
//!
//! Turns the console output of a TeX engine into typed [`LogEvent`](ir::LogEvent)s
//! and builds the bounded excerpts that galley attaches to compile failures.
//!
//! ## Overview
//!
//! When an engine run fails, the interesting part of its output is a handful
//! of lines buried in hundreds of lines of package chatter. The scanner
//! recognizes:
//!
//! - `! <message>` marks an engine error start
//! - `l.<n> <source>` is the source-line reference that follows an error
//! - `LaTeX Warning:` and `Package … Warning:` lines are warnings
//!
//! [`excerpt`](scanner::excerpt) distills captured stdout/stderr into a short
//! diagnostic string: typed error lines when any were recognized, otherwise
//! the tail of whichever stream had content, always bounded in length so
//! error values stay small. The full logs are persisted to the compile
//! workspace separately; the excerpt is for error payloads only.
//!
//! ## Examples
//!
//! ```
//! use galley_log::{scan, EventPayload};
//!
//! let output = "! Undefined control sequence.\nl.42 \\badmacro\n";
//! let events = scan(output);
//!
//! assert!(matches!(&events[0].payload, EventPayload::ErrorStart { .. }));
//! assert!(matches!(&events[1].payload, EventPayload::ErrorLineRef { line: 42, .. }));
//! ```
//!
//! The event types implement `serde::Serialize`, so scans can be exported as
//! JSON (the CLI's `diagnose` subcommand does exactly that).

pub mod ir;
pub mod scanner;

pub use ir::{EventPayload, LogEvent, Span};
pub use scanner::{excerpt, scan, DEFAULT_EXCERPT_LINES};
