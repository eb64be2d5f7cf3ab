use serde::{Deserialize, Serialize};

/// Byte range in the scanned output that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One recognized line of engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub span: Span,
    #[serde(flatten)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum EventPayload {
    /// A line starting with `!`: the engine reporting an error.
    ErrorStart { message: String },
    /// An `l.<n>` line referencing the offending source line, usually
    /// immediately after an `ErrorStart`.
    ErrorLineRef {
        line: u32,
        source_excerpt: Option<String>,
    },
    /// A `LaTeX Warning:` or `Package … Warning:` line.
    Warning { message: String },
}
