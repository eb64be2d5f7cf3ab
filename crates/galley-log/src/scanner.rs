use crate::ir::{EventPayload, LogEvent, Span};

/// Default line budget for [`excerpt`].
pub const DEFAULT_EXCERPT_LINES: usize = 20;

/// Scans engine console output line by line and returns recognized events.
///
/// Unrecognized lines are skipped; the scan never fails. Unlike a full log
/// parser this works on what the pipeline already captured in memory, so
/// there is no streaming or 79-column unwrapping to deal with.
pub fn scan(output: &str) -> Vec<LogEvent> {
    let mut events = Vec::new();
    let mut offset = 0usize;

    for line in output.lines() {
        let span = Span::new(offset, offset + line.len());
        offset += line.len() + 1;

        if let Some(rest) = line.strip_prefix('!') {
            events.push(LogEvent {
                span,
                payload: EventPayload::ErrorStart {
                    message: rest.trim().to_string(),
                },
            });
            continue;
        }

        if let Some(event) = scan_line_ref(line, span) {
            events.push(event);
            continue;
        }

        if is_warning(line) {
            events.push(LogEvent {
                span,
                payload: EventPayload::Warning {
                    message: line.trim_end().to_string(),
                },
            });
        }
    }

    events
}

/// Recognizes `l.<digits> <source>` lines.
fn scan_line_ref(line: &str, span: Span) -> Option<LogEvent> {
    let rest = line.strip_prefix("l.")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    let source = rest[digits.len()..].trim();
    Some(LogEvent {
        span,
        payload: EventPayload::ErrorLineRef {
            line: number,
            source_excerpt: if source.is_empty() {
                None
            } else {
                Some(source.to_string())
            },
        },
    })
}

fn is_warning(line: &str) -> bool {
    line.starts_with("LaTeX Warning:")
        || (line.starts_with("Package ") && line.contains(" Warning:"))
}

/// Builds a bounded diagnostic excerpt from captured stdout/stderr.
///
/// Preference order: typed error lines recognized in stdout, then in stderr
/// (TeX engines report errors on stdout; stderr usually only carries shell
/// noise), then the raw tail of whichever stream has content. The result
/// never exceeds `max_lines` lines.
pub fn excerpt(stdout: &str, stderr: &str, max_lines: usize) -> String {
    let mut lines = error_lines(stdout, max_lines);
    if lines.is_empty() {
        lines = error_lines(stderr, max_lines);
    }
    if lines.is_empty() {
        let source = if stderr.trim().is_empty() { stdout } else { stderr };
        lines = tail_lines(source, max_lines);
    }
    lines.join("\n")
}

fn error_lines(output: &str, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for event in scan(output) {
        match event.payload {
            EventPayload::ErrorStart { message } => lines.push(format!("! {message}")),
            EventPayload::ErrorLineRef {
                line,
                source_excerpt,
            } => lines.push(match source_excerpt {
                Some(source) => format!("l.{line} {source}"),
                None => format!("l.{line}"),
            }),
            EventPayload::Warning { .. } => {}
        }
        if lines.len() == max_lines {
            break;
        }
    }
    lines
}

fn tail_lines(output: &str, max_lines: usize) -> Vec<String> {
    let meaningful: Vec<&str> = output
        .lines()
        .rev()
        .skip_while(|l| l.trim().is_empty())
        .take(max_lines)
        .collect();
    meaningful.into_iter().rev().map(str::to_string).collect()
}
