//! Child-process execution with incremental output capture.

use crate::error::CompileError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// What a compiler run produced: exit status plus both captured streams.
///
/// A non-zero exit code is data here, not an error. Interpreting it is the
/// orchestrator's call.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs the compiler to completion in `working_dir`, capturing both output
/// streams.
///
/// Output is accumulated line by line as the child emits it (and echoed at
/// debug level), so a chatty compiler never blocks on a full pipe. The only
/// failure at this layer is failing to launch the executable; everything
/// the process itself reports comes back inside [`ProcessOutcome`].
///
/// No timeout is imposed. The call suspends until the child exits.
pub async fn run_compiler(
    program: &Path,
    args: &[OsString],
    working_dir: &Path,
) -> Result<ProcessOutcome, CompileError> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CompileError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    let stdout = child.stdout.take().ok_or_else(|| pipe_error("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| pipe_error("stderr"))?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    let stdout_handle = tokio::spawn(async move {
        let mut acc = String::new();
        while let Ok(Some(line)) = stdout_reader.next_line().await {
            log::debug!("[stdout] {}", line);
            acc.push_str(&line);
            acc.push('\n');
        }
        acc
    });

    let stderr_handle = tokio::spawn(async move {
        let mut acc = String::new();
        while let Ok(Some(line)) = stderr_reader.next_line().await {
            log::debug!("[stderr] {}", line);
            acc.push_str(&line);
            acc.push('\n');
        }
        acc
    });

    let status = child.wait().await.map_err(|source| CompileError::Io {
        context: String::from("failed waiting for compiler exit"),
        source,
    })?;
    let (stdout_res, stderr_res) = tokio::join!(stdout_handle, stderr_handle);

    Ok(ProcessOutcome {
        exit_code: status.code(),
        stdout: stdout_res.unwrap_or_default(),
        stderr: stderr_res.unwrap_or_default(),
    })
}

fn pipe_error(stream: &str) -> CompileError {
    CompileError::Io {
        context: format!("failed to open child {stream}"),
        source: std::io::Error::other("pipe was not captured"),
    }
}
