//! External tool execution

use crate::error::{PreviewError, PreviewResult};
use std::ffi::{OsStr, OsString};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Max number of stderr lines kept in error messages
const STDERR_TAIL_LINES: usize = 20;

/// Render a command line for logs and error messages
pub(crate) fn display_command(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Keep the last `STDERR_TAIL_LINES` lines of a tool's stderr
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Run `program` to completion and return its output.
///
/// Fails with `CommandFailed` if the program cannot be spawned and
/// `CommandExecution` if it exits unsuccessfully.
pub(crate) fn run_tool<I, S>(program: &str, args: I) -> PreviewResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect();
    let command = display_command(program, &args);
    debug!("Executing: {}", command);

    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| PreviewError::command_failed(&command, e))?;

    if !output.status.success() {
        return Err(PreviewError::command_exec(
            command,
            stderr_tail(&output.stderr),
        ));
    }

    Ok(output)
}
