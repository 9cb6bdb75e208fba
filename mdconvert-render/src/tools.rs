//! Locating and running external programs.

use crate::error::RenderError;
use std::env;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use which::which;

/// Find a program: explicit path first, then an environment variable, then
/// the first candidate name found on `PATH`.
pub(crate) fn resolve_tool(
    explicit: Option<&Path>,
    env_var: &str,
    candidates: &[&str],
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env::var_os(env_var) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    candidates.iter().find_map(|name| which(name).ok())
}

/// Run a program to completion, capturing its output
///
/// No timeout is applied; a renderer may take as long as it needs.
pub(crate) fn run_tool<I, S>(program: &Path, args: I) -> Result<Output, RenderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = tool_name(program);
    tracing::debug!("Running {}", tool);

    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            RenderError::ToolNotFound(tool.clone())
        } else {
            RenderError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(RenderError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

pub(crate) fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
