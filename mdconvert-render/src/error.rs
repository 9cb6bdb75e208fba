//! Rendering errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found; install it or set its path in the config")]
    ToolNotFound(String),

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}
