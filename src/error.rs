//! Error taxonomy for tool invocations.
//!
//! Not-found conditions (unknown path/method/category/team type/tool name)
//! are not represented here: they are returned to the caller as structured
//! JSON results carrying the valid alternatives, so the caller can correct
//! the request without parsing error strings.

use thiserror::Error;

/// Failure of a single tool invocation. Never retried by this layer.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Malformed or out-of-range caller input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote API answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure (connection, timeout, malformed body).
    #[error("network error: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;
