//! Session error types.

use thiserror::Error;
use xbee_protocol::FrameError;

/// Errors surfaced by the session layer.
///
/// Decode failures never appear here: the dispatcher folds them into
/// Error-kind responses so the read loop keeps running. These errors
/// belong to the caller that attempted an operation.
#[derive(Error, Debug)]
pub enum HostError {
    /// No matching response arrived within the deadline.
    #[error("timed out waiting for a response")]
    Timeout,

    /// The session (or its transport) has shut down.
    #[error("session closed")]
    Closed,

    /// A synchronous send with frame id 0 would wait forever: the module
    /// never responds to the sentinel id.
    #[error("request with frame id 0 never generates a response")]
    NoResponseExpected,

    /// A newer request reused this request's frame id before its
    /// response arrived; any late response goes to the newer sender.
    #[error("request superseded by a newer request with the same frame id")]
    Superseded,

    /// Request validation or encoding failed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The underlying byte source or sink failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}
