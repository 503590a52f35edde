//! Error taxonomy for the adapter and its concrete jobs.
//!
//! Two layers, kept deliberately separate:
//!
//! - [`NetError`] is what a concrete job reports through `read_raw`. The
//!   adapter never translates or suppresses these; they surface to the host
//!   engine exactly as the job produced them, wrapped only in the transparent
//!   [`AdapterError::Net`] variant.
//! - [`AdapterError`] covers contract violations on the adapter itself:
//!   starting twice, selecting twice, forwarding before a strategy is
//!   selected, or scheduling onto a coordination context that has shut down.
//!   These are programmer errors made diagnosable instead of assertions.

use crate::adapter::Strategy;
use http::StatusCode;
use std::fmt;

/// Job-level error reported through the forwarded read channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// No protocol handler was willing to serve the request.
    NotImplemented,
    /// The file backing a file job does not exist.
    FileNotFound,
    /// The file backing a file job exists but cannot be opened.
    AccessDenied,
    /// The job was killed before or during the read.
    Aborted,
    /// An underlying I/O operation failed mid-read.
    Io {
        /// Description of the failed operation.
        message: String,
    },
}

impl NetError {
    /// HTTP status code the host engine should report for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            NetError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            NetError::FileNotFound => StatusCode::NOT_FOUND,
            NetError::AccessDenied => StatusCode::FORBIDDEN,
            NetError::Aborted => StatusCode::BAD_GATEWAY,
            NetError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an I/O error from a file open or read into the job taxonomy.
    pub(crate) fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => NetError::FileNotFound,
            std::io::ErrorKind::PermissionDenied => NetError::AccessDenied,
            _ => NetError::Io {
                message: err.to_string(),
            },
        }
    }
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::NotImplemented => write!(f, "no handler implements this request"),
            NetError::FileNotFound => write!(f, "file not found"),
            NetError::AccessDenied => write!(f, "access denied"),
            NetError::Aborted => write!(f, "request aborted"),
            NetError::Io { message } => write!(f, "i/o error: {}", message),
        }
    }
}

impl std::error::Error for NetError {}

/// Contract violation on the adapter surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// `start()` was called more than once.
    AlreadyStarted,
    /// A selection entry point fired after a strategy was already bound.
    AlreadySelected {
        /// The strategy that is already bound.
        current: Strategy,
    },
    /// A forwarding call arrived before any strategy was selected.
    NotSelected {
        /// The forwarding operation that was attempted.
        operation: &'static str,
    },
    /// The coordination context has shut down; the decision cannot be scheduled.
    CoordinationGone,
    /// A job-level error, passed through unmodified.
    Net(NetError),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::AlreadyStarted => {
                write!(f, "adapter start() called more than once")
            }
            AdapterError::AlreadySelected { current } => {
                write!(
                    f,
                    "strategy already selected ({}); selection is one-shot",
                    current
                )
            }
            AdapterError::NotSelected { operation } => {
                write!(
                    f,
                    "{} called before a strategy was selected for this request",
                    operation
                )
            }
            AdapterError::CoordinationGone => {
                write!(f, "coordination context is gone; cannot schedule decision")
            }
            AdapterError::Net(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdapterError::Net(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NetError> for AdapterError {
    fn from(err: NetError) -> Self {
        AdapterError::Net(err)
    }
}
