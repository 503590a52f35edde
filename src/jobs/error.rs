use crate::errors::NetError;
use crate::job::RequestJob;
use crate::request::RequestContext;
use std::sync::Arc;
use tracing::debug;

/// Reports a fixed error on every read; never produces bytes.
///
/// Bound directly by `select_error`, and also the degrade target when the
/// protocol registry yields no job for a handler-provided selection.
pub struct ErrorJob {
    request: Arc<RequestContext>,
    error: NetError,
}

impl ErrorJob {
    pub fn new(request: Arc<RequestContext>, error: NetError) -> Self {
        Self { request, error }
    }

    /// The error this job reports.
    pub fn error(&self) -> &NetError {
        &self.error
    }
}

impl RequestJob for ErrorJob {
    fn start(&mut self) {
        debug!(
            request_id = %self.request.request_id,
            error = %self.error,
            status = %self.error.status(),
            "error job started"
        );
    }

    fn kill(&mut self) {
        // Already terminal; reads keep reporting the configured error.
    }

    fn read_raw(&mut self, _buf: &mut [u8]) -> Result<usize, NetError> {
        Err(self.error.clone())
    }
}
