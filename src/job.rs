//! The capability interface every concrete job implements.
//!
//! The adapter stores one `Box<dyn RequestJob>` and calls it uniformly; no
//! type tag, no downcast. Variants that have nothing to say for a query keep
//! the default (`None`) answers.

use crate::errors::NetError;
use http::StatusCode;
use url::Url;

/// A redirect answer from a job's `is_redirect` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Where the request should be redirected to.
    pub location: Url,
    /// The redirect status code (301, 302, ...).
    pub status: StatusCode,
}

/// A content filter a job may install between its raw bytes and the host
/// engine, e.g. a decompressor. The adapter forwards the query and never
/// applies the filter itself.
pub trait ContentFilter: Send {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Transform a chunk of raw bytes, appending the result to `output`.
    fn filter(&mut self, input: &[u8], output: &mut Vec<u8>);
}

/// The uniform job interface the adapter delegates to once a strategy is
/// selected.
///
/// `read_raw` fills as much of `buf` as it can and returns the byte count;
/// `Ok(0)` means end of data. Errors are reported through [`NetError`] and
/// surface to the host unmodified.
pub trait RequestJob: Send {
    /// Begin producing data. Called exactly once, by the adapter, at bind time.
    fn start(&mut self);

    /// Cancel the job. Subsequent reads report [`NetError::Aborted`] unless
    /// the job defines a more specific terminal state.
    fn kill(&mut self);

    /// Read raw bytes into `buf`.
    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, NetError>;

    /// Whether this job's response is a redirect.
    fn is_redirect(&self) -> Option<Redirect> {
        None
    }

    /// MIME type of the response, if the job knows one.
    fn mime_type(&self) -> Option<String> {
        None
    }

    /// Charset of the response, if the job knows one.
    fn charset(&self) -> Option<String> {
        None
    }

    /// Content filter to install, if any.
    fn setup_filter(&self) -> Option<Box<dyn ContentFilter>> {
        None
    }
}
