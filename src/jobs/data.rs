use crate::errors::NetError;
use crate::job::RequestJob;
use crate::request::RequestContext;
use std::sync::Arc;
use tracing::debug;

/// Serves a literal byte payload with a declared MIME type and charset.
pub struct DataJob {
    request: Arc<RequestContext>,
    mime: String,
    charset: String,
    data: Vec<u8>,
    pos: usize,
    killed: bool,
}

impl DataJob {
    pub fn new(
        request: Arc<RequestContext>,
        mime: impl Into<String>,
        charset: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            request,
            mime: mime.into(),
            charset: charset.into(),
            data: data.into(),
            pos: 0,
            killed: false,
        }
    }

    /// Serve a serialized JSON value as `application/json; charset=utf-8`.
    pub fn json(request: Arc<RequestContext>, value: &serde_json::Value) -> Self {
        Self::new(request, "application/json", "utf-8", value.to_string())
    }
}

impl RequestJob for DataJob {
    fn start(&mut self) {
        debug!(
            request_id = %self.request.request_id,
            mime = %self.mime,
            len = self.data.len(),
            "data job started"
        );
    }

    fn kill(&mut self) {
        self.killed = true;
        debug!(request_id = %self.request.request_id, "data job killed");
    }

    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        if self.killed {
            return Err(NetError::Aborted);
        }
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }

    fn mime_type(&self) -> Option<String> {
        Some(self.mime.clone())
    }

    fn charset(&self) -> Option<String> {
        Some(self.charset.clone())
    }
}
