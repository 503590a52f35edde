use crate::errors::NetError;
use crate::job::RequestJob;
use crate::request::RequestContext;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves the bytes of a file, with the MIME type guessed from its extension.
///
/// The file is opened at `start()`; an open failure is held and reported
/// through the read channel like any other job error, so the host engine sees
/// it on the same path it sees successful bytes.
pub struct FileJob {
    request: Arc<RequestContext>,
    path: PathBuf,
    file: Option<File>,
    error: Option<NetError>,
    killed: bool,
}

impl FileJob {
    pub fn new(request: Arc<RequestContext>, path: impl Into<PathBuf>) -> Self {
        Self {
            request,
            path: path.into(),
            file: None,
            error: None,
            killed: false,
        }
    }

    /// Map a URL path under a base directory, rejecting any component that
    /// would escape it. Returns a job whose reads report `FileNotFound` when
    /// the mapping is rejected.
    pub fn rooted(
        request: Arc<RequestContext>,
        base: impl Into<PathBuf>,
        url_path: &str,
    ) -> Self {
        match Self::map_path(&base.into(), url_path) {
            Some(path) => Self::new(request, path),
            None => {
                let mut job = Self::new(request, PathBuf::new());
                job.error = Some(NetError::FileNotFound);
                job
            }
        }
    }

    fn map_path(base: &Path, url_path: &str) -> Option<PathBuf> {
        let mut pb = base.to_path_buf();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" => "text/html",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

impl RequestJob for FileJob {
    fn start(&mut self) {
        if self.error.is_some() {
            return;
        }
        match File::open(&self.path) {
            Ok(file) => {
                debug!(
                    request_id = %self.request.request_id,
                    path = %self.path.display(),
                    "file job started"
                );
                self.file = Some(file);
            }
            Err(err) => {
                warn!(
                    request_id = %self.request.request_id,
                    path = %self.path.display(),
                    error = %err,
                    "file job failed to open file"
                );
                self.error = Some(NetError::from_io(&err));
            }
        }
    }

    fn kill(&mut self) {
        self.killed = true;
        self.file = None;
        debug!(request_id = %self.request.request_id, "file job killed");
    }

    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        if self.killed {
            return Err(NetError::Aborted);
        }
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match &mut self.file {
            Some(file) => file.read(buf).map_err(|err| NetError::from_io(&err)),
            // start() has not run; the adapter always starts jobs at bind time.
            None => Err(NetError::Aborted),
        }
    }

    fn mime_type(&self) -> Option<String> {
        Some(Self::content_type(&self.path).to_string())
    }
}
