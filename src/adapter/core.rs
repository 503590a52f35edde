use crate::coordinator::{DecisionRouter, DecisionScheduler, DecisionTask};
use crate::errors::{AdapterError, NetError};
use crate::job::{ContentFilter, Redirect, RequestJob};
use crate::jobs::{DataJob, ErrorJob, FileJob};
use crate::registry::ProtocolRegistry;
use crate::request::RequestContext;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, info, warn};

/// The concrete handling strategy bound to an adapter.
///
/// "Unselected" has no variant here; it is the adapter's pending state, and
/// [`RequestAdapter::strategy`] reports it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Literal bytes with a declared MIME type and charset.
    LiteralData,
    /// Bytes of a file on disk.
    File,
    /// A fixed error on every read.
    Error,
    /// A job produced by a registered protocol handler.
    HandlerProvided,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::LiteralData => "literal_data",
            Strategy::File => "file",
            Strategy::Error => "error",
            Strategy::HandlerProvided => "handler_provided",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-shot selection state. Written exactly once, Pending → Bound; the
/// state mutex is what makes that transition a compare-and-set.
enum Selection {
    Pending { cancel_requested: bool },
    Bound { strategy: Strategy, job: Box<dyn RequestJob> },
}

struct AdapterState {
    request: Arc<RequestContext>,
    registry: Arc<ProtocolRegistry>,
    selection: Selection,
}

fn lock(state: &Mutex<AdapterState>) -> MutexGuard<'_, AdapterState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Bind a job under an already-held state lock. A pending kill aborts the
/// job instead of starting it; the strategy is recorded either way.
fn bind(st: &mut AdapterState, strategy: Strategy, mut job: Box<dyn RequestJob>, canceled: bool) {
    if canceled {
        job.kill();
        info!(
            request_id = %st.request.request_id,
            strategy = strategy.as_str(),
            "cancellation was pending; job bound killed"
        );
    } else {
        job.start();
        info!(
            request_id = %st.request.request_id,
            strategy = strategy.as_str(),
            "strategy selected"
        );
    }
    st.selection = Selection::Bound { strategy, job };
}

fn select_on(
    state: &Mutex<AdapterState>,
    strategy: Strategy,
    build: impl FnOnce(&Arc<RequestContext>) -> Box<dyn RequestJob>,
) -> Result<(), AdapterError> {
    let mut st = lock(state);
    match st.selection {
        Selection::Bound { strategy: current, .. } => {
            warn!(
                request_id = %st.request.request_id,
                current = current.as_str(),
                attempted = strategy.as_str(),
                "selection entry point fired twice"
            );
            Err(AdapterError::AlreadySelected { current })
        }
        Selection::Pending { cancel_requested } => {
            let request = Arc::clone(&st.request);
            let job = build(&request);
            bind(&mut st, strategy, job, cancel_requested);
            Ok(())
        }
    }
}

fn select_from_handler_on(state: &Mutex<AdapterState>) -> Result<(), AdapterError> {
    let mut st = lock(state);
    let cancel_requested = match st.selection {
        Selection::Bound { strategy: current, .. } => {
            warn!(
                request_id = %st.request.request_id,
                current = current.as_str(),
                attempted = Strategy::HandlerProvided.as_str(),
                "selection entry point fired twice"
            );
            return Err(AdapterError::AlreadySelected { current });
        }
        Selection::Pending { cancel_requested } => cancel_requested,
    };

    let request = Arc::clone(&st.request);
    match st.registry.maybe_create_job(&request) {
        Some(job) => bind(&mut st, Strategy::HandlerProvided, job, cancel_requested),
        None => {
            debug!(
                request_id = %request.request_id,
                scheme = %request.scheme(),
                "no handler produced a job; degrading to not-implemented error job"
            );
            let job = Box::new(ErrorJob::new(request, NetError::NotImplemented));
            bind(&mut st, Strategy::Error, job, cancel_requested);
        }
    }
    Ok(())
}

/// Weak, cancelable reference to an adapter awaiting selection.
///
/// The coordination context holds only this; if the host engine destroys the
/// adapter before the decision runs, every entry point degrades to a logged
/// no-op instead of touching freed state.
#[derive(Clone)]
pub struct AdapterHandle {
    state: Weak<Mutex<AdapterState>>,
}

impl AdapterHandle {
    /// Whether the adapter this handle points at still exists.
    pub fn is_live(&self) -> bool {
        self.state.strong_count() > 0
    }

    fn with_state(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Mutex<AdapterState>) -> Result<(), AdapterError>,
    ) -> Result<(), AdapterError> {
        match self.state.upgrade() {
            Some(state) => f(&state),
            None => {
                debug!(operation, "adapter dropped before selection; ignoring");
                Ok(())
            }
        }
    }

    /// Bind and start a literal-data job.
    pub fn select_literal_data(
        &self,
        mime: impl Into<String>,
        charset: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<(), AdapterError> {
        let (mime, charset, data) = (mime.into(), charset.into(), data.into());
        self.with_state("select_literal_data", |state| {
            select_on(state, Strategy::LiteralData, |request| {
                Box::new(DataJob::new(Arc::clone(request), mime, charset, data))
            })
        })
    }

    /// Bind and start a file job.
    pub fn select_file(&self, path: impl Into<PathBuf>) -> Result<(), AdapterError> {
        let path = path.into();
        self.with_state("select_file", |state| {
            select_on(state, Strategy::File, |request| {
                Box::new(FileJob::new(Arc::clone(request), path))
            })
        })
    }

    /// Bind and start an error job.
    pub fn select_error(&self, error: NetError) -> Result<(), AdapterError> {
        self.with_state("select_error", |state| {
            select_on(state, Strategy::Error, |request| {
                Box::new(ErrorJob::new(Arc::clone(request), error))
            })
        })
    }

    /// Ask the protocol registry for a job; degrade to a not-implemented
    /// error job when no handler matches or the handler declines.
    pub fn select_from_handler(&self) -> Result<(), AdapterError> {
        self.with_state("select_from_handler", select_from_handler_on)
    }
}

/// The durable identity object the host engine drives for a request.
///
/// Construction binds the adapter to the host-owned request context, a
/// scheduler into the coordination context, the decision router, and the
/// protocol registry. Nothing happens until [`RequestAdapter::start`].
pub struct RequestAdapter {
    request: Arc<RequestContext>,
    state: Arc<Mutex<AdapterState>>,
    scheduler: DecisionScheduler,
    router: Arc<dyn DecisionRouter>,
    started: bool,
}

impl RequestAdapter {
    pub fn new(
        request: Arc<RequestContext>,
        scheduler: DecisionScheduler,
        router: Arc<dyn DecisionRouter>,
        registry: Arc<ProtocolRegistry>,
    ) -> Self {
        let state = Arc::new(Mutex::new(AdapterState {
            request: Arc::clone(&request),
            registry,
            selection: Selection::Pending {
                cancel_requested: false,
            },
        }));
        Self {
            request,
            state,
            scheduler,
            router,
            started: false,
        }
    }

    /// The request this adapter was matched to.
    pub fn request(&self) -> &Arc<RequestContext> {
        &self.request
    }

    /// A weak handle for the coordination context.
    pub fn handle(&self) -> AdapterHandle {
        AdapterHandle {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Schedule the decision router on the coordination context and return
    /// immediately. First call only.
    pub fn start(&mut self) -> Result<(), AdapterError> {
        if self.started {
            return Err(AdapterError::AlreadyStarted);
        }
        self.scheduler.schedule(DecisionTask {
            request: Arc::clone(&self.request),
            handle: self.handle(),
            router: Arc::clone(&self.router),
        })?;
        self.started = true;
        debug!(request_id = %self.request.request_id, "decision scheduled");
        Ok(())
    }

    /// The bound strategy, or `None` while selection is pending.
    pub fn strategy(&self) -> Option<Strategy> {
        match lock(&self.state).selection {
            Selection::Pending { .. } => None,
            Selection::Bound { strategy, .. } => Some(strategy),
        }
    }

    /// Cancel the request. Before selection this records a pending
    /// cancellation that aborts whichever job selection eventually binds;
    /// after selection it forwards to the bound job.
    pub fn kill(&self) {
        let mut st = lock(&self.state);
        match &mut st.selection {
            Selection::Pending { cancel_requested } => {
                *cancel_requested = true;
                debug!(
                    request_id = %st.request.request_id,
                    "kill before selection; cancellation pending"
                );
            }
            Selection::Bound { job, .. } => job.kill(),
        }
    }

    fn with_job<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut dyn RequestJob) -> Result<T, AdapterError>,
    ) -> Result<T, AdapterError> {
        let mut st = lock(&self.state);
        match &mut st.selection {
            Selection::Pending { .. } => {
                warn!(
                    request_id = %st.request.request_id,
                    operation,
                    "forwarding call before selection"
                );
                Err(AdapterError::NotSelected { operation })
            }
            Selection::Bound { job, .. } => f(job.as_mut()),
        }
    }

    /// Read raw bytes from the bound job. `Ok(0)` is end of data; job-level
    /// errors surface unmodified in [`AdapterError::Net`].
    pub fn read_raw(&self, buf: &mut [u8]) -> Result<usize, AdapterError> {
        self.with_job("read_raw", |job| {
            job.read_raw(buf).map_err(AdapterError::from)
        })
    }

    /// Forwarded redirect query.
    pub fn is_redirect(&self) -> Result<Option<Redirect>, AdapterError> {
        self.with_job("is_redirect", |job| Ok(job.is_redirect()))
    }

    /// Forwarded MIME type query.
    pub fn mime_type(&self) -> Result<Option<String>, AdapterError> {
        self.with_job("mime_type", |job| Ok(job.mime_type()))
    }

    /// Forwarded charset query.
    pub fn charset(&self) -> Result<Option<String>, AdapterError> {
        self.with_job("charset", |job| Ok(job.charset()))
    }

    /// Forwarded filter setup query.
    pub fn setup_filter(&self) -> Result<Option<Box<dyn ContentFilter>>, AdapterError> {
        self.with_job("setup_filter", |job| Ok(job.setup_filter()))
    }

    /// Selection entry points, mirrored for embedders that resolve the
    /// strategy synchronously on the execution context.
    pub fn select_literal_data(
        &self,
        mime: impl Into<String>,
        charset: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<(), AdapterError> {
        let (mime, charset, data) = (mime.into(), charset.into(), data.into());
        select_on(&self.state, Strategy::LiteralData, |request| {
            Box::new(DataJob::new(Arc::clone(request), mime, charset, data))
        })
    }

    pub fn select_file(&self, path: impl Into<PathBuf>) -> Result<(), AdapterError> {
        let path = path.into();
        select_on(&self.state, Strategy::File, |request| {
            Box::new(FileJob::new(Arc::clone(request), path))
        })
    }

    pub fn select_error(&self, error: NetError) -> Result<(), AdapterError> {
        select_on(&self.state, Strategy::Error, |request| {
            Box::new(ErrorJob::new(Arc::clone(request), error))
        })
    }

    pub fn select_from_handler(&self) -> Result<(), AdapterError> {
        select_from_handler_on(&self.state)
    }
}
