//! The coordination context: a single coroutine where strategy decisions run.
//!
//! `start()` on an adapter never decides anything itself; it schedules a
//! [`DecisionTask`] here and returns. The coordination loop checks that the
//! adapter is still alive, then runs the embedder's [`DecisionRouter`] under
//! panic recovery. Policy code (registry lookups, configuration reads,
//! blocking work) therefore never stalls the context the host engine serves
//! I/O on.

use crate::adapter::AdapterHandle;
use crate::errors::AdapterError;
use crate::request::RequestContext;
use crate::runtime_config::RuntimeConfig;
use may::coroutine;
use may::sync::mpsc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// Inspects a request and invokes exactly one selection entry point on the
/// adapter handle it is given.
///
/// Runs on the coordination coroutine. Calling no entry point leaves the
/// adapter pending forever; calling more than one gets `AlreadySelected` for
/// every call after the first.
pub trait DecisionRouter: Send + Sync {
    fn decide(&self, request: &RequestContext, adapter: &AdapterHandle);
}

/// One scheduled decision: the request to inspect, a weak handle to the
/// adapter awaiting the answer, and the router that will decide.
pub struct DecisionTask {
    pub(crate) request: Arc<RequestContext>,
    pub(crate) handle: AdapterHandle,
    pub(crate) router: Arc<dyn DecisionRouter>,
}

/// Counters for the coordination loop.
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    /// Tasks accepted by a scheduler.
    scheduled: AtomicU64,
    /// Tasks whose router ran to completion.
    decided: AtomicU64,
    /// Tasks skipped because the adapter was gone before the router ran.
    canceled: AtomicU64,
    /// Tasks whose router panicked.
    panicked: AtomicU64,
}

impl CoordinatorMetrics {
    fn record_scheduled(&self) {
        self.scheduled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_decided(&self) {
        self.decided.fetch_add(1, Ordering::Relaxed);
    }

    fn record_canceled(&self) {
        self.canceled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scheduled(&self) -> u64 {
        self.scheduled.load(Ordering::Relaxed)
    }

    pub fn decided(&self) -> u64 {
        self.decided.load(Ordering::Relaxed)
    }

    pub fn canceled(&self) -> u64 {
        self.canceled.load(Ordering::Relaxed)
    }

    pub fn panicked(&self) -> u64 {
        self.panicked.load(Ordering::Relaxed)
    }
}

/// Cloneable entry point for scheduling decisions onto the coordination loop.
///
/// Every adapter holds one; the loop exits once the `Coordinator` and all
/// schedulers are dropped.
#[derive(Clone)]
pub struct DecisionScheduler {
    tx: mpsc::Sender<DecisionTask>,
    metrics: Arc<CoordinatorMetrics>,
}

impl DecisionScheduler {
    pub(crate) fn schedule(&self, task: DecisionTask) -> Result<(), AdapterError> {
        self.tx
            .send(task)
            .map_err(|_| AdapterError::CoordinationGone)?;
        self.metrics.record_scheduled();
        Ok(())
    }
}

/// Owns the coordination coroutine.
pub struct Coordinator {
    scheduler: DecisionScheduler,
    metrics: Arc<CoordinatorMetrics>,
}

impl Coordinator {
    /// Spawn the coordination coroutine and return its owner.
    ///
    /// # Safety
    ///
    /// Spawns via `may::coroutine::Builder::spawn()`, which is unsafe in the
    /// `may` runtime. The caller must ensure the may runtime is initialized
    /// before calling this.
    pub unsafe fn start(config: RuntimeConfig) -> Self {
        let (tx, rx) = mpsc::channel::<DecisionTask>();
        let metrics = Arc::new(CoordinatorMetrics::default());
        let loop_metrics = Arc::clone(&metrics);

        // SAFETY: the unsafety comes from the coroutine runtime's
        // requirements, not from this loop's logic. The task payloads are
        // Send + 'static and every failure is reported through metrics.
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .stack_size(config.stack_size)
                .spawn(move || {
                    debug!(stack_size = config.stack_size, "coordination loop started");

                    for task in rx.iter() {
                        let request_id = task.request.request_id;

                        if !task.handle.is_live() {
                            debug!(
                                request_id = %request_id,
                                "adapter dropped before decision; skipping task"
                            );
                            loop_metrics.record_canceled();
                            continue;
                        }

                        debug!(request_id = %request_id, "running decision router");

                        if let Err(panic) =
                            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                                task.router.decide(&task.request, &task.handle);
                            }))
                        {
                            error!(
                                request_id = %request_id,
                                panic_message = ?panic,
                                "decision router panicked"
                            );
                            loop_metrics.record_panicked();
                        } else {
                            loop_metrics.record_decided();
                        }
                    }

                    debug!("coordination loop exiting");
                })
        };

        if let Err(e) = spawn_result {
            error!(
                error = %e,
                stack_size = config.stack_size,
                "failed to spawn coordination coroutine"
            );
        }

        Self {
            scheduler: DecisionScheduler {
                tx,
                metrics: Arc::clone(&metrics),
            },
            metrics,
        }
    }

    /// A scheduler for wiring into adapters.
    pub fn scheduler(&self) -> DecisionScheduler {
        self.scheduler.clone()
    }

    /// Current counters.
    pub fn metrics(&self) -> &CoordinatorMetrics {
        &self.metrics
    }
}
