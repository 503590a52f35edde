//! # jobrelay
//!
//! **jobrelay** is a deferred-dispatch request-job adapter for coroutine
//! services built on the [`may`](https://docs.rs/may) runtime. A single
//! [`RequestAdapter`] is handed to the host network engine as the job for a
//! request; *which* concrete job actually serves it — literal data, a file,
//! an error, or a job from a pluggable protocol handler — is decided
//! asynchronously on a coordination coroutine, off the hot I/O path.
//!
//! ## Architecture
//!
//! - **[`adapter`]** - The [`RequestAdapter`] state machine, its weak
//!   [`AdapterHandle`], and the one-shot selection entry points
//! - **[`coordinator`]** - The coordination coroutine where
//!   [`DecisionRouter`]s run, with scheduling metrics
//! - **[`job`]** - The uniform [`RequestJob`] capability interface plus
//!   [`Redirect`] and [`ContentFilter`]
//! - **[`jobs`]** - Built-in concrete jobs: [`DataJob`], [`FileJob`],
//!   [`ErrorJob`]
//! - **[`registry`]** - Scheme-keyed [`ProtocolRegistry`] of
//!   [`ProtocolHandler`]s
//! - **[`request`]** - The host-owned [`RequestContext`] shared by adapter
//!   and job
//! - **[`errors`]** - [`NetError`] (job-level) and [`AdapterError`]
//!   (contract violations)
//! - **[`telemetry`]** - `tracing` setup with env-driven format and filtering
//! - **[`runtime_config`]** - Coroutine stack sizing from the environment
//!
//! ### Selection Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host Engine
//!     participant Adapter as RequestAdapter
//!     participant Coord as Coordination coroutine
//!     participant Router as DecisionRouter
//!     participant Job as Concrete Job
//!
//!     Host->>Adapter: start()
//!     Adapter->>Coord: schedule DecisionTask (weak handle)
//!     Adapter-->>Host: returns immediately (pending)
//!     Coord->>Coord: handle still live?
//!     Coord->>Router: decide(request, handle)
//!     Router->>Adapter: select_file(path)  [exactly one entry point]
//!     Adapter->>Job: construct + start()
//!     Host->>Adapter: read_raw / mime_type / charset / kill
//!     Adapter->>Job: forwarded uniformly, unmodified
//! ```
//!
//! Selection is one-shot and one-way: pending → exactly one of
//! `{literal_data, file, error, handler_provided}`, never back. If the host
//! destroys the adapter while the decision is still queued, the coordination
//! coroutine observes a dead handle and the decision becomes a no-op.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jobrelay::{
//!     AdapterHandle, Coordinator, DecisionRouter, ProtocolRegistry, RequestAdapter,
//!     RequestContext, RuntimeConfig,
//! };
//! use http::Method;
//! use std::sync::Arc;
//! use url::Url;
//!
//! struct BundleRouter;
//!
//! impl DecisionRouter for BundleRouter {
//!     fn decide(&self, request: &RequestContext, adapter: &AdapterHandle) {
//!         if request.url.path().ends_with(".html") {
//!             let _ = adapter.select_file("/srv/bundle/index.html");
//!         } else {
//!             let _ = adapter.select_from_handler();
//!         }
//!     }
//! }
//!
//! let coordinator = unsafe { Coordinator::start(RuntimeConfig::from_env()) };
//! let request = Arc::new(RequestContext::new(
//!     Method::GET,
//!     Url::parse("app://bundle/index.html").unwrap(),
//! ));
//! let mut adapter = RequestAdapter::new(
//!     request,
//!     coordinator.scheduler(),
//!     Arc::new(BundleRouter),
//!     Arc::new(ProtocolRegistry::new()),
//! );
//! adapter.start().unwrap();
//! // The host engine polls/reads once the decision lands:
//! // adapter.read_raw(&mut buf), adapter.mime_type(), ...
//! ```

pub mod adapter;
pub mod coordinator;
pub mod errors;
pub mod ids;
pub mod job;
pub mod jobs;
pub mod registry;
pub mod request;
pub mod runtime_config;
pub mod telemetry;

pub use adapter::{AdapterHandle, RequestAdapter, Strategy};
pub use coordinator::{Coordinator, CoordinatorMetrics, DecisionRouter, DecisionScheduler};
pub use errors::{AdapterError, NetError};
pub use ids::RequestId;
pub use job::{ContentFilter, Redirect, RequestJob};
pub use jobs::{DataJob, ErrorJob, FileJob};
pub use registry::{ProtocolHandler, ProtocolRegistry};
pub use request::{HeaderVec, RequestContext, MAX_INLINE_HEADERS};
pub use runtime_config::RuntimeConfig;
