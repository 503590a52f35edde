//! Protocol handler registry, keyed by URL scheme.
//!
//! A [`ProtocolHandler`] is the pluggable strategy source: given a request it
//! may produce a job, or decline. The registry only stores and looks up
//! handlers; the degrade-to-error policy when nothing matches lives in the
//! adapter's `select_from_handler`.

use crate::job::RequestJob;
use crate::request::RequestContext;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An external source of concrete jobs for a URL scheme.
pub trait ProtocolHandler: Send + Sync {
    /// Produce a job for the request, or decline with `None`.
    ///
    /// Called on the coordination context, under the adapter's state lock;
    /// implementations must only construct the job, never call back into the
    /// adapter.
    fn maybe_create_job(&self, request: &Arc<RequestContext>) -> Option<Box<dyn RequestJob>>;
}

/// Scheme → handler map consulted by handler-provided selection.
#[derive(Default, Clone)]
pub struct ProtocolRegistry {
    handlers: HashMap<String, Arc<dyn ProtocolHandler>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a scheme. An existing handler for the same
    /// scheme is replaced.
    pub fn register(&mut self, scheme: impl Into<String>, handler: Arc<dyn ProtocolHandler>) {
        let scheme = scheme.into();
        if self.handlers.remove(&scheme).is_some() {
            warn!(scheme = %scheme, "replaced existing protocol handler");
        }
        info!(
            scheme = %scheme,
            total_handlers = self.handlers.len() + 1,
            "protocol handler registered"
        );
        self.handlers.insert(scheme, handler);
    }

    /// Look up the handler for a scheme.
    pub fn lookup(&self, scheme: &str) -> Option<&Arc<dyn ProtocolHandler>> {
        self.handlers.get(scheme)
    }

    /// Ask the handler for the request's scheme to produce a job.
    ///
    /// `None` means either no handler is registered for the scheme or the
    /// handler declined.
    pub fn maybe_create_job(
        &self,
        request: &Arc<RequestContext>,
    ) -> Option<Box<dyn RequestJob>> {
        let scheme = request.scheme();
        match self.handlers.get(scheme) {
            Some(handler) => handler.maybe_create_job(request),
            None => {
                debug!(
                    request_id = %request.request_id,
                    scheme = %scheme,
                    "no protocol handler registered for scheme"
                );
                None
            }
        }
    }
}
