//! End-to-end tests for the adapter: start → coordination hop → selection →
//! forwarded reads, plus the contract-violation paths.

use http::Method;
use jobrelay::{
    AdapterError, AdapterHandle, Coordinator, DecisionRouter, NetError, ProtocolRegistry,
    RequestAdapter, RequestContext, RuntimeConfig, Strategy,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

mod common;

use tracing_util::TestTracing;

struct LiteralRouter;

impl DecisionRouter for LiteralRouter {
    fn decide(&self, _request: &RequestContext, adapter: &AdapterHandle) {
        adapter
            .select_literal_data("text/plain", "utf-8", b"hello".to_vec())
            .unwrap();
    }
}

struct ErrorRouter;

impl DecisionRouter for ErrorRouter {
    fn decide(&self, _request: &RequestContext, adapter: &AdapterHandle) {
        adapter.select_error(NetError::NotImplemented).unwrap();
    }
}

struct FileRouter {
    path: PathBuf,
}

impl DecisionRouter for FileRouter {
    fn decide(&self, _request: &RequestContext, adapter: &AdapterHandle) {
        adapter.select_file(self.path.clone()).unwrap();
    }
}

fn new_adapter(router: Arc<dyn DecisionRouter>, coordinator: &Coordinator) -> RequestAdapter {
    let request = Arc::new(RequestContext::new(
        Method::GET,
        Url::parse("app://bundle/hello.txt").unwrap(),
    ));
    RequestAdapter::new(
        request,
        coordinator.scheduler(),
        router,
        Arc::new(ProtocolRegistry::new()),
    )
}

fn read_to_end(adapter: &RequestAdapter) -> Result<Vec<u8>, AdapterError> {
    let mut out = Vec::new();
    let mut buf = [0u8; 2];
    loop {
        let n = adapter.read_raw(&mut buf)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
    }
}

fn wait_for_selection(adapter: &RequestAdapter) {
    assert!(
        common::wait_until(Duration::from_secs(2), || adapter.strategy().is_some()),
        "decision never landed"
    );
}

#[test]
fn test_literal_data_selection_serves_bytes() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let mut adapter = new_adapter(Arc::new(LiteralRouter), &coordinator);

    adapter.start().unwrap();
    wait_for_selection(&adapter);

    assert_eq!(adapter.strategy(), Some(Strategy::LiteralData));
    assert_eq!(read_to_end(&adapter).unwrap(), b"hello");
    assert_eq!(adapter.mime_type().unwrap().as_deref(), Some("text/plain"));
    assert_eq!(adapter.charset().unwrap().as_deref(), Some("utf-8"));
    assert_eq!(adapter.is_redirect().unwrap(), None);
    assert!(adapter.setup_filter().unwrap().is_none());
    assert_eq!(coordinator.metrics().decided(), 1);
}

#[test]
fn test_start_is_one_shot() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let mut adapter = new_adapter(Arc::new(LiteralRouter), &coordinator);

    adapter.start().unwrap();
    assert_eq!(adapter.start(), Err(AdapterError::AlreadyStarted));
}

#[test]
fn test_error_selection_fails_every_read() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let mut adapter = new_adapter(Arc::new(ErrorRouter), &coordinator);

    adapter.start().unwrap();
    wait_for_selection(&adapter);

    assert_eq!(adapter.strategy(), Some(Strategy::Error));
    let mut buf = [0u8; 16];
    assert_eq!(
        adapter.read_raw(&mut buf),
        Err(AdapterError::Net(NetError::NotImplemented))
    );
    // The error is stable over repeated reads.
    assert_eq!(
        adapter.read_raw(&mut buf),
        Err(AdapterError::Net(NetError::NotImplemented))
    );
    assert_eq!(adapter.mime_type().unwrap(), None);
}

#[test]
fn test_file_selection_round_trips_file_bytes() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let payload: &[u8] = &[0x00, 0x01, 0xFE, 0xFF, b'!', b'\n'];
    let file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .unwrap();
    std::fs::write(file.path(), payload).unwrap();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let router = Arc::new(FileRouter {
        path: file.path().to_path_buf(),
    });
    let mut adapter = new_adapter(router, &coordinator);

    adapter.start().unwrap();
    wait_for_selection(&adapter);

    assert_eq!(adapter.strategy(), Some(Strategy::File));
    assert_eq!(read_to_end(&adapter).unwrap(), payload);
    assert_eq!(adapter.mime_type().unwrap().as_deref(), Some("text/plain"));
    assert_eq!(adapter.charset().unwrap(), None);
}

#[test]
fn test_forwarding_before_selection_is_an_explicit_error() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let adapter = new_adapter(Arc::new(LiteralRouter), &coordinator);

    // Not started, nothing selected.
    let mut buf = [0u8; 4];
    assert_eq!(
        adapter.read_raw(&mut buf),
        Err(AdapterError::NotSelected {
            operation: "read_raw"
        })
    );
    assert!(matches!(
        adapter.is_redirect(),
        Err(AdapterError::NotSelected { .. })
    ));
    assert!(matches!(
        adapter.charset(),
        Err(AdapterError::NotSelected { .. })
    ));
    assert!(matches!(
        adapter.setup_filter(),
        Err(AdapterError::NotSelected { .. })
    ));
}

#[test]
fn test_kill_after_selection_forwards_to_the_job() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let mut adapter = new_adapter(Arc::new(LiteralRouter), &coordinator);

    adapter.start().unwrap();
    wait_for_selection(&adapter);

    adapter.kill();
    let mut buf = [0u8; 4];
    assert_eq!(
        adapter.read_raw(&mut buf),
        Err(AdapterError::Net(NetError::Aborted))
    );
}

#[test]
fn test_kill_before_selection_aborts_the_eventual_job() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let adapter = new_adapter(Arc::new(LiteralRouter), &coordinator);

    // Kill while still pending: recorded, then applied at selection time.
    adapter.kill();
    adapter
        .select_literal_data("text/plain", "utf-8", b"never served".to_vec())
        .unwrap();

    assert_eq!(adapter.strategy(), Some(Strategy::LiteralData));
    let mut buf = [0u8; 4];
    assert_eq!(
        adapter.read_raw(&mut buf),
        Err(AdapterError::Net(NetError::Aborted))
    );
}

#[test]
fn test_selection_is_one_shot_across_variants() {
    let _tracing = TestTracing::init();
    common::setup_may_runtime();

    let coordinator = unsafe { Coordinator::start(RuntimeConfig::default()) };
    let adapter = new_adapter(Arc::new(LiteralRouter), &coordinator);

    adapter.select_error(NetError::FileNotFound).unwrap();
    assert_eq!(
        adapter.select_file("/tmp/ignored"),
        Err(AdapterError::AlreadySelected {
            current: Strategy::Error
        })
    );
    assert_eq!(
        adapter.select_from_handler(),
        Err(AdapterError::AlreadySelected {
            current: Strategy::Error
        })
    );
    assert_eq!(adapter.strategy(), Some(Strategy::Error));
}
