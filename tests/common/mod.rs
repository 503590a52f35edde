#![allow(dead_code)]

use std::sync::Once;
use std::time::{Duration, Instant};

/// Ensures the may runtime is configured only once per test binary.
static MAY_INIT: Once = Once::new();

pub fn setup_may_runtime() {
    MAY_INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
    });
}

/// Poll `predicate` until it holds or `timeout` elapses. Decisions land on
/// the coordination coroutine, so tests wait for them rather than assume
/// ordering with the test thread.
pub fn wait_until(timeout: Duration, predicate: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    predicate()
}
