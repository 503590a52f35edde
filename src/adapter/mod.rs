//! The deferred-dispatch request adapter.
//!
//! One [`RequestAdapter`] is the stable identity the host engine drives for a
//! request's whole lifetime, no matter which concrete job ends up serving it.
//! Selection is one-shot and one-way: pending until a [`crate::coordinator::DecisionRouter`]
//! fires exactly one entry point, bound forever after.

mod core;

pub use self::core::{AdapterHandle, RequestAdapter, Strategy};
