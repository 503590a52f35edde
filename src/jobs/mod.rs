//! Built-in concrete jobs: literal data, file, and error.
//!
//! These are the three strategies the adapter can bind without consulting the
//! protocol registry. Anything else comes from a [`crate::registry::ProtocolHandler`].

mod data;
mod error;
mod file;

pub use data::DataJob;
pub use error::ErrorJob;
pub use file::FileJob;
