//! Cache backend for entity store reads.
//!
//! A single in-memory implementation: the cache lives per process, next
//! to the UI it serves, so there is no remote backend to select.

mod memory;

pub use memory::RequestCache;
