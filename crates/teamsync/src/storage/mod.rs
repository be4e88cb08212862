//! Entity store backends and decorators.
//!
//! `CachedStore` wraps any backend with the read-side cache and rate
//! limiter. The `inmemory` feature (default) provides a local document
//! store for tests and development; production deployments wire in a
//! client for the remote entity API instead.

mod cached;

#[cfg(feature = "inmemory")]
mod inmemory;

pub use cached::CachedStore;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;
