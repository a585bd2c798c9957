//! Entity cache

mod cache;

pub use cache::Cache;
