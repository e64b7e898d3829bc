//! Claims Data Access Layer
//!
//! The engine's boundary to persistent state: the [`ClaimStore`] port, a
//! PostgreSQL adapter, an in-memory adapter for tests, and the process-wide
//! [`ReadCache`] that mirrors the store for fast reads.

pub mod cache;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::ReadCache;
pub use error::StoreError;
pub use memory::MemoryClaimStore;
pub use postgres::PgClaimStore;
pub use store::ClaimStore;
