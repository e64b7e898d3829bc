//! Claims Review Engine
//!
//! The orchestrating service between the HTTP layer and the domain: it owns
//! the store/cache pair, normalizes and scores rows on read, and applies the
//! status-transition workflow on write.

pub mod engine;
pub mod error;

pub use engine::{ClaimQuery, ClaimsEngine, ClaimsList, ListParams, RiskAnalysis};
pub use error::EngineError;
