//! Wire types for the Coverlink services.
//!
//! This crate contains the serde-serializable types used for communication
//! with the staking pool, token ledger, and claims services. These types
//! represent the "protocol layer" - the shapes of data as they appear on
//! the wire - plus the static interface descriptions actors are bound to.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with the services: Match each service's published interface
//! * Stable: Changes only when a service interface changes
//!
//! Higher-level ergonomic APIs are built on top of these types in `coverlink`.

pub mod claims;
pub mod describe;
pub mod ledger;
pub mod pool;
pub mod types;

pub use claims::*;
pub use describe::*;
pub use ledger::*;
pub use pool::*;
pub use types::*;
