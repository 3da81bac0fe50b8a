//! Wallet provider lifecycle, transports, and network registry.
//!
//! This crate hosts the seams between the session layer and the outside
//! world: the [`WalletProvider`] capability surface a browser wallet
//! exposes, the [`Transport`] trait remote calls travel over, the
//! anonymous HTTP transport for read-only queries, durable key/value
//! storage for session records, and the per-network deployment registry.
//!
//! Higher-level session orchestration lives in `coverlink`.

pub mod anonymous;
pub mod fake;
pub mod network;
pub mod provider;
pub mod storage;
pub mod transport;

pub use anonymous::AnonymousTransport;
pub use network::{Network, NetworkProfile, NetworkRegistry, ParseNetworkError, ServiceIds};
pub use provider::{ProviderError, WalletProvider};
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use transport::{Transport, TransportError};
