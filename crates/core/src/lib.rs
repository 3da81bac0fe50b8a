//! Wallet session lifecycle and typed service actors for Coverlink.
//!
//! The entry point is [`SessionService`]: it binds a [`WalletProvider`]
//! to one deployment profile, drives connect/restore/disconnect, persists
//! the approved connection across reloads, and watches wallet liveness.
//! Typed actors for the pool, ledger, and claims services are built
//! through [`ActorFactory`]; read-only actors run over a shared anonymous
//! transport while signing actors go through the wallet.
//!
//! Wire types live in `coverlink-protocol`; providers, transports, and
//! storage backends live in `coverlink-runtime`. The construction surface
//! of both is re-exported here.

pub mod actors;
pub mod classify;
pub mod error;
pub mod recovery;
pub mod session;

pub use actors::{ActorFactory, ClaimsActor, LedgerActor, PoolActor, Query, RemoteActor, Signing, TransportMode};
pub use error::{Error, Result};
pub use recovery::{RecoverNoise, handle_remote_error};
pub use session::{
	MONITOR_INTERVAL, MonitorHandle, RestoreOutcome, SessionRecord, SessionRepository, SessionService, SessionSnapshot, SessionStatus,
	SessionStore,
};

pub use coverlink_protocol::Principal;
pub use coverlink_runtime::{Network, NetworkProfile, NetworkRegistry, StorageBackend, WalletProvider};
