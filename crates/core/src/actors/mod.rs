//! Typed remote actors over the wallet transports.
//!
//! This module centralizes descriptor-checked service calls, the
//! query/signing capability split, and actor construction against a
//! network profile.

/// Typed actor for the claims service.
pub mod claims;
/// Actor construction bound to a network profile and session.
pub mod factory;
/// Descriptor-checked call handle and transport capability markers.
pub mod handle;
/// Typed actor for the ledger service.
pub mod ledger;
/// Typed actor for the pool service.
pub mod pool;

/// Claims service actor.
pub use claims::ClaimsActor;
/// Actor constructor bound to one network profile.
pub use factory::ActorFactory;
/// Marker for read-only query bindings.
pub use handle::Query;
/// Descriptor-checked remote call handle.
pub use handle::RemoteActor;
/// Marker for wallet-signed bindings.
pub use handle::Signing;
/// Capability marker implemented by [`Query`] and [`Signing`].
pub use handle::TransportMode;
/// Ledger service actor.
pub use ledger::LedgerActor;
/// Pool service actor.
pub use pool::PoolActor;
