//! Wallet session lifecycle subsystem.
//!
//! This module centralizes session state and its observers, the persisted
//! connection record, the liveness monitor, and the connect/restore/
//! disconnect orchestration.

/// Background watchdog over the wallet identity.
pub mod monitor;
/// Persisted connection record and its repository.
pub mod record;
/// Connect/restore/disconnect facade.
pub mod service;
/// Authoritative session state and snapshot publishing.
pub mod store;

/// Default spacing between monitor checks.
pub use monitor::MONITOR_INTERVAL;
/// Handle cancelling a running monitor.
pub use monitor::MonitorHandle;
/// Persisted wallet connection record.
pub use record::SessionRecord;
/// Repository over the persisted record.
pub use record::SessionRepository;
/// Result of a restore attempt.
pub use service::RestoreOutcome;
/// Session lifecycle entry point.
pub use service::SessionService;
/// Observable session state.
pub use store::SessionSnapshot;
/// Connection phase of the session.
pub use store::SessionStatus;
/// Shared session state and epoch-guarded transitions.
pub use store::SessionStore;
