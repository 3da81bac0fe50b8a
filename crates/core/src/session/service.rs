//! High-level session orchestration over the wallet provider.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use coverlink_runtime::{NetworkProfile, ProviderError, StorageBackend, WalletProvider};

use super::monitor::{MONITOR_INTERVAL, MonitorHandle, spawn_monitor};
use super::record::SessionRepository;
use super::store::{SessionSnapshot, SessionStatus, SessionStore};
use crate::actors::ActorFactory;
use crate::error::{Error, Result};

/// What became of a restore attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
	/// Nothing was persisted; the wallet was never contacted.
	NoRecord,
	/// The persisted session is live again.
	Restored(SessionSnapshot),
	/// The record could not be re-verified and has been cleared.
	Rejected,
	/// A newer session operation took over before the attempt committed.
	Superseded,
}

/// Entry point for the wallet session lifecycle.
///
/// One service binds one wallet provider to one deployment profile. It
/// owns the session store, the persisted record, and the liveness monitor;
/// typed service actors are built through [`actors`].
///
/// [`actors`]: Self::actors
pub struct SessionService {
	profile: NetworkProfile,
	provider: Arc<dyn WalletProvider>,
	store: Arc<SessionStore>,
	repository: SessionRepository,
	factory: ActorFactory,
	monitor: Mutex<Option<MonitorHandle>>,
	check_interval: Duration,
}

impl SessionService {
	pub fn new(provider: Arc<dyn WalletProvider>, profile: NetworkProfile, backend: Arc<dyn StorageBackend>) -> Self {
		let repository = SessionRepository::new(backend);
		let store = Arc::new(SessionStore::new(repository.clone(), Arc::clone(&provider)));
		let factory = ActorFactory::new(profile.clone(), Arc::clone(&provider), Arc::clone(&store));
		Self {
			profile,
			provider,
			store,
			repository,
			factory,
			monitor: Mutex::new(None),
			check_interval: MONITOR_INTERVAL,
		}
	}

	/// Overrides the monitor's check interval.
	pub fn with_check_interval(mut self, interval: Duration) -> Self {
		self.check_interval = interval;
		self
	}

	/// Deployment profile this service binds to.
	pub fn profile(&self) -> &NetworkProfile {
		&self.profile
	}

	/// Current connection phase.
	pub fn status(&self) -> SessionStatus {
		self.store.status()
	}

	/// Current observable state.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.store.snapshot()
	}

	/// Subscribes to snapshot changes.
	pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
		self.store.subscribe()
	}

	/// Actor constructor sharing this service's session.
	pub fn actors(&self) -> ActorFactory {
		self.factory.clone()
	}

	/// Prompts the wallet for a connection and establishes the session.
	///
	/// Idempotent while a matching session is live. Any failure after the
	/// prompt resets the session to disconnected, unless a newer operation
	/// has already taken over.
	pub async fn connect(&self) -> Result<SessionSnapshot> {
		if !self.provider.is_installed() {
			return Err(ProviderError::NotInstalled.into());
		}

		let current = self.store.snapshot();
		if current.is_connected() {
			if current.network == Some(self.profile.network) && self.provider.is_connected() {
				return Ok(current);
			}
			// The live session no longer matches; start over.
			self.disarm_monitor();
			self.store.disconnect().await;
		}

		let epoch = self.store.begin_connecting();
		match self.drive_connect(epoch).await {
			Ok(snapshot) => {
				self.arm_monitor();
				Ok(snapshot)
			}
			Err(err) => {
				self.store.disconnect_if_current(epoch).await;
				Err(err)
			}
		}
	}

	async fn drive_connect(&self, epoch: u64) -> Result<SessionSnapshot> {
		let allowlist = self.profile.allowlist();
		if !self.provider.request_connect(&allowlist, &self.profile.endpoint).await? {
			return Err(Error::ConnectDeclined);
		}

		let transport = self.provider.create_signing_transport(&allowlist, &self.profile.endpoint).await?;
		let identity = transport.identity().await?;
		if !identity.is_session_identity() {
			return Err(ProviderError::Extension("wallet reported an anonymous identity".to_string()).into());
		}

		if !self.store.complete(epoch, identity, self.profile.network, transport) {
			return Err(Error::Superseded);
		}
		Ok(self.store.snapshot())
	}

	/// Attempts to revive the persisted session without prompting.
	///
	/// The record is only a hint. The wallet must still hold the approval
	/// and report a session identity, which is adopted as truth even when
	/// it differs from the record. Every rejection clears the record.
	pub async fn restore(&self) -> RestoreOutcome {
		let Some(record) = self.store.restore_hint() else {
			return RestoreOutcome::NoRecord;
		};

		if record.network != self.profile.network {
			info!(
				target = "coverlink.session",
				recorded = %record.network,
				profile = %self.profile.network,
				"wallet record is for another network; discarding it"
			);
			if let Err(err) = self.repository.clear() {
				warn!(target = "coverlink.store", error = %err, "failed to clear wallet record");
			}
			return RestoreOutcome::Rejected;
		}

		let epoch = self.store.begin_reauthenticating(&record);

		if !self.provider.is_installed() || !self.provider.is_connected() {
			info!(target = "coverlink.session", "wallet no longer holds the connection; discarding record");
			return self.reject_restore(epoch).await;
		}

		let allowlist = self.profile.allowlist();
		let transport = match self.provider.create_signing_transport(&allowlist, &self.profile.endpoint).await {
			Ok(transport) => transport,
			Err(err) => {
				debug!(target = "coverlink.session", error = %err, "could not rebuild the signing transport");
				return self.reject_restore(epoch).await;
			}
		};

		let identity = match transport.identity().await {
			Ok(identity) => identity,
			Err(err) => {
				debug!(target = "coverlink.session", error = %err, "identity re-check failed; discarding record");
				return self.reject_restore(epoch).await;
			}
		};
		if !identity.is_session_identity() {
			info!(target = "coverlink.session", "wallet reports an anonymous identity; discarding record");
			return self.reject_restore(epoch).await;
		}
		if identity != record.identity {
			debug!(target = "coverlink.session", "wallet identity changed since the record was written");
		}

		if !self.store.complete(epoch, identity, record.network, transport) {
			return RestoreOutcome::Superseded;
		}
		self.arm_monitor();
		RestoreOutcome::Restored(self.store.snapshot())
	}

	/// Ends the session. Always succeeds locally.
	pub async fn disconnect(&self) {
		self.disarm_monitor();
		self.store.disconnect().await;
	}

	/// Cancels the monitor without touching session state.
	///
	/// Dropping the service cancels it too.
	pub fn shutdown(&self) {
		self.disarm_monitor();
	}

	async fn reject_restore(&self, epoch: u64) -> RestoreOutcome {
		if self.store.disconnect_if_current(epoch).await {
			RestoreOutcome::Rejected
		} else {
			RestoreOutcome::Superseded
		}
	}

	fn arm_monitor(&self) {
		let handle = spawn_monitor(Arc::clone(&self.store), Arc::clone(&self.provider), self.check_interval);
		// Replacing the slot drops and thereby aborts any previous task.
		*self.monitor.lock() = Some(handle);
	}

	fn disarm_monitor(&self) {
		*self.monitor.lock() = None;
	}
}
