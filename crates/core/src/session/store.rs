//! Authoritative in-memory session state with epoch-guarded transitions.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use coverlink_protocol::Principal;
use coverlink_runtime::{Network, Transport, WalletProvider};

use super::record::{SessionRecord, SessionRepository};

/// Connection phase of the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
	Disconnected,
	Connecting,
	Connected,
	Reauthenticating,
}

/// Cloneable read model published to session observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
	pub status: SessionStatus,
	pub identity: Option<Principal>,
	pub network: Option<Network>,
}

impl SessionSnapshot {
	pub fn is_connected(&self) -> bool {
		self.status == SessionStatus::Connected
	}

	fn disconnected() -> Self {
		Self {
			status: SessionStatus::Disconnected,
			identity: None,
			network: None,
		}
	}
}

struct Session {
	status: SessionStatus,
	identity: Option<Principal>,
	network: Option<Network>,
	transport: Option<Arc<dyn Transport>>,
	epoch: u64,
}

impl Session {
	fn disconnected(epoch: u64) -> Self {
		Self {
			status: SessionStatus::Disconnected,
			identity: None,
			network: None,
			transport: None,
			epoch,
		}
	}
}

/// Session state shared by the facade, the monitor, and actor bindings.
///
/// Multi-step transitions claim an epoch with a `begin_*` call and commit
/// with [`complete`]; a commit whose epoch is no longer current is refused,
/// so whichever operation claimed last wins.
///
/// [`complete`]: Self::complete
pub struct SessionStore {
	session: RwLock<Session>,
	repository: SessionRepository,
	provider: Arc<dyn WalletProvider>,
	publisher: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
	pub fn new(repository: SessionRepository, provider: Arc<dyn WalletProvider>) -> Self {
		let (publisher, _) = watch::channel(SessionSnapshot::disconnected());
		Self {
			session: RwLock::new(Session::disconnected(0)),
			repository,
			provider,
			publisher,
		}
	}

	/// Current connection phase.
	pub fn status(&self) -> SessionStatus {
		self.session.read().status
	}

	/// Current observable state.
	pub fn snapshot(&self) -> SessionSnapshot {
		Self::snapshot_of(&self.session.read())
	}

	/// Subscribes to snapshot changes.
	pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
		self.publisher.subscribe()
	}

	/// Transport of the active session, when connected.
	pub fn transport(&self) -> Option<Arc<dyn Transport>> {
		self.session.read().transport.clone()
	}

	/// Reads the persisted record without touching live state.
	pub fn restore_hint(&self) -> Option<SessionRecord> {
		match self.repository.load() {
			Ok(record) => record,
			Err(err) => {
				warn!(target = "coverlink.store", error = %err, "failed to read wallet record");
				None
			}
		}
	}

	/// Commits a connected session unconditionally and persists the record.
	///
	/// Re-connecting with the session's current identity and network only
	/// refreshes the transport.
	pub fn connect(&self, identity: Principal, network: Network, transport: Arc<dyn Transport>) -> SessionSnapshot {
		let mut session = self.session.write();
		if session.status == SessionStatus::Connected && session.identity.as_ref() == Some(&identity) && session.network == Some(network) {
			session.transport = Some(transport);
			return Self::snapshot_of(&session);
		}

		let epoch = session.epoch + 1;
		*session = Session {
			status: SessionStatus::Connected,
			identity: Some(identity.clone()),
			network: Some(network),
			transport: Some(transport),
			epoch,
		};
		let snapshot = Self::snapshot_of(&session);
		self.publish(&session);
		drop(session);

		info!(target = "coverlink.session", identity = %identity, network = %network, "wallet session connected");
		self.persist(&SessionRecord { identity, network });
		snapshot
	}

	/// Claims the session for a connect attempt.
	pub fn begin_connecting(&self) -> u64 {
		let mut session = self.session.write();
		let epoch = session.epoch + 1;
		*session = Session {
			status: SessionStatus::Connecting,
			identity: None,
			network: None,
			transport: None,
			epoch,
		};
		self.publish(&session);
		epoch
	}

	/// Claims the session for a restore attempt over a persisted record.
	///
	/// The record's identity and network stay visible while the attempt
	/// runs, so observers can render the returning user.
	pub fn begin_reauthenticating(&self, record: &SessionRecord) -> u64 {
		let mut session = self.session.write();
		let epoch = session.epoch + 1;
		*session = Session {
			status: SessionStatus::Reauthenticating,
			identity: Some(record.identity.clone()),
			network: Some(record.network),
			transport: None,
			epoch,
		};
		self.publish(&session);
		epoch
	}

	/// Commits a claimed attempt; refuses when `epoch` is no longer current.
	pub fn complete(&self, epoch: u64, identity: Principal, network: Network, transport: Arc<dyn Transport>) -> bool {
		let mut session = self.session.write();
		if session.epoch != epoch {
			debug!(target = "coverlink.session", "commit superseded by a newer session change");
			return false;
		}

		*session = Session {
			status: SessionStatus::Connected,
			identity: Some(identity.clone()),
			network: Some(network),
			transport: Some(transport),
			epoch,
		};
		self.publish(&session);
		drop(session);

		info!(target = "coverlink.session", identity = %identity, network = %network, "wallet session connected");
		self.persist(&SessionRecord { identity, network });
		true
	}

	/// Resets a claimed attempt back to disconnected; refuses when stale.
	pub fn abandon(&self, epoch: u64) -> bool {
		let mut session = self.session.write();
		if session.epoch != epoch {
			return false;
		}
		*session = Session::disconnected(epoch + 1);
		self.publish(&session);
		true
	}

	/// Tears the session down.
	///
	/// Local state is reset first and always succeeds; clearing the record
	/// and releasing the provider transport are best-effort.
	pub async fn disconnect(&self) {
		{
			let mut session = self.session.write();
			let epoch = session.epoch + 1;
			*session = Session::disconnected(epoch);
			self.publish(&session);
		}
		self.teardown().await;
	}

	/// Tears the session down only when `epoch` is still current.
	///
	/// Lets a failed attempt clean up without clobbering whatever newer
	/// operation superseded it.
	pub async fn disconnect_if_current(&self, epoch: u64) -> bool {
		if !self.abandon(epoch) {
			return false;
		}
		self.teardown().await;
		true
	}

	async fn teardown(&self) {
		if let Err(err) = self.repository.clear() {
			warn!(target = "coverlink.store", error = %err, "failed to clear wallet record");
		}
		if let Err(err) = self.provider.disconnect().await {
			warn!(target = "coverlink.session", error = %err, "wallet provider disconnect failed");
		}
		info!(target = "coverlink.session", "wallet session disconnected");
	}

	fn persist(&self, record: &SessionRecord) {
		if let Err(err) = self.repository.save(record) {
			warn!(target = "coverlink.store", error = %err, "failed to persist wallet record");
		} else {
			debug!(target = "coverlink.store", identity = %record.identity, "saved wallet record");
		}
	}

	fn publish(&self, session: &Session) {
		self.publisher.send_replace(Self::snapshot_of(session));
	}

	fn snapshot_of(session: &Session) -> SessionSnapshot {
		SessionSnapshot {
			status: session.status,
			identity: session.identity.clone(),
			network: session.network,
		}
	}
}

#[cfg(test)]
mod tests {
	use coverlink_runtime::MemoryBackend;
	use coverlink_runtime::fake::{FakeProviderBuilder, FakeTransportBuilder};

	use super::*;

	fn store() -> SessionStore {
		let (provider, _controller) = FakeProviderBuilder::new().build();
		let repository = SessionRepository::new(Arc::new(MemoryBackend::new()));
		SessionStore::new(repository, provider)
	}

	fn transport() -> Arc<dyn Transport> {
		let (transport, _controller) = FakeTransportBuilder::new().build();
		transport
	}

	#[test]
	fn connect_publishes_and_persists() {
		let store = store();
		let mut updates = store.subscribe();

		let snapshot = store.connect(Principal::from("w3gef-eqbai"), Network::Local, transport());
		assert!(snapshot.is_connected());
		assert_eq!(snapshot.identity, Some(Principal::from("w3gef-eqbai")));
		assert_eq!(snapshot.network, Some(Network::Local));

		assert!(updates.has_changed().unwrap());
		assert_eq!(*updates.borrow_and_update(), snapshot);

		let record = store.restore_hint().unwrap();
		assert_eq!(record.network, Network::Local);
	}

	#[test]
	fn reconnecting_with_same_session_is_idempotent() {
		let store = store();
		let first = store.connect(Principal::from("w3gef-eqbai"), Network::Local, transport());
		let second = store.connect(Principal::from("w3gef-eqbai"), Network::Local, transport());
		assert_eq!(first, second);
		assert!(store.transport().is_some());
	}

	#[test]
	fn stale_commit_is_refused() {
		let store = store();
		let stale = store.begin_connecting();
		let current = store.begin_connecting();

		assert!(!store.complete(stale, Principal::from("w3gef-eqbai"), Network::Local, transport()));
		assert_eq!(store.status(), SessionStatus::Connecting);

		assert!(store.complete(current, Principal::from("w3gef-eqbai"), Network::Local, transport()));
		assert_eq!(store.status(), SessionStatus::Connected);
	}

	#[test]
	fn reauthenticating_keeps_record_identity_visible() {
		let store = store();
		let record = SessionRecord {
			identity: Principal::from("w3gef-eqbai"),
			network: Network::Testnet,
		};
		store.begin_reauthenticating(&record);

		let snapshot = store.snapshot();
		assert_eq!(snapshot.status, SessionStatus::Reauthenticating);
		assert_eq!(snapshot.identity, Some(record.identity));
		assert_eq!(snapshot.network, Some(Network::Testnet));
		assert!(store.transport().is_none());
	}

	#[test]
	fn abandon_only_applies_to_the_current_attempt() {
		let store = store();
		let stale = store.begin_connecting();
		let current = store.begin_connecting();

		assert!(!store.abandon(stale));
		assert_eq!(store.status(), SessionStatus::Connecting);

		assert!(store.abandon(current));
		assert_eq!(store.status(), SessionStatus::Disconnected);
	}

	#[test]
	fn abandon_invalidates_the_abandoned_epoch() {
		let store = store();
		let epoch = store.begin_connecting();
		assert!(store.abandon(epoch));
		assert!(!store.complete(epoch, Principal::from("w3gef-eqbai"), Network::Local, transport()));
		assert_eq!(store.status(), SessionStatus::Disconnected);
	}

	#[tokio::test]
	async fn disconnect_clears_state_record_and_provider() {
		let (provider, controller) = FakeProviderBuilder::new().build();
		let repository = SessionRepository::new(Arc::new(MemoryBackend::new()));
		let store = SessionStore::new(repository, provider);

		store.connect(Principal::from("w3gef-eqbai"), Network::Local, transport());
		store.disconnect().await;

		assert_eq!(store.status(), SessionStatus::Disconnected);
		assert!(store.restore_hint().is_none());
		assert!(store.transport().is_none());
		assert_eq!(controller.disconnect_count(), 1);
	}

	#[tokio::test]
	async fn disconnect_invalidates_inflight_attempts() {
		let store = store();
		let epoch = store.begin_connecting();
		store.disconnect().await;
		assert!(!store.complete(epoch, Principal::from("w3gef-eqbai"), Network::Local, transport()));
		assert_eq!(store.status(), SessionStatus::Disconnected);
	}

	#[tokio::test]
	async fn guarded_disconnect_spares_a_newer_attempt() {
		let store = store();
		let stale = store.begin_connecting();
		let current = store.begin_connecting();

		assert!(!store.disconnect_if_current(stale).await);
		assert_eq!(store.status(), SessionStatus::Connecting);

		assert!(store.disconnect_if_current(current).await);
		assert_eq!(store.status(), SessionStatus::Disconnected);
	}
}
