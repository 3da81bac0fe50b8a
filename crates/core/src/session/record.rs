//! Persisted wallet connection record and its repository facade.

use std::sync::Arc;

use tracing::warn;

use coverlink_protocol::Principal;
use coverlink_runtime::{Network, StorageBackend, StorageError};

pub(crate) const CONNECTED_KEY: &str = "wallet.connected";
pub(crate) const IDENTITY_KEY: &str = "wallet.identity";
pub(crate) const NETWORK_KEY: &str = "wallet.network";

/// Approved wallet connection as written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
	pub identity: Principal,
	pub network: Network,
}

/// Repository wrapper for the wallet connection record.
///
/// The record spans three scalar keys; a record missing any of them is
/// treated as absent and removed so restore never sees partial state.
#[derive(Clone)]
pub struct SessionRepository {
	backend: Arc<dyn StorageBackend>,
}

impl SessionRepository {
	pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
		Self { backend }
	}

	/// Loads the persisted record.
	pub fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
		if self.backend.get(CONNECTED_KEY)?.as_deref() != Some("true") {
			return Ok(None);
		}

		let identity = self.backend.get(IDENTITY_KEY)?;
		let network = self.backend.get(NETWORK_KEY)?;
		let (Some(identity), Some(network)) = (identity, network) else {
			warn!(target = "coverlink.store", "wallet record is missing keys; removing it");
			self.clear()?;
			return Ok(None);
		};

		let Ok(network) = network.parse::<Network>() else {
			warn!(target = "coverlink.store", value = %network, "wallet record names an unknown network; removing it");
			self.clear()?;
			return Ok(None);
		};

		let identity = Principal::from_text(identity);
		if !identity.is_session_identity() {
			warn!(target = "coverlink.store", "wallet record holds a non-session identity; removing it");
			self.clear()?;
			return Ok(None);
		}

		Ok(Some(SessionRecord { identity, network }))
	}

	/// Persists `record` across all of its keys.
	pub fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
		self.backend.set(CONNECTED_KEY, "true")?;
		self.backend.set(IDENTITY_KEY, record.identity.as_str())?;
		self.backend.set(NETWORK_KEY, record.network.as_str())
	}

	/// Removes the record.
	pub fn clear(&self) -> Result<(), StorageError> {
		self.backend.remove(CONNECTED_KEY)?;
		self.backend.remove(IDENTITY_KEY)?;
		self.backend.remove(NETWORK_KEY)
	}
}

#[cfg(test)]
mod tests {
	use coverlink_runtime::MemoryBackend;

	use super::*;

	fn repository() -> SessionRepository {
		SessionRepository::new(Arc::new(MemoryBackend::new()))
	}

	#[test]
	fn save_then_load_round_trips() {
		let repo = repository();
		let record = SessionRecord {
			identity: Principal::from("w3gef-eqbai"),
			network: Network::Local,
		};
		repo.save(&record).unwrap();
		assert_eq!(repo.load().unwrap(), Some(record));
	}

	#[test]
	fn absent_record_loads_as_none() {
		assert_eq!(repository().load().unwrap(), None);
	}

	#[test]
	fn partial_record_is_removed() {
		let backend = Arc::new(MemoryBackend::new());
		backend.set(CONNECTED_KEY, "true").unwrap();
		backend.set(IDENTITY_KEY, "w3gef-eqbai").unwrap();

		let repo = SessionRepository::new(backend.clone() as Arc<dyn StorageBackend>);
		assert_eq!(repo.load().unwrap(), None);
		assert_eq!(backend.get(CONNECTED_KEY).unwrap(), None);
		assert_eq!(backend.get(IDENTITY_KEY).unwrap(), None);
	}

	#[test]
	fn anonymous_identity_is_rejected() {
		let backend = Arc::new(MemoryBackend::new());
		backend.set(CONNECTED_KEY, "true").unwrap();
		backend.set(IDENTITY_KEY, "2vxsx-fae").unwrap();
		backend.set(NETWORK_KEY, "local").unwrap();

		let repo = SessionRepository::new(backend as Arc<dyn StorageBackend>);
		assert_eq!(repo.load().unwrap(), None);
	}

	#[test]
	fn unknown_network_is_rejected() {
		let backend = Arc::new(MemoryBackend::new());
		backend.set(CONNECTED_KEY, "true").unwrap();
		backend.set(IDENTITY_KEY, "w3gef-eqbai").unwrap();
		backend.set(NETWORK_KEY, "devnet9").unwrap();

		let repo = SessionRepository::new(backend as Arc<dyn StorageBackend>);
		assert_eq!(repo.load().unwrap(), None);
	}

	#[test]
	fn clear_removes_every_key() {
		let backend = Arc::new(MemoryBackend::new());
		let repo = SessionRepository::new(backend.clone() as Arc<dyn StorageBackend>);
		repo.save(&SessionRecord {
			identity: Principal::from("w3gef-eqbai"),
			network: Network::Mainnet,
		})
		.unwrap();

		repo.clear().unwrap();
		assert_eq!(backend.get(CONNECTED_KEY).unwrap(), None);
		assert_eq!(backend.get(IDENTITY_KEY).unwrap(), None);
		assert_eq!(backend.get(NETWORK_KEY).unwrap(), None);
	}
}
