//! Durable key/value storage for session records.
//!
//! The session layer persists a handful of scalar keys. The backend trait
//! mirrors that surface; implementations are an in-memory map for tests
//! and a schema-versioned JSON file for real use.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const STORE_SCHEMA_VERSION: u32 = 1;

/// Failures raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("storage io: {0}")]
	Io(#[from] std::io::Error),
	#[error("storage encoding: {0}")]
	Encoding(#[from] serde_json::Error),
}

/// Scalar key/value persistence used for session records.
pub trait StorageBackend: Send + Sync {
	/// Reads the value stored under `key`.
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Stores `value` under `key`.
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Removes `key` when present.
	fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile backend for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StorageBackend for MemoryBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.lock().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries.lock().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		self.entries.lock().remove(key);
		Ok(())
	}
}

/// On-disk format for a storage file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
	schema: u32,
	#[serde(default)]
	entries: HashMap<String, String>,
}

impl Default for StoreFile {
	fn default() -> Self {
		Self {
			schema: STORE_SCHEMA_VERSION,
			entries: HashMap::new(),
		}
	}
}

/// File-backed storage holding all keys in one JSON document.
///
/// Loading is tolerant: a missing, unreadable, or malformed file behaves
/// like an empty store rather than an error.
#[derive(Debug)]
pub struct FileBackend {
	path: PathBuf,
	file: Mutex<StoreFile>,
}

impl FileBackend {
	/// Opens (or initializes) the store at `path`.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let file = fs::read_to_string(&path)
			.ok()
			.and_then(|content| serde_json::from_str(&content).ok())
			.unwrap_or_default();
		Self {
			path,
			file: Mutex::new(file),
		}
	}

	/// Default per-user store location.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("coverlink/session.json"))
	}

	/// Returns the backing file path.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn save(&self, file: &StoreFile) -> Result<(), StorageError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(file)?;
		fs::write(&self.path, json)?;
		Ok(())
	}
}

impl StorageBackend for FileBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.file.lock().entries.get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let mut file = self.file.lock();
		file.entries.insert(key.to_string(), value.to_string());
		self.save(&file)
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		let mut file = self.file.lock();
		if file.entries.remove(key).is_none() {
			return Ok(());
		}
		if let Err(err) = self.save(&file) {
			warn!(target = "coverlink.store", path = %self.path.display(), error = %err, "failed to persist key removal");
			return Err(err);
		}
		Ok(())
	}
}
