//! Error types shared across the session and actor layers.

use thiserror::Error;

use coverlink_runtime::{ProviderError, StorageError, TransportError};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for session and actor operations.
#[derive(Debug, Error)]
pub enum Error {
	/// The user dismissed or rejected the wallet connect prompt.
	#[error("wallet connection was declined")]
	ConnectDeclined,

	/// A signing operation was requested without an active wallet session.
	#[error("no wallet session; connect first")]
	NoWalletSession,

	/// A newer session change landed while this operation was in flight.
	#[error("superseded by a newer session change")]
	Superseded,

	/// The method is not part of the service interface.
	#[error("service `{service}` has no method `{method}`")]
	UnknownMethod { service: &'static str, method: String },

	/// The method mutates state and needs a signing transport.
	#[error("method `{method}` requires a signing session")]
	SigningRequired { method: String },

	#[error("failed to encode arguments for `{method}`: {source}")]
	EncodeArgs {
		method: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to decode reply from `{method}`: {source}")]
	DecodeReply {
		method: String,
		#[source]
		source: serde_json::Error,
	},

	#[error(transparent)]
	Provider(#[from] ProviderError),

	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error(transparent)]
	Storage(#[from] StorageError),
}
