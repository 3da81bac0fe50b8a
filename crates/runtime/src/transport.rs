//! Remote-call transport abstraction shared by wallet and anonymous paths.

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use coverlink_protocol::{CallMode, Principal};

/// Failures raised while moving a call to a service and back.
///
/// Variants preserve the underlying message text verbatim in their
/// `Display` form; the session layer classifies errors by that text.
#[derive(Debug, Error)]
pub enum TransportError {
	/// The endpoint could not be reached or answered with a non-success status.
	#[error("transport unreachable: {0}")]
	Unreachable(String),
	/// The response failed signature or certificate verification.
	#[error("{0}")]
	Verification(String),
	/// The call did not complete within the request timeout.
	#[error("request timed out after {millis}ms")]
	Timeout { millis: u64 },
	/// The gateway answered with a JSON-RPC error object.
	#[error("rpc error {code}: {message}")]
	Rpc { code: i32, message: String },
	/// The trust-bootstrap key could not be obtained.
	#[error("fetchRootKey failed: {0}")]
	RootKeyFetch(String),
	/// The reply was not in the expected envelope.
	#[error("invalid response: {0}")]
	InvalidResponse(String),
}

/// A bidirectional path to remote services.
///
/// Implementations are either the wallet's signing transport (calls are
/// signed as the connected identity) or the anonymous HTTP transport
/// (calls carry no identity). Both are shared behind `Arc` and must be
/// safe to call concurrently.
pub trait Transport: Send + Sync {
	/// Issues `method` against `service` and returns the raw reply value.
	fn call<'a>(
		&'a self,
		service: &'a Principal,
		method: &'a str,
		mode: CallMode,
		args: Value,
	) -> BoxFuture<'a, Result<Value, TransportError>>;

	/// Reports the principal this transport currently authenticates as.
	fn identity(&self) -> BoxFuture<'_, Result<Principal, TransportError>>;
}
