//! Capability surface a browser wallet extension exposes to the session layer.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

use coverlink_protocol::{Principal, ServiceDescriptor};

use crate::transport::{Transport, TransportError};

/// Failures reported by a wallet provider.
#[derive(Debug, Error)]
pub enum ProviderError {
	/// The wallet extension is not present in this environment.
	#[error("wallet provider is not installed")]
	NotInstalled,
	/// The provider holds no approved connection for this application.
	#[error("no active wallet connection")]
	NotConnected,
	/// The extension reported a failure; text is preserved verbatim.
	#[error("{0}")]
	Extension(String),
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// An installed wallet extension, modeled as an explicit interface.
///
/// The session layer holds a provider behind `Arc<dyn WalletProvider>` and
/// never probes the environment directly; a single `is_installed` check at
/// the connect boundary decides whether the provider is usable at all.
pub trait WalletProvider: Send + Sync {
	/// Whether the extension is present at all.
	fn is_installed(&self) -> bool;

	/// Whether the extension currently holds an approved connection.
	fn is_connected(&self) -> bool;

	/// Prompts the user to approve a connection for `allowlist` services.
	///
	/// Resolves `true` on approval and `false` on decline. The prompt may
	/// suspend indefinitely while the user decides.
	fn request_connect<'a>(&'a self, allowlist: &'a [Principal], endpoint: &'a str) -> BoxFuture<'a, Result<bool, ProviderError>>;

	/// Builds (or returns) the signing transport for the approved connection.
	///
	/// Does not prompt; fails with [`ProviderError::NotConnected`] when no
	/// approval exists.
	fn create_signing_transport<'a>(
		&'a self,
		allowlist: &'a [Principal],
		endpoint: &'a str,
	) -> BoxFuture<'a, Result<Arc<dyn Transport>, ProviderError>>;

	/// Returns the active signing transport, when one exists.
	fn signing_transport(&self) -> Option<Arc<dyn Transport>>;

	/// Builds a provider-managed transport bound to one service.
	///
	/// This is the preferred path for signing actors; the provider signs
	/// each call against `descriptor`'s interface.
	fn create_actor<'a>(
		&'a self,
		service: &'a Principal,
		descriptor: &'static ServiceDescriptor,
	) -> BoxFuture<'a, Result<Arc<dyn Transport>, ProviderError>>;

	/// Asks the extension to drop its connection. Best-effort.
	fn disconnect(&self) -> BoxFuture<'_, Result<(), ProviderError>>;
}
