//! Fake provider and transport for unit testing session flows.
//!
//! Provides in-memory stand-ins for a wallet extension so the session
//! layer can be exercised without a browser.
//!
//! # Example
//!
//! ```ignore
//! let (provider, controller) = FakeProviderBuilder::new()
//!     .identity(Principal::from("w3gef-eqbai"))
//!     .build();
//!
//! controller.transport().push_response(json!({ "Ok": 3 }));
//! let approved = provider.request_connect(&allowlist, "http://127.0.0.1:4943").await?;
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;

use coverlink_protocol::{CallMode, Principal, ServiceDescriptor};

use crate::provider::{ProviderError, WalletProvider};
use crate::transport::{Transport, TransportError};

/// One call captured by a fake transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
	pub service: Principal,
	pub method: String,
	pub mode: CallMode,
	pub args: Value,
}

/// One connect prompt captured by the fake provider.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
	pub allowlist: Vec<Principal>,
	pub endpoint: String,
}

struct TransportState {
	identity: Mutex<Principal>,
	identity_failure: Mutex<Option<String>>,
	identity_queries: AtomicU64,
	responses: Mutex<VecDeque<Result<Value, TransportError>>>,
	calls: Mutex<Vec<RecordedCall>>,
}

impl TransportState {
	fn new(identity: Principal) -> Self {
		Self {
			identity: Mutex::new(identity),
			identity_failure: Mutex::new(None),
			identity_queries: AtomicU64::new(0),
			responses: Mutex::new(VecDeque::new()),
			calls: Mutex::new(Vec::new()),
		}
	}
}

/// In-memory transport with scripted replies and call recording.
pub struct FakeTransport {
	state: Arc<TransportState>,
}

impl Transport for FakeTransport {
	fn call<'a>(
		&'a self,
		service: &'a Principal,
		method: &'a str,
		mode: CallMode,
		args: Value,
	) -> BoxFuture<'a, Result<Value, TransportError>> {
		let state = Arc::clone(&self.state);
		Box::pin(async move {
			state.calls.lock().push(RecordedCall {
				service: service.clone(),
				method: method.to_string(),
				mode,
				args,
			});
			match state.responses.lock().pop_front() {
				Some(reply) => reply,
				None => Err(TransportError::InvalidResponse(format!("no scripted reply for `{method}`"))),
			}
		})
	}

	fn identity(&self) -> BoxFuture<'_, Result<Principal, TransportError>> {
		let state = Arc::clone(&self.state);
		Box::pin(async move {
			state.identity_queries.fetch_add(1, Ordering::SeqCst);
			if let Some(message) = state.identity_failure.lock().clone() {
				return Err(TransportError::Unreachable(message));
			}
			Ok(state.identity.lock().clone())
		})
	}
}

/// Controller for scripting a [`FakeTransport`] and inspecting its calls.
#[derive(Clone)]
pub struct FakeTransportController {
	state: Arc<TransportState>,
}

impl FakeTransportController {
	/// Queues a successful reply for the next call.
	pub fn push_response(&self, value: Value) {
		self.state.responses.lock().push_back(Ok(value));
	}

	/// Queues a failing reply for the next call.
	pub fn push_error(&self, error: TransportError) {
		self.state.responses.lock().push_back(Err(error));
	}

	/// Changes the identity the transport reports.
	pub fn set_identity(&self, identity: Principal) {
		*self.state.identity.lock() = identity;
	}

	/// Makes identity queries fail until [`clear_identity_failure`] is called.
	///
	/// [`clear_identity_failure`]: Self::clear_identity_failure
	pub fn fail_identity(&self, message: impl Into<String>) {
		*self.state.identity_failure.lock() = Some(message.into());
	}

	/// Restores successful identity queries.
	pub fn clear_identity_failure(&self) {
		*self.state.identity_failure.lock() = None;
	}

	/// Number of identity queries issued so far.
	pub fn identity_queries(&self) -> u64 {
		self.state.identity_queries.load(Ordering::SeqCst)
	}

	/// Takes all recorded calls, clearing the buffer.
	pub fn take_calls(&self) -> Vec<RecordedCall> {
		std::mem::take(&mut *self.state.calls.lock())
	}
}

/// Builder for standalone fake transports.
pub struct FakeTransportBuilder {
	identity: Principal,
}

impl FakeTransportBuilder {
	pub fn new() -> Self {
		Self {
			identity: Principal::anonymous(),
		}
	}

	/// Sets the identity the transport reports.
	pub fn identity(mut self, identity: Principal) -> Self {
		self.identity = identity;
		self
	}

	/// Builds the transport and its controller.
	pub fn build(self) -> (Arc<FakeTransport>, FakeTransportController) {
		let state = Arc::new(TransportState::new(self.identity));
		let transport = Arc::new(FakeTransport { state: Arc::clone(&state) });
		(transport, FakeTransportController { state })
	}
}

impl Default for FakeTransportBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ProviderState {
	installed: AtomicBool,
	connected: AtomicBool,
	decline_next: AtomicBool,
	disconnect_failure: Mutex<Option<String>>,
	disconnects: AtomicU64,
	connect_requests: Mutex<Vec<ConnectRequest>>,
	transport: Mutex<Option<Arc<FakeTransport>>>,
	transport_state: Arc<TransportState>,
}

impl ProviderState {
	fn ensure_transport(&self) -> Arc<FakeTransport> {
		let mut slot = self.transport.lock();
		match slot.as_ref() {
			Some(transport) => Arc::clone(transport),
			None => {
				let transport = Arc::new(FakeTransport {
					state: Arc::clone(&self.transport_state),
				});
				*slot = Some(Arc::clone(&transport));
				transport
			}
		}
	}
}

/// In-memory wallet provider with controllable approval and lifecycle.
pub struct FakeWalletProvider {
	state: Arc<ProviderState>,
}

impl WalletProvider for FakeWalletProvider {
	fn is_installed(&self) -> bool {
		self.state.installed.load(Ordering::SeqCst)
	}

	fn is_connected(&self) -> bool {
		self.state.connected.load(Ordering::SeqCst)
	}

	fn request_connect<'a>(&'a self, allowlist: &'a [Principal], endpoint: &'a str) -> BoxFuture<'a, Result<bool, ProviderError>> {
		let state = Arc::clone(&self.state);
		Box::pin(async move {
			state.connect_requests.lock().push(ConnectRequest {
				allowlist: allowlist.to_vec(),
				endpoint: endpoint.to_string(),
			});
			if !state.installed.load(Ordering::SeqCst) {
				return Err(ProviderError::NotInstalled);
			}
			if state.decline_next.swap(false, Ordering::SeqCst) {
				return Ok(false);
			}
			state.connected.store(true, Ordering::SeqCst);
			state.ensure_transport();
			Ok(true)
		})
	}

	fn create_signing_transport<'a>(
		&'a self,
		_allowlist: &'a [Principal],
		_endpoint: &'a str,
	) -> BoxFuture<'a, Result<Arc<dyn Transport>, ProviderError>> {
		let state = Arc::clone(&self.state);
		Box::pin(async move {
			if !state.connected.load(Ordering::SeqCst) {
				return Err(ProviderError::NotConnected);
			}
			Ok(state.ensure_transport() as Arc<dyn Transport>)
		})
	}

	fn signing_transport(&self) -> Option<Arc<dyn Transport>> {
		self.state
			.transport
			.lock()
			.as_ref()
			.map(|transport| Arc::clone(transport) as Arc<dyn Transport>)
	}

	fn create_actor<'a>(
		&'a self,
		_service: &'a Principal,
		_descriptor: &'static ServiceDescriptor,
	) -> BoxFuture<'a, Result<Arc<dyn Transport>, ProviderError>> {
		let state = Arc::clone(&self.state);
		Box::pin(async move {
			if !state.connected.load(Ordering::SeqCst) {
				return Err(ProviderError::NotConnected);
			}
			Ok(state.ensure_transport() as Arc<dyn Transport>)
		})
	}

	fn disconnect(&self) -> BoxFuture<'_, Result<(), ProviderError>> {
		let state = Arc::clone(&self.state);
		Box::pin(async move {
			state.disconnects.fetch_add(1, Ordering::SeqCst);
			if let Some(message) = state.disconnect_failure.lock().clone() {
				return Err(ProviderError::Extension(message));
			}
			state.connected.store(false, Ordering::SeqCst);
			*state.transport.lock() = None;
			Ok(())
		})
	}
}

/// Controller steering a [`FakeWalletProvider`] from tests.
#[derive(Clone)]
pub struct FakeProviderController {
	state: Arc<ProviderState>,
}

impl FakeProviderController {
	/// Installs or removes the extension.
	pub fn set_installed(&self, installed: bool) {
		self.state.installed.store(installed, Ordering::SeqCst);
	}

	/// Forces the extension-side connection flag.
	pub fn set_connected(&self, connected: bool) {
		self.state.connected.store(connected, Ordering::SeqCst);
		if connected {
			self.state.ensure_transport();
		}
	}

	/// Makes the next connect prompt resolve to a decline.
	pub fn decline_next_connect(&self) {
		self.state.decline_next.store(true, Ordering::SeqCst);
	}

	/// Makes provider disconnects fail with `message`.
	pub fn fail_disconnect(&self, message: impl Into<String>) {
		*self.state.disconnect_failure.lock() = Some(message.into());
	}

	/// Drops the active transport while leaving the connection flag alone.
	pub fn drop_transport(&self) {
		*self.state.transport.lock() = None;
	}

	/// Changes the identity the signing transport reports.
	pub fn set_identity(&self, identity: Principal) {
		*self.state.transport_state.identity.lock() = identity;
	}

	/// Controller for the provider's signing transport.
	pub fn transport(&self) -> FakeTransportController {
		FakeTransportController {
			state: Arc::clone(&self.state.transport_state),
		}
	}

	/// Takes all recorded connect prompts.
	pub fn take_connect_requests(&self) -> Vec<ConnectRequest> {
		std::mem::take(&mut *self.state.connect_requests.lock())
	}

	/// Number of disconnects asked of the extension.
	pub fn disconnect_count(&self) -> u64 {
		self.state.disconnects.load(Ordering::SeqCst)
	}
}

/// Builder for fake providers.
pub struct FakeProviderBuilder {
	installed: bool,
	identity: Principal,
}

impl FakeProviderBuilder {
	pub fn new() -> Self {
		Self {
			installed: true,
			identity: Principal::from("w3gef-eqbai"),
		}
	}

	/// Whether the extension reports as installed.
	pub fn installed(mut self, installed: bool) -> Self {
		self.installed = installed;
		self
	}

	/// Identity the signing transport reports after approval.
	pub fn identity(mut self, identity: Principal) -> Self {
		self.identity = identity;
		self
	}

	/// Builds the provider and its controller.
	pub fn build(self) -> (Arc<FakeWalletProvider>, FakeProviderController) {
		let state = Arc::new(ProviderState {
			installed: AtomicBool::new(self.installed),
			connected: AtomicBool::new(false),
			decline_next: AtomicBool::new(false),
			disconnect_failure: Mutex::new(None),
			disconnects: AtomicU64::new(0),
			connect_requests: Mutex::new(Vec::new()),
			transport: Mutex::new(None),
			transport_state: Arc::new(TransportState::new(self.identity)),
		});
		let provider = Arc::new(FakeWalletProvider { state: Arc::clone(&state) });
		(provider, FakeProviderController { state })
	}
}

impl Default for FakeProviderBuilder {
	fn default() -> Self {
		Self::new()
	}
}
