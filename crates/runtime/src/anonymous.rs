//! Anonymous HTTP transport for read-only queries.
//!
//! Speaks JSON-RPC 2.0 against a deployment gateway. Calls carry no
//! signing identity; [`Transport::identity`] always reports the anonymous
//! principal. On networks with an ad-hoc signing key the transport fetches
//! the gateway's root key once before first use and caches it for the
//! transport's lifetime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use coverlink_protocol::{CallMode, Principal};

use crate::network::Network;
use crate::transport::{Transport, TransportError};

/// Per-request timeout applied to every gateway call.
const REQUEST_TIMEOUT_MS: u64 = 30_000;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
	jsonrpc: &'static str,
	method: String,
	params: Value,
	id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
	result: Option<T>,
	error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
	code: i32,
	message: String,
}

#[derive(Debug, Deserialize)]
struct GatewayStatus {
	#[serde(default)]
	root_key: Option<String>,
}

/// Read-only transport bound to one gateway endpoint.
pub struct AnonymousTransport {
	endpoint: Url,
	client: reqwest::Client,
	bootstrap: bool,
	root_key: OnceCell<String>,
}

impl AnonymousTransport {
	/// Creates a transport for `endpoint` on `network`.
	///
	/// The endpoint is parsed up front so a misconfigured gateway URL
	/// fails here instead of on the first call.
	pub fn new(endpoint: impl AsRef<str>, network: Network) -> Result<Self, TransportError> {
		let endpoint = Url::parse(endpoint.as_ref())
			.map_err(|err| TransportError::Unreachable(format!("invalid endpoint `{}`: {err}", endpoint.as_ref())))?;
		let client = reqwest::Client::builder()
			.timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
			.build()
			.map_err(|err| TransportError::Unreachable(err.to_string()))?;

		Ok(Self {
			endpoint,
			client,
			bootstrap: network.requires_trust_bootstrap(),
			root_key: OnceCell::new(),
		})
	}

	/// Performs the one-time trust bootstrap when the network needs it.
	///
	/// Success is cached; a failure is reported as a classifiable
	/// [`TransportError::RootKeyFetch`] and retried on the next call.
	pub async fn ensure_ready(&self) -> Result<(), TransportError> {
		if !self.bootstrap {
			return Ok(());
		}
		self.root_key
			.get_or_try_init(|| async { self.fetch_root_key().await })
			.await?;
		Ok(())
	}

	/// Whether the trust bootstrap has completed (or was never needed).
	pub fn is_ready(&self) -> bool {
		!self.bootstrap || self.root_key.initialized()
	}

	async fn fetch_root_key(&self) -> Result<String, TransportError> {
		let status: GatewayStatus = self
			.rpc("status", serde_json::json!({}))
			.await
			.map_err(|err| TransportError::RootKeyFetch(err.to_string()))?;

		let Some(root_key) = status.root_key else {
			return Err(TransportError::RootKeyFetch("gateway reported no root key".to_string()));
		};

		debug!(target = "coverlink.transport", endpoint = %self.endpoint, "gateway root key fetched");
		Ok(root_key)
	}

	async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, TransportError> {
		let request = JsonRpcRequest {
			jsonrpc: "2.0",
			method: method.to_string(),
			params,
			id: REQUEST_ID.fetch_add(1, Ordering::SeqCst),
		};

		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&request)
			.send()
			.await
			.map_err(|err| {
				if err.is_timeout() {
					TransportError::Timeout { millis: REQUEST_TIMEOUT_MS }
				} else {
					TransportError::Unreachable(err.to_string())
				}
			})?;

		if !response.status().is_success() {
			return Err(TransportError::Unreachable(format!("HTTP {}", response.status())));
		}

		let reply: JsonRpcResponse<T> = response
			.json()
			.await
			.map_err(|err| TransportError::InvalidResponse(err.to_string()))?;

		if let Some(error) = reply.error {
			return Err(TransportError::Rpc {
				code: error.code,
				message: error.message,
			});
		}

		reply
			.result
			.ok_or_else(|| TransportError::InvalidResponse("missing result in gateway reply".to_string()))
	}
}

impl Transport for AnonymousTransport {
	fn call<'a>(
		&'a self,
		service: &'a Principal,
		method: &'a str,
		mode: CallMode,
		args: Value,
	) -> BoxFuture<'a, Result<Value, TransportError>> {
		Box::pin(async move {
			let params = serde_json::json!({
				"service": service,
				"mode": mode,
				"args": args,
			});
			self.rpc(method, params).await
		})
	}

	fn identity(&self) -> BoxFuture<'_, Result<Principal, TransportError>> {
		Box::pin(async { Ok(Principal::anonymous()) })
	}
}
