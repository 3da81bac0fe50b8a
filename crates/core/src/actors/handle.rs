//! Service-agnostic actor handle bound to one transport mode.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use coverlink_protocol::{CallMode, Principal, ServiceDescriptor};
use coverlink_runtime::Transport;

use crate::error::{Error, Result};

mod private {
	pub trait Sealed {}
}

/// Compile-time capability of an actor binding.
pub trait TransportMode: private::Sealed + Send + Sync + 'static {
	/// Tag used in logs.
	const LABEL: &'static str;

	/// Whether the binding may issue calls of `mode`.
	fn allows(mode: CallMode) -> bool;
}

/// Marker for anonymous, read-only bindings.
pub enum Query {}

/// Marker for wallet-signed bindings.
pub enum Signing {}

impl private::Sealed for Query {}
impl private::Sealed for Signing {}

impl TransportMode for Query {
	const LABEL: &'static str = "query";

	fn allows(mode: CallMode) -> bool {
		mode == CallMode::Query
	}
}

impl TransportMode for Signing {
	const LABEL: &'static str = "signing";

	fn allows(_mode: CallMode) -> bool {
		true
	}
}

/// Handle for calling one remote service through one transport.
///
/// The marker `M` fixes at compile time whether update calls are
/// available; the dynamic [`call`] path re-checks against the service
/// description so a query binding can never smuggle an update through.
///
/// [`call`]: Self::call
pub struct RemoteActor<M: TransportMode> {
	descriptor: &'static ServiceDescriptor,
	service: Principal,
	transport: Arc<dyn Transport>,
	mode: PhantomData<M>,
}

impl<M: TransportMode> Clone for RemoteActor<M> {
	fn clone(&self) -> Self {
		Self {
			descriptor: self.descriptor,
			service: self.service.clone(),
			transport: Arc::clone(&self.transport),
			mode: PhantomData,
		}
	}
}

impl<M: TransportMode> RemoteActor<M> {
	/// Binds `descriptor` methods on `service` to an explicit transport.
	pub fn bind(descriptor: &'static ServiceDescriptor, service: Principal, transport: Arc<dyn Transport>) -> Self {
		Self {
			descriptor,
			service,
			transport,
			mode: PhantomData,
		}
	}

	/// Interface description this actor is bound to.
	pub fn descriptor(&self) -> &'static ServiceDescriptor {
		self.descriptor
	}

	/// Service id this actor calls.
	pub fn service(&self) -> &Principal {
		&self.service
	}

	/// Calls `method` with named arguments, decoding the reply as `R`.
	///
	/// Typed wrappers cover the known surfaces; this is the dynamic path
	/// underneath them.
	pub async fn call<A, R>(&self, method: &str, args: &A) -> Result<R>
	where
		A: Serialize + Sync,
		R: DeserializeOwned,
	{
		let Some(descriptor) = self.descriptor.method(method) else {
			return Err(Error::UnknownMethod {
				service: self.descriptor.name,
				method: method.to_string(),
			});
		};
		if !M::allows(descriptor.mode) {
			return Err(Error::SigningRequired { method: method.to_string() });
		}

		let args = serde_json::to_value(args).map_err(|source| Error::EncodeArgs {
			method: method.to_string(),
			source,
		})?;

		debug!(target = "coverlink.actor", service = %self.service, method = descriptor.name, mode = M::LABEL, "remote call");
		let reply = self.transport.call(&self.service, descriptor.name, descriptor.mode, args).await?;
		serde_json::from_value(reply).map_err(|source| Error::DecodeReply {
			method: method.to_string(),
			source,
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use coverlink_protocol::describe;
	use coverlink_runtime::fake::FakeTransportBuilder;

	use super::*;

	fn query_actor() -> (RemoteActor<Query>, coverlink_runtime::fake::FakeTransportController) {
		let (transport, controller) = FakeTransportBuilder::new().build();
		let actor = RemoteActor::<Query>::bind(&describe::POOL, Principal::from("ufxgi-4p777-77774-qaadq-cai"), transport);
		(actor, controller)
	}

	#[tokio::test]
	async fn query_call_decodes_the_reply() {
		let (actor, controller) = query_actor();
		controller.push_response(json!(12));

		let episode: u64 = actor.call("get_current_episode_id", &json!({})).await.unwrap();
		assert_eq!(episode, 12);

		let calls = controller.take_calls();
		assert_eq!(calls[0].method, "get_current_episode_id");
		assert_eq!(calls[0].mode, CallMode::Query);
	}

	#[tokio::test]
	async fn unknown_method_is_refused_before_the_wire() {
		let (actor, controller) = query_actor();
		let result: Result<u64> = actor.call("get_weather", &json!({})).await;
		assert!(matches!(result, Err(Error::UnknownMethod { service: "pool", .. })));
		assert!(controller.take_calls().is_empty());
	}

	#[tokio::test]
	async fn update_through_query_binding_is_refused() {
		let (actor, controller) = query_actor();
		let result: Result<()> = actor.call("reward_pool", &json!({})).await;
		assert!(matches!(result, Err(Error::SigningRequired { .. })));
		assert!(controller.take_calls().is_empty());
	}

	#[tokio::test]
	async fn signing_binding_reaches_update_methods() {
		let (transport, controller) = FakeTransportBuilder::new().build();
		let actor = RemoteActor::<Signing>::bind(&describe::POOL, Principal::from("ufxgi-4p777-77774-qaadq-cai"), transport);
		controller.push_response(json!({ "Ok": null }));

		let reply: coverlink_protocol::PoolResult<()> = actor.call("reward_pool", &json!({})).await.unwrap();
		assert!(reply.is_ok());
		assert_eq!(controller.take_calls()[0].mode, CallMode::Update);
	}

	#[tokio::test]
	async fn malformed_reply_surfaces_as_decode_error() {
		let (actor, controller) = query_actor();
		controller.push_response(json!("twelve"));

		let result: Result<u64> = actor.call("get_current_episode_id", &json!({})).await;
		assert!(matches!(result, Err(Error::DecodeReply { .. })));
	}
}
