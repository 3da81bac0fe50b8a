//! Session-aware construction of query and signing actors.

use std::sync::{Arc, OnceLock};

use coverlink_protocol::{Principal, ServiceDescriptor, describe};
use coverlink_runtime::{AnonymousTransport, NetworkProfile, Transport, WalletProvider};

use super::claims::ClaimsActor;
use super::handle::{Query, RemoteActor, Signing};
use super::ledger::LedgerActor;
use super::pool::PoolActor;
use crate::error::{Error, Result};
use crate::recovery::handle_remote_error;
use crate::session::{SessionStatus, SessionStore};

/// Builds actors against one deployment.
///
/// Query actors share a lazily built anonymous transport; signing actors
/// go through the wallet provider and need an active session.
#[derive(Clone)]
pub struct ActorFactory {
	profile: NetworkProfile,
	provider: Arc<dyn WalletProvider>,
	store: Arc<SessionStore>,
	anonymous: Arc<OnceLock<Arc<AnonymousTransport>>>,
}

impl ActorFactory {
	pub(crate) fn new(profile: NetworkProfile, provider: Arc<dyn WalletProvider>, store: Arc<SessionStore>) -> Self {
		Self {
			profile,
			provider,
			store,
			anonymous: Arc::new(OnceLock::new()),
		}
	}

	/// Deployment profile the factory binds against.
	pub fn profile(&self) -> &NetworkProfile {
		&self.profile
	}

	/// Binds a read-only actor over the shared anonymous transport.
	///
	/// Trust bootstrap runs once per factory; a bootstrap failure that the
	/// recovery policy tolerates leaves the transport usable unverified.
	pub async fn bind_query(&self, descriptor: &'static ServiceDescriptor, service: Principal) -> Result<RemoteActor<Query>> {
		let transport = self.anonymous_transport()?;
		if let Err(err) = transport.ensure_ready().await {
			handle_remote_error(Error::from(err), self.profile.network)?;
		}
		Ok(RemoteActor::bind(descriptor, service, transport as Arc<dyn Transport>))
	}

	/// Binds a signing actor through the wallet provider.
	pub async fn bind_signing(&self, descriptor: &'static ServiceDescriptor, service: Principal) -> Result<RemoteActor<Signing>> {
		if self.store.status() != SessionStatus::Connected {
			return Err(Error::NoWalletSession);
		}
		let transport = self.provider.create_actor(&service, descriptor).await?;
		Ok(RemoteActor::bind(descriptor, service, transport))
	}

	/// Read-only pool actor.
	pub async fn pool(&self) -> Result<PoolActor<Query>> {
		Ok(PoolActor::new(self.bind_query(&describe::POOL, self.profile.services.pool.clone()).await?))
	}

	/// Signing pool actor.
	pub async fn pool_signing(&self) -> Result<PoolActor<Signing>> {
		Ok(PoolActor::new(self.bind_signing(&describe::POOL, self.profile.services.pool.clone()).await?))
	}

	/// Read-only ledger actor.
	pub async fn ledger(&self) -> Result<LedgerActor<Query>> {
		Ok(LedgerActor::new(self.bind_query(&describe::LEDGER, self.profile.services.ledger.clone()).await?))
	}

	/// Signing ledger actor.
	pub async fn ledger_signing(&self) -> Result<LedgerActor<Signing>> {
		Ok(LedgerActor::new(self.bind_signing(&describe::LEDGER, self.profile.services.ledger.clone()).await?))
	}

	/// Read-only claims actor.
	pub async fn claims(&self) -> Result<ClaimsActor<Query>> {
		Ok(ClaimsActor::new(self.bind_query(&describe::CLAIMS, self.profile.services.claims.clone()).await?))
	}

	/// Signing claims actor.
	pub async fn claims_signing(&self) -> Result<ClaimsActor<Signing>> {
		Ok(ClaimsActor::new(self.bind_signing(&describe::CLAIMS, self.profile.services.claims.clone()).await?))
	}

	fn anonymous_transport(&self) -> Result<Arc<AnonymousTransport>> {
		if let Some(transport) = self.anonymous.get() {
			return Ok(Arc::clone(transport));
		}
		let transport = Arc::new(AnonymousTransport::new(&self.profile.endpoint, self.profile.network)?);
		let _ = self.anonymous.set(Arc::clone(&transport));
		// A racing caller may have stored first; hand out whichever won.
		Ok(self.anonymous.get().cloned().unwrap_or(transport))
	}
}

#[cfg(test)]
mod tests {
	use coverlink_runtime::fake::FakeProviderBuilder;
	use coverlink_runtime::{MemoryBackend, Network, NetworkRegistry};

	use super::*;
	use crate::session::record::SessionRepository;

	fn factory_for(network: Network) -> (ActorFactory, coverlink_runtime::fake::FakeProviderController) {
		let (provider, controller) = FakeProviderBuilder::new().build();
		let repository = SessionRepository::new(Arc::new(MemoryBackend::new()));
		let store = Arc::new(SessionStore::new(repository, provider.clone()));
		let profile = NetworkRegistry::profile(network);
		(ActorFactory::new(profile, provider, store), controller)
	}

	#[tokio::test]
	async fn signing_actor_requires_a_session() {
		let (factory, _controller) = factory_for(Network::Mainnet);
		let result = factory.pool_signing().await;
		assert!(matches!(result, Err(Error::NoWalletSession)));
	}

	#[tokio::test]
	async fn signing_actor_binds_through_the_provider() {
		let (factory, controller) = factory_for(Network::Mainnet);
		controller.set_connected(true);
		factory.store.connect(
			Principal::from("w3gef-eqbai"),
			Network::Mainnet,
			factory.provider.signing_transport().unwrap(),
		);

		let actor = factory.pool_signing().await.unwrap();
		controller.transport().push_response(serde_json::json!({ "Ok": null }));
		let reply = actor.reward_pool().await.unwrap();
		assert!(reply.is_ok());
	}

	#[tokio::test]
	async fn query_actor_skips_bootstrap_off_local() {
		let (factory, _controller) = factory_for(Network::Mainnet);
		let actor = factory.pool().await.unwrap();
		assert_eq!(actor.service(), &NetworkRegistry::profile(Network::Mainnet).services.pool);
	}

	#[tokio::test]
	async fn local_bootstrap_failure_is_tolerated() {
		let (factory, _controller) = factory_for(Network::Local);
		// No gateway is listening; the root-key fetch fails and the
		// recovery policy swallows it on the local network.
		let actor = factory.claims().await.unwrap();
		assert_eq!(actor.service(), &NetworkRegistry::profile(Network::Local).services.claims);
	}
}
