//! Typed actor for the coverage pool service.

use serde_json::json;

use coverlink_protocol::{Coverage, Deposit, Episode, PoolResult, PoolState, Principal, Product, Subaccount, UserDepositInfo};

use super::handle::{RemoteActor, Signing, TransportMode};
use crate::error::Result;

/// Pool service actor; update methods exist only on signing bindings.
pub struct PoolActor<M: TransportMode> {
	actor: RemoteActor<M>,
}

impl<M: TransportMode> Clone for PoolActor<M> {
	fn clone(&self) -> Self {
		Self { actor: self.actor.clone() }
	}
}

impl<M: TransportMode> PoolActor<M> {
	pub fn new(actor: RemoteActor<M>) -> Self {
		Self { actor }
	}

	/// Service id this actor calls.
	pub fn service(&self) -> &Principal {
		self.actor.service()
	}

	pub async fn get_current_episode_id(&self) -> Result<u64> {
		self.actor.call("get_current_episode_id", &json!({})).await
	}

	pub async fn get_episode(&self, episode_id: u64) -> Result<Option<Episode>> {
		self.actor.call("get_episode", &json!({ "episode_id": episode_id })).await
	}

	pub async fn get_pool_state(&self) -> Result<PoolState> {
		self.actor.call("get_pool_state", &json!({})).await
	}

	pub async fn get_pool_reward_rate(&self) -> Result<u64> {
		self.actor.call("get_pool_reward_rate", &json!({})).await
	}

	pub async fn get_user_deposits(&self, user: &Principal) -> Result<Vec<UserDepositInfo>> {
		self.actor.call("get_user_deposits", &json!({ "user": user })).await
	}

	pub async fn get_deposit(&self, deposit_id: u64) -> Result<Option<Deposit>> {
		self.actor.call("get_deposit", &json!({ "deposit_id": deposit_id })).await
	}

	/// Pending rewards summed over `deposit_ids`.
	pub async fn get_deposits_rewards(&self, deposit_ids: &[u64]) -> Result<u64> {
		self.actor.call("get_deposits_rewards", &json!({ "deposit_ids": deposit_ids })).await
	}

	/// Subaccount to fund before staking `episode` for `user`.
	pub async fn get_deposit_subaccount(&self, user: &Principal, episode: u64) -> Result<Subaccount> {
		self.actor.call("get_deposit_subaccount", &json!({ "user": user, "episode": episode })).await
	}

	/// Subaccount to fund before purchasing coverage on `product_id`.
	pub async fn get_purchase_subaccount(&self, user: &Principal, product_id: u64) -> Result<Subaccount> {
		self.actor.call("get_purchase_subaccount", &json!({ "user": user, "product_id": product_id })).await
	}

	pub async fn get_reward_subaccount(&self) -> Result<Subaccount> {
		self.actor.call("get_reward_subaccount", &json!({})).await
	}

	pub async fn get_products(&self) -> Result<Vec<Product>> {
		self.actor.call("get_products", &json!({})).await
	}

	pub async fn get_total_cover_allocation(&self) -> Result<u64> {
		self.actor.call("get_total_cover_allocation", &json!({})).await
	}

	pub async fn get_coverages(&self, user: &Principal) -> Result<Vec<Coverage>> {
		self.actor.call("get_coverages", &json!({ "user": user })).await
	}

	pub async fn get_coverage(&self, coverage_id: u64) -> Result<Option<Coverage>> {
		self.actor.call("get_coverage", &json!({ "coverage_id": coverage_id })).await
	}
}

impl PoolActor<Signing> {
	/// Stakes whatever `user` transferred to the episode's deposit subaccount.
	pub async fn deposit(&self, user: &Principal, episode: u64) -> Result<PoolResult<()>> {
		self.actor.call("deposit", &json!({ "user": user, "episode": episode })).await
	}

	/// Returns a matured deposit to its owner.
	pub async fn withdraw(&self, deposit_id: u64) -> Result<PoolResult<()>> {
		self.actor.call("withdraw", &json!({ "deposit_id": deposit_id })).await
	}

	/// Collects rewards across `deposit_ids`; replies with the paid amount.
	pub async fn withdraw_rewards(&self, deposit_ids: &[u64]) -> Result<PoolResult<u64>> {
		self.actor.call("withdraw_rewards", &json!({ "deposit_ids": deposit_ids })).await
	}

	/// Buys coverage against the pre-funded purchase subaccount.
	pub async fn purchase_coverage(
		&self,
		product_id: u64,
		covered_account: &Principal,
		coverage_duration: u64,
		coverage_amount: u64,
	) -> Result<PoolResult<()>> {
		self.actor
			.call(
				"purchase_coverage",
				&json!({
					"product_id": product_id,
					"covered_account": covered_account,
					"coverage_duration": coverage_duration,
					"coverage_amount": coverage_amount,
				}),
			)
			.await
	}

	/// Registers a coverage product; replies with its id.
	pub async fn create_product(
		&self,
		name: &str,
		annual_percent: u64,
		max_coverage_duration: u64,
		max_pool_allocation_percent: u64,
	) -> Result<PoolResult<u64>> {
		self.actor
			.call(
				"create_product",
				&json!({
					"name": name,
					"annual_percent": annual_percent,
					"max_coverage_duration": max_coverage_duration,
					"max_pool_allocation_percent": max_pool_allocation_percent,
				}),
			)
			.await
	}

	pub async fn set_product(
		&self,
		product_id: u64,
		annual_percent: u64,
		max_coverage_duration: u64,
		max_pool_allocation_percent: u64,
		active: bool,
	) -> Result<PoolResult<()>> {
		self.actor
			.call(
				"set_product",
				&json!({
					"product_id": product_id,
					"annual_percent": annual_percent,
					"max_coverage_duration": max_coverage_duration,
					"max_pool_allocation_percent": max_pool_allocation_percent,
					"active": active,
				}),
			)
			.await
	}

	pub async fn set_executor_principal(&self, executor: &Principal) -> Result<PoolResult<()>> {
		self.actor.call("set_executor_principal", &json!({ "executor": executor })).await
	}

	pub async fn set_pool_manager_principal(&self, pool_manager: &Principal) -> Result<PoolResult<()>> {
		self.actor.call("set_pool_manager_principal", &json!({ "pool_manager": pool_manager })).await
	}

	/// Pays `amount` out of the pool to `receiver`; executor only.
	pub async fn slash(&self, receiver: &Principal, amount: u64) -> Result<PoolResult<()>> {
		self.actor.call("slash", &json!({ "receiver": receiver, "amount": amount })).await
	}

	/// Distributes whatever sits in the reward subaccount.
	pub async fn reward_pool(&self) -> Result<PoolResult<()>> {
		self.actor.call("reward_pool", &json!({})).await
	}

	pub async fn update_episodes_state(&self) -> Result<()> {
		self.actor.call("update_episodes_state", &json!({})).await
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use coverlink_protocol::{PoolError, describe};
	use coverlink_runtime::fake::FakeTransportBuilder;

	use super::super::handle::Query;
	use super::*;

	fn pool_service() -> Principal {
		Principal::from("ufxgi-4p777-77774-qaadq-cai")
	}

	#[tokio::test]
	async fn query_sends_named_arguments() {
		let (transport, controller) = FakeTransportBuilder::new().build();
		let actor = PoolActor::new(RemoteActor::<Query>::bind(&describe::POOL, pool_service(), transport));

		controller.push_response(json!(null));
		let episode = actor.get_episode(9).await.unwrap();
		assert_eq!(episode, None);

		let calls = controller.take_calls();
		assert_eq!(calls[0].method, "get_episode");
		assert_eq!(calls[0].args, json!({ "episode_id": 9 }));
	}

	#[tokio::test]
	async fn business_errors_decode_as_values() {
		let (transport, controller) = FakeTransportBuilder::new().build();
		let actor = PoolActor::new(RemoteActor::<Signing>::bind(&describe::POOL, pool_service(), transport));

		controller.push_response(json!({ "Err": "EpisodeNotStakable" }));
		let reply = actor.deposit(&Principal::from("w3gef-eqbai"), 4).await.unwrap();
		assert_eq!(reply, Err(PoolError::EpisodeNotStakable));
	}

	#[tokio::test]
	async fn rewards_reply_with_the_paid_amount() {
		let (transport, controller) = FakeTransportBuilder::new().build();
		let actor = PoolActor::new(RemoteActor::<Signing>::bind(&describe::POOL, pool_service(), transport));

		controller.push_response(json!({ "Ok": 250 }));
		let paid = actor.withdraw_rewards(&[1, 2]).await.unwrap();
		assert_eq!(paid, Ok(250));

		let calls = controller.take_calls();
		assert_eq!(calls[0].args, json!({ "deposit_ids": [1, 2] }));
	}
}
