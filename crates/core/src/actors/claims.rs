//! Typed actor for the claims service.

use serde_json::json;

use coverlink_protocol::{Claim, ClaimResult, Principal, Subaccount};

use super::handle::{RemoteActor, Signing, TransportMode};
use crate::error::Result;

/// Claims service actor; claim lifecycle changes need a signing binding.
pub struct ClaimsActor<M: TransportMode> {
	actor: RemoteActor<M>,
}

impl<M: TransportMode> Clone for ClaimsActor<M> {
	fn clone(&self) -> Self {
		Self { actor: self.actor.clone() }
	}
}

impl<M: TransportMode> ClaimsActor<M> {
	pub fn new(actor: RemoteActor<M>) -> Self {
		Self { actor }
	}

	/// Service id this actor calls.
	pub fn service(&self) -> &Principal {
		self.actor.service()
	}

	pub async fn get_claim(&self, claim_id: u64) -> Result<Option<Claim>> {
		self.actor.call("get_claim", &json!({ "claim_id": claim_id })).await
	}

	pub async fn is_approver(&self, principal: &Principal) -> Result<bool> {
		self.actor.call("is_approver", &json!({ "principal": principal })).await
	}

	pub async fn get_claim_deposit(&self) -> Result<u64> {
		self.actor.call("get_claim_deposit", &json!({})).await
	}

	/// Subaccount to fund with the spam deposit before filing this claim.
	pub async fn get_claim_deposit_subaccount(
		&self,
		user: &Principal,
		receiver: &Principal,
		amount: u64,
		pool_service: &Principal,
		description: &str,
	) -> Result<Subaccount> {
		self.actor
			.call(
				"get_claim_deposit_subaccount",
				&json!({
					"user": user,
					"receiver": receiver,
					"amount": amount,
					"pool_service": pool_service,
					"description": description,
				}),
			)
			.await
	}

	pub async fn get_execution_timeout(&self) -> Result<u64> {
		self.actor.call("get_execution_timeout", &json!({})).await
	}

	pub async fn get_owner(&self) -> Result<Principal> {
		self.actor.call("get_owner", &json!({})).await
	}
}

impl ClaimsActor<Signing> {
	/// Files a claim against a pool; replies with the claim id.
	pub async fn add_claim(&self, receiver: &Principal, amount: u64, pool_service: &Principal, description: &str) -> Result<ClaimResult<u64>> {
		self.actor
			.call(
				"add_claim",
				&json!({
					"receiver": receiver,
					"amount": amount,
					"pool_service": pool_service,
					"description": description,
				}),
			)
			.await
	}

	pub async fn approve_claim(&self, claim_id: u64) -> Result<ClaimResult<()>> {
		self.actor.call("approve_claim", &json!({ "claim_id": claim_id })).await
	}

	/// Triggers the pool payout for an approved claim.
	pub async fn execute_claim(&self, claim_id: u64) -> Result<ClaimResult<()>> {
		self.actor.call("execute_claim", &json!({ "claim_id": claim_id })).await
	}

	pub async fn add_approver(&self, approver: &Principal) -> Result<ClaimResult<()>> {
		self.actor.call("add_approver", &json!({ "approver": approver })).await
	}

	pub async fn remove_approver(&self, approver: &Principal) -> Result<ClaimResult<()>> {
		self.actor.call("remove_approver", &json!({ "approver": approver })).await
	}

	/// Returns the spam deposit of an executed or rejected claim.
	pub async fn withdraw_deposit(&self, claim_id: u64) -> Result<ClaimResult<()>> {
		self.actor.call("withdraw_deposit", &json!({ "claim_id": claim_id })).await
	}

	pub async fn mark_as_spam(&self, claim_id: u64) -> Result<ClaimResult<()>> {
		self.actor.call("mark_as_spam", &json!({ "claim_id": claim_id })).await
	}

	pub async fn set_claim_deposit(&self, new_deposit: u64) -> Result<ClaimResult<()>> {
		self.actor.call("set_claim_deposit", &json!({ "new_deposit": new_deposit })).await
	}

	pub async fn set_execution_timeout(&self, new_timeout: u64) -> Result<ClaimResult<()>> {
		self.actor.call("set_execution_timeout", &json!({ "new_timeout": new_timeout })).await
	}
}
