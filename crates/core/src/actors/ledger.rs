//! Typed actor for the token ledger service.

use serde_json::json;

use coverlink_protocol::{Account, ApproveArgs, ApproveResult, Principal, TransferArgs, TransferResult};

use super::handle::{RemoteActor, Signing, TransportMode};
use crate::error::Result;

/// Ledger service actor; transfers and approvals need a signing binding.
pub struct LedgerActor<M: TransportMode> {
	actor: RemoteActor<M>,
}

impl<M: TransportMode> Clone for LedgerActor<M> {
	fn clone(&self) -> Self {
		Self { actor: self.actor.clone() }
	}
}

impl<M: TransportMode> LedgerActor<M> {
	pub fn new(actor: RemoteActor<M>) -> Self {
		Self { actor }
	}

	/// Service id this actor calls.
	pub fn service(&self) -> &Principal {
		self.actor.service()
	}

	pub async fn icrc1_balance_of(&self, account: &Account) -> Result<u64> {
		self.actor.call("icrc1_balance_of", &json!({ "account": account })).await
	}

	pub async fn icrc1_decimals(&self) -> Result<u8> {
		self.actor.call("icrc1_decimals", &json!({})).await
	}

	pub async fn icrc1_fee(&self) -> Result<u64> {
		self.actor.call("icrc1_fee", &json!({})).await
	}

	pub async fn icrc1_metadata(&self) -> Result<Vec<(String, String)>> {
		self.actor.call("icrc1_metadata", &json!({})).await
	}

	pub async fn icrc1_name(&self) -> Result<String> {
		self.actor.call("icrc1_name", &json!({})).await
	}

	pub async fn icrc1_symbol(&self) -> Result<String> {
		self.actor.call("icrc1_symbol", &json!({})).await
	}

	pub async fn icrc1_total_supply(&self) -> Result<u64> {
		self.actor.call("icrc1_total_supply", &json!({})).await
	}
}

impl LedgerActor<Signing> {
	/// Moves tokens; replies with the ledger block index.
	pub async fn icrc1_transfer(&self, args: &TransferArgs) -> Result<TransferResult> {
		self.actor.call("icrc1_transfer", &json!({ "transfer_args": args })).await
	}

	/// Grants a spender an allowance; replies with the ledger block index.
	pub async fn icrc2_approve(&self, args: &ApproveArgs) -> Result<ApproveResult> {
		self.actor.call("icrc2_approve", &json!({ "args": args })).await
	}
}
