//! Static interface descriptions for the three Coverlink services.
//!
//! Every remote actor is bound to one of these tables. The table is the
//! single source of truth for which operations a service exposes and
//! whether each one is a read-only query or a state-changing update.

use serde::{Deserialize, Serialize};

/// Whether an operation reads state or changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMode {
	Query,
	Update,
}

/// One operation in a service interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
	pub name: &'static str,
	pub mode: CallMode,
}

/// A service interface: name, schema tag, and operation table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceDescriptor {
	pub name: &'static str,
	pub version: u32,
	pub methods: &'static [MethodDescriptor],
}

impl ServiceDescriptor {
	/// Looks up an operation by wire name.
	pub fn method(&self, name: &str) -> Option<&'static MethodDescriptor> {
		self.methods.iter().find(|method| method.name == name)
	}

	/// Iterates the read-only operations.
	pub fn queries(&self) -> impl Iterator<Item = &'static MethodDescriptor> {
		self.methods.iter().filter(|method| method.mode == CallMode::Query)
	}

	/// Iterates the state-changing operations.
	pub fn updates(&self) -> impl Iterator<Item = &'static MethodDescriptor> {
		self.methods.iter().filter(|method| method.mode == CallMode::Update)
	}
}

const fn query(name: &'static str) -> MethodDescriptor {
	MethodDescriptor { name, mode: CallMode::Query }
}

const fn update(name: &'static str) -> MethodDescriptor {
	MethodDescriptor { name, mode: CallMode::Update }
}

/// Staking/insurance pool interface.
pub static POOL: ServiceDescriptor = ServiceDescriptor {
	name: "pool",
	version: 1,
	methods: &[
		query("get_current_episode_id"),
		query("get_episode"),
		query("get_pool_state"),
		query("get_pool_reward_rate"),
		query("get_deposit"),
		query("get_user_deposits"),
		query("get_deposit_subaccount"),
		query("get_purchase_subaccount"),
		query("get_reward_subaccount"),
		query("get_deposits_rewards"),
		query("get_products"),
		query("get_total_cover_allocation"),
		query("get_coverages"),
		query("get_coverage"),
		update("deposit"),
		update("withdraw"),
		update("withdraw_rewards"),
		update("purchase_coverage"),
		update("create_product"),
		update("set_product"),
		update("slash"),
		update("reward_pool"),
		update("update_episodes_state"),
		update("set_executor_principal"),
		update("set_pool_manager_principal"),
	],
};

/// Fungible-token ledger interface (ICRC-1 style).
pub static LEDGER: ServiceDescriptor = ServiceDescriptor {
	name: "ledger",
	version: 1,
	methods: &[
		query("icrc1_balance_of"),
		query("icrc1_fee"),
		query("icrc1_metadata"),
		query("icrc1_name"),
		query("icrc1_symbol"),
		query("icrc1_decimals"),
		query("icrc1_total_supply"),
		update("icrc1_transfer"),
		update("icrc2_approve"),
	],
};

/// Claims-approval interface.
pub static CLAIMS: ServiceDescriptor = ServiceDescriptor {
	name: "claims",
	version: 1,
	methods: &[
		query("get_claim"),
		query("is_approver"),
		query("get_claim_deposit"),
		query("get_claim_deposit_subaccount"),
		query("get_execution_timeout"),
		query("get_owner"),
		update("add_claim"),
		update("approve_claim"),
		update("execute_claim"),
		update("withdraw_deposit"),
		update("mark_as_spam"),
		update("add_approver"),
		update("remove_approver"),
		update("set_claim_deposit"),
		update("set_execution_timeout"),
	],
};
