//! Wire shapes for the staking/insurance pool service.

use serde::{Deserialize, Serialize};

use crate::types::Principal;

/// Result payload returned by pool update operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Business errors reported by the pool service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolError {
	NoDeposit,
	InsufficientBalance,
	TransferFailed,
	LedgerCallFailed,
	LedgerNotSet,
	NotOwner,
	NotPoolManager,
	TimelockNotExpired,
	EpisodeNotActive,
	EpisodeNotStakable,
	NotSlashingExecutor,
	ProductNotActive,
	CoverageDurationTooLong,
	CoverageDurationTooShort,
	NotEnoughAssetsToCover,
	ProductNotFound,
	InvalidProductParameters,
}

/// Aggregate pool balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
	pub total_assets: u64,
	pub total_shares: u64,
}

/// One staking episode's accounting snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
	pub episode_shares: u64,
	pub assets_staked: u64,
	pub reward_decrease: u64,
	pub coverage_decrease: u64,
	pub acc_reward_per_share_on_expire: u64,
}

/// A single deposit's share position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
	pub episode: u64,
	pub shares: u64,
	pub reward_per_share: u64,
	pub rewards_collected: u64,
}

/// Per-deposit summary returned by `get_user_deposits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDepositInfo {
	pub deposit_id: u64,
	pub episode: u64,
	pub shares: u64,
	pub amount: u64,
}

/// An insurance product offered by the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	pub name: String,
	pub product_id: u64,
	pub annual_percent: u64,
	pub max_coverage_duration: u64,
	pub max_pool_allocation_percent: u64,
	pub allocation: u64,
	pub last_allocation_update: u64,
	pub active: bool,
}

/// An active coverage position purchased against a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
	pub coverage_id: u64,
	pub product_id: u64,
	pub covered_account: Principal,
	pub coverage_amount: u64,
	pub premium_amount: u64,
	pub start_time: u64,
	pub end_time: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pool_result_decodes_both_arms() {
		let ok: PoolResult<u64> = serde_json::from_value(serde_json::json!({ "Ok": 3 })).unwrap();
		assert_eq!(ok, Ok(3));

		let err: PoolResult<u64> = serde_json::from_value(serde_json::json!({ "Err": "EpisodeNotStakable" })).unwrap();
		assert_eq!(err, Err(PoolError::EpisodeNotStakable));
	}

	#[test]
	fn product_round_trips() {
		let product = Product {
			name: "validator-slash".to_string(),
			product_id: 4,
			annual_percent: 12,
			max_coverage_duration: 7_776_000,
			max_pool_allocation_percent: 40,
			allocation: 125_000,
			last_allocation_update: 1_700_000_000,
			active: true,
		};
		let json = serde_json::to_value(&product).unwrap();
		assert_eq!(json["product_id"], 4);
		let back: Product = serde_json::from_value(json).unwrap();
		assert_eq!(product, back);
	}
}
