//! Wire shapes for the claims-approval service.

use serde::{Deserialize, Serialize};

use crate::types::Principal;

/// Result payload returned by claims update operations.
pub type ClaimResult<T> = Result<T, ClaimError>;

/// Lifecycle states of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
	Pending,
	Approved,
	Executing,
	Executed,
	Rejected,
	Spam,
}

/// A payout claim raised against a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
	pub id: u64,
	pub proposer: Principal,
	pub receiver: Principal,
	pub amount: u64,
	pub pool_service: Principal,
	pub description: String,
	pub status: ClaimStatus,
	pub created_at: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub approved_at: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub approved_by: Option<Principal>,
	pub deposit_amount: u64,
}

/// Business errors reported by the claims service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimError {
	NotFound,
	NotApprover,
	AlreadyApproved,
	AlreadyExecuting,
	AlreadyExecuted,
	NotApproved,
	TimelockNotExpired,
	ExecutionTimeoutNotExpired,
	ApprovalPeriodExpired,
	PoolCallFailed(String),
	InsufficientPermissions,
	NotProposer,
	AlreadyMarkedAsSpam,
	NoDepositToWithdraw,
	DepositTransferFailed,
	InsufficientDeposit,
	LedgerNotSet,
}
