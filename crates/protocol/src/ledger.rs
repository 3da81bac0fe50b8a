//! Wire shapes for the fungible-token ledger service (ICRC-1 style).

use serde::{Deserialize, Serialize};

use crate::types::{Account, Memo, Subaccount};

/// Result payload of `icrc1_transfer`; `Ok` carries the block index.
pub type TransferResult = Result<u64, TransferError>;

/// Result payload of `icrc2_approve`; `Ok` carries the block index.
pub type ApproveResult = Result<u64, ApproveError>;

/// Arguments for `icrc1_transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferArgs {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_subaccount: Option<Subaccount>,
	pub to: Account,
	pub amount: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub memo: Option<Memo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at_time: Option<u64>,
}

impl TransferArgs {
	/// A plain transfer to `to` with ledger-default fee and no memo.
	pub fn to_account(to: Account, amount: u64) -> Self {
		Self {
			from_subaccount: None,
			to,
			amount,
			fee: None,
			memo: None,
			created_at_time: None,
		}
	}
}

/// Business errors reported by `icrc1_transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferError {
	BadFee { expected_fee: u64 },
	BadBurn { min_burn_amount: u64 },
	InsufficientFunds { balance: u64 },
	TooOld,
	CreatedInFuture { ledger_time: u64 },
	TemporarilyUnavailable,
	Duplicate { duplicate_of: u64 },
	GenericError { error_code: u64, message: String },
}

/// Arguments for `icrc2_approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveArgs {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_subaccount: Option<Subaccount>,
	pub spender: Account,
	pub amount: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expected_allowance: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub memo: Option<Memo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at_time: Option<u64>,
}

/// Business errors reported by `icrc2_approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApproveError {
	BadFee { expected_fee: u64 },
	InsufficientFunds { balance: u64 },
	AllowanceChanged { current_allowance: u64 },
	Expired { ledger_time: u64 },
	TooOld,
	CreatedInFuture { ledger_time: u64 },
	Duplicate { duplicate_of: u64 },
	TemporarilyUnavailable,
	GenericError { error_code: u64, message: String },
}
