//! Shared scalar and account types used across all service interfaces.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Textual form of the anonymous principal.
///
/// A transport that has lost its signing identity reports this principal;
/// it never identifies a real wallet session.
pub const ANONYMOUS_PRINCIPAL: &str = "2vxsx-fae";

/// Opaque textual identifier for an on-network identity or service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
	/// Wraps a principal's textual form.
	pub fn from_text(text: impl Into<String>) -> Self {
		Self(text.into())
	}

	/// Returns the anonymous principal.
	pub fn anonymous() -> Self {
		Self(ANONYMOUS_PRINCIPAL.to_string())
	}

	/// Returns the textual form.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns `true` for the anonymous principal.
	pub fn is_anonymous(&self) -> bool {
		self.0 == ANONYMOUS_PRINCIPAL
	}

	/// Returns `true` when the principal identifies a real session.
	///
	/// Empty text and the anonymous principal both fail this check.
	pub fn is_session_identity(&self) -> bool {
		!self.0.is_empty() && !self.is_anonymous()
	}
}

impl fmt::Display for Principal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Principal {
	fn from(text: &str) -> Self {
		Self(text.to_string())
	}
}

impl From<String> for Principal {
	fn from(text: String) -> Self {
		Self(text)
	}
}

/// A 32-byte service subaccount, base64-encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subaccount(pub [u8; 32]);

impl Serialize for Subaccount {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&BASE64.encode(self.0))
	}
}

impl<'de> Deserialize<'de> for Subaccount {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		let bytes = BASE64.decode(&text).map_err(D::Error::custom)?;
		let bytes: [u8; 32] = bytes
			.try_into()
			.map_err(|raw: Vec<u8>| D::Error::custom(format!("subaccount must be 32 bytes, got {}", raw.len())))?;
		Ok(Self(bytes))
	}
}

impl FromStr for Subaccount {
	type Err = String;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let bytes = BASE64.decode(text).map_err(|err| err.to_string())?;
		let bytes: [u8; 32] = bytes
			.try_into()
			.map_err(|raw: Vec<u8>| format!("subaccount must be 32 bytes, got {}", raw.len()))?;
		Ok(Self(bytes))
	}
}

/// Arbitrary transfer memo bytes, base64-encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Memo(pub Vec<u8>);

impl Serialize for Memo {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&BASE64.encode(&self.0))
	}
}

impl<'de> Deserialize<'de> for Memo {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		BASE64.decode(&text).map(Memo).map_err(D::Error::custom)
	}
}

/// An account on the ledger: owning principal plus optional subaccount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub owner: Principal,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subaccount: Option<Subaccount>,
}

impl Account {
	/// An account addressed by owner alone.
	pub fn of(owner: Principal) -> Self {
		Self { owner, subaccount: None }
	}

	/// An account addressed by owner and subaccount.
	pub fn with_subaccount(owner: Principal, subaccount: Subaccount) -> Self {
		Self {
			owner,
			subaccount: Some(subaccount),
		}
	}
}
