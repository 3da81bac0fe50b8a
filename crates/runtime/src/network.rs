//! Deployment registry: network tags, gateway endpoints, and service ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coverlink_protocol::Principal;

/// Environment variable overriding the gateway endpoint.
pub const ENDPOINT_ENV: &str = "COVERLINK_ENDPOINT";
/// Environment variable overriding the pool service id.
pub const POOL_SERVICE_ENV: &str = "COVERLINK_POOL_SERVICE";
/// Environment variable overriding the ledger service id.
pub const LEDGER_SERVICE_ENV: &str = "COVERLINK_LEDGER_SERVICE";
/// Environment variable overriding the claims service id.
pub const CLAIMS_SERVICE_ENV: &str = "COVERLINK_CLAIMS_SERVICE";

/// The closed set of deployment networks a session can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	Local,
	Testnet,
	Mainnet,
}

impl Network {
	/// Stable tag used in persistence and configuration.
	pub fn as_str(self) -> &'static str {
		match self {
			Network::Local => "local",
			Network::Testnet => "testnet",
			Network::Mainnet => "mainnet",
		}
	}

	/// Whether transports must fetch the gateway's root key before first use.
	///
	/// Only local replicas have an ad-hoc signing key; public networks ship
	/// a hardcoded one.
	pub fn requires_trust_bootstrap(self) -> bool {
		matches!(self, Network::Local)
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error produced when a stored or configured network tag is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown network tag `{0}`")]
pub struct ParseNetworkError(pub String);

impl FromStr for Network {
	type Err = ParseNetworkError;

	fn from_str(tag: &str) -> Result<Self, Self::Err> {
		match tag {
			"local" => Ok(Network::Local),
			"testnet" => Ok(Network::Testnet),
			"mainnet" => Ok(Network::Mainnet),
			other => Err(ParseNetworkError(other.to_string())),
		}
	}
}

/// Service ids of one Coverlink deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIds {
	pub pool: Principal,
	pub ledger: Principal,
	pub claims: Principal,
}

/// Everything needed to reach one deployment: gateway plus service ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
	pub network: Network,
	pub endpoint: String,
	pub services: ServiceIds,
}

impl NetworkProfile {
	/// Service ids a wallet connection must be approved for.
	pub fn allowlist(&self) -> Vec<Principal> {
		vec![
			self.services.pool.clone(),
			self.services.ledger.clone(),
			self.services.claims.clone(),
		]
	}

	/// Replaces the gateway endpoint.
	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	/// Replaces the service ids.
	pub fn with_services(mut self, services: ServiceIds) -> Self {
		self.services = services;
		self
	}
}

/// Built-in deployment lookup with environment overrides.
pub struct NetworkRegistry;

impl NetworkRegistry {
	/// Returns the built-in profile for `network`.
	pub fn profile(network: Network) -> NetworkProfile {
		match network {
			Network::Local => NetworkProfile {
				network,
				endpoint: "http://127.0.0.1:4943".to_string(),
				services: ServiceIds {
					pool: Principal::from("ufxgi-4p777-77774-qaadq-cai"),
					ledger: Principal::from("ulvla-h7777-77774-qaacq-cai"),
					claims: Principal::from("uxrrr-q7777-77774-qaaaq-cai"),
				},
			},
			Network::Testnet => NetworkProfile {
				network,
				endpoint: "https://testnet.icp0.io".to_string(),
				services: ServiceIds {
					pool: Principal::from("be2us-64aaa-aaaaa-qaabq-cai"),
					ledger: Principal::from("br5f7-7uaaa-aaaaa-qaaca-cai"),
					claims: Principal::from("bw4dl-smaaa-aaaaa-qaacq-cai"),
				},
			},
			Network::Mainnet => NetworkProfile {
				network,
				endpoint: "https://icp0.io".to_string(),
				services: ServiceIds {
					pool: Principal::from("3uh73-fiaaa-aaaam-qbmza-cai"),
					ledger: Principal::from("ryjl3-tyaaa-aaaaa-aaaba-cai"),
					claims: Principal::from("3vbcr-tqaaa-aaaam-qbm2a-cai"),
				},
			},
		}
	}

	/// Returns the profile for `network` with `COVERLINK_*` overrides applied.
	pub fn profile_from_env(network: Network) -> NetworkProfile {
		let mut profile = Self::profile(network);
		if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
			profile.endpoint = endpoint;
		}
		if let Ok(pool) = std::env::var(POOL_SERVICE_ENV) {
			profile.services.pool = Principal::from(pool);
		}
		if let Ok(ledger) = std::env::var(LEDGER_SERVICE_ENV) {
			profile.services.ledger = Principal::from(ledger);
		}
		if let Ok(claims) = std::env::var(CLAIMS_SERVICE_ENV) {
			profile.services.claims = Principal::from(claims);
		}
		profile
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tags_round_trip_through_display_and_parse() {
		for network in [Network::Local, Network::Testnet, Network::Mainnet] {
			let parsed: Network = network.as_str().parse().unwrap();
			assert_eq!(parsed, network);
		}
		assert!("ic".parse::<Network>().is_err());
	}

	#[test]
	fn only_local_requires_trust_bootstrap() {
		assert!(Network::Local.requires_trust_bootstrap());
		assert!(!Network::Testnet.requires_trust_bootstrap());
		assert!(!Network::Mainnet.requires_trust_bootstrap());
	}

	#[test]
	fn allowlist_covers_all_three_services() {
		let profile = NetworkRegistry::profile(Network::Local);
		let allowlist = profile.allowlist();
		assert_eq!(allowlist.len(), 3);
		assert!(allowlist.contains(&profile.services.claims));
	}

	#[test]
	fn env_overrides_replace_builtin_values() {
		// Safety: no other test in this crate touches these variables.
		unsafe {
			std::env::set_var(ENDPOINT_ENV, "http://127.0.0.1:8080");
			std::env::set_var(POOL_SERVICE_ENV, "aaaaa-aa");
		}
		let profile = NetworkRegistry::profile_from_env(Network::Local);
		unsafe {
			std::env::remove_var(ENDPOINT_ENV);
			std::env::remove_var(POOL_SERVICE_ENV);
		}

		assert_eq!(profile.endpoint, "http://127.0.0.1:8080");
		assert_eq!(profile.services.pool, Principal::from("aaaaa-aa"));
		assert_eq!(profile.services.ledger, NetworkRegistry::profile(Network::Local).services.ledger);
	}

	#[test]
	fn network_serializes_as_lowercase_tag() {
		let json = serde_json::to_value(Network::Mainnet).unwrap();
		assert_eq!(json, "mainnet");
	}
}
