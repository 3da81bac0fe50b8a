//! Network-aware tolerance for known-noisy remote failures.
//!
//! Some failures are environmental rather than actionable: local replicas
//! sign with an untrusted root key, and public boundary nodes drop or
//! time out long polls. Callers on a read path can treat those as an
//! absent value instead of an error.

use tracing::debug;

use coverlink_runtime::Network;

use crate::classify;
use crate::error::{Error, Result};

/// Swallows `err` when it is expected noise on `network`.
///
/// Returns `Ok(())` when the error was tolerated and the caller should
/// proceed without a value; otherwise hands the error back.
pub fn handle_remote_error(err: Error, network: Network) -> Result<()> {
	let tolerated = if network == Network::Local {
		classify::is_signature_verification_error(&err) || classify::is_fetch_root_key_error(&err)
	} else {
		classify::is_invalid_read_state_error(&err) || classify::is_timeout_error(&err)
	};

	if tolerated {
		debug!(target = "coverlink.actor", network = %network, error = %err, "tolerating expected remote failure");
		Ok(())
	} else {
		Err(err)
	}
}

/// Read-path extension that maps tolerated failures to `None`.
pub trait RecoverNoise<T> {
	/// Returns `Ok(None)` when the error is expected noise on `network`.
	fn recover_noise(self, network: Network) -> Result<Option<T>>;
}

impl<T> RecoverNoise<T> for Result<T> {
	fn recover_noise(self, network: Network) -> Result<Option<T>> {
		match self {
			Ok(value) => Ok(Some(value)),
			Err(err) => {
				handle_remote_error(err, network)?;
				Ok(None)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use coverlink_runtime::TransportError;

	use super::*;

	fn verification_error() -> Error {
		Error::Transport(TransportError::Verification("signature verification failed".to_string()))
	}

	fn timeout_error() -> Error {
		Error::Transport(TransportError::Timeout { millis: 30_000 })
	}

	#[test]
	fn local_tolerates_untrusted_signatures() {
		let outcome: Result<Option<u64>> = Err::<u64, _>(verification_error()).recover_noise(Network::Local);
		assert!(matches!(outcome, Ok(None)));
	}

	#[test]
	fn mainnet_propagates_signature_failures() {
		let outcome: Result<Option<u64>> = Err::<u64, _>(verification_error()).recover_noise(Network::Mainnet);
		let err = outcome.unwrap_err();
		assert_eq!(err.to_string(), verification_error().to_string());
	}

	#[test]
	fn mainnet_tolerates_timeouts() {
		let outcome: Result<Option<u64>> = Err::<u64, _>(timeout_error()).recover_noise(Network::Mainnet);
		assert!(matches!(outcome, Ok(None)));
	}

	#[test]
	fn local_propagates_timeouts() {
		let outcome: Result<Option<u64>> = Err::<u64, _>(timeout_error()).recover_noise(Network::Local);
		assert!(outcome.is_err());
	}

	#[test]
	fn successes_pass_through() {
		let outcome = Ok::<u64, Error>(7).recover_noise(Network::Local);
		assert!(matches!(outcome, Ok(Some(7))));
	}
}
