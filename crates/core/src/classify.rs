//! Classification of remote-call failures by their reported text.
//!
//! Gateway and agent errors arrive as strings with no stable codes, so
//! the session layer matches on known fragments of the rendered message.

use crate::error::Error;

fn rendered(err: &Error) -> String {
	err.to_string().to_lowercase()
}

/// True when the certificate or signature on a reply failed to verify.
///
/// Local replicas sign with a root key the agent does not trust, so this
/// shows up on every certified read against a fresh local network.
pub fn is_signature_verification_error(err: &Error) -> bool {
	let text = rendered(err);
	text.contains("signature verification") || text.contains("invalid certificate")
}

/// True when fetching the network root key failed.
pub fn is_fetch_root_key_error(err: &Error) -> bool {
	let text = rendered(err);
	text.contains("failed to fetch") || text.contains("fetchrootkey")
}

/// True when a polled read state no longer matches any in-flight request.
pub fn is_invalid_read_state_error(err: &Error) -> bool {
	let text = rendered(err);
	text.contains("invalid read state request") || text.contains("response could not be found")
}

/// True when the transport gave up waiting for a reply.
pub fn is_timeout_error(err: &Error) -> bool {
	rendered(err).contains("request timed out after")
}

#[cfg(test)]
mod tests {
	use coverlink_runtime::TransportError;

	use super::*;

	fn transport(message: &str) -> Error {
		Error::Transport(TransportError::Verification(message.to_string()))
	}

	#[test]
	fn signature_fragments_match_case_insensitively() {
		assert!(is_signature_verification_error(&transport("Signature verification failed")));
		assert!(is_signature_verification_error(&transport("Invalid certificate: malformed")));
		assert!(!is_signature_verification_error(&transport("unrelated failure")));
	}

	#[test]
	fn root_key_fragments_match() {
		assert!(is_fetch_root_key_error(&transport("TypeError: Failed to fetch")));
		assert!(is_fetch_root_key_error(&Error::Transport(TransportError::RootKeyFetch("gateway down".to_string()))));
		assert!(!is_fetch_root_key_error(&transport("certificate expired")));
	}

	#[test]
	fn read_state_fragments_match() {
		assert!(is_invalid_read_state_error(&transport("Invalid read state request")));
		assert!(is_invalid_read_state_error(&Error::Transport(TransportError::Rpc {
			code: -32000,
			message: "response could not be found".to_string(),
		})));
	}

	#[test]
	fn timeouts_match_only_the_timeout_shape() {
		assert!(is_timeout_error(&Error::Transport(TransportError::Timeout { millis: 30_000 })));
		assert!(!is_timeout_error(&transport("request failed")));
	}
}
