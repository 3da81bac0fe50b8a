//! Background watchdog that ends sessions whose wallet went away.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use coverlink_runtime::WalletProvider;

use super::store::{SessionStatus, SessionStore};

/// Default spacing between identity checks.
pub const MONITOR_INTERVAL: Duration = Duration::from_secs(5);

/// Handle to a running monitor task; dropping it cancels the task.
pub struct MonitorHandle {
	task: JoinHandle<()>,
}

impl MonitorHandle {
	/// Stops the monitor.
	pub fn cancel(&self) {
		self.task.abort();
	}

	/// True once the task has exited.
	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}
}

impl Drop for MonitorHandle {
	fn drop(&mut self) {
		self.task.abort();
	}
}

/// Spawns a watchdog that re-checks the wallet identity every `interval`.
///
/// The task ends the session when the provider has dropped its transport
/// or reports an identity that is empty or anonymous. Failed identity
/// queries are retried on the next tick; the task exits once the store
/// is disconnected.
pub fn spawn_monitor(store: Arc<SessionStore>, provider: Arc<dyn WalletProvider>, interval: Duration) -> MonitorHandle {
	let task = tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		// The first tick of a fresh interval fires immediately.
		ticker.tick().await;

		loop {
			ticker.tick().await;
			match store.status() {
				SessionStatus::Connected => {}
				SessionStatus::Disconnected => {
					debug!(target = "coverlink.monitor", "session gone; monitor exiting");
					break;
				}
				_ => continue,
			}

			let Some(transport) = provider.signing_transport() else {
				info!(target = "coverlink.monitor", "wallet transport gone; ending session");
				store.disconnect().await;
				break;
			};

			match transport.identity().await {
				Ok(identity) if identity.is_session_identity() => {}
				Ok(_) => {
					info!(target = "coverlink.monitor", "wallet identity no longer valid; ending session");
					store.disconnect().await;
					break;
				}
				Err(err) => {
					debug!(target = "coverlink.monitor", error = %err, "identity check failed; will retry");
				}
			}
		}
	});

	MonitorHandle { task }
}
