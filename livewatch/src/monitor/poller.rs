//! Poll worker.
//!
//! One poll cycle runs on its own tokio task so resolution latency never
//! touches the engine's control loop. The worker streams its result back
//! over a bounded channel: one [`PollMessage::Live`] per live login, then
//! the [`PollMessage::CycleEnd`] marker, then the task returns normally.

use std::sync::Arc;

use helix_client::HelixClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::Settings;

/// Capacity of the worker-to-engine channel.
pub const POLL_CHANNEL_CAPACITY: usize = 256;

/// One unit of a cycle's streamed result.
///
/// A worker that dies before sending [`PollMessage::CycleEnd`] leaves its
/// cycle unconsumed; the engine resolves the leftover marks when the next
/// completed cycle delivers its marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollMessage {
    /// One channel reported live by the current cycle.
    Live(String),
    /// End-marker: this cycle's result is complete.
    CycleEnd,
}

/// Start one poll cycle in the background and return immediately.
///
/// The settings snapshot is read once by the spawned task; configuration
/// changes never affect a cycle already in flight.
pub fn spawn_poll(
    settings: Settings,
    client: Arc<HelixClient>,
    tx: mpsc::Sender<PollMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let watchlist = settings.watchlist();
        debug!(channels = watchlist.len(), "poll cycle started");

        let live = client.live_channels(&watchlist).await;

        for login in live {
            if tx.send(PollMessage::Live(login)).await.is_err() {
                // Engine shut down mid-cycle; nothing left to deliver to.
                debug!("result channel closed, dropping cycle");
                return;
            }
        }

        if tx.send(PollMessage::CycleEnd).await.is_err() {
            debug!("result channel closed before end-marker");
        }
    })
}
