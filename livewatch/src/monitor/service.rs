//! Monitor engine: schedules poll cycles and applies their results.

use std::sync::Arc;

use helix_client::HelixClient;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::Settings;

use super::events::{EventBroadcaster, MonitorEvent};
use super::poller::{POLL_CHANNEL_CAPACITY, PollMessage, spawn_poll};
use super::tracker::ChannelTracker;

/// The monitor engine.
///
/// Owns the channel registry and the event broadcaster, and drives the
/// whole pipeline: a fixed-interval timer spawns poll workers, their
/// streamed results feed the tracker, and every genuine transition is
/// published as a [`MonitorEvent`]. The first cycle runs immediately on
/// startup.
///
/// At most one worker is in flight at a time: a timer tick that arrives
/// while the previous cycle is still running is skipped, so two cycles can
/// never interleave their results on the channel.
pub struct LiveMonitor {
    settings: Settings,
    client: Arc<HelixClient>,
    tracker: ChannelTracker,
    broadcaster: EventBroadcaster,
}

impl LiveMonitor {
    /// Create an engine with the transport configured in the settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = settings.build_transport()?;
        Ok(Self::with_client(
            settings,
            Arc::new(HelixClient::new(transport)),
        ))
    }

    /// Create an engine around an existing client (used by tests).
    pub fn with_client(settings: Settings, client: Arc<HelixClient>) -> Self {
        Self {
            settings,
            client,
            tracker: ChannelTracker::new(),
            broadcaster: EventBroadcaster::new(),
        }
    }

    /// Subscribe to transition events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.broadcaster.subscribe()
    }

    /// Get the event broadcaster for external use.
    pub fn broadcaster(&self) -> &EventBroadcaster {
        &self.broadcaster
    }

    /// Logins currently known online, sorted.
    pub fn online_channels(&self) -> Vec<String> {
        self.tracker.online_channels()
    }

    /// Run until the token is cancelled.
    ///
    /// Cancellation stops the timer and closes the result channel without
    /// waiting for an in-flight worker; the worker notices its next failed
    /// send and exits on its own.
    pub async fn run(mut self, cancel: CancellationToken) {
        let (tx, mut rx) = mpsc::channel::<PollMessage>(POLL_CHANNEL_CAPACITY);

        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut worker: Option<JoinHandle<()>> = None;
        let mut mid_cycle = false;

        info!(
            interval_secs = self.settings.poll_interval.as_secs(),
            channels = self.settings.watchlist().len(),
            "monitor started"
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("monitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if worker.as_ref().is_some_and(|h| !h.is_finished()) {
                        warn!("previous poll cycle still in flight, skipping tick");
                    } else {
                        worker = Some(spawn_poll(
                            self.settings.clone(),
                            self.client.clone(),
                            tx.clone(),
                        ));
                    }
                }
                Some(msg) = rx.recv() => {
                    self.apply_message(msg, &mut mid_cycle);
                }
            }
        }

        // The receiver drops here; an in-flight worker is not signalled,
        // its next send just fails and the task winds down by itself.
        drop(rx);
    }

    /// Apply one streamed result unit to the tracker.
    ///
    /// The mark step runs lazily on the first message of a cycle, so the
    /// registry snapshot always matches the result it is diffed against
    /// even when messages sat queued behind a previous cycle.
    fn apply_message(&mut self, msg: PollMessage, mid_cycle: &mut bool) {
        if !*mid_cycle {
            self.tracker.begin_cycle();
            *mid_cycle = true;
        }

        match msg {
            PollMessage::Live(login) => {
                if let Some(transition) = self.tracker.observe_live(&login) {
                    self.broadcaster
                        .publish(MonitorEvent::from_transition(&transition));
                }
            }
            PollMessage::CycleEnd => {
                for transition in self.tracker.finish_cycle() {
                    self.broadcaster
                        .publish(MonitorEvent::from_transition(&transition));
                }

                let live_count = self.tracker.online_channels().len();
                debug!(live_count, "poll cycle applied");
                self.broadcaster
                    .publish(MonitorEvent::CycleCompleted { live_count });

                *mid_cycle = false;
            }
        }
    }
}
