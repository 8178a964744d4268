//! Notification sinks.
//!
//! Transition events reach the outside world through sinks. The status
//! sink (log output) is always on; a webhook sink is added when a webhook
//! URL is configured. Delivery failures are warnings, never fatal, and a
//! failing sink does not stop the others.

mod webhook;

pub use webhook::WebhookSink;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Result;
use crate::monitor::{EventBroadcaster, MonitorEvent};

/// Trait for notification sinks.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Get the sink type name.
    fn sink_type(&self) -> &'static str;

    /// Deliver one event through this sink.
    async fn notify(&self, event: &MonitorEvent) -> Result<()>;
}

/// Sink that writes transitions to the persistent status surface (the
/// application log).
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn sink_type(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, event: &MonitorEvent) -> Result<()> {
        info!("{}", event.description());
        Ok(())
    }
}

/// Forward broadcast events to every sink until cancelled.
///
/// Runs on its own task so slow sinks never hold up the monitor's control
/// loop. Events that arrive while the dispatcher lags are dropped by the
/// broadcast channel and counted in a warning.
pub fn spawn_dispatcher(
    broadcaster: &EventBroadcaster,
    sinks: Vec<Box<dyn NotificationSink>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let mut receiver = broadcaster.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("notification dispatcher shutting down");
                    break;
                }
                result = receiver.recv() => match result {
                    Ok(event) => {
                        if !event.should_notify() {
                            continue;
                        }
                        for sink in &sinks {
                            if let Err(e) = sink.notify(&event).await {
                                warn!(
                                    sink = sink.sink_type(),
                                    error = %e,
                                    "notification delivery failed"
                                );
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "notification dispatcher lagged, events dropped");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    })
}
