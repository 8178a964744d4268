//! Monitor events for the notification system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::tracker::Transition;

/// Build the public URL for a channel login.
pub fn channel_url(login: &str) -> String {
    format!("https://twitch.tv/{login}")
}

/// Events emitted by the monitor engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MonitorEvent {
    /// Channel went online.
    ChannelOnline {
        login: String,
        url: String,
        timestamp: DateTime<Utc>,
    },
    /// Channel went offline.
    ChannelOffline {
        login: String,
        url: String,
        timestamp: DateTime<Utc>,
    },
    /// One poll cycle finished its sweep.
    CycleCompleted { live_count: usize },
}

impl MonitorEvent {
    /// Build the event for a tracker transition.
    pub fn from_transition(transition: &Transition) -> Self {
        match transition {
            Transition::Online(login) => MonitorEvent::ChannelOnline {
                login: login.clone(),
                url: channel_url(login),
                timestamp: Utc::now(),
            },
            Transition::Offline(login) => MonitorEvent::ChannelOffline {
                login: login.clone(),
                url: channel_url(login),
                timestamp: Utc::now(),
            },
        }
    }

    /// Get a human-readable description of the event.
    pub fn description(&self) -> String {
        match self {
            MonitorEvent::ChannelOnline { login, url, .. } => {
                format!("channel {login} now online ({url})")
            }
            MonitorEvent::ChannelOffline { login, .. } => {
                format!("channel {login} now offline")
            }
            MonitorEvent::CycleCompleted { live_count } => {
                format!("poll cycle completed, {live_count} live")
            }
        }
    }

    /// Check if this event should reach notification sinks.
    pub fn should_notify(&self) -> bool {
        match self {
            MonitorEvent::ChannelOnline { .. } | MonitorEvent::ChannelOffline { .. } => true,
            MonitorEvent::CycleCompleted { .. } => false,
        }
    }
}

/// Broadcaster for monitor events.
pub struct EventBroadcaster {
    sender: broadcast::Sender<MonitorEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster with default capacity (256).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new broadcaster with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: MonitorEvent) {
        let _ = self.sender.send(event);
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBroadcaster {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
