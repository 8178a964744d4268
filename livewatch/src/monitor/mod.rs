//! Live-status monitor engine.
//!
//! The engine turns a configured watchlist into deduplicated transition
//! events:
//!
//! - a poll worker ([`poller`]) runs one resolution cycle per timer tick on
//!   its own task and streams the live set back over a bounded channel,
//! - the tracker ([`tracker`]) diffs each complete result against the
//!   registry with a mark-and-sweep pass,
//! - the service ([`service`]) wires both together and broadcasts
//!   [`MonitorEvent`]s to whoever subscribes.

pub mod events;
pub mod poller;
pub mod service;
pub mod tracker;

pub use events::{EventBroadcaster, MonitorEvent, channel_url};
pub use poller::{POLL_CHANNEL_CAPACITY, PollMessage, spawn_poll};
pub use service::LiveMonitor;
pub use tracker::{ChannelState, ChannelTracker, Transition};
