//! Channel state tracking.
//!
//! Converts one poll cycle's "currently live" snapshot into deduplicated
//! transitions with a mark-and-sweep pass: every known-online channel is
//! provisionally marked at the start of a cycle, confirmed back to online
//! as it reappears in the result, and swept to offline if it never does.
//! The same steady state reported over any number of consecutive cycles
//! produces no events at all.

use std::collections::HashMap;

use tracing::debug;

/// Liveness state of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Offline,
    Online,
    /// Provisional mark: online before the current cycle, not yet
    /// confirmed by it. Never survives past [`ChannelTracker::finish_cycle`].
    WasOnline,
}

/// A genuine transition observed during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Online(String),
    Offline(String),
}

impl Transition {
    /// The login the transition concerns.
    pub fn login(&self) -> &str {
        match self {
            Transition::Online(login) | Transition::Offline(login) => login,
        }
    }
}

/// Owned registry of channel states.
///
/// Only ever mutated while processing one complete poll result. Entries
/// are never pruned: a channel dropped from the configuration keeps its
/// last state until shutdown.
#[derive(Debug, Default)]
pub struct ChannelTracker {
    registry: HashMap<String, ChannelState>,
}

impl ChannelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark step: every online channel becomes provisionally was-online.
    ///
    /// Marks left over from a cycle that died before its end-marker are
    /// carried into the new cycle, where the sweep resolves them.
    pub fn begin_cycle(&mut self) {
        for state in self.registry.values_mut() {
            if *state == ChannelState::Online {
                *state = ChannelState::WasOnline;
            }
        }
    }

    /// Sweep-in step: one login reported live by the current cycle.
    ///
    /// Returns a transition only if the channel was not already known
    /// live; confirming a marked channel is silent.
    pub fn observe_live(&mut self, login: &str) -> Option<Transition> {
        let previous = self.registry.get(login).copied();
        self.registry
            .insert(login.to_string(), ChannelState::Online);

        match previous {
            Some(ChannelState::WasOnline) | Some(ChannelState::Online) => None,
            Some(ChannelState::Offline) | None => {
                debug!(login, "channel went online");
                Some(Transition::Online(login.to_string()))
            }
        }
    }

    /// Sweep-out step: every channel still marked was-online is gone from
    /// this cycle's result and transitions to offline.
    ///
    /// Returned transitions are sorted by login for deterministic output.
    pub fn finish_cycle(&mut self) -> Vec<Transition> {
        let mut dropped: Vec<String> = self
            .registry
            .iter()
            .filter(|(_, state)| **state == ChannelState::WasOnline)
            .map(|(login, _)| login.clone())
            .collect();
        dropped.sort();

        for login in &dropped {
            self.registry
                .insert(login.clone(), ChannelState::Offline);
            debug!(login = login.as_str(), "channel went offline");
        }

        dropped.into_iter().map(Transition::Offline).collect()
    }

    /// Logins currently online, sorted.
    pub fn online_channels(&self) -> Vec<String> {
        let mut online: Vec<String> = self
            .registry
            .iter()
            .filter(|(_, state)| **state == ChannelState::Online)
            .map(|(login, _)| login.clone())
            .collect();
        online.sort();
        online
    }

    /// Current state of a login, if it has ever been observed live.
    pub fn state(&self, login: &str) -> Option<ChannelState> {
        self.registry.get(login).copied()
    }

    /// Number of channels the registry has ever tracked.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
