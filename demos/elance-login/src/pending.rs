//! States handed out with authorization URLs and not yet redeemed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a user has to finish the consent round trip.
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
pub struct PendingStates {
    ttl: Duration,
    states: HashMap<String, Instant>,
}

impl PendingStates {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            states: HashMap::new(),
        }
    }

    /// Remember a state, dropping any that have outlived the TTL.
    pub fn insert(&mut self, state: String) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.states.retain(|_, created| now.duration_since(*created) < ttl);
        self.states.insert(state, now);
    }

    /// Consume a state. Unknown and expired states are rejected.
    pub fn take(&mut self, state: &str) -> bool {
        self.states
            .remove(state)
            .is_some_and(|created| created.elapsed() < self.ttl)
    }

    pub fn count(&self) -> usize {
        self.states.len()
    }
}

impl Default for PendingStates {
    fn default() -> Self {
        Self::new(STATE_TTL)
    }
}
