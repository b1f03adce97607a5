use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use crate::clock::Clock;
use crate::error::WorkerError;

// Sliding-window log of admissions for one key (oldest first)
#[derive(Default, Debug)]
pub struct AdmissionWindow {
    admitted: VecDeque<Duration>,
}

impl AdmissionWindow {
    // Drop everything at or before now - window
    fn prune(&mut self, now: Duration, window: Duration) {
        let Some(cutoff) = now.checked_sub(window) else {
            return;
        };
        while self.admitted.front().is_some_and(|&t| t <= cutoff) {
            self.admitted.pop_front();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.admitted.is_empty()
    }
}

// Admits a key while it has fewer than `limit` admissions in (now - window, now].
// Prune-then-append runs under the key's shard lock.
pub struct AdmissionController {
    windows: DashMap<String, AdmissionWindow>,
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl AdmissionController {
    pub fn new(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Result<Self, WorkerError> {
        if limit == 0 {
            return Err(WorkerError::InvalidArgument(
                "rate limit must be greater than zero".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(WorkerError::InvalidArgument(
                "rate window must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            windows: DashMap::new(),
            limit,
            window,
            clock,
        })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, self.clock.now())
    }

    pub fn admit_at(&self, key: &str, now: Duration) -> bool {
        let mut entry = self.windows.entry(key.to_string()).or_default();

        entry.prune(now, self.window);

        if entry.admitted.len() < self.limit as usize {
            entry.admitted.push_back(now);
            return true;
        }

        false
    }

    // Prune every window and forget keys with nothing left in them
    pub fn sweep(&self, now: Duration) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| {
            w.prune(now, self.window);
            !w.is_empty()
        });
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
