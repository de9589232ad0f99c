// src/core/wait.rs
//
// Poll-until-predicate with a deadline. Stands in for fixed sleeps: callers
// say what they are waiting for and how long they are willing to wait.

use std::{thread, time::{Duration, Instant}};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wait {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Call `probe` until it yields a value or the timeout runs out.
    /// `probe` always runs at least once, even with a zero timeout.
    pub fn until<T, F>(&self, mut probe: F) -> Option<T>
    where
        F: FnMut() -> Option<T>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(v) = probe() {
                return Some(v);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            thread::sleep(self.interval.min(deadline - now));
        }
    }
}
