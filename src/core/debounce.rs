//! Debounce timers for network-bound refreshes.
//!
//! The stats search waits 300 ms after the last keystroke before re-fetching;
//! the event typeahead waits 250 ms and additionally requires two characters.
//! The local row filter never debounces — it is cheap and purely local.

use std::time::{Duration, Instant};

pub const STATS_SEARCH_DELAY: Duration = Duration::from_millis(300);
pub const TYPEAHEAD_DELAY: Duration = Duration::from_millis(250);
pub const TYPEAHEAD_MIN_QUERY: usize = 2;

/// A restartable one-shot timer.  `poke` (re)arms it; `fire` reports
/// readiness exactly once per arming.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Arm (or re-arm) the timer from `now`.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the delay has elapsed; disarms so the refresh runs once.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Gate for the typeahead: queries shorter than the minimum never fetch.
pub fn typeahead_query_ready(query: &str) -> bool {
    query.trim().chars().count() >= TYPEAHEAD_MIN_QUERY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_the_delay() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(250));
        debounce.poke(start);

        assert!(!debounce.fire(start + Duration::from_millis(100)));
        assert!(debounce.fire(start + Duration::from_millis(250)));
        // Disarmed after firing.
        assert!(!debounce.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn poking_restarts_the_countdown() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(250));
        debounce.poke(start);
        debounce.poke(start + Duration::from_millis(200));

        assert!(!debounce.fire(start + Duration::from_millis(300)));
        assert!(debounce.fire(start + Duration::from_millis(450)));
    }

    #[test]
    fn cancel_disarms() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(100));
        debounce.poke(start);
        debounce.cancel();
        assert!(!debounce.is_armed());
        assert!(!debounce.fire(start + Duration::from_secs(1)));
    }

    #[test]
    fn typeahead_needs_two_characters() {
        assert!(!typeahead_query_ready(""));
        assert!(!typeahead_query_ready("a"));
        assert!(!typeahead_query_ready(" a "));
        assert!(typeahead_query_ready("ab"));
        assert!(typeahead_query_ready("Sommerfest"));
    }
}
