//! Pagination trigger: debounced "load more" requests when the viewport
//! reaches the bottom of the content.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

/// Scroll state reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    /// Current scroll offset in pixels.
    pub scroll_top: u32,
    /// Total scrollable height as the host measures it.
    pub scroll_height: u32,
}

impl ScrollEvent {
    /// Create a scroll event.
    pub fn new(scroll_top: u32, scroll_height: u32) -> Self {
        Self {
            scroll_top,
            scroll_height,
        }
    }
}

/// Completion handle passed to the "load more" hook.
///
/// Dropping it without calling [`finish`](Self::finish) leaves the request
/// in flight, and no further pagination happens.
#[must_use = "call finish() once the fetch completes"]
pub struct LoadMoreDone {
    in_flight: Arc<AtomicBool>,
}

impl LoadMoreDone {
    /// Mark the request complete so the next bottom hit may fetch again.
    pub fn finish(self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for LoadMoreDone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadMoreDone")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

/// Hook called with a completion handle when more data is wanted.
pub type LoadMoreHook = Box<dyn FnMut(LoadMoreDone) + Send + Sync>;

/// Trailing-edge debounce: fires once `delay` has passed since the last
/// event.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debounce {
    /// Create a debounce with `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    /// Record an event at `now`, restarting the delay.
    pub fn arm(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// Returns `true` once, when the delay has elapsed since the last event.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_event else {
            return false;
        };
        if now.saturating_duration_since(last) >= self.delay {
            self.last_event = None;
            return true;
        }
        false
    }

    /// Time left before [`fire`](Self::fire) succeeds.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        let last = self.last_event?;
        Some(self.delay.saturating_sub(now.saturating_duration_since(last)))
    }

    /// Returns `true` while an event is waiting.
    pub fn is_armed(&self) -> bool {
        self.last_event.is_some()
    }
}

/// Pagination state of one grid.
#[derive(Debug)]
pub struct Pagination {
    can_load_more: bool,
    in_flight: Arc<AtomicBool>,
    triggered_at: HashSet<u32>,
    debounce: Debounce,
    latest: Option<ScrollEvent>,
}

impl Pagination {
    /// Create pagination state with the given debounce delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            can_load_more: true,
            in_flight: Arc::new(AtomicBool::new(false)),
            triggered_at: HashSet::new(),
            debounce: Debounce::new(delay),
            latest: None,
        }
    }

    /// Whether more data may still be requested.
    pub fn can_load_more(&self) -> bool {
        self.can_load_more
    }

    /// Stop requesting more data for good.
    pub fn stop(&mut self) {
        self.can_load_more = false;
    }

    /// Whether a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Record a scroll event and restart the debounce.
    pub fn on_scroll(&mut self, event: ScrollEvent, now: Instant) {
        self.latest = Some(event);
        self.debounce.arm(now);
    }

    /// Time left before the pending scroll is evaluated.
    pub fn time_until_check(&self, now: Instant) -> Option<Duration> {
        self.debounce.time_until_fire(now)
    }

    /// Bottom test: the content's far edge exactly meets the viewport plus
    /// `slack`. Hits at most once per distinct scroll offset.
    pub fn is_at_bottom(&mut self, event: ScrollEvent, viewport_height: u32, slack: u32) -> bool {
        let at_bottom =
            event.scroll_height as u64 == event.scroll_top as u64 + viewport_height as u64 + slack as u64;
        at_bottom && self.triggered_at.insert(event.scroll_top)
    }

    /// Evaluate the debounced scroll at `now`.
    ///
    /// Returns a completion handle, with the request marked in flight, when
    /// the delay has elapsed, the latest scroll sits at the bottom, more data
    /// may be loaded and nothing is in flight.
    pub fn poll(&mut self, now: Instant, viewport_height: u32, slack: u32) -> Option<LoadMoreDone> {
        if !self.debounce.fire(now) {
            return None;
        }
        let event = self.latest?;
        if !self.is_at_bottom(event, viewport_height, slack) || !self.can_load_more {
            return None;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(LoadMoreDone {
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_debounce_collapses_bursts() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);
        debounce.arm(start);
        debounce.arm(start + Duration::from_millis(200));

        assert!(!debounce.fire(start + Duration::from_millis(400)));
        assert!(debounce.is_armed());
        assert!(debounce.fire(start + Duration::from_millis(500)));
        assert!(!debounce.is_armed());
        assert!(!debounce.fire(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_bottom_once_per_offset() {
        let mut pagination = Pagination::new(DELAY);
        let event = ScrollEvent::new(600, 1004);
        assert!(pagination.is_at_bottom(event, 400, 4));
        assert!(!pagination.is_at_bottom(event, 400, 4));
        assert!(!pagination.is_at_bottom(ScrollEvent::new(590, 1004), 400, 4));
    }

    #[test]
    fn test_poll_guards_in_flight() {
        let start = Instant::now();
        let mut pagination = Pagination::new(DELAY);

        pagination.on_scroll(ScrollEvent::new(600, 1004), start);
        let done = pagination.poll(start + DELAY, 400, 4).unwrap();
        assert!(pagination.is_loading());

        // A different bottom offset while the first request is outstanding.
        pagination.on_scroll(ScrollEvent::new(700, 1104), start + DELAY);
        assert!(pagination.poll(start + DELAY * 2, 400, 4).is_none());

        done.finish();
        assert!(!pagination.is_loading());
        pagination.on_scroll(ScrollEvent::new(800, 1204), start + DELAY * 2);
        assert!(pagination.poll(start + DELAY * 3, 400, 4).is_some());
    }

    #[test]
    fn test_stop_disables_requests() {
        let start = Instant::now();
        let mut pagination = Pagination::new(DELAY);
        pagination.stop();
        pagination.on_scroll(ScrollEvent::new(600, 1004), start);
        assert!(pagination.poll(start + DELAY, 400, 4).is_none());
        assert!(!pagination.can_load_more());
    }
}
