use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSignal {
    Started,
    Stopped,
}

/// Debounced scroll gesture detection. Raw scroll ticks are fed through
/// [`ScrollWatcher::tick`]; the gesture counts as stopped once no tick has
/// arrived for the quiet interval. Consumers act on `Stopped` only, never
/// on individual ticks.
///
/// Time is passed in by the caller so the watcher stays deterministic.
#[derive(Debug)]
pub struct ScrollWatcher {
    quiet: Duration,
    last_tick: Option<Instant>,
}

impl ScrollWatcher {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_tick: None,
        }
    }

    /// Records a raw scroll tick. Returns `Started` on the first tick of
    /// a new gesture.
    pub fn tick(&mut self, now: Instant) -> Option<ScrollSignal> {
        let first = self.last_tick.is_none();
        self.last_tick = Some(now);
        first.then_some(ScrollSignal::Started)
    }

    /// Polls for the end of the gesture. Returns `Stopped` exactly once
    /// after the quiet interval has elapsed with no further ticks.
    pub fn poll(&mut self, now: Instant) -> Option<ScrollSignal> {
        match self.last_tick {
            Some(last) if now.duration_since(last) >= self.quiet => {
                self.last_tick = None;
                Some(ScrollSignal::Stopped)
            }
            _ => None,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.last_tick.is_some()
    }
}

impl Default for ScrollWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_starts_gesture() {
        let mut watcher = ScrollWatcher::default();
        let now = Instant::now();
        assert_eq!(watcher.tick(now), Some(ScrollSignal::Started));
        assert_eq!(watcher.tick(now + Duration::from_millis(10)), None);
        assert!(watcher.is_scrolling());
    }

    #[test]
    fn stop_fires_only_after_quiet_interval() {
        let mut watcher = ScrollWatcher::new(Duration::from_millis(250));
        let now = Instant::now();
        watcher.tick(now);

        assert_eq!(watcher.poll(now + Duration::from_millis(100)), None);
        assert_eq!(
            watcher.poll(now + Duration::from_millis(250)),
            Some(ScrollSignal::Stopped)
        );
        // Stop is reported once per gesture.
        assert_eq!(watcher.poll(now + Duration::from_millis(600)), None);
        assert!(!watcher.is_scrolling());
    }

    #[test]
    fn continued_ticks_postpone_stop() {
        let mut watcher = ScrollWatcher::new(Duration::from_millis(250));
        let now = Instant::now();
        watcher.tick(now);
        watcher.tick(now + Duration::from_millis(200));

        assert_eq!(watcher.poll(now + Duration::from_millis(300)), None);
        assert_eq!(
            watcher.poll(now + Duration::from_millis(450)),
            Some(ScrollSignal::Stopped)
        );
    }
}
