/// Trailing-edge debouncer driven by the host's clock.
///
/// Each `schedule` supersedes (cancels) the previous pending value and
/// restarts the window, so a burst of calls collapses to the last one. The
/// host polls with the current time from its event loop; nothing fires on
/// its own.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window_ms: u64,
    pending: Option<Scheduled<T>>,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due_ms: u64,
    value: T,
}

impl<T> Debouncer<T> {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn schedule(&mut self, value: T, now_ms: u64) {
        self.pending = Some(Scheduled {
            due_ms: now_ms.saturating_add(self.window_ms),
            value,
        });
    }

    /// Take the pending value once its window has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some(scheduled) if now_ms >= scheduled.due_ms => {
                self.pending.take().map(|scheduled| scheduled.value)
            }
            _ => None,
        }
    }

    /// Take the pending value without waiting
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|scheduled| scheduled.value)
    }

    /// Drop the pending value; returns whether there was one
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|scheduled| scheduled.due_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_collapses_to_last_value() {
        let mut debouncer = Debouncer::new(10);
        debouncer.schedule(1, 0);
        debouncer.schedule(2, 4);
        debouncer.schedule(3, 8);

        assert_eq!(debouncer.poll(17), None);
        assert_eq!(debouncer.poll(18), Some(3));
        assert_eq!(debouncer.poll(100), None);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut debouncer = Debouncer::new(10);
        debouncer.schedule("move", 0);
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.poll(50), None);
    }

    #[test]
    fn test_flush_ignores_window() {
        let mut debouncer = Debouncer::new(10);
        debouncer.schedule('x', 0);
        assert_eq!(debouncer.due_ms(), Some(10));
        assert_eq!(debouncer.flush(), Some('x'));
        assert!(!debouncer.is_pending());
    }
}
