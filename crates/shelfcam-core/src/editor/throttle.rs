//! Frame-paced coalescing of pointer samples.

/// Holds at most one pending sample and releases it at most once per
/// frame-budget window.
///
/// A newer sample replaces the pending one instead of queueing behind it,
/// so what gets committed is always the most recent input.
#[derive(Debug, Clone)]
pub struct FrameThrottle<T> {
    budget_ms: f64,
    last_commit_ms: Option<f64>,
    pending: Option<T>,
    dropped: u64,
}

/// Outcome of offering a sample to the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First sample since the last commit; an update is now scheduled
    Scheduled,
    /// Replaced an older pending sample, which was dropped
    Coalesced,
}

impl<T> FrameThrottle<T> {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms: if budget_ms.is_finite() { budget_ms.max(0.0) } else { 0.0 },
            last_commit_ms: None,
            pending: None,
            dropped: 0,
        }
    }

    /// Store a sample, replacing any pending one.
    pub fn offer(&mut self, sample: T) -> Offer {
        match self.pending.replace(sample) {
            Some(_) => {
                self.dropped += 1;
                Offer::Coalesced
            }
            None => Offer::Scheduled,
        }
    }

    /// Take the pending sample if the frame budget has elapsed since the
    /// previous commit.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        if self.pending.is_none() || !self.window_open(now_ms) {
            return None;
        }
        self.last_commit_ms = Some(now_ms);
        self.pending.take()
    }

    /// Take the pending sample regardless of the frame budget.
    pub fn flush(&mut self, now_ms: f64) -> Option<T> {
        let sample = self.pending.take();
        if sample.is_some() {
            self.last_commit_ms = Some(now_ms);
        }
        sample
    }

    /// Discard any pending sample.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.dropped += 1;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Samples discarded since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn window_open(&self, now_ms: f64) -> bool {
        match self.last_commit_ms {
            Some(last) => now_ms - last >= self.budget_ms,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_sample_wins() {
        let mut t = FrameThrottle::new(16.0);
        assert_eq!(t.offer(1), Offer::Scheduled);
        for i in 2..=5 {
            assert_eq!(t.offer(i), Offer::Coalesced);
        }
        assert_eq!(t.poll(4.0), Some(5));
        assert_eq!(t.poll(40.0), None);
        assert_eq!(t.dropped(), 4);
    }

    #[test]
    fn test_budget_blocks_early_commit() {
        let mut t = FrameThrottle::new(16.0);
        t.offer(1);
        assert_eq!(t.poll(100.0), Some(1));

        t.offer(2);
        assert_eq!(t.poll(110.0), None);
        assert!(t.has_pending());
        assert_eq!(t.poll(116.0), Some(2));
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut t = FrameThrottle::new(16.0);
        t.offer(1);
        t.cancel();
        assert!(!t.has_pending());
        assert_eq!(t.poll(1000.0), None);
    }

    #[test]
    fn test_flush_ignores_budget() {
        let mut t = FrameThrottle::new(16.0);
        t.offer(1);
        assert_eq!(t.poll(0.0), Some(1));
        t.offer(2);
        assert_eq!(t.flush(1.0), Some(2));
        assert_eq!(t.flush(2.0), None);
    }
}
