// ── Busy task counter ──
//
// Saturating count of outstanding asynchronous operations. The shell
// mirrors it onto the spinner and emits `busy-end` from `finish()`.

/// Count of in-flight tasks, never below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyTracker {
    count: u32,
}

impl BusyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` tasks. Returns `true` when the indicator should be
    /// active afterwards.
    pub fn add(&mut self, count: u32) -> bool {
        self.count = self.count.saturating_add(count);
        self.count > 0
    }

    /// Finish one task, clamping at zero. Returns `true` whenever the
    /// count ends at zero, including when it was already zero: every such
    /// call deactivates the indicator and notifies `busy-end`.
    pub fn finish(&mut self) -> bool {
        self.count = self.count.saturating_sub(1);
        self.count == 0
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_busy(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let tracker = BusyTracker::new();
        assert_eq!(tracker.count(), 0);
        assert!(!tracker.is_busy());
    }

    #[test]
    fn add_then_finish_settles() {
        let mut tracker = BusyTracker::new();
        assert!(tracker.add(2));
        assert!(tracker.is_busy());
        assert!(!tracker.finish());
        assert!(tracker.is_busy());
        assert!(tracker.finish());
        assert!(!tracker.is_busy());
    }

    #[test]
    fn extra_finishes_clamp_and_still_settle() {
        let mut tracker = BusyTracker::new();
        assert!(tracker.finish());
        assert!(tracker.finish());
        assert_eq!(tracker.count(), 0);

        // The clamp does not bank negative credit.
        assert!(tracker.add(1));
        assert!(tracker.is_busy());
    }

    #[test]
    fn adding_zero_keeps_indicator_state() {
        let mut tracker = BusyTracker::new();
        assert!(!tracker.add(0));
        tracker.add(3);
        assert!(tracker.add(0));
    }

    #[test]
    fn busy_matches_clamped_running_sum() {
        // (op, n): true = add n, false = finish
        let ops = [
            (false, 0),
            (true, 2),
            (false, 0),
            (true, 1),
            (false, 0),
            (false, 0),
            (false, 0),
            (false, 0),
            (true, 5),
            (false, 0),
        ];
        let mut tracker = BusyTracker::new();
        let mut model: i64 = 0;
        for (is_add, n) in ops {
            if is_add {
                tracker.add(n);
                model += i64::from(n);
            } else {
                tracker.finish();
                model = (model - 1).max(0);
            }
            assert_eq!(tracker.is_busy(), model > 0);
            assert_eq!(i64::from(tracker.count()), model);
        }
    }
}
