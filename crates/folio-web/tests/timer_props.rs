//! Property-based tests for the timer queue.
//!
//! Verifies:
//! 1. Due timers come out in (deadline, schedule order) order
//! 2. Nothing later than `now` is ever popped
//! 3. Cancelled timers never fire
//! 4. Interval timers fire once per elapsed period

use std::time::Duration;

use folio_web::TimerQueue;
use proptest::prelude::*;

proptest! {
    #[test]
    fn due_timers_pop_in_order(
        deadlines in prop::collection::vec(0u64..1000, 0..40),
        now in 0u64..1200,
    ) {
        let mut q = TimerQueue::new();
        let ids: Vec<_> = deadlines
            .iter()
            .enumerate()
            .map(|(i, d)| q.schedule(0, i as u64, Duration::from_millis(*d), None))
            .collect();
        prop_assert_eq!(ids.len(), deadlines.len());

        let now = Duration::from_millis(now);
        let popped: Vec<_> = std::iter::from_fn(|| q.pop_due(now)).collect();
        for pair in popped.windows(2) {
            prop_assert!((pair[0].deadline, pair[0].id) < (pair[1].deadline, pair[1].id));
        }
        for due in &popped {
            prop_assert!(due.deadline <= now);
        }
        let expected = deadlines.iter().filter(|d| Duration::from_millis(**d) <= now).count();
        prop_assert_eq!(popped.len(), expected);
        prop_assert_eq!(q.len(), deadlines.len() - expected);
    }

    #[test]
    fn cancelled_timers_never_fire(
        deadlines in prop::collection::vec(0u64..100, 1..30),
        cancel_mask in prop::collection::vec(any::<bool>(), 30),
    ) {
        let mut q = TimerQueue::new();
        let mut kept = Vec::new();
        for (i, d) in deadlines.iter().enumerate() {
            let id = q.schedule(1, i as u64, Duration::from_millis(*d), None);
            if cancel_mask[i] {
                prop_assert!(q.cancel(id));
            } else {
                kept.push(i as u64);
            }
        }
        let mut fired: Vec<u64> = std::iter::from_fn(|| q.pop_due(Duration::from_millis(100)))
            .map(|d| d.token)
            .collect();
        fired.sort_unstable();
        prop_assert_eq!(fired, kept);
    }

    #[test]
    fn interval_fires_once_per_period(period in 1u64..100, elapsed in 0u64..5000) {
        let mut q = TimerQueue::new();
        let period_d = Duration::from_millis(period);
        q.schedule(0, 0, period_d, Some(period_d));
        let fired = std::iter::from_fn(|| q.pop_due(Duration::from_millis(elapsed))).count();
        prop_assert_eq!(fired as u64, elapsed / period);
        prop_assert_eq!(q.len(), 1);
    }
}
