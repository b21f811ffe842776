//! # Fibonacci Backoff
//!
//! Progressive backoff for store retries. Grows more slowly than exponential
//! backoff, so a handful of retries stays well inside an admission deadline.
//!
//! Calculations are in milliseconds. With the default 50ms minimum and 400ms
//! maximum the sequence is 50ms, 50ms, 100ms, 150ms, 250ms, 400ms (max).

use std::time::Duration;

/// Fibonacci backoff calculator
///
/// Each backoff is the sum of the previous two, capped at the maximum.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Previous backoff in milliseconds
    prev_millis: u64,
    /// Current backoff in milliseconds
    current_millis: u64,
    /// Maximum backoff in milliseconds
    max_millis: u64,
}

impl FibonacciBackoff {
    /// Create a backoff bounded by `min` and `max`
    ///
    /// # Arguments
    ///
    /// * `min` - Used for the first two values
    /// * `max` - Caps the sequence; raised to `min` when smaller
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        let min_millis = duration_millis(min);
        let max_millis = duration_millis(max).max(min_millis);
        Self {
            prev_millis: 0,
            current_millis: min_millis,
            max_millis,
        }
    }

    /// Get the next backoff in milliseconds and advance the sequence
    pub fn next_backoff_millis(&mut self) -> u64 {
        let result = self.current_millis;

        let next = self.prev_millis.saturating_add(self.current_millis);
        self.prev_millis = self.current_millis;
        self.current_millis = std::cmp::min(next, self.max_millis);

        result
    }

    /// Get the next backoff as a `Duration` and advance the sequence
    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_millis(self.next_backoff_millis())
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fibonacci_backoff_sequence() {
        let mut backoff = FibonacciBackoff::new(ms(50), ms(400));

        assert_eq!(backoff.next_backoff_millis(), 50);
        assert_eq!(backoff.next_backoff_millis(), 50);
        assert_eq!(backoff.next_backoff_millis(), 100);
        assert_eq!(backoff.next_backoff_millis(), 150);
        assert_eq!(backoff.next_backoff_millis(), 250);
        assert_eq!(backoff.next_backoff_millis(), 400); // max
    }

    #[test]
    fn test_fibonacci_backoff_max_cap() {
        let mut backoff = FibonacciBackoff::new(ms(50), ms(400));

        for _ in 0..6 {
            backoff.next_backoff_millis();
        }
        // Next would be 650ms (400+250), capped at 400ms
        assert_eq!(backoff.next_backoff_millis(), 400);
        assert_eq!(backoff.next_backoff(), ms(400));
    }

    #[test]
    fn test_max_below_min_is_raised() {
        let mut backoff = FibonacciBackoff::new(ms(100), ms(10));
        assert_eq!(backoff.next_backoff_millis(), 100);
        assert_eq!(backoff.next_backoff_millis(), 100);
        assert_eq!(backoff.next_backoff_millis(), 100);
    }
}
