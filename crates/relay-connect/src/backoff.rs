// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Source of the random component added to every reconnect delay.
///
/// Injected rather than ambient so retry schedules are reproducible
/// under test: seed the source and the whole sequence is fixed.
pub trait Jitter {
    /// Sample a duration in `[0, bound)`. Returns zero when `bound`
    /// rounds down to zero milliseconds.
    fn sample(&mut self, bound: Duration) -> Duration;
}

/// Production jitter source backed by a seedable RNG.
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Jitter for SeededJitter {
    fn sample(&mut self, bound: Duration) -> Duration {
        let bound_ms = bound.as_millis() as u64;
        if bound_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.rng.gen_range(0..bound_ms))
    }
}

/// No randomness at all; every sample is zero.
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self, _bound: Duration) -> Duration {
        Duration::ZERO
    }
}

/// Compute the delay before the next reconnect attempt.
///
/// `current` is the persistent backoff state from the previous call
/// (zero on the first retry), `base` the configured reconnect interval,
/// `max` the growth cap. Returns the delay to schedule and the state to
/// carry into the next call:
///
/// - a zero `base` disables backoff entirely; the delay is zero and the
///   state never changes,
/// - the delay is the current interval plus jitter in `[0, base)`,
/// - the interval doubles, saturating at `max`, only when `max` is set
///   above `base`; otherwise it stays pinned at `base` forever.
pub fn next_interval(
    current: Duration,
    base: Duration,
    max: Duration,
    jitter: &mut dyn Jitter,
) -> (Duration, Duration) {
    if base.is_zero() {
        return (Duration::ZERO, current);
    }

    let current = if current.is_zero() { base } else { current };
    let delay = current + jitter.sample(base);

    let next = if !max.is_zero() && max > base {
        (current * 2).min(max)
    } else {
        current
    };

    (delay, next)
}

/// Persistent backoff state for one attempt sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backoff {
    current: Duration,
}

impl Backoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay for the next attempt, advancing the internal interval.
    pub fn next(&mut self, base: Duration, max: Duration, jitter: &mut dyn Jitter) -> Duration {
        let (delay, next) = next_interval(self.current, base, max, jitter);
        self.current = next;
        delay
    }

    /// Forget accumulated growth, as after a healthy connection.
    pub fn reset(&mut self) {
        self.current = Duration::ZERO;
    }

    pub fn current(&self) -> Duration {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn zero_base_disables_backoff() {
        let mut jitter = SeededJitter::from_seed(7);
        let mut current = Duration::ZERO;
        for _ in 0..5 {
            let (delay, next) = next_interval(current, Duration::ZERO, 800 * MS, &mut jitter);
            assert_eq!(delay, Duration::ZERO);
            current = next;
        }
        assert_eq!(current, Duration::ZERO);
    }

    #[test]
    fn no_max_keeps_delay_in_base_window() {
        let mut jitter = SeededJitter::from_seed(42);
        let base = 100 * MS;
        let mut current = Duration::ZERO;
        for _ in 0..50 {
            let (delay, next) = next_interval(current, base, Duration::ZERO, &mut jitter);
            assert!(delay >= base, "delay {delay:?} below base");
            assert!(delay < 2 * base, "delay {delay:?} escaped the base window");
            current = next;
        }
        assert_eq!(current, base);
    }

    #[test]
    fn doubles_and_saturates_at_max() {
        let mut jitter = NoJitter;
        let base = 100 * MS;
        let max = 800 * MS;
        let mut backoff = Backoff::new();

        let delays: Vec<Duration> = (0..6)
            .map(|_| backoff.next(base, max, &mut jitter))
            .collect();
        assert_eq!(
            delays,
            vec![100 * MS, 200 * MS, 400 * MS, 800 * MS, 800 * MS, 800 * MS]
        );
        assert_eq!(backoff.current(), max);
    }

    #[test]
    fn max_at_or_below_base_never_grows() {
        let mut jitter = NoJitter;
        let base = 100 * MS;
        let mut backoff = Backoff::new();
        for _ in 0..10 {
            assert_eq!(backoff.next(base, base, &mut jitter), base);
        }
        assert_eq!(backoff.current(), base);
    }

    #[test]
    fn reset_forgets_growth() {
        let mut jitter = NoJitter;
        let base = 100 * MS;
        let max = 800 * MS;
        let mut backoff = Backoff::new();
        backoff.next(base, max, &mut jitter);
        backoff.next(base, max, &mut jitter);
        backoff.reset();
        assert_eq!(backoff.next(base, max, &mut jitter), base);
    }

    #[test]
    fn seeded_jitter_is_reproducible_and_bounded() {
        let bound = 100 * MS;
        let mut a = SeededJitter::from_seed(1234);
        let mut b = SeededJitter::from_seed(1234);
        for _ in 0..20 {
            let sample = a.sample(bound);
            assert_eq!(sample, b.sample(bound));
            assert!(sample < bound);
        }
    }

    #[test]
    fn jitter_of_zero_bound_is_zero() {
        let mut jitter = SeededJitter::from_entropy();
        assert_eq!(jitter.sample(Duration::ZERO), Duration::ZERO);
    }
}
