//! Expiry normalization for cache writes.
//!
//! Callers express lifetimes either as minutes (possibly fractional) or as a
//! point-in-time deadline. Every write path funnels through
//! [`Expiry::as_seconds`], the single place where those inputs are converted
//! to the store-native unit (whole seconds).
//!
//! An unusable expiry (non-positive, non-finite, or already passed) converts
//! to `None`, which write operations treat as "do not store". Storing with no
//! expiration at all is a separate operation (`forever`), never inferred from
//! a zero value here.

use std::time::SystemTime;

/// Requested lifetime for a cache entry.
///
/// # Examples
///
/// ```
/// use cache_facade::Expiry;
///
/// assert_eq!(Expiry::Minutes(10.0).as_seconds(), Some(600));
/// assert_eq!(Expiry::Minutes(0.5).as_seconds(), Some(30));
/// assert_eq!(Expiry::Minutes(0.0).as_seconds(), None);
/// assert_eq!(Expiry::Minutes(-5.0).as_seconds(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expiry {
    /// Lifetime in minutes from now. Fractional values are allowed.
    Minutes(f64),

    /// Absolute deadline. Deadlines in the past are unusable.
    At(SystemTime),
}

impl Expiry {
    /// Convert to whole seconds from now.
    ///
    /// Returns `None` when the expiry is unusable: non-positive or
    /// non-finite minutes, or a deadline that is not in the future.
    /// Usable expiries are clamped to at least one second so a short but
    /// positive lifetime never degenerates into an immediate expiry.
    pub fn as_seconds(&self) -> Option<u64> {
        match self {
            Expiry::Minutes(minutes) => {
                if !minutes.is_finite() || *minutes <= 0.0 {
                    return None;
                }
                Some(((minutes * 60.0) as u64).max(1))
            }
            Expiry::At(deadline) => match deadline.duration_since(SystemTime::now()) {
                Ok(remaining) if !remaining.is_zero() => Some(remaining.as_secs().max(1)),
                _ => None,
            },
        }
    }
}

impl From<f64> for Expiry {
    fn from(minutes: f64) -> Self {
        Expiry::Minutes(minutes)
    }
}

impl From<u64> for Expiry {
    fn from(minutes: u64) -> Self {
        Expiry::Minutes(minutes as f64)
    }
}

impl From<SystemTime> for Expiry {
    fn from(deadline: SystemTime) -> Self {
        Expiry::At(deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_whole_minutes() {
        assert_eq!(Expiry::Minutes(1.0).as_seconds(), Some(60));
        assert_eq!(Expiry::Minutes(10.0).as_seconds(), Some(600));
    }

    #[test]
    fn test_fractional_minutes() {
        assert_eq!(Expiry::Minutes(0.5).as_seconds(), Some(30));
        assert_eq!(Expiry::Minutes(1.5).as_seconds(), Some(90));
    }

    #[test]
    fn test_sub_second_minutes_clamp_to_one() {
        // 0.01 minutes is 600ms; still a usable one-second TTL.
        assert_eq!(Expiry::Minutes(0.01).as_seconds(), Some(1));
    }

    #[test]
    fn test_unusable_minutes() {
        assert_eq!(Expiry::Minutes(0.0).as_seconds(), None);
        assert_eq!(Expiry::Minutes(-1.0).as_seconds(), None);
        assert_eq!(Expiry::Minutes(f64::NAN).as_seconds(), None);
        assert_eq!(Expiry::Minutes(f64::INFINITY).as_seconds(), None);
    }

    #[test]
    fn test_future_deadline() {
        let deadline = SystemTime::now() + Duration::from_secs(120);
        let secs = Expiry::At(deadline).as_seconds().expect("Deadline unusable");
        assert!(secs >= 118 && secs <= 120, "got {}", secs);
    }

    #[test]
    fn test_past_deadline() {
        let deadline = SystemTime::now() - Duration::from_secs(60);
        assert_eq!(Expiry::At(deadline).as_seconds(), None);
    }

    #[test]
    fn test_deadline_at_now_is_unusable() {
        // Only a strictly future deadline is usable; "now" never clamps
        // up to a one-second TTL.
        assert_eq!(Expiry::At(SystemTime::now()).as_seconds(), None);
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Expiry::from(5.0).as_seconds(), Some(300));
        assert_eq!(Expiry::from(5u64).as_seconds(), Some(300));
    }

    proptest! {
        #[test]
        fn prop_positive_minutes_always_usable(minutes in 0.001f64..100_000.0) {
            let secs = Expiry::Minutes(minutes).as_seconds();
            prop_assert!(secs.is_some());
            prop_assert!(secs.expect("checked") >= 1);
        }

        #[test]
        fn prop_non_positive_minutes_never_usable(minutes in -100_000.0f64..=0.0) {
            prop_assert_eq!(Expiry::Minutes(minutes).as_seconds(), None);
        }

        #[test]
        fn prop_conversion_is_monotonic(a in 1.0f64..10_000.0, b in 1.0f64..10_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_secs = Expiry::Minutes(lo).as_seconds().expect("usable");
            let hi_secs = Expiry::Minutes(hi).as_seconds().expect("usable");
            prop_assert!(lo_secs <= hi_secs);
        }
    }
}
