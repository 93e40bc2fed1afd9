use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated number of simulation steps per second, always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickRate(u32);

impl TickRate {
    /// Rate used before any explicit configuration.
    pub const DEFAULT: TickRate = TickRate(1);

    /// Validates a requested rate against the provided cap.
    pub fn new(requested: i64, cap: u32) -> Result<Self, TickRateError> {
        if requested <= 0 {
            return Err(TickRateError::NonPositive { requested });
        }
        if requested > i64::from(cap) {
            return Err(TickRateError::AboveCap { requested, cap });
        }
        u32::try_from(requested)
            .map(Self)
            .map_err(|_| TickRateError::AboveCap { requested, cap })
    }

    /// Parses and validates user supplied text.
    pub fn parse(text: &str, cap: u32) -> Result<Self, TickRateError> {
        let trimmed = text.trim();
        let requested = trimmed
            .parse::<i64>()
            .map_err(|_| TickRateError::NotANumber {
                input: trimmed.to_owned(),
            })?;
        Self::new(requested, cap)
    }

    /// Ticks per second.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Minimum wall-clock time between two steps.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(1) / self.0.max(1)
    }

    /// Returns the rate nudged by `delta`, saturating at 1 and `cap`.
    #[must_use]
    pub fn adjusted(self, delta: i64, cap: u32) -> Self {
        let ceiling = i64::from(cap.max(1));
        let value = i64::from(self.0).saturating_add(delta).clamp(1, ceiling);
        Self(u32::try_from(value).unwrap_or(1))
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reasons a tick rate request can be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickRateError {
    /// The input was not an integer.
    #[error("tick rate `{input}` is not a whole number")]
    NotANumber {
        /// Text that failed to parse.
        input: String,
    },
    /// The requested rate was zero or negative.
    #[error("tick rate must be at least 1 (received {requested})")]
    NonPositive {
        /// Rejected rate.
        requested: i64,
    },
    /// The requested rate exceeds the active family's cap.
    #[error("tick rate {requested} exceeds the limit of {cap}")]
    AboveCap {
        /// Rejected rate.
        requested: i64,
        /// Highest accepted rate.
        cap: u32,
    },
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{TickRate, TickRateError};

    #[test]
    fn rejects_zero_and_negative_rates() {
        assert_eq!(
            TickRate::new(0, 5),
            Err(TickRateError::NonPositive { requested: 0 })
        );
        assert_eq!(
            TickRate::new(-3, 5),
            Err(TickRateError::NonPositive { requested: -3 })
        );
    }

    #[test]
    fn rejects_rates_above_cap() {
        assert_eq!(
            TickRate::new(6, 5),
            Err(TickRateError::AboveCap {
                requested: 6,
                cap: 5
            })
        );
        assert_eq!(TickRate::new(5, 5).map(|rate| rate.get()), Ok(5));
    }

    #[test]
    fn parse_rejects_non_numeric_text() {
        assert_eq!(
            TickRate::parse("fast", 5),
            Err(TickRateError::NotANumber {
                input: "fast".to_owned()
            })
        );
        assert_eq!(TickRate::parse(" 3 ", 5).map(|rate| rate.get()), Ok(3));
    }

    #[test]
    fn adjusted_never_drops_below_one() {
        let mut rate = TickRate::DEFAULT;
        for _ in 0..10 {
            rate = rate.adjusted(-100, 1000);
            assert_eq!(rate.get(), 1);
        }
        assert_eq!(rate.adjusted(i64::MIN, 1000).get(), 1);
    }

    #[test]
    fn adjusted_saturates_at_cap() {
        let rate = TickRate::new(4, 5).expect("valid");
        assert_eq!(rate.adjusted(1, 5).get(), 5);
        assert_eq!(rate.adjusted(10, 5).get(), 5);
        assert_eq!(rate.adjusted(i64::MAX, 5).get(), 5);
    }

    #[test]
    fn interval_is_reciprocal_of_rate() {
        assert_eq!(TickRate::DEFAULT.interval(), Duration::from_secs(1));
        let rate = TickRate::new(4, 5).expect("valid");
        assert_eq!(rate.interval(), Duration::from_millis(250));
    }
}
