//! Synthetic sensor readings.
//!
//! One random source is shared by the device simulator (`/device status`)
//! and the telemetry scheduler, so both draw from the same bounded range.
//! The generator can be seeded for deterministic tests.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::foundation::DomainError;

/// Inclusive bounds for generated sensor values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingRange {
    min: i64,
    max: i64,
}

impl ReadingRange {
    /// Creates a range, rejecting `min > max`.
    pub fn new(min: i64, max: i64) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::invalid_format(
                "reading_range",
                format!("min {} exceeds max {}", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Returns true if `value` lies within the bounds.
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ReadingRange {
    /// 0 to 100 inclusive.
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

impl fmt::Display for ReadingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Formats a value with the fixed telemetry template.
pub fn format_reading(value: i64) -> String {
    format!("Sensor reading: {}", value)
}

/// Thread-safe generator of sensor values within a [`ReadingRange`].
pub struct SensorReadings {
    rng: Mutex<StdRng>,
    range: ReadingRange,
}

impl SensorReadings {
    /// Creates a generator seeded from OS entropy.
    pub fn from_entropy(range: ReadingRange) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            range,
        }
    }

    /// Creates a generator with a fixed seed.
    ///
    /// Two generators built from the same seed and range yield the same
    /// sequence of values.
    pub fn seeded(seed: u64, range: ReadingRange) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            range,
        }
    }

    pub fn range(&self) -> ReadingRange {
        self.range
    }

    /// Draws the next value, always within `range()`.
    pub fn next_value(&self) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(self.range.min..=self.range.max)
    }

    /// Draws the next value and formats it as `Sensor reading: N`.
    pub fn next_reading(&self) -> String {
        format_reading(self.next_value())
    }
}

impl Default for SensorReadings {
    fn default() -> Self {
        Self::from_entropy(ReadingRange::default())
    }
}
