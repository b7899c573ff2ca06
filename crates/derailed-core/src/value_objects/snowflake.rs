//! Snowflake ID - 64-bit time-sortable unique identifier
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since the Derailed epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)
//!
//! Storage is partitioned into week-long buckets of the timestamp component,
//! see [`Snowflake::bucket`] and [`Snowflake::buckets`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Snowflake ID (64-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Derailed epoch: 2022-04-07 09:54:31.415 UTC (milliseconds)
    pub const EPOCH: i64 = 1_649_325_271_415;

    /// Width of one storage bucket: 7 days in milliseconds
    pub const BUCKET_SIZE: i64 = 1000 * 60 * 60 * 24 * 7;

    /// Create a new Snowflake from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Check if the Snowflake is zero (uninitialized)
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    /// Extract worker ID (0-1023)
    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> 12) & 0x3FF) as u16
    }

    /// Extract sequence number (0-4095)
    #[inline]
    pub fn sequence(&self) -> u16 {
        (self.0 & 0xFFF) as u16
    }

    /// Convert timestamp to DateTime<Utc>
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(self.timestamp()).unwrap_or_default()
    }

    /// Storage bucket this id falls into
    pub fn bucket(&self) -> i64 {
        (self.0 >> 22) / Self::BUCKET_SIZE
    }

    /// Storage bucket for the current instant
    pub fn current_bucket() -> i64 {
        (now_millis() - Self::EPOCH) / Self::BUCKET_SIZE
    }

    /// Every bucket between `start` and `end` (inclusive).
    ///
    /// A missing `end` means "up to now".
    pub fn buckets(start: Snowflake, end: Option<Snowflake>) -> RangeInclusive<i64> {
        let last = end.map_or_else(Self::current_bucket, |e| e.bucket());
        start.bucket()..=last
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a snowflake ID")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                Ok(Snowflake(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("snowflake out of range"))
            }

            fn visit_str<E>(self, value: &str) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                value
                    .parse::<i64>()
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("invalid snowflake string"))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Lock-free Snowflake ID generator
///
/// The last issued `(millis << 12) | sequence` pair lives in one atomic.
/// When the sequence overflows or the wall clock steps backwards the
/// generator borrows from the next millisecond instead of sleeping, so ids
/// from one generator are always strictly increasing.
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    /// Generate a new unique Snowflake ID
    pub fn generate(&self) -> Snowflake {
        let mut prev = self.state.load(Ordering::Acquire);
        loop {
            let elapsed = now_millis() - Snowflake::EPOCH;
            let next = if elapsed > prev >> 12 {
                elapsed << 12
            } else {
                prev + 1
            };

            match self
                .state
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let millis = next >> 12;
                    let sequence = next & 0xFFF;
                    return Snowflake::new(
                        (millis << 22) | (i64::from(self.worker_id) << 12) | sequence,
                    );
                }
                Err(current) => prev = current,
            }
        }
    }

    /// Get the worker ID of this generator
    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[inline]
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
