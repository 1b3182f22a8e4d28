use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Sub},
    str::FromStr,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::bytesrepr::{self, FromBytes, ToBytes, U64_SERIALIZED_LENGTH};

/// A timestamp type, representing a concrete moment in time, in milliseconds since the Unix
/// epoch.
#[derive(Copy, Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Returns the timestamp of the current moment.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        Timestamp(millis)
    }

    /// Returns the zero timestamp, the Unix epoch.
    pub const fn zero() -> Self {
        Timestamp(0)
    }

    /// Returns the timestamp as the number of milliseconds since the Unix epoch.
    pub fn millis(&self) -> u64 {
        self.0
    }

    /// Returns a random timestamp within the last ten years.
    #[cfg(any(feature = "testing", test))]
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        const TEN_YEARS_MILLIS: u64 = 10 * 365 * 24 * 60 * 60 * 1_000;
        Timestamp(1_600_000_000_000 + rng.gen_range(0..TEN_YEARS_MILLIS))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match UNIX_EPOCH.checked_add(Duration::from_millis(self.0)) {
            Some(system_time) => write!(f, "{}", humantime::format_rfc3339_millis(system_time))
                .or_else(|error| write!(f, "invalid Timestamp: {}: {}", error, self.0)),
            None => write!(f, "invalid Timestamp: {} ms after the Unix epoch", self.0),
        }
    }
}

impl FromStr for Timestamp {
    type Err = humantime::TimestampError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let system_time = humantime::parse_rfc3339_weak(value)?;
        let inner = system_time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| humantime::TimestampError::OutOfRange)?
            .as_millis() as u64;
        Ok(Timestamp(inner))
    }
}

impl Add<TimeDiff> for Timestamp {
    type Output = Timestamp;

    fn add(self, diff: TimeDiff) -> Timestamp {
        Timestamp(self.0.saturating_add(diff.0))
    }
}

impl Sub<TimeDiff> for Timestamp {
    type Output = Timestamp;

    fn sub(self, diff: TimeDiff) -> Timestamp {
        Timestamp(self.0.saturating_sub(diff.0))
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Timestamp(millis)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            let mut text = String::new();
            fmt::Write::write_fmt(&mut text, format_args!("{}", self))
                .map_err(<S::Error as serde::ser::Error>::custom)?;
            text.serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let value_as_string = String::deserialize(deserializer)?;
            Timestamp::from_str(&value_as_string).map_err(SerdeError::custom)
        } else {
            let inner = u64::deserialize(deserializer)?;
            Ok(Timestamp(inner))
        }
    }
}

impl ToBytes for Timestamp {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        U64_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for Timestamp {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        u64::from_bytes(bytes).map(|(inner, remainder)| (Timestamp(inner), remainder))
    }
}

/// A time difference between two timestamps, in milliseconds.
#[derive(Copy, Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct TimeDiff(u64);

impl TimeDiff {
    /// Returns the time difference as the number of milliseconds.
    pub const fn millis(&self) -> u64 {
        self.0
    }

    /// Creates a new time difference from seconds.
    pub const fn from_seconds(seconds: u32) -> Self {
        TimeDiff(seconds as u64 * 1_000)
    }

    /// Creates a new time difference from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        TimeDiff(millis)
    }
}

impl Display for TimeDiff {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", humantime::format_duration(Duration::from_millis(self.0)))
    }
}

impl FromStr for TimeDiff {
    type Err = humantime::DurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let inner = humantime::parse_duration(value)?.as_millis() as u64;
        Ok(TimeDiff(inner))
    }
}

impl From<Duration> for TimeDiff {
    fn from(duration: Duration) -> Self {
        TimeDiff(duration.as_millis() as u64)
    }
}

impl Serialize for TimeDiff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.to_string().serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for TimeDiff {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let value_as_string = String::deserialize(deserializer)?;
            TimeDiff::from_str(&value_as_string).map_err(SerdeError::custom)
        } else {
            let inner = u64::deserialize(deserializer)?;
            Ok(TimeDiff(inner))
        }
    }
}

impl ToBytes for TimeDiff {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        U64_SERIALIZED_LENGTH
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for TimeDiff {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        u64::from_bytes(bytes).map(|(inner, remainder)| (TimeDiff(inner), remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_should_render_rfc3339_millis() {
        let timestamp = Timestamp::from(1_605_573_564_072);
        assert_eq!(timestamp.to_string(), "2020-11-17T00:39:24.072Z");
        assert_eq!(
            Timestamp::from_str("2020-11-17T00:39:24.072Z").unwrap(),
            timestamp
        );
    }

    #[test]
    fn timestamp_should_encode_as_u64_le() {
        let timestamp = Timestamp::from(0x0102);
        assert_eq!(timestamp.to_bytes().unwrap(), vec![2, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            bytesrepr::deserialize::<Timestamp>(timestamp.to_bytes().unwrap()).unwrap(),
            timestamp
        );
    }

    #[test]
    fn time_diff_should_parse_humantime() {
        assert_eq!(
            TimeDiff::from_str("30m").unwrap(),
            TimeDiff::from_seconds(30 * 60)
        );
        assert_eq!(TimeDiff::from_str("1h 30m").unwrap().millis(), 5_400_000);
        assert_eq!(TimeDiff::from_millis(1_500).to_string(), "1s 500ms");
        assert!(TimeDiff::from_str("soon").is_err());
    }

    #[test]
    fn arithmetic_should_saturate() {
        let timestamp = Timestamp::from(10);
        assert_eq!(timestamp - TimeDiff::from_millis(20), Timestamp::zero());
        assert_eq!(
            Timestamp::from(u64::MAX) + TimeDiff::from_millis(1),
            Timestamp::from(u64::MAX)
        );
    }

    #[test]
    fn json_should_use_text_forms() {
        let ttl = TimeDiff::from_seconds(3_600);
        assert_eq!(serde_json::to_string(&ttl).unwrap(), "\"1h\"");
        let timestamp: Timestamp = serde_json::from_str("\"2020-11-17T00:39:24.072Z\"").unwrap();
        assert_eq!(timestamp.millis(), 1_605_573_564_072);
    }

    #[test]
    fn timestamp_beyond_year_9999_should_still_format() {
        let timestamp = Timestamp::from(300_000_000_000_000);
        let text = timestamp.to_string();
        assert!(text.starts_with("invalid Timestamp: "), "{}", text);
        assert!(text.ends_with("300000000000000"), "{}", text);

        let json = serde_json::to_string(&timestamp).unwrap();
        assert_eq!(json, format!("\"{}\"", text));
        assert_eq!(
            bytesrepr::deserialize::<Timestamp>(timestamp.to_bytes().unwrap()).unwrap(),
            timestamp
        );
    }
}
