//! Domain types for the race lifecycle.
//!
//! All values here are small scalars: they are persisted one-per-file by the
//! state store and travel over the wire as plain JSON numbers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a race session.
///
/// Only ever moves forward through [`RaceId::next`], or is overwritten by an
/// operator through the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceId(u64);

impl RaceId {
    /// Create a race id from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value of the id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the id space is exhausted.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text is not a valid non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid non-negative integer")]
pub struct ParseCountError {
    /// The rejected input.
    pub input: String,
}

/// Parse a non-negative counter value, tolerating surrounding whitespace.
///
/// Only plain base-10 digits are accepted: signs, decimals and empty input are
/// rejected.
///
/// # Errors
///
/// Returns [`ParseCountError`] when `input` is not a base-10 `u64`.
pub fn parse_count(input: &str) -> Result<u64, ParseCountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCountError {
            input: input.to_string(),
        });
    }
    trimmed.parse().map_err(|_| ParseCountError {
        input: input.to_string(),
    })
}

impl FromStr for RaceId {
    type Err = ParseCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_count(s).map(Self)
    }
}

/// Persisted status of the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RaceStatus {
    /// A race is in progress.
    Racing,
    /// No race is in progress.
    Stopped,
}

impl RaceStatus {
    /// Text stored in the status file and sent in events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Racing => "RACING",
            Self::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status file holds an unknown word.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown race status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for RaceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("RACING") {
            Ok(Self::Racing)
        } else if trimmed.eq_ignore_ascii_case("STOPPED") {
            Ok(Self::Stopped)
        } else {
            Err(ParseStatusError(s.to_string()))
        }
    }
}

/// Operation requested on the race through `PUT /race/:raceop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceOp {
    /// Start a new race.
    Start,
    /// Stop the current race.
    Stop,
}

impl RaceOp {
    /// Parse an operation token case-insensitively.
    ///
    /// Returns `None` for anything other than `start` or `stop`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("start") {
            Some(Self::Start)
        } else if token.eq_ignore_ascii_case("stop") {
            Some(Self::Stop)
        } else {
            None
        }
    }
}

/// Deployment-specific identifier of the physical demo installation.
///
/// Read once at process start and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemoZone(String);

impl DemoZone {
    /// Create a demo zone from its identifier, trimming surrounding whitespace.
    #[must_use]
    pub fn new(zone: impl AsRef<str>) -> Self {
        Self(zone.as_ref().trim().to_string())
    }

    /// The zone identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DemoZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a car taking part in the demo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(String);

impl CarId {
    /// Create a car id, trimming surrounding whitespace.
    ///
    /// Returns `None` for blank names.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The car name as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-separated list of car names, skipping blanks and duplicates.
#[must_use]
pub fn parse_car_list(list: &str) -> Vec<CarId> {
    let mut cars: Vec<CarId> = Vec::new();
    for car in list.split(',').filter_map(CarId::new) {
        if !cars.contains(&car) {
            cars.push(car);
        }
    }
    cars
}

/// Result of a successful start or stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceOutcome {
    /// Status after the operation.
    pub status: RaceStatus,
    /// Human-readable description.
    pub message: String,
    /// Race the operation applied to.
    #[serde(rename = "raceid")]
    pub race_id: RaceId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_count_rejects_signs_and_garbage() {
        assert!(parse_count("-1").is_err());
        assert!(parse_count("+1").is_err());
        assert!(parse_count("abc").is_err());
        assert!(parse_count("1.5").is_err());
        assert!(parse_count("").is_err());
        assert!(parse_count("   ").is_err());
        assert!(parse_count("18446744073709551616").is_err());
    }

    #[test]
    fn test_parse_count_trims_whitespace() {
        assert_eq!(parse_count(" 42\n").unwrap(), 42);
    }

    #[test]
    fn test_race_id_next_saturates_to_none() {
        assert_eq!(RaceId::new(7).next(), Some(RaceId::new(8)));
        assert_eq!(RaceId::new(u64::MAX).next(), None);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("racing".parse::<RaceStatus>().unwrap(), RaceStatus::Racing);
        assert_eq!("STOPPED\n".parse::<RaceStatus>().unwrap(), RaceStatus::Stopped);
        assert!("paused".parse::<RaceStatus>().is_err());
    }

    #[test]
    fn test_race_op_parse() {
        assert_eq!(RaceOp::parse("START"), Some(RaceOp::Start));
        assert_eq!(RaceOp::parse("sToP"), Some(RaceOp::Stop));
        assert_eq!(RaceOp::parse("jump"), None);
        assert_eq!(RaceOp::parse(""), None);
    }

    #[test]
    fn test_car_list_skips_blanks_and_duplicates() {
        let cars = parse_car_list("Thermo, ,Skull,Thermo,Ground Shock");
        let names: Vec<&str> = cars.iter().map(CarId::as_str).collect();
        assert_eq!(names, vec!["Thermo", "Skull", "Ground Shock"]);
    }

    #[test]
    fn test_outcome_serializes_raceid_field() {
        let outcome = RaceOutcome {
            status: RaceStatus::Racing,
            message: "Race started".to_string(),
            race_id: RaceId::new(3),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "RACING", "message": "Race started", "raceid": 3})
        );
    }

    proptest! {
        #[test]
        fn prop_any_u64_parses_as_race_id(n in any::<u64>()) {
            prop_assert_eq!(n.to_string().parse::<RaceId>().unwrap(), RaceId::new(n));
        }

        #[test]
        fn prop_negative_numbers_are_rejected(n in 1..i64::MAX) {
            prop_assert!((-n).to_string().parse::<RaceId>().is_err());
        }
    }
}
