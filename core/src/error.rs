//! Error types for race lifecycle operations.

use crate::environment::StateKey;
use crate::types::{DemoZone, RaceId, RaceStatus};
use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for race lifecycle operations.
pub type Result<T> = std::result::Result<T, RaceError>;

/// Errors raised by a state store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing location could not be read.
    #[error("failed to read {key}: {reason}")]
    Read {
        /// Slot that failed.
        key: StateKey,
        /// Underlying cause.
        reason: String,
    },

    /// The backing location could not be written.
    #[error("failed to write {key}: {reason}")]
    Write {
        /// Slot that failed.
        key: StateKey,
        /// Underlying cause.
        reason: String,
    },

    /// The slot holds a value that does not parse.
    #[error("corrupt value {value:?} in {key}")]
    Corrupt {
        /// Slot holding the value.
        key: StateKey,
        /// Raw stored text.
        value: String,
    },
}

/// Errors raised while posting a race event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The request never produced a response (connect failure, timeout).
    #[error("event request failed: {0}")]
    RequestFailed(String),

    /// The event service answered with a non-success status.
    #[error("event service rejected the event (status {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },
}

/// Errors raised by the IoT sync trigger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The trigger request never produced a response.
    #[error("sync request failed: {0}")]
    RequestFailed(String),

    /// The integration answered with something other than 202 Accepted.
    #[error("sync not accepted (status {status}): {message}")]
    NotAccepted {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },
}

/// Broad classification of a [`RaceError`], used by the HTTP layer to pick a
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// Operation not allowed right now (no demo scheduled).
    Authorization,
    /// Unknown operation.
    NotFound,
    /// Race already in the requested state.
    Conflict,
    /// Flat-file read or write failure.
    Storage,
    /// Downstream service failure.
    Upstream,
}

/// Errors produced by the race lifecycle controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaceError {
    /// An operator-supplied race id is not a non-negative integer.
    #[error("You must enter a valid positive number for Race Id (got '{0}')")]
    InvalidRaceId(String),

    /// No demo is scheduled for the zone today.
    #[error("No demo scheduled for zone {zone} on {date}")]
    NoDemoScheduled {
        /// Demo zone checked.
        zone: DemoZone,
        /// Date checked.
        date: NaiveDate,
    },

    /// The operation token is neither `start` nor `stop`.
    #[error("Unknown race operation '{0}'")]
    UnknownOperation(String),

    /// No operation token was supplied.
    #[error("Missing race operation")]
    MissingOperation,

    /// A race is already running.
    #[error("Race already started with raceid {race_id}")]
    AlreadyStarted {
        /// Race currently running.
        race_id: RaceId,
    },

    /// No race is running.
    #[error("Race already stopped with raceid {race_id}")]
    AlreadyStopped {
        /// Last race that ran.
        race_id: RaceId,
    },

    /// The race id cannot be incremented any further.
    #[error("Race id {0} cannot be incremented")]
    RaceIdExhausted(RaceId),

    /// Persisted state could not be read or written.
    #[error("Race state storage failed: {0}")]
    Storage(#[from] StoreError),

    /// The state change was persisted but the event could not be delivered.
    #[error("Race {race_id} is {status} but the event notification failed: {source}")]
    Notify {
        /// Race the event was about.
        race_id: RaceId,
        /// Status that was persisted.
        status: RaceStatus,
        /// Underlying failure.
        #[source]
        source: NotifyError,
    },
}

impl RaceError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRaceId(_) => ErrorKind::Validation,
            Self::NoDemoScheduled { .. } => ErrorKind::Authorization,
            Self::UnknownOperation(_) => ErrorKind::NotFound,
            Self::AlreadyStarted { .. } | Self::AlreadyStopped { .. } | Self::RaceIdExhausted(_) => {
                ErrorKind::Conflict
            }
            Self::Storage(_) => ErrorKind::Storage,
            Self::MissingOperation | Self::Notify { .. } => ErrorKind::Upstream,
        }
    }

    /// Race id to report alongside the error, when there is one.
    #[must_use]
    pub const fn race_id(&self) -> Option<RaceId> {
        match self {
            Self::AlreadyStarted { race_id }
            | Self::AlreadyStopped { race_id }
            | Self::Notify { race_id, .. }
            | Self::RaceIdExhausted(race_id) => Some(*race_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_carry_race_id() {
        let err = RaceError::AlreadyStarted {
            race_id: RaceId::new(12),
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.race_id(), Some(RaceId::new(12)));
        assert_eq!(err.to_string(), "Race already started with raceid 12");
    }

    #[test]
    fn test_storage_error_converts() {
        let err: RaceError = StoreError::Read {
            key: StateKey::RaceId,
            reason: "permission denied".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.race_id(), None);
    }

    #[test]
    fn test_unknown_operation_is_not_found() {
        assert_eq!(
            RaceError::UnknownOperation("jump".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(RaceError::MissingOperation.kind(), ErrorKind::Upstream);
    }
}
