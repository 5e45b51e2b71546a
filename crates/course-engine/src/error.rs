//! Error types for course-engine operations.

use thiserror::Error;

use crate::course::CourseId;

/// A meeting-time string that could not be turned into a [`TimeInterval`].
///
/// [`TimeInterval`]: crate::time::TimeInterval
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed time '{input}': {reason}")]
pub struct MalformedTimeError {
    /// The text that failed to parse (or a rendering of the rejected bounds).
    pub input: String,
    /// Human-readable cause.
    pub reason: String,
}

impl MalformedTimeError {
    pub(crate) fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// A day name outside Monday..Friday.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown weekday: {0}")]
pub struct UnknownWeekDay(pub String);

/// Why a course cannot be waitlisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistIneligibility {
    AlreadyRegistered,
    AlreadyWaitlisted,
    /// The course still has open seats; register instead.
    SeatsAvailable,
    WaitlistDisabled,
}

impl std::fmt::Display for WaitlistIneligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::AlreadyRegistered => "already registered",
            Self::AlreadyWaitlisted => "already on the waitlist",
            Self::SeatsAvailable => "seats are still available",
            Self::WaitlistDisabled => "no waitlist is offered",
        };
        f.write_str(text)
    }
}

/// Rejections reported by the [`RegistrationEngine`].
///
/// Every variant is recoverable. Apart from the documented `replace` case the
/// engine state is untouched when one of these is returned.
///
/// [`RegistrationEngine`]: crate::registration::RegistrationEngine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    #[error("Already registered for {0}")]
    AlreadyRegistered(CourseId),

    /// The course is on the waitlist and must leave it before registering.
    #[error("{0} is waitlisted; leave the waitlist before registering")]
    Waitlisted(CourseId),

    #[error("Not registered for {0}")]
    NotRegistered(CourseId),

    #[error("{course} has a time conflict with {conflicting}")]
    ScheduleConflict {
        course: CourseId,
        conflicting: CourseId,
    },

    #[error("Cannot waitlist {course}: {reason}")]
    WaitlistIneligible {
        course: CourseId,
        reason: WaitlistIneligibility,
    },

    #[error("Registering {course} would bring credits to {attempted}, above the limit of {limit}")]
    CreditLimitExceeded {
        course: CourseId,
        limit: u32,
        attempted: u32,
    },
}

/// Failures while building a [`Catalog`].
///
/// [`Catalog`]: crate::catalog::Catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate course id: {0}")]
    DuplicateId(CourseId),

    #[error("Invalid course {code}: {source}")]
    InvalidCourse {
        code: String,
        #[source]
        source: MalformedTimeError,
    },
}

/// Convenience alias used by the time parser.
pub type Result<T> = std::result::Result<T, MalformedTimeError>;
