//! # course-engine
//!
//! Schedule-conflict detection and the registration state machine behind a
//! student course-registration front end.
//!
//! Courses meet on weekly-recurring patterns (a lecture block and an optional lab
//! block). The engine decides whether two such patterns overlap and enforces the
//! legal transitions between unregistered, registered and waitlisted.
//!
//! ## Modules
//!
//! - [`time`]: `WeekDay`, `TimeInterval`, and the `"H:MM AM - H:MM PM"` parser
//! - [`occurrence`]: `WeeklyOccurrence`: days + interval
//! - [`course`]: `Course` catalog entries, levels, seat counts
//! - [`conflict`]: Pairwise and set-wide conflict detection
//! - [`catalog`]: JSON catalog loading and browsing
//! - [`registration`]: `RegistrationEngine` state machine
//! - [`agenda`]: Day-by-day weekly schedule view
//! - [`error`]: Error types

pub mod agenda;
pub mod catalog;
pub mod conflict;
pub mod course;
pub mod error;
pub mod occurrence;
pub mod registration;
pub mod time;

pub use agenda::WeeklyAgenda;
pub use catalog::{Catalog, CatalogQuery, SortCriteria};
pub use conflict::{
    all_conflicts, courses_conflict, find_conflict, occurrences_overlap, ConflictKind,
    CourseConflict,
};
pub use course::{Course, CourseId, CourseLevel, Seats};
pub use error::{CatalogError, MalformedTimeError, RegistrationError, WaitlistIneligibility};
pub use occurrence::WeeklyOccurrence;
pub use registration::{RegistrationEngine, RegistrationPolicy, RegistrationStatus};
pub use time::{parse_interval, parse_meeting_time, TimeInterval, WeekDay};
