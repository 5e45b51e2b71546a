//! The registration state machine for a single student session.
//!
//! Per course, a student is `Unregistered`, `Registered` or `Waitlisted`:
//!
//! - `Unregistered -> Registered` via [`RegistrationEngine::register`]
//! - `Unregistered -> Waitlisted` via [`RegistrationEngine::join_waitlist`]
//! - `Registered -> Unregistered` via [`RegistrationEngine::drop_course`]
//! - `Waitlisted -> Unregistered` via [`RegistrationEngine::leave_waitlist`]
//!
//! There is no direct `Waitlisted -> Registered` or `Registered -> Waitlisted`
//! transition. [`RegistrationEngine::replace`] chains a drop and a register.
//!
//! The engine owns the live enrollment counter of every catalog course. It never
//! logs and never performs I/O: every operation either changes state and
//! succeeds or returns a [`RegistrationError`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agenda::WeeklyAgenda;
use crate::catalog::{Catalog, CatalogQuery};
use crate::conflict::{self, CourseConflict};
use crate::course::{Course, CourseId, Seats};
use crate::error::{RegistrationError, WaitlistIneligibility};

/// Tunable limits for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationPolicy {
    /// Maximum registered credits, or `None` for no limit.
    pub credit_limit: Option<u32>,
}

/// A course's relationship to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Unregistered,
    Registered,
    Waitlisted,
}

/// Owns a student's registered and waitlisted sets over a fixed catalog.
///
/// Sets keep insertion order, so conflict lookups and listings are deterministic.
/// A course id is never in both sets at once.
#[derive(Debug, Clone)]
pub struct RegistrationEngine {
    catalog: Catalog,
    policy: RegistrationPolicy,
    registered: Vec<CourseId>,
    waitlisted: Vec<CourseId>,
    enrollment: HashMap<CourseId, u32>,
}

impl RegistrationEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_policy(catalog, RegistrationPolicy::default())
    }

    /// Create an engine whose enrollment counters start from the catalog snapshot.
    pub fn with_policy(catalog: Catalog, policy: RegistrationPolicy) -> Self {
        let enrollment = catalog
            .iter()
            .map(|course| (course.id.clone(), course.seats.enrolled))
            .collect();
        Self {
            catalog,
            policy,
            registered: Vec::new(),
            waitlisted: Vec::new(),
            enrollment,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    fn lookup(&self, id: &str) -> Result<&Course, RegistrationError> {
        self.catalog
            .get(id)
            .ok_or_else(|| RegistrationError::UnknownCourse(CourseId::from(id)))
    }

    // ── Read API ────────────────────────────────────────────────────────────

    pub fn is_registered(&self, id: &str) -> bool {
        self.registered.iter().any(|r| r.as_str() == id)
    }

    pub fn is_waitlisted(&self, id: &str) -> bool {
        self.waitlisted.iter().any(|w| w.as_str() == id)
    }

    pub fn status(&self, id: &str) -> RegistrationStatus {
        if self.is_registered(id) {
            RegistrationStatus::Registered
        } else if self.is_waitlisted(id) {
            RegistrationStatus::Waitlisted
        } else {
            RegistrationStatus::Unregistered
        }
    }

    /// Live capacity and enrollment for a catalog course.
    pub fn seats(&self, id: &str) -> Option<Seats> {
        self.catalog.get(id).map(|course| self.live_seats(course))
    }

    fn live_seats(&self, course: &Course) -> Seats {
        Seats {
            capacity: course.seats.capacity,
            enrolled: self
                .enrollment
                .get(&course.id)
                .copied()
                .unwrap_or(course.seats.enrolled),
        }
    }

    fn registered_iter(&self) -> impl Iterator<Item = &Course> {
        self.registered
            .iter()
            .filter_map(|id| self.catalog.get(id.as_str()))
    }

    /// Registered courses in registration order.
    pub fn registered_courses(&self) -> Vec<&Course> {
        self.registered_iter().collect()
    }

    /// Waitlisted courses in the order they were joined.
    pub fn waitlisted_courses(&self) -> Vec<&Course> {
        self.waitlisted
            .iter()
            .filter_map(|id| self.catalog.get(id.as_str()))
            .collect()
    }

    pub fn total_credits(&self) -> u32 {
        self.registered_iter()
            .fold(0, |total, course| total.saturating_add(course.credits))
    }

    /// The first registered course that conflicts with `course`, if any.
    ///
    /// Presentation layers call this before offering a register action. The course
    /// itself is skipped if already registered.
    pub fn has_schedule_conflict(&self, course: &Course) -> Option<&Course> {
        conflict::find_conflict(course, self.registered_iter())
    }

    /// All conflicting pairs among `courses`.
    pub fn check_conflicts<'a, I>(&self, courses: I) -> Vec<CourseConflict<'a>>
    where
        I: IntoIterator<Item = &'a Course>,
    {
        conflict::all_conflicts(courses)
    }

    /// All conflicting pairs among the registered courses.
    pub fn audit(&self) -> Vec<CourseConflict<'_>> {
        conflict::all_conflicts(self.registered_iter())
    }

    /// Browse the catalog using live seat counts.
    pub fn browse(&self, query: &CatalogQuery) -> Vec<&Course> {
        self.catalog
            .query_with(query, |course| self.live_seats(course))
    }

    pub fn weekly_agenda(&self) -> WeeklyAgenda {
        WeeklyAgenda::build(self.registered_iter())
    }

    // ── Transitions ─────────────────────────────────────────────────────────

    /// `Unregistered -> Registered`.
    ///
    /// Seat availability is not checked here; callers offer the waitlist for full
    /// courses instead.
    ///
    /// # Errors
    /// - [`RegistrationError::UnknownCourse`] if `id` is not in the catalog.
    /// - [`RegistrationError::AlreadyRegistered`] if it is already registered.
    /// - [`RegistrationError::Waitlisted`] if it is on the waitlist.
    /// - [`RegistrationError::ScheduleConflict`] naming the first registered course
    ///   it overlaps.
    /// - [`RegistrationError::CreditLimitExceeded`] if the policy limit would be passed.
    pub fn register(&mut self, id: &str) -> Result<(), RegistrationError> {
        let course = self.lookup(id)?;

        if self.is_registered(id) {
            return Err(RegistrationError::AlreadyRegistered(course.id.clone()));
        }
        if self.is_waitlisted(id) {
            return Err(RegistrationError::Waitlisted(course.id.clone()));
        }
        if let Some(conflicting) = self.has_schedule_conflict(course) {
            return Err(RegistrationError::ScheduleConflict {
                course: course.id.clone(),
                conflicting: conflicting.id.clone(),
            });
        }
        if let Some(limit) = self.policy.credit_limit {
            let attempted = self.total_credits().saturating_add(course.credits);
            if attempted > limit {
                return Err(RegistrationError::CreditLimitExceeded {
                    course: course.id.clone(),
                    limit,
                    attempted,
                });
            }
        }

        let id = course.id.clone();
        let enrolled = self.enrollment.entry(id.clone()).or_default();
        *enrolled = enrolled.saturating_add(1);
        self.registered.push(id);
        Ok(())
    }

    /// `Registered -> Unregistered`. Returns `false`, changing nothing, when the
    /// course is not registered.
    pub fn drop_course(&mut self, id: &str) -> bool {
        let Some(position) = self.registered.iter().position(|r| r.as_str() == id) else {
            return false;
        };
        let id = self.registered.remove(position);
        if let Some(enrolled) = self.enrollment.get_mut(&id) {
            *enrolled = enrolled.saturating_sub(1);
        }
        true
    }

    /// `Unregistered -> Waitlisted`, for full courses that offer a waitlist.
    ///
    /// Enrollment is not touched.
    ///
    /// # Errors
    /// [`RegistrationError::UnknownCourse`], or
    /// [`RegistrationError::WaitlistIneligible`] when the course is already
    /// registered or waitlisted, still has seats, or offers no waitlist.
    pub fn join_waitlist(&mut self, id: &str) -> Result<(), RegistrationError> {
        let course = self.lookup(id)?;

        let reason = if self.is_registered(id) {
            Some(WaitlistIneligibility::AlreadyRegistered)
        } else if self.is_waitlisted(id) {
            Some(WaitlistIneligibility::AlreadyWaitlisted)
        } else if self.live_seats(course).is_open() {
            Some(WaitlistIneligibility::SeatsAvailable)
        } else if !course.waitlist_available {
            Some(WaitlistIneligibility::WaitlistDisabled)
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(RegistrationError::WaitlistIneligible {
                course: course.id.clone(),
                reason,
            });
        }

        let id = course.id.clone();
        self.waitlisted.push(id);
        Ok(())
    }

    /// `Waitlisted -> Unregistered`. Returns `false` when not waitlisted.
    pub fn leave_waitlist(&mut self, id: &str) -> bool {
        let before = self.waitlisted.len();
        self.waitlisted.retain(|w| w.as_str() != id);
        self.waitlisted.len() != before
    }

    /// Drop `drop_id` and register `register_id` in its place.
    ///
    /// `register_id` is not checked against `drop_id`, which is gone by the time
    /// it is registered, but it is checked against every other registered course.
    ///
    /// The preconditions that do not depend on the drop are validated first and
    /// leave state untouched on failure. A conflict with a third course (or a
    /// credit-limit failure) is detected after the drop and the drop is NOT
    /// rolled back: `drop_id` stays unregistered and the error is returned.
    ///
    /// # Errors
    /// - [`RegistrationError::UnknownCourse`] for either id.
    /// - [`RegistrationError::NotRegistered`] if `drop_id` is not registered.
    /// - [`RegistrationError::AlreadyRegistered`] / [`RegistrationError::Waitlisted`]
    ///   for `register_id` (replacing a course with itself is allowed).
    /// - [`RegistrationError::ScheduleConflict`] / [`RegistrationError::CreditLimitExceeded`]
    ///   after the drop, as above.
    pub fn replace(&mut self, drop_id: &str, register_id: &str) -> Result<(), RegistrationError> {
        let dropping = self.lookup(drop_id)?.id.clone();
        let registering = self.lookup(register_id)?.id.clone();

        if !self.is_registered(drop_id) {
            return Err(RegistrationError::NotRegistered(dropping));
        }
        if dropping != registering && self.is_registered(register_id) {
            return Err(RegistrationError::AlreadyRegistered(registering));
        }
        if self.is_waitlisted(register_id) {
            return Err(RegistrationError::Waitlisted(registering));
        }

        self.drop_course(dropping.as_str());
        self.register(registering.as_str())
    }
}
