//! Catalog course entries.
//!
//! A [`Course`] is immutable once loaded. Live enrollment is tracked by the
//! [`RegistrationEngine`](crate::registration::RegistrationEngine); the
//! [`Seats`] stored here is the catalog snapshot it starts from.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::occurrence::WeeklyOccurrence;
use crate::time::{TimeInterval, WeekDay};

/// Stable identifier of a course offering for the term.
///
/// Usually the course code (`"CMSC 140"`), but two offerings sharing a code must
/// carry distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CourseId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CourseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Academic level, ordered from first-year to graduate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CourseLevel {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
    #[default]
    Unknown,
}

impl CourseLevel {
    pub fn from_course_number(number: u32) -> Self {
        match number {
            100..=199 => CourseLevel::Freshman,
            200..=299 => CourseLevel::Sophomore,
            300..=399 => CourseLevel::Junior,
            400..=499 => CourseLevel::Senior,
            500..=999 => CourseLevel::Graduate,
            _ => CourseLevel::Unknown,
        }
    }

    /// Derive the level from the number after the subject prefix (`"BIOL 121"`).
    pub fn from_code(code: &str) -> Self {
        code.split_whitespace()
            .nth(1)
            .and_then(|number| number.parse().ok())
            .map(Self::from_course_number)
            .unwrap_or_default()
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Capacity and enrollment for one offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seats {
    pub capacity: u32,
    pub enrolled: u32,
}

impl Seats {
    /// `max(0, capacity - enrolled)`.
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    pub fn is_open(&self) -> bool {
        self.available() > 0
    }
}

/// Which block of a course a meeting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingKind {
    Lecture,
    Lab,
}

/// The lab component of a course. `occurrence` is `None` while its time is TBA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lab {
    pub occurrence: Option<WeeklyOccurrence>,
    pub location: Option<String>,
}

/// A catalog entry for one course offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub instructor: String,
    pub location: String,
    pub description: String,
    pub department: String,
    pub semester: String,
    /// Lecture meeting; `None` when the catalog lists the time as TBA.
    pub main: Option<WeeklyOccurrence>,
    pub lab: Option<Lab>,
    pub credits: u32,
    pub seats: Seats,
    pub waitlist_available: bool,
    pub prerequisites: Vec<String>,
    pub level: CourseLevel,
}

impl Course {
    pub fn builder(code: impl Into<String>) -> CourseBuilder {
        CourseBuilder::new(code)
    }

    pub fn has_lab(&self) -> bool {
        self.lab.is_some()
    }

    pub fn lab_occurrence(&self) -> Option<&WeeklyOccurrence> {
        self.lab.as_ref().and_then(|lab| lab.occurrence.as_ref())
    }

    pub fn lab_location(&self) -> Option<&str> {
        self.lab.as_ref().and_then(|lab| lab.location.as_deref())
    }

    /// Every scheduled meeting, lecture first. TBA meetings are skipped.
    pub fn occurrences(&self) -> impl Iterator<Item = (MeetingKind, &WeeklyOccurrence)> {
        self.main
            .iter()
            .map(|occ| (MeetingKind::Lecture, occ))
            .chain(self.lab_occurrence().map(|occ| (MeetingKind::Lab, occ)))
    }

    pub fn is_75_minute_class(&self) -> bool {
        self.main
            .as_ref()
            .is_some_and(|occ| occ.interval().is_75_minute_class())
    }
}

/// Incremental constructor for [`Course`]; id and level default from the code.
#[derive(Debug, Clone)]
pub struct CourseBuilder {
    course: Course,
}

impl CourseBuilder {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            course: Course {
                id: CourseId::new(code.clone()),
                level: CourseLevel::from_code(&code),
                code,
                title: String::new(),
                instructor: String::new(),
                location: String::new(),
                description: String::new(),
                department: String::new(),
                semester: String::new(),
                main: None,
                lab: None,
                credits: 3,
                seats: Seats::default(),
                waitlist_available: true,
                prerequisites: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<CourseId>) -> Self {
        self.course.id = id.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.course.title = title.into();
        self
    }

    pub fn instructor(mut self, instructor: impl Into<String>) -> Self {
        self.course.instructor = instructor.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.course.location = location.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.course.description = description.into();
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.course.department = department.into();
        self
    }

    pub fn semester(mut self, semester: impl Into<String>) -> Self {
        self.course.semester = semester.into();
        self
    }

    pub fn meets(
        mut self,
        days: impl IntoIterator<Item = WeekDay>,
        interval: TimeInterval,
    ) -> Self {
        self.course.main = Some(WeeklyOccurrence::new(days, interval));
        self
    }

    pub fn lab(
        mut self,
        days: impl IntoIterator<Item = WeekDay>,
        interval: TimeInterval,
        location: Option<&str>,
    ) -> Self {
        self.course.lab = Some(Lab {
            occurrence: Some(WeeklyOccurrence::new(days, interval)),
            location: location.map(str::to_string),
        });
        self
    }

    /// A lab whose meeting time has not been announced.
    pub fn lab_tba(mut self, location: Option<&str>) -> Self {
        self.course.lab = Some(Lab {
            occurrence: None,
            location: location.map(str::to_string),
        });
        self
    }

    pub fn credits(mut self, credits: u32) -> Self {
        self.course.credits = credits;
        self
    }

    pub fn seats(mut self, capacity: u32, enrolled: u32) -> Self {
        self.course.seats = Seats { capacity, enrolled };
        self
    }

    pub fn waitlist(mut self, available: bool) -> Self {
        self.course.waitlist_available = available;
        self
    }

    pub fn prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.course.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn level(mut self, level: CourseLevel) -> Self {
        self.course.level = level;
        self
    }

    pub fn build(self) -> Course {
        self.course
    }
}

