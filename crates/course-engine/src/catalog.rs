//! The static term catalog and catalog browsing.
//!
//! The catalog is loaded once, before registration starts, from a JSON array of
//! [`CourseRecord`]s. Meeting-time strings are parsed here so the rest of the
//! crate only ever sees validated [`TimeInterval`]s.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::course::{Course, CourseId, CourseLevel, Lab, Seats};
use crate::error::CatalogError;
use crate::occurrence::WeeklyOccurrence;
use crate::time::{parse_meeting_time, TimeInterval, WeekDay};

/// One course as it appears in catalog JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRecord {
    pub code: String,
    /// Defaults to `code` when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub location: String,
    /// Meeting time such as `"10:00 AM - 10:50 AM"`, or `"TBA"`.
    pub time: String,
    #[serde(default)]
    pub days: Vec<WeekDay>,
    pub credits: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub semester: String,
    pub capacity: u32,
    #[serde(default)]
    pub enrollment: u32,
    #[serde(default = "default_waitlist")]
    pub waitlist: bool,
    #[serde(default)]
    pub level: Option<CourseLevel>,
    #[serde(default)]
    pub lab: Option<LabRecord>,
}

fn default_waitlist() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabRecord {
    pub time: String,
    #[serde(default)]
    pub days: Vec<WeekDay>,
    #[serde(default)]
    pub location: Option<String>,
}

fn occurrence(
    code: &str,
    time: &str,
    days: Vec<WeekDay>,
) -> Result<Option<WeeklyOccurrence>, CatalogError> {
    let interval: Option<TimeInterval> =
        parse_meeting_time(time).map_err(|source| CatalogError::InvalidCourse {
            code: code.to_string(),
            source,
        })?;

    if interval.is_none() {
        tracing::debug!(code, time, "meeting time to be announced");
    }
    Ok(interval.map(|interval| WeeklyOccurrence::new(days, interval)))
}

impl TryFrom<CourseRecord> for Course {
    type Error = CatalogError;

    fn try_from(record: CourseRecord) -> Result<Self, Self::Error> {
        let main = occurrence(&record.code, &record.time, record.days)?;
        let lab = record
            .lab
            .map(|lab| -> Result<Lab, CatalogError> {
                Ok(Lab {
                    occurrence: occurrence(&record.code, &lab.time, lab.days)?,
                    location: lab.location,
                })
            })
            .transpose()?;

        Ok(Course {
            id: CourseId::new(record.id.unwrap_or_else(|| record.code.clone())),
            level: record
                .level
                .unwrap_or_else(|| CourseLevel::from_code(&record.code)),
            code: record.code,
            title: record.title,
            instructor: record.instructor,
            location: record.location,
            description: record.description,
            department: record.department,
            semester: record.semester,
            main,
            lab,
            credits: record.credits,
            seats: Seats {
                capacity: record.capacity,
                enrolled: record.enrollment,
            },
            waitlist_available: record.waitlist,
            prerequisites: record.prerequisites,
        })
    }
}

/// Ordering for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriteria {
    /// By title, A to Z.
    #[default]
    Alphabetical,
    Department,
    /// Most credits first.
    Credits,
    /// Most open seats first.
    Availability,
    CourseLevel,
    /// Earliest lecture start first; TBA courses last.
    MeetingTime,
}

/// Filters for browsing the catalog. The default query lists everything by title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    /// Case-insensitive substring over title, code, instructor and department.
    pub search: Option<String>,
    pub department: Option<String>,
    pub level: Option<CourseLevel>,
    pub open_only: bool,
    pub sort: SortCriteria,
}

impl CatalogQuery {
    fn matches(&self, course: &Course, seats: Seats) -> bool {
        if let Some(needle) = self.search.as_deref().map(str::to_lowercase) {
            let hit = [
                &course.title,
                &course.code,
                &course.instructor,
                &course.department,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self
            .department
            .as_deref()
            .is_some_and(|department| course.department != department)
        {
            return false;
        }
        if self.level.is_some_and(|level| course.level != level) {
            return false;
        }
        !self.open_only || seats.is_open()
    }
}

/// The term's course offerings in load order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<CourseId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    ///
    /// Distinct ids that share a course code are accepted; the catalog source is
    /// known to repeat codes across departments, so they are only logged.
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(courses.len());
        let mut codes: HashMap<&str, &CourseId> = HashMap::new();

        for (position, course) in courses.iter().enumerate() {
            if index.insert(course.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(course.id.clone()));
            }
            if let Some(first) = codes.insert(course.code.as_str(), &course.id) {
                tracing::warn!(
                    code = %course.code,
                    first_id = %first,
                    second_id = %course.id,
                    "course code appears under more than one id"
                );
            }
        }

        tracing::info!(courses = courses.len(), "catalog loaded");
        Ok(Self { courses, index })
    }

    pub fn from_records(records: Vec<CourseRecord>) -> Result<Self, CatalogError> {
        let courses = records
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(courses)
    }

    /// Parse a JSON array of [`CourseRecord`]s.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<CourseRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let records: Vec<CourseRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.index.get(id).map(|&position| &self.courses[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Course> {
        self.courses.iter()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Distinct department names, sorted.
    pub fn departments(&self) -> Vec<&str> {
        self.courses
            .iter()
            .map(|course| course.department.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Browse using each course's catalog seat snapshot.
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Course> {
        self.query_with(query, |course| course.seats)
    }

    /// Browse with seat counts supplied by the caller (e.g. live enrollment).
    pub fn query_with<F>(&self, query: &CatalogQuery, seats_of: F) -> Vec<&Course>
    where
        F: Fn(&Course) -> Seats,
    {
        let mut results: Vec<(&Course, Seats)> = self
            .courses
            .iter()
            .map(|course| (course, seats_of(course)))
            .filter(|(course, seats)| query.matches(course, *seats))
            .collect();

        match query.sort {
            SortCriteria::Alphabetical => results.sort_by(|(a, _), (b, _)| a.title.cmp(&b.title)),
            SortCriteria::Department => {
                results.sort_by(|(a, _), (b, _)| a.department.cmp(&b.department))
            }
            SortCriteria::Credits => results.sort_by(|(a, _), (b, _)| b.credits.cmp(&a.credits)),
            SortCriteria::Availability => {
                results.sort_by(|(_, a), (_, b)| b.available().cmp(&a.available()))
            }
            SortCriteria::CourseLevel => results.sort_by_key(|(course, _)| course.level),
            SortCriteria::MeetingTime => results.sort_by_key(|(course, _)| {
                course
                    .main
                    .as_ref()
                    .map_or(u32::MAX, |occ| occ.interval().start_minute())
            }),
        }

        results.into_iter().map(|(course, _)| course).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Course;
    type IntoIter = std::slice::Iter<'a, Course>;

    fn into_iter(self) -> Self::IntoIter {
        self.courses.iter()
    }
}

