//! Detect scheduling conflicts between courses.
//!
//! Two courses conflict when any scheduled meeting of one (lecture or lab) shares
//! a weekday with, and overlaps in time, any scheduled meeting of the other.
//! Adjacent meetings (one ends exactly when the other starts) are NOT conflicts,
//! and TBA meetings never conflict with anything.

use serde::Serialize;

use crate::course::Course;
use crate::occurrence::WeeklyOccurrence;

/// Which pair of meetings produced a conflict, from the first course's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Lecture against lecture.
    Lecture,
    /// The first course's lab against the second course's lecture.
    LabWithLecture,
    /// The first course's lecture against the second course's lab.
    LectureWithLab,
    /// Lab against lab.
    Lab,
}

impl ConflictKind {
    /// The same conflict seen with the two courses swapped.
    pub fn mirrored(self) -> Self {
        match self {
            ConflictKind::LabWithLecture => ConflictKind::LectureWithLab,
            ConflictKind::LectureWithLab => ConflictKind::LabWithLecture,
            other => other,
        }
    }
}

/// A detected conflict between two courses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseConflict<'a> {
    pub first: &'a Course,
    pub second: &'a Course,
    /// The first rule that fired, in the order lecture, lab/lecture, lecture/lab, lab.
    pub kind: ConflictKind,
    /// Overlap on each shared day for the meetings named by `kind`.
    pub overlap_minutes: u32,
}

/// `a` and `b` share a weekday and their intervals overlap (half-open).
pub fn occurrences_overlap(a: &WeeklyOccurrence, b: &WeeklyOccurrence) -> bool {
    a.overlaps(b)
}

/// Evaluate the four meeting pairings between `a` and `b`, in rule order.
fn overlapping_meetings<'c>(
    a: &'c Course,
    b: &'c Course,
) -> impl Iterator<Item = (ConflictKind, u32)> + 'c {
    let pairings = [
        (ConflictKind::Lecture, a.main.as_ref(), b.main.as_ref()),
        (ConflictKind::LabWithLecture, a.lab_occurrence(), b.main.as_ref()),
        (ConflictKind::LectureWithLab, a.main.as_ref(), b.lab_occurrence()),
        (ConflictKind::Lab, a.lab_occurrence(), b.lab_occurrence()),
    ];

    pairings.into_iter().filter_map(|(kind, x, y)| {
        let (x, y) = (x?, y?);
        occurrences_overlap(x, y).then(|| (kind, x.overlap_minutes(y)))
    })
}

/// True iff `a` and `b` are different courses with any overlapping meetings.
///
/// Symmetric: `courses_conflict(a, b) == courses_conflict(b, a)`. A course never
/// conflicts with itself (compared by id).
pub fn courses_conflict(a: &Course, b: &Course) -> bool {
    a.id != b.id && overlapping_meetings(a, b).next().is_some()
}

/// Every rule that fires between `a` and `b`; empty when they do not conflict.
pub fn conflict_kinds(a: &Course, b: &Course) -> Vec<ConflictKind> {
    if a.id == b.id {
        return Vec::new();
    }
    overlapping_meetings(a, b).map(|(kind, _)| kind).collect()
}

/// Describe the conflict between `a` and `b`, if there is one.
pub fn course_conflict<'a>(a: &'a Course, b: &'a Course) -> Option<CourseConflict<'a>> {
    if a.id == b.id {
        return None;
    }
    overlapping_meetings(a, b)
        .next()
        .map(|(kind, overlap_minutes)| CourseConflict {
            first: a,
            second: b,
            kind,
            overlap_minutes,
        })
}

/// The first course in `against` (in iteration order) that conflicts with
/// `candidate`. Entries with the candidate's id are skipped.
pub fn find_conflict<'a, I>(candidate: &Course, against: I) -> Option<&'a Course>
where
    I: IntoIterator<Item = &'a Course>,
{
    against
        .into_iter()
        .find(|other| courses_conflict(candidate, other))
}

/// Every conflict between `candidate` and the courses in `against`, in order.
pub fn find_conflicts<'a, I>(candidate: &'a Course, against: I) -> Vec<CourseConflict<'a>>
where
    I: IntoIterator<Item = &'a Course>,
{
    against
        .into_iter()
        .filter_map(|other| course_conflict(candidate, other))
        .collect()
}

/// All conflicting unordered pairs `(i < j)` in `courses`, each reported once.
///
/// Pairs come out in input order: by the first course's position, then the second's.
pub fn all_conflicts<'a, I>(courses: I) -> Vec<CourseConflict<'a>>
where
    I: IntoIterator<Item = &'a Course>,
{
    let courses: Vec<&'a Course> = courses.into_iter().collect();
    let mut conflicts = Vec::new();

    for (i, &a) in courses.iter().enumerate() {
        for &b in &courses[i + 1..] {
            if let Some(conflict) = course_conflict(a, b) {
                conflicts.push(conflict);
            }
        }
    }

    conflicts
}

