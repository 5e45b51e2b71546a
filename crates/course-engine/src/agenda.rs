//! Day-by-day view of a set of courses, for weekly schedule grids.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::course::{Course, CourseId, MeetingKind};
use crate::time::{TimeInterval, WeekDay};

/// One meeting placed on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    pub course: CourseId,
    pub code: String,
    pub title: String,
    pub kind: MeetingKind,
    pub interval: TimeInterval,
    pub location: String,
}

/// A lecture or lab whose time has not been announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnscheduledMeeting {
    pub course: CourseId,
    pub code: String,
    pub kind: MeetingKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WeeklyAgenda {
    days: BTreeMap<WeekDay, Vec<AgendaEntry>>,
    unscheduled: Vec<UnscheduledMeeting>,
}

impl WeeklyAgenda {
    /// Lay out every lecture and lab of `courses`. Entries on each day are sorted
    /// by start time, then by course code.
    pub fn build<'a, I>(courses: I) -> Self
    where
        I: IntoIterator<Item = &'a Course>,
    {
        let mut agenda = WeeklyAgenda::default();

        for course in courses {
            if course.main.is_none() {
                agenda.unscheduled.push(UnscheduledMeeting {
                    course: course.id.clone(),
                    code: course.code.clone(),
                    kind: MeetingKind::Lecture,
                });
            }
            if course.has_lab() && course.lab_occurrence().is_none() {
                agenda.unscheduled.push(UnscheduledMeeting {
                    course: course.id.clone(),
                    code: course.code.clone(),
                    kind: MeetingKind::Lab,
                });
            }

            for (kind, occurrence) in course.occurrences() {
                let location = match kind {
                    MeetingKind::Lab => course.lab_location().unwrap_or(course.location.as_str()),
                    MeetingKind::Lecture => course.location.as_str(),
                };
                for &day in occurrence.days() {
                    agenda.days.entry(day).or_default().push(AgendaEntry {
                        course: course.id.clone(),
                        code: course.code.clone(),
                        title: course.title.clone(),
                        kind,
                        interval: occurrence.interval(),
                        location: location.to_string(),
                    });
                }
            }
        }

        for entries in agenda.days.values_mut() {
            entries.sort_by(|a, b| {
                a.interval
                    .start_minute()
                    .cmp(&b.interval.start_minute())
                    .then_with(|| a.code.cmp(&b.code))
            });
        }

        agenda
    }

    pub fn day(&self, day: WeekDay) -> &[AgendaEntry] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All five weekdays in order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (WeekDay, &[AgendaEntry])> {
        WeekDay::ALL.into_iter().map(move |day| (day, self.day(day)))
    }

    pub fn unscheduled(&self) -> &[UnscheduledMeeting] {
        &self.unscheduled
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.unscheduled.is_empty()
    }

    /// Earliest start and latest end over the whole week, for sizing a grid.
    pub fn span(&self) -> Option<(u32, u32)> {
        let entries = self.days.values().flatten();
        let start = entries.clone().map(|e| e.interval.start_minute()).min()?;
        let end = entries.map(|e| e.interval.end_minute()).max()?;
        Some((start, end))
    }
}
