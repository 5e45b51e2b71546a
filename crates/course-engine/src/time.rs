//! Weekdays and minute-of-day intervals, plus the 12-hour meeting-time parser.
//!
//! Catalog meeting times arrive as strings like `"10:00 AM - 10:50 AM"`. They are
//! converted once into [`TimeInterval`]s (minutes since local midnight) so every
//! conflict check afterwards is plain integer comparison.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{MalformedTimeError, Result, UnknownWeekDay};

/// Minutes in a day; the exclusive upper bound of any interval end.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Markers the catalog uses for meetings whose time is not yet known.
const TBA_MARKERS: [&str; 3] = ["TBA", "TBD", "TO BE ANNOUNCED"];

/// A teaching day. Weekends are not part of the academic week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    #[serde(alias = "mon")]
    Monday,
    #[serde(alias = "tue")]
    Tuesday,
    #[serde(alias = "wed")]
    Wednesday,
    #[serde(alias = "thu")]
    Thursday,
    #[serde(alias = "fri")]
    Friday,
}

impl WeekDay {
    pub const ALL: [WeekDay; 5] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
    ];

    /// 1 for Monday through 5 for Friday.
    pub fn ordinal(self) -> u8 {
        match self {
            WeekDay::Monday => 1,
            WeekDay::Tuesday => 2,
            WeekDay::Wednesday => 3,
            WeekDay::Thursday => 4,
            WeekDay::Friday => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeekDay::Monday => "Monday",
            WeekDay::Tuesday => "Tuesday",
            WeekDay::Wednesday => "Wednesday",
            WeekDay::Thursday => "Thursday",
            WeekDay::Friday => "Friday",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeekDay {
    type Err = UnknownWeekDay;

    /// Accepts full names and the usual abbreviations, case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekDay::Monday),
            "tuesday" | "tue" | "tues" => Ok(WeekDay::Tuesday),
            "wednesday" | "wed" => Ok(WeekDay::Wednesday),
            "thursday" | "thu" | "thur" | "thurs" => Ok(WeekDay::Thursday),
            "friday" | "fri" => Ok(WeekDay::Friday),
            _ => Err(UnknownWeekDay(s.to_string())),
        }
    }
}

impl From<WeekDay> for Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Monday => Weekday::Mon,
            WeekDay::Tuesday => Weekday::Tue,
            WeekDay::Wednesday => Weekday::Wed,
            WeekDay::Thursday => Weekday::Thu,
            WeekDay::Friday => Weekday::Fri,
        }
    }
}

impl TryFrom<Weekday> for WeekDay {
    type Error = UnknownWeekDay;

    fn try_from(day: Weekday) -> std::result::Result<Self, Self::Error> {
        match day {
            Weekday::Mon => Ok(WeekDay::Monday),
            Weekday::Tue => Ok(WeekDay::Tuesday),
            Weekday::Wed => Ok(WeekDay::Wednesday),
            Weekday::Thu => Ok(WeekDay::Thursday),
            Weekday::Fri => Ok(WeekDay::Friday),
            Weekday::Sat | Weekday::Sun => Err(UnknownWeekDay(day.to_string())),
        }
    }
}

/// A half-open `[start, end)` span of minutes since local midnight.
///
/// Invariant: `start < end <= 1440`. Touching intervals (`a.end == b.start`) do
/// not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeInterval {
    start: u32,
    end: u32,
}

impl TimeInterval {
    pub fn new(start_minute: u32, end_minute: u32) -> Result<Self> {
        if start_minute >= end_minute || end_minute > MINUTES_PER_DAY {
            return Err(MalformedTimeError::new(
                format!("[{}, {})", start_minute, end_minute),
                "interval must satisfy start < end <= 1440",
            ));
        }
        Ok(Self {
            start: start_minute,
            end: end_minute,
        })
    }

    pub fn start_minute(&self) -> u32 {
        self.start
    }

    pub fn end_minute(&self) -> u32 {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    /// `self.start < other.end && self.end > other.start`.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Length of the shared span, 0 when the intervals do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> u32 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }

    /// True for the 75-minute Tuesday/Thursday style block (70 to 80 minutes).
    pub fn is_75_minute_class(&self) -> bool {
        (70..=80).contains(&self.duration_minutes())
    }

    pub fn start_time(&self) -> NaiveTime {
        minute_to_time(self.start)
    }

    /// End as a wall-clock time. An interval ending at 1440 ends at midnight.
    pub fn end_time(&self) -> NaiveTime {
        minute_to_time(self.end)
    }
}

fn minute_to_time(minute: u32) -> NaiveTime {
    let minute = minute % MINUTES_PER_DAY;
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap_or(NaiveTime::MIN)
}

fn format_clock(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_clock(self.start_time()),
            format_clock(self.end_time())
        )
    }
}

impl FromStr for TimeInterval {
    type Err = MalformedTimeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_interval(s)
    }
}

impl TryFrom<String> for TimeInterval {
    type Error = MalformedTimeError;

    fn try_from(s: String) -> Result<Self> {
        parse_interval(&s)
    }
}

impl From<TimeInterval> for String {
    fn from(interval: TimeInterval) -> Self {
        interval.to_string()
    }
}

/// Parse a `"<start> - <end>"` range where each side is `"H:MM AM"` or `"H:MM PM"`.
///
/// `12 AM` is midnight (minute 0) and `12 PM` is noon (minute 720). An end of
/// `12:00 AM` is the following midnight (minute 1440).
///
/// # Errors
/// Returns [`MalformedTimeError`] when the `" - "` separator is missing, a side has
/// no `':'`, the hour or minute is not an integer or out of range, the meridiem is
/// not `AM`/`PM`, or the end is not after the start.
pub fn parse_interval(text: &str) -> Result<TimeInterval> {
    let (start, end) = text
        .split_once(" - ")
        .ok_or_else(|| MalformedTimeError::new(text, "missing ' - ' separator"))?;

    let start = parse_clock(start).map_err(|reason| MalformedTimeError::new(text, reason))?;
    let mut end = parse_clock(end).map_err(|reason| MalformedTimeError::new(text, reason))?;
    // A range closing at 12:00 AM runs to the end of the day.
    if end == 0 {
        end = MINUTES_PER_DAY;
    }

    TimeInterval::new(start, end)
        .map_err(|_| MalformedTimeError::new(text, "end time must be after start time"))
}

/// Parse a catalog meeting time, mapping a to-be-announced marker to `None`.
///
/// Anything that is not a TBA marker must parse as an interval; there is no
/// silent fallback for malformed input.
pub fn parse_meeting_time(text: &str) -> Result<Option<TimeInterval>> {
    if is_tba_marker(text) {
        return Ok(None);
    }
    parse_interval(text).map(Some)
}

/// True for blank text or one of the TBA/TBD placeholders.
pub fn is_tba_marker(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || TBA_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Convert one `"H:MM AM"` side to minutes since midnight.
fn parse_clock(side: &str) -> std::result::Result<u32, String> {
    let side = side.trim();
    if !side.contains(':') {
        return Err(format!("'{}' has no ':'", side));
    }

    let mut parts = side.split_whitespace();
    let clock = parts.next().unwrap_or_default();
    let meridiem = parts
        .next()
        .ok_or_else(|| format!("'{}' is missing AM/PM", side))?;
    if parts.next().is_some() {
        return Err(format!("unexpected text after '{} {}'", clock, meridiem));
    }

    let (hour, minute) = clock
        .split_once(':')
        .ok_or_else(|| format!("'{}' has no ':'", clock))?;
    if !(1..=2).contains(&hour.len()) || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("hour '{}' is not a number", hour));
    }
    if minute.len() != 2 || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("minute '{}' is not two digits", minute));
    }
    let hour: u32 = hour
        .parse()
        .map_err(|_| format!("hour '{}' is not a number", hour))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| format!("minute '{}' is not a number", minute))?;

    if !(1..=12).contains(&hour) {
        return Err(format!("hour {} is outside 1..=12", hour));
    }
    if minute > 59 {
        return Err(format!("minute {} is outside 0..=59", minute));
    }

    let hour = match meridiem.to_ascii_uppercase().as_str() {
        "AM" if hour == 12 => 0,
        "AM" => hour,
        "PM" if hour < 12 => hour + 12,
        "PM" => hour,
        other => return Err(format!("'{}' is not AM or PM", other)),
    };

    Ok(hour * 60 + minute)
}

