//! `coursereg` CLI: browse a course catalog, check schedule conflicts, and replay
//! registration plans from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List open Accounting courses by meeting time
//! coursereg list -i catalog.json --department "Accounting & Finance" --open-only --sort meeting-time
//!
//! # Report every conflicting pair among a set of courses
//! coursereg conflicts -i catalog.json "ACCT 340" "ECON 217" "CHEM 101"
//!
//! # Replay a registration plan with an 18-credit cap, JSON output
//! coursereg --credit-limit 18 plan -i catalog.json --actions plan.json --json
//!
//! # Register courses in order and print the weekly schedule (catalog from stdin)
//! cat catalog.json | coursereg schedule "BIOL 121" "ACCT 240"
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use course_engine::course::MeetingKind;
use course_engine::{
    Catalog, CatalogQuery, ConflictKind, Course, CourseConflict, CourseLevel, RegistrationEngine,
    RegistrationPolicy, SortCriteria, WeeklyAgenda,
};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "coursereg",
    version,
    about = "Course catalog browsing, conflict detection and registration planning"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Reject registrations that would exceed this many credits
    #[arg(long, global = true)]
    credit_limit: Option<u32>,
}

#[derive(Args)]
struct CatalogArgs {
    /// Catalog JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Case-insensitive search over title, code, instructor and department
        #[arg(long)]
        search: Option<String>,
        /// Exact department name
        #[arg(long)]
        department: Option<String>,
        #[arg(long, value_enum)]
        level: Option<LevelArg>,
        /// Only courses with open seats
        #[arg(long)]
        open_only: bool,
        #[arg(long, value_enum, default_value_t = SortArg::Alphabetical)]
        sort: SortArg,
    },
    /// Report every conflicting pair among the given courses
    Conflicts {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Course ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Replay a JSON array of registration steps through a fresh session
    Plan {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Steps file: `[{"action": "register", "course": "ACCT 240"}, ...]`.
        /// A `replace` step drops `replace` and registers `course`.
        #[arg(long)]
        actions: String,
    },
    /// Register the given courses in order and print the weekly schedule
    Schedule {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Course ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
}

impl From<LevelArg> for CourseLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Freshman => CourseLevel::Freshman,
            LevelArg::Sophomore => CourseLevel::Sophomore,
            LevelArg::Junior => CourseLevel::Junior,
            LevelArg::Senior => CourseLevel::Senior,
            LevelArg::Graduate => CourseLevel::Graduate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Alphabetical,
    Department,
    Credits,
    Availability,
    Level,
    MeetingTime,
}

impl From<SortArg> for SortCriteria {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Alphabetical => SortCriteria::Alphabetical,
            SortArg::Department => SortCriteria::Department,
            SortArg::Credits => SortCriteria::Credits,
            SortArg::Availability => SortCriteria::Availability,
            SortArg::Level => SortCriteria::CourseLevel,
            SortArg::MeetingTime => SortCriteria::MeetingTime,
        }
    }
}

/// One entry of a `plan --actions` file.
#[derive(Debug, Deserialize)]
struct PlanStep {
    action: PlanAction,
    course: String,
    #[serde(default)]
    replace: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum PlanAction {
    Register,
    Drop,
    Waitlist,
    LeaveWaitlist,
    Replace,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Outcome {
    Ok,
    NoOp,
    Rejected,
}

#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    action: PlanAction,
    course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replace: Option<String>,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    registered: Vec<String>,
    waitlisted: Vec<String>,
    total_credits: u32,
}

impl SessionSummary {
    fn of(engine: &RegistrationEngine) -> Self {
        Self {
            registered: ids(&engine.registered_courses()),
            waitlisted: ids(&engine.waitlisted_courses()),
            total_credits: engine.total_credits(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ConflictReport {
    first: String,
    second: String,
    kind: ConflictKind,
    overlap_minutes: u32,
}

impl From<&CourseConflict<'_>> for ConflictReport {
    fn from(conflict: &CourseConflict<'_>) -> Self {
        Self {
            first: conflict.first.id.to_string(),
            second: conflict.second.id.to_string(),
            kind: conflict.kind,
            overlap_minutes: conflict.overlap_minutes,
        }
    }
}

#[derive(Debug, Serialize)]
struct Rejection {
    course: String,
    message: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let policy = RegistrationPolicy {
        credit_limit: cli.credit_limit,
    };

    match cli.command {
        Commands::List {
            catalog,
            search,
            department,
            level,
            open_only,
            sort,
        } => {
            let courses = load_catalog(catalog.input.as_deref())?;
            let query = CatalogQuery {
                search,
                department,
                level: level.map(CourseLevel::from),
                open_only,
                sort: sort.into(),
            };
            let results = courses.query(&query);
            tracing::debug!(matches = results.len(), "catalog query");

            if catalog.json {
                print_json(&results)?;
            } else {
                for course in results {
                    println!("{}", describe_course(course));
                }
            }
        }
        Commands::Conflicts { catalog, ids } => {
            let courses = load_catalog(catalog.input.as_deref())?;
            let selected = ids
                .iter()
                .map(|id| {
                    courses
                        .get(id)
                        .with_context(|| format!("Unknown course: {}", id))
                })
                .collect::<Result<Vec<&Course>>>()?;

            let reports: Vec<ConflictReport> = course_engine::all_conflicts(selected)
                .iter()
                .map(ConflictReport::from)
                .collect();

            if catalog.json {
                print_json(&reports)?;
            } else if reports.is_empty() {
                println!("No conflicts.");
            } else {
                for report in &reports {
                    println!(
                        "{} conflicts with {} ({}, {} min)",
                        report.first,
                        report.second,
                        kind_label(report.kind),
                        report.overlap_minutes
                    );
                }
            }
        }
        Commands::Plan { catalog, actions } => {
            let courses = load_catalog(catalog.input.as_deref())?;
            let text = std::fs::read_to_string(&actions)
                .with_context(|| format!("Failed to read file: {}", actions))?;
            let steps: Vec<PlanStep> =
                serde_json::from_str(&text).context("Failed to parse plan steps")?;

            let mut engine = RegistrationEngine::with_policy(courses, policy);
            let reports = steps
                .into_iter()
                .enumerate()
                .map(|(index, step)| run_step(&mut engine, index + 1, step))
                .collect::<Result<Vec<_>>>()?;
            let summary = SessionSummary::of(&engine);

            if catalog.json {
                print_json(&serde_json::json!({
                    "steps": reports,
                    "registered": summary.registered,
                    "waitlisted": summary.waitlisted,
                    "total_credits": summary.total_credits,
                }))?;
            } else {
                for report in &reports {
                    println!("{}", describe_step(report));
                }
                print_summary(&summary);
            }
        }
        Commands::Schedule { catalog, ids } => {
            let courses = load_catalog(catalog.input.as_deref())?;
            let mut engine = RegistrationEngine::with_policy(courses, policy);

            let mut rejected = Vec::new();
            for id in &ids {
                if let Err(err) = engine.register(id) {
                    tracing::info!(course = %id, error = %err, "registration rejected");
                    rejected.push(Rejection {
                        course: id.clone(),
                        message: err.to_string(),
                    });
                }
            }
            let agenda = engine.weekly_agenda();
            let summary = SessionSummary::of(&engine);

            if catalog.json {
                print_json(&serde_json::json!({
                    "registered": summary.registered,
                    "rejected": rejected,
                    "total_credits": summary.total_credits,
                    "agenda": agenda,
                }))?;
            } else {
                for rejection in &rejected {
                    println!("Not registered: {}", rejection.message);
                }
                print_agenda(&agenda);
                println!("Total credits: {}", summary.total_credits);
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Apply one plan step. Rejections are reported; only malformed steps are errors.
fn run_step(engine: &mut RegistrationEngine, step: usize, plan: PlanStep) -> Result<StepReport> {
    let course = plan.course.as_str();
    let result = match plan.action {
        PlanAction::Register => engine.register(course).map(|()| true),
        PlanAction::Drop => Ok(engine.drop_course(course)),
        PlanAction::Waitlist => engine.join_waitlist(course).map(|()| true),
        PlanAction::LeaveWaitlist => Ok(engine.leave_waitlist(course)),
        PlanAction::Replace => {
            let dropping = plan
                .replace
                .as_deref()
                .with_context(|| format!("Step {}: replace needs a \"replace\" course", step))?;
            engine.replace(dropping, course).map(|()| true)
        }
    };

    let (outcome, message) = match result {
        Ok(true) => (Outcome::Ok, None),
        Ok(false) => (Outcome::NoOp, Some(format!("{} unchanged", course))),
        Err(err) => (Outcome::Rejected, Some(err.to_string())),
    };
    tracing::debug!(step, action = ?plan.action, course, outcome = ?outcome, "plan step");

    Ok(StepReport {
        step,
        action: plan.action,
        course: plan.course,
        replace: plan.replace,
        outcome,
        message,
    })
}

fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    let json = read_input(path)?;
    let catalog = Catalog::from_json(&json).context("Failed to load catalog")?;
    tracing::debug!(source = path.unwrap_or("<stdin>"), courses = catalog.len(), "catalog ready");
    Ok(catalog)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}

fn ids(courses: &[&Course]) -> Vec<String> {
    courses.iter().map(|course| course.id.to_string()).collect()
}

fn kind_label(kind: ConflictKind) -> &'static str {
    match kind {
        ConflictKind::Lecture => "lecture overlaps lecture",
        ConflictKind::LabWithLecture => "lab overlaps lecture",
        ConflictKind::LectureWithLab => "lecture overlaps lab",
        ConflictKind::Lab => "lab overlaps lab",
    }
}

fn describe_course(course: &Course) -> String {
    let meets = course
        .main
        .as_ref()
        .map_or_else(|| "TBA".to_string(), ToString::to_string);
    let mut line = format!(
        "{:<12} {:<36} {:<32} {} cr  {}/{} seats",
        course.id.as_str(),
        course.title,
        meets,
        course.credits,
        course.seats.available(),
        course.seats.capacity
    );
    if let Some(lab) = &course.lab {
        let lab_meets = lab
            .occurrence
            .as_ref()
            .map_or_else(|| "TBA".to_string(), ToString::to_string);
        line.push_str(&format!("  lab {}", lab_meets));
    }
    line
}

fn describe_step(report: &StepReport) -> String {
    let action = match report.action {
        PlanAction::Register => "register",
        PlanAction::Drop => "drop",
        PlanAction::Waitlist => "waitlist",
        PlanAction::LeaveWaitlist => "leave-waitlist",
        PlanAction::Replace => "replace",
    };
    let target = match &report.replace {
        Some(dropping) => format!("{} -> {}", dropping, report.course),
        None => report.course.clone(),
    };
    let outcome = match report.outcome {
        Outcome::Ok => "ok".to_string(),
        Outcome::NoOp => "no change".to_string(),
        Outcome::Rejected => format!(
            "rejected: {}",
            report.message.as_deref().unwrap_or_default()
        ),
    };
    format!("{}. {} {}: {}", report.step, action, target, outcome)
}

fn print_summary(summary: &SessionSummary) {
    let list = |ids: &[String]| {
        if ids.is_empty() {
            "(none)".to_string()
        } else {
            ids.join(", ")
        }
    };
    println!("Registered: {}", list(&summary.registered));
    println!("Waitlisted: {}", list(&summary.waitlisted));
    println!("Total credits: {}", summary.total_credits);
}

fn print_agenda(agenda: &WeeklyAgenda) {
    for (day, entries) in agenda.iter() {
        if entries.is_empty() {
            continue;
        }
        println!("{}", day);
        for entry in entries {
            let kind = match entry.kind {
                MeetingKind::Lecture => "",
                MeetingKind::Lab => " (lab)",
            };
            println!(
                "  {:<20} {:<12} {}{}  {}",
                entry.interval.to_string(),
                entry.code,
                entry.title,
                kind,
                entry.location
            );
        }
    }
    for meeting in agenda.unscheduled() {
        let kind = match meeting.kind {
            MeetingKind::Lecture => "lecture",
            MeetingKind::Lab => "lab",
        };
        println!("TBA: {} {}", meeting.code, kind);
    }
}
