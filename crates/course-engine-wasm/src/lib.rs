//! WASM bindings for course-engine.
//!
//! Exposes a `Registration` session and pairwise conflict checks to JavaScript
//! via `wasm-bindgen`. Complex values cross the boundary as JSON strings.
//! Errors are thrown as JSON strings of the form
//! `{"kind": "...", "message": "...", "course"?: "...", "conflicting"?: "..."}`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p course-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/course_engine_wasm.wasm
//! ```

use course_engine::catalog::CourseRecord;
use course_engine::{
    Catalog, CatalogError, CatalogQuery, Course, CourseConflict, RegistrationEngine,
    RegistrationError, RegistrationPolicy, RegistrationStatus,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ErrorDto {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicting: Option<String>,
}

impl ErrorDto {
    fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            course: None,
            conflicting: None,
        }
    }

    fn into_js(self) -> JsValue {
        JsValue::from_str(&serde_json::to_string(&self).unwrap_or_default())
    }
}

impl From<&RegistrationError> for ErrorDto {
    fn from(err: &RegistrationError) -> Self {
        let (kind, course, conflicting) = match err {
            RegistrationError::UnknownCourse(id) => ("unknown_course", id, None),
            RegistrationError::AlreadyRegistered(id) => ("already_registered", id, None),
            RegistrationError::Waitlisted(id) => ("waitlisted", id, None),
            RegistrationError::NotRegistered(id) => ("not_registered", id, None),
            RegistrationError::ScheduleConflict {
                course,
                conflicting,
            } => ("schedule_conflict", course, Some(conflicting)),
            RegistrationError::WaitlistIneligible { course, .. } => {
                ("waitlist_ineligible", course, None)
            }
            RegistrationError::CreditLimitExceeded { course, .. } => {
                ("credit_limit_exceeded", course, None)
            }
        };
        Self {
            kind,
            message: err.to_string(),
            course: Some(course.to_string()),
            conflicting: conflicting.map(ToString::to_string),
        }
    }
}

fn registration_error(err: RegistrationError) -> JsValue {
    ErrorDto::from(&err).into_js()
}

fn catalog_error(err: CatalogError) -> JsValue {
    ErrorDto::new("invalid_catalog", err.to_string()).into_js()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| {
        ErrorDto::new("serialization", format!("Serialization error: {}", e)).into_js()
    })
}

#[derive(Serialize)]
struct ConflictDto {
    first: String,
    second: String,
    kind: course_engine::ConflictKind,
    overlap_minutes: u32,
}

impl From<&CourseConflict<'_>> for ConflictDto {
    fn from(c: &CourseConflict<'_>) -> Self {
        Self {
            first: c.first.id.to_string(),
            second: c.second.id.to_string(),
            kind: c.kind,
            overlap_minutes: c.overlap_minutes,
        }
    }
}

/// Parse a single catalog record (same shape as one catalog JSON entry).
fn parse_course(json: &str) -> Result<Course, JsValue> {
    let record: CourseRecord = serde_json::from_str(json)
        .map_err(|e| catalog_error(CatalogError::Json(e)))?;
    Course::try_from(record).map_err(catalog_error)
}

fn course_ids(courses: &[&Course]) -> Vec<String> {
    courses.iter().map(|c| c.id.to_string()).collect()
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// True if two courses (given as catalog-record JSON) have any overlapping
/// lecture or lab meeting.
#[wasm_bindgen(js_name = "coursesConflict")]
pub fn courses_conflict(course_a_json: &str, course_b_json: &str) -> Result<bool, JsValue> {
    let a = parse_course(course_a_json)?;
    let b = parse_course(course_b_json)?;
    Ok(course_engine::courses_conflict(&a, &b))
}

/// One student's registration session over a catalog.
#[wasm_bindgen]
pub struct Registration {
    engine: RegistrationEngine,
}

#[wasm_bindgen]
impl Registration {
    /// Build a session from a catalog JSON array.
    ///
    /// # Arguments
    /// - `catalog_json` -- JSON array of course records
    /// - `credit_limit` -- Optional maximum of registered credits
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str, credit_limit: Option<u32>) -> Result<Registration, JsValue> {
        let catalog = Catalog::from_json(catalog_json).map_err(catalog_error)?;
        let policy = RegistrationPolicy { credit_limit };
        Ok(Registration {
            engine: RegistrationEngine::with_policy(catalog, policy),
        })
    }

    pub fn register(&mut self, id: &str) -> Result<(), JsValue> {
        self.engine.register(id).map_err(registration_error)
    }

    /// Returns `false` when the course was not registered.
    #[wasm_bindgen(js_name = "drop")]
    pub fn drop_course(&mut self, id: &str) -> bool {
        self.engine.drop_course(id)
    }

    #[wasm_bindgen(js_name = "joinWaitlist")]
    pub fn join_waitlist(&mut self, id: &str) -> Result<(), JsValue> {
        self.engine.join_waitlist(id).map_err(registration_error)
    }

    /// Returns `false` when the course was not waitlisted.
    #[wasm_bindgen(js_name = "leaveWaitlist")]
    pub fn leave_waitlist(&mut self, id: &str) -> bool {
        self.engine.leave_waitlist(id)
    }

    /// Drop `drop_id` and register `register_id`. A conflict with a third
    /// course is thrown after the drop, which is not undone.
    pub fn replace(&mut self, drop_id: &str, register_id: &str) -> Result<(), JsValue> {
        self.engine
            .replace(drop_id, register_id)
            .map_err(registration_error)
    }

    /// Id of the first registered course that conflicts with `id`, or `undefined`.
    #[wasm_bindgen(js_name = "hasScheduleConflict")]
    pub fn has_schedule_conflict(&self, id: &str) -> Result<Option<String>, JsValue> {
        let course = self.engine.catalog().get(id).ok_or_else(|| {
            registration_error(RegistrationError::UnknownCourse(id.into()))
        })?;
        Ok(self
            .engine
            .has_schedule_conflict(course)
            .map(|c| c.id.to_string()))
    }

    /// `"unregistered"`, `"registered"` or `"waitlisted"`.
    pub fn status(&self, id: &str) -> String {
        let status = match self.engine.status(id) {
            RegistrationStatus::Unregistered => "unregistered",
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Waitlisted => "waitlisted",
        };
        status.to_string()
    }

    /// JSON array of registered course ids, in registration order.
    pub fn registered(&self) -> Result<String, JsValue> {
        to_json(&course_ids(&self.engine.registered_courses()))
    }

    /// JSON array of waitlisted course ids.
    pub fn waitlisted(&self) -> Result<String, JsValue> {
        to_json(&course_ids(&self.engine.waitlisted_courses()))
    }

    #[wasm_bindgen(js_name = "totalCredits")]
    pub fn total_credits(&self) -> u32 {
        self.engine.total_credits()
    }

    /// JSON array of `{first, second, kind, overlap_minutes}` among registered courses.
    pub fn audit(&self) -> Result<String, JsValue> {
        let dtos: Vec<ConflictDto> = self.engine.audit().iter().map(ConflictDto::from).collect();
        to_json(&dtos)
    }

    /// Browse the catalog with live seat counts. `query_json` is a catalog query
    /// object (`{search, department, level, open_only, sort}`, all optional).
    pub fn browse(&self, query_json: &str) -> Result<String, JsValue> {
        let query: CatalogQuery = serde_json::from_str(query_json).map_err(|e| {
            ErrorDto::new("invalid_query", format!("Invalid query JSON: {}", e)).into_js()
        })?;
        to_json(&self.engine.browse(&query))
    }

    /// The registered courses laid out by weekday, as JSON.
    #[wasm_bindgen(js_name = "weeklyAgenda")]
    pub fn weekly_agenda(&self) -> Result<String, JsValue> {
        to_json(&self.engine.weekly_agenda())
    }
}
