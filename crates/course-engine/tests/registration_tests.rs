//! Tests for the registration state machine.

use course_engine::{
    Catalog, CatalogQuery, Course, RegistrationEngine, RegistrationError, RegistrationPolicy,
    RegistrationStatus, WaitlistIneligibility,
};

/// Helper: an engine over the shared catalog fixture.
fn engine() -> RegistrationEngine {
    RegistrationEngine::new(fixture_catalog())
}

fn fixture_catalog() -> Catalog {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog.json");
    let json = std::fs::read_to_string(path).expect("catalog.json fixture must exist");
    Catalog::from_json(&json).unwrap()
}

fn registered_ids(engine: &RegistrationEngine) -> Vec<String> {
    engine
        .registered_courses()
        .iter()
        .map(|c| c.id.to_string())
        .collect()
}

fn enrolled(engine: &RegistrationEngine, id: &str) -> u32 {
    engine.seats(id).unwrap().enrolled
}

// ── register ────────────────────────────────────────────────────────────────

#[test]
fn register_adds_course_and_takes_a_seat() {
    let mut engine = engine();
    assert_eq!(enrolled(&engine, "ACCT 340"), 18);

    engine.register("ACCT 340").unwrap();

    assert!(engine.is_registered("ACCT 340"));
    assert_eq!(engine.status("ACCT 340"), RegistrationStatus::Registered);
    assert_eq!(enrolled(&engine, "ACCT 340"), 19);
    // The catalog snapshot is untouched.
    assert_eq!(engine.catalog().get("ACCT 340").unwrap().seats.enrolled, 18);
}

#[test]
fn registering_twice_is_rejected_without_double_counting() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();

    let err = engine.register("ACCT 340").unwrap_err();
    assert_eq!(err, RegistrationError::AlreadyRegistered("ACCT 340".into()));
    assert_eq!(registered_ids(&engine), vec!["ACCT 340"]);
    assert_eq!(enrolled(&engine, "ACCT 340"), 19);
}

#[test]
fn conflicting_course_is_rejected_naming_the_registered_one() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();

    let err = engine.register("ECON 217").unwrap_err();
    assert_eq!(
        err,
        RegistrationError::ScheduleConflict {
            course: "ECON 217".into(),
            conflicting: "ACCT 340".into(),
        }
    );
    assert!(!engine.is_registered("ECON 217"));
    assert_eq!(enrolled(&engine, "ECON 217"), 22);
}

#[test]
fn lab_conflict_blocks_registration() {
    let mut engine = engine();
    engine.register("HIST 150").unwrap();

    // BIOL 121 has no Wednesday lecture, but its Wednesday lab overlaps HIST 150.
    let err = engine.register("BIOL 121").unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::ScheduleConflict { ref conflicting, .. }
            if conflicting.as_str() == "HIST 150"
    ));
}

#[test]
fn conflict_names_the_first_registered_course_in_order() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    engine.register("CHEM 101").unwrap();

    // ECON 217 overlaps both; ACCT 340 was registered first.
    match engine.register("ECON 217") {
        Err(RegistrationError::ScheduleConflict { conflicting, .. }) => {
            assert_eq!(conflicting.as_str(), "ACCT 340")
        }
        other => panic!("expected ScheduleConflict, got {:?}", other),
    }
}

#[test]
fn full_course_can_still_be_registered() {
    let mut engine = engine();
    engine.register("BIOL 121").unwrap();
    assert_eq!(enrolled(&engine, "BIOL 121"), 41);
    assert_eq!(engine.seats("BIOL 121").unwrap().available(), 0);
}

#[test]
fn unknown_course_is_rejected() {
    let mut engine = engine();
    assert_eq!(
        engine.register("ASTR 999").unwrap_err(),
        RegistrationError::UnknownCourse("ASTR 999".into())
    );
    assert!(engine.seats("ASTR 999").is_none());
    assert_eq!(engine.status("ASTR 999"), RegistrationStatus::Unregistered);
}

#[test]
fn waitlisted_course_cannot_be_registered_directly() {
    let mut engine = engine();
    engine.join_waitlist("BIOL 121").unwrap();

    assert_eq!(
        engine.register("BIOL 121").unwrap_err(),
        RegistrationError::Waitlisted("BIOL 121".into())
    );
    assert!(engine.is_waitlisted("BIOL 121"));
    assert!(!engine.is_registered("BIOL 121"));
}

#[test]
fn tba_course_never_conflicts() {
    let mut engine = engine();
    engine.register("ACCT 240").unwrap();
    engine.register("MUSC 210").unwrap();
    engine.register("CMSC 140").unwrap();
    assert_eq!(registered_ids(&engine), vec!["ACCT 240", "MUSC 210", "CMSC 140"]);
}

#[test]
fn sections_sharing_a_code_are_tracked_separately() {
    let mut engine = engine();
    engine.register("MATH 261-01").unwrap();
    assert!(engine.is_registered("MATH 261-01"));
    assert!(!engine.is_registered("MATH 261-02"));
    assert_eq!(enrolled(&engine, "MATH 261-01"), 29);
    assert_eq!(enrolled(&engine, "MATH 261-02"), 30);
}

// ── drop_course ─────────────────────────────────────────────────────────────

#[test]
fn drop_restores_prior_enrollment() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    assert!(engine.drop_course("ACCT 340"));

    assert!(!engine.is_registered("ACCT 340"));
    assert_eq!(enrolled(&engine, "ACCT 340"), 18);
}

#[test]
fn dropping_an_unregistered_course_is_a_no_op() {
    let mut engine = engine();
    assert!(!engine.drop_course("ACCT 340"));
    assert!(!engine.drop_course("ASTR 999"));
    assert_eq!(enrolled(&engine, "ACCT 340"), 18);
}

#[test]
fn drop_never_underflows_enrollment() {
    let course = Course::builder("ART 101").seats(10, 0).build();
    let catalog = Catalog::new(vec![course]).unwrap();
    let mut engine = RegistrationEngine::new(catalog);

    engine.register("ART 101").unwrap();
    assert!(engine.drop_course("ART 101"));
    assert!(!engine.drop_course("ART 101"));
    assert_eq!(enrolled(&engine, "ART 101"), 0);
}

#[test]
fn register_saturates_a_full_enrollment_counter() {
    let course = Course::builder("ART 101").seats(10, u32::MAX).build();
    let catalog = Catalog::new(vec![course]).unwrap();
    let mut engine = RegistrationEngine::new(catalog);

    engine.register("ART 101").unwrap();
    assert_eq!(enrolled(&engine, "ART 101"), u32::MAX);
    assert!(engine.drop_course("ART 101"));
    assert_eq!(enrolled(&engine, "ART 101"), u32::MAX - 1);
}

#[test]
fn credit_totals_saturate_instead_of_wrapping() {
    let heavy = Course::builder("ART 101").credits(u32::MAX).build();
    let light = Course::builder("ART 102").credits(3).build();
    let catalog = Catalog::new(vec![heavy, light]).unwrap();

    let mut engine = RegistrationEngine::new(catalog.clone());
    engine.register("ART 101").unwrap();
    engine.register("ART 102").unwrap();
    assert_eq!(engine.total_credits(), u32::MAX);

    let policy = RegistrationPolicy {
        credit_limit: Some(u32::MAX - 1),
    };
    let mut limited = RegistrationEngine::with_policy(catalog, policy);
    limited.register("ART 102").unwrap();
    let err = limited.register("ART 101").unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::CreditLimitExceeded { attempted: u32::MAX, .. }
    ));
    assert_eq!(limited.total_credits(), 3);
}

#[test]
fn dropping_frees_the_time_slot() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    engine.drop_course("ACCT 340");
    engine.register("ECON 217").unwrap();
    assert_eq!(registered_ids(&engine), vec!["ECON 217"]);
}

// ── waitlist ────────────────────────────────────────────────────────────────

#[test]
fn full_course_with_waitlist_can_be_joined_without_taking_a_seat() {
    let mut engine = engine();
    engine.join_waitlist("BIOL 121").unwrap();

    assert!(engine.is_waitlisted("BIOL 121"));
    assert_eq!(engine.status("BIOL 121"), RegistrationStatus::Waitlisted);
    assert_eq!(enrolled(&engine, "BIOL 121"), 40);
    let waitlisted: Vec<&str> = engine
        .waitlisted_courses()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(waitlisted, vec!["BIOL 121"]);
}

#[test]
fn waitlist_ineligibility_reasons() {
    let mut engine = engine();
    let reason = |err: RegistrationError| match err {
        RegistrationError::WaitlistIneligible { reason, .. } => reason,
        other => panic!("expected WaitlistIneligible, got {:?}", other),
    };

    assert_eq!(
        reason(engine.join_waitlist("ACCT 240").unwrap_err()),
        WaitlistIneligibility::SeatsAvailable
    );
    assert_eq!(
        reason(engine.join_waitlist("PSYC 233").unwrap_err()),
        WaitlistIneligibility::WaitlistDisabled
    );

    engine.register("MATH 261-02").unwrap();
    assert_eq!(
        reason(engine.join_waitlist("MATH 261-02").unwrap_err()),
        WaitlistIneligibility::AlreadyRegistered
    );

    engine.join_waitlist("BIOL 121").unwrap();
    assert_eq!(
        reason(engine.join_waitlist("BIOL 121").unwrap_err()),
        WaitlistIneligibility::AlreadyWaitlisted
    );

    assert_eq!(engine.waitlisted_courses().len(), 1);
}

#[test]
fn leave_waitlist_is_a_no_op_when_absent() {
    let mut engine = engine();
    assert!(!engine.leave_waitlist("BIOL 121"));

    engine.join_waitlist("BIOL 121").unwrap();
    assert!(engine.leave_waitlist("BIOL 121"));
    assert!(!engine.is_waitlisted("BIOL 121"));
    assert!(!engine.leave_waitlist("BIOL 121"));
}

#[test]
fn waitlisted_courses_are_not_conflict_checked() {
    let mut engine = engine();
    engine.register("HIST 150").unwrap();
    // BIOL 121's lab overlaps HIST 150, but waitlisting does not reserve a slot.
    engine.join_waitlist("BIOL 121").unwrap();
    assert!(engine.audit().is_empty());
}

// ── replace ─────────────────────────────────────────────────────────────────

#[test]
fn replace_swaps_a_conflicting_course() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    assert!(engine.register("ECON 217").is_err());

    engine.replace("ACCT 340", "ECON 217").unwrap();

    assert_eq!(registered_ids(&engine), vec!["ECON 217"]);
    assert_eq!(enrolled(&engine, "ACCT 340"), 18);
    assert_eq!(enrolled(&engine, "ECON 217"), 23);
}

#[test]
fn replace_requires_the_dropped_course_to_be_registered() {
    let mut engine = engine();
    assert_eq!(
        engine.replace("ACCT 340", "ECON 217").unwrap_err(),
        RegistrationError::NotRegistered("ACCT 340".into())
    );
    assert!(registered_ids(&engine).is_empty());
}

#[test]
fn replace_rejects_unknown_ids_before_dropping() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();

    assert_eq!(
        engine.replace("ACCT 340", "ASTR 999").unwrap_err(),
        RegistrationError::UnknownCourse("ASTR 999".into())
    );
    assert_eq!(registered_ids(&engine), vec!["ACCT 340"]);
}

#[test]
fn replace_rejects_an_already_registered_target() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    engine.register("HIST 150").unwrap();

    assert_eq!(
        engine.replace("ACCT 340", "HIST 150").unwrap_err(),
        RegistrationError::AlreadyRegistered("HIST 150".into())
    );
    assert_eq!(registered_ids(&engine), vec!["ACCT 340", "HIST 150"]);
}

#[test]
fn replace_rejects_a_waitlisted_target() {
    let mut engine = engine();
    engine.register("HIST 150").unwrap();
    engine.join_waitlist("BIOL 121").unwrap();

    assert_eq!(
        engine.replace("HIST 150", "BIOL 121").unwrap_err(),
        RegistrationError::Waitlisted("BIOL 121".into())
    );
    assert!(engine.is_registered("HIST 150"));
}

#[test]
fn replacing_a_course_with_itself_re_registers_it() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    engine.replace("ACCT 340", "ACCT 340").unwrap();
    assert_eq!(registered_ids(&engine), vec!["ACCT 340"]);
    assert_eq!(enrolled(&engine, "ACCT 340"), 19);
}

#[test]
fn residual_conflict_after_replace_keeps_the_drop() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();
    engine.register("CHEM 101").unwrap();

    // ECON 217 no longer clashes with ACCT 340 once it is dropped, but it
    // still overlaps CHEM 101 at 11:00.
    let err = engine.replace("ACCT 340", "ECON 217").unwrap_err();
    assert_eq!(
        err,
        RegistrationError::ScheduleConflict {
            course: "ECON 217".into(),
            conflicting: "CHEM 101".into(),
        }
    );
    assert_eq!(registered_ids(&engine), vec!["CHEM 101"]);
    assert_eq!(enrolled(&engine, "ACCT 340"), 18);
}

// ── credit limit ────────────────────────────────────────────────────────────

#[test]
fn no_credit_limit_by_default() {
    let mut engine = engine();
    assert_eq!(engine.policy().credit_limit, None);
    for id in ["ACCT 242", "BIOL 122", "CMSC 140", "HIST 150", "MATH 261-01", "MUSC 210"] {
        engine.register(id).unwrap();
    }
    assert_eq!(engine.total_credits(), 19);
}

#[test]
fn credit_limit_rejects_registration_past_the_cap() {
    let policy = RegistrationPolicy {
        credit_limit: Some(10),
    };
    let mut engine = RegistrationEngine::with_policy(fixture_catalog(), policy);
    engine.register("ACCT 242").unwrap();
    engine.register("BIOL 122").unwrap();
    assert_eq!(engine.total_credits(), 7);

    assert_eq!(
        engine.register("MATH 261-01").unwrap_err(),
        RegistrationError::CreditLimitExceeded {
            course: "MATH 261-01".into(),
            limit: 10,
            attempted: 11,
        }
    );
    // Exactly reaching the limit is allowed.
    engine.register("HIST 150").unwrap();
    assert_eq!(engine.total_credits(), 10);
}

#[test]
fn policy_deserializes_with_defaults() {
    let policy: RegistrationPolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(policy, RegistrationPolicy::default());
    let capped: RegistrationPolicy = serde_json::from_str(r#"{"credit_limit": 18}"#).unwrap();
    assert_eq!(capped.credit_limit, Some(18));
}

// ── Read API ────────────────────────────────────────────────────────────────

#[test]
fn has_schedule_conflict_reports_without_mutating() {
    let mut engine = engine();
    engine.register("ACCT 340").unwrap();

    let econ = engine.catalog().get("ECON 217").unwrap();
    let conflicting = engine.has_schedule_conflict(econ).unwrap();
    assert_eq!(conflicting.id.as_str(), "ACCT 340");

    let hist = engine.catalog().get("HIST 150").unwrap();
    assert!(engine.has_schedule_conflict(hist).is_none());
    assert_eq!(registered_ids(&engine), vec!["ACCT 340"]);
}

#[test]
fn check_conflicts_over_arbitrary_courses() {
    let engine = engine();
    let catalog = engine.catalog();
    let picks = ["ACCT 340", "ECON 217", "CHEM 101", "HIST 150", "BIOL 121"]
        .iter()
        .filter_map(|id| catalog.get(id));

    let pairs: Vec<(String, String)> = engine
        .check_conflicts(picks)
        .iter()
        .map(|c| (c.first.id.to_string(), c.second.id.to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("ACCT 340".to_string(), "ECON 217".to_string()),
            ("ECON 217".to_string(), "CHEM 101".to_string()),
            ("HIST 150".to_string(), "BIOL 121".to_string()),
        ]
    );
}

#[test]
fn audit_of_a_clean_schedule_is_empty() {
    let mut engine = engine();
    engine.register("ACCT 240").unwrap();
    engine.register("ACCT 340").unwrap();
    engine.register("CHEM 101").unwrap();
    assert!(engine.audit().is_empty());
    assert_eq!(engine.total_credits(), 10);
}

#[test]
fn browse_reflects_live_enrollment() {
    let catalog = Catalog::new(vec![
        Course::builder("ART 101").title("Drawing").seats(1, 0).build(),
        Course::builder("ART 102").title("Painting").seats(5, 5).build(),
    ])
    .unwrap();
    let mut engine = RegistrationEngine::new(catalog);
    let open_only = CatalogQuery {
        open_only: true,
        ..CatalogQuery::default()
    };
    let open = |engine: &RegistrationEngine| -> Vec<String> {
        engine
            .browse(&open_only)
            .iter()
            .map(|c| c.id.to_string())
            .collect()
    };

    assert_eq!(open(&engine), vec!["ART 101"]);
    assert_eq!(
        engine.join_waitlist("ART 101").unwrap_err(),
        RegistrationError::WaitlistIneligible {
            course: "ART 101".into(),
            reason: WaitlistIneligibility::SeatsAvailable,
        }
    );

    engine.register("ART 101").unwrap();
    assert!(open(&engine).is_empty());
    // The snapshot still reports the seat as open.
    assert_eq!(engine.catalog().query(&open_only).len(), 1);

    engine.drop_course("ART 101");
    assert_eq!(open(&engine), vec!["ART 101"]);
}

#[test]
fn weekly_agenda_covers_registered_courses_only() {
    let mut engine = engine();
    engine.register("BIOL 122").unwrap();
    engine.join_waitlist("BIOL 121").unwrap();

    let agenda = engine.weekly_agenda();
    assert_eq!(agenda.day(course_engine::WeekDay::Tuesday).len(), 1);
    assert_eq!(agenda.day(course_engine::WeekDay::Friday).len(), 1);
    assert!(agenda.day(course_engine::WeekDay::Wednesday).is_empty());
}
