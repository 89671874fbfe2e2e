#![forbid(unsafe_code)]
use chrono::NaiveDate;
use gardes::{
    detect_conflicts, plan_period, resolve_absences, AbsenceRow, Assignment, ClinicianKey,
    FixedOrder, HistoryRecord, PlanConfig, PlanError, PlanningPeriod, Shuffled,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
}

fn config(start: u32, end: u32) -> PlanConfig {
    PlanConfig {
        period: PlanningPeriod::new(day(start), day(end)).unwrap(),
        ..PlanConfig::default()
    }
}

fn key(name: &str) -> ClinicianKey {
    ClinicianKey::new(name)
}

#[test]
fn single_clinician_rotates_away_from_last_service() {
    // ANA : urgences le samedi 30 novembre ; période = dimanche 1er décembre
    let history = vec![HistoryRecord::new("2024-11-30").with_cell("ACİL", "ANA")];
    let outcome = plan_period(&history, None, &config(1, 1), &mut FixedOrder).unwrap();

    let maternity = outcome.roster.find(day(1), "DOĞUMHANE").unwrap();
    let emergency = outcome.roster.find(day(1), "ACİL").unwrap();
    assert_eq!(maternity.assignment.display_name(), Some("ANA"));
    assert_eq!(emergency.assignment, Assignment::Unfilled);

    let load = outcome.load_of(&key("ana")).unwrap();
    assert_eq!((load.total, load.weekend), (1, 1));
}

#[test]
fn continuity_penalty_steers_each_clinician_to_the_other_service() {
    let history = vec![HistoryRecord::new("2024-11-30")
        .with_cell("ACİL", "Ana")
        .with_cell("DOĞUMHANE", "Bora")];
    // urgences traitées en premier : Bora (venant de la salle de naissance) l'emporte
    let mut cfg = config(1, 1);
    cfg.services.reverse();
    let outcome = plan_period(&history, None, &cfg, &mut FixedOrder).unwrap();

    assert_eq!(
        outcome.roster.find(day(1), "ACİL").unwrap().assignment.display_name(),
        Some("Bora")
    );
    assert_eq!(
        outcome.roster.find(day(1), "DOĞUMHANE").unwrap().assignment.display_name(),
        Some("Ana")
    );
}

#[test]
fn weekends_are_filled_first_and_rest_holds_both_ways() {
    // vendredi 6 au lundi 9, un seul service, un seul praticien
    let history = vec![HistoryRecord::new("2024-11-20").with_cell("ACİL", "Ana")];
    let mut cfg = config(6, 9);
    cfg.services.retain(|s| s.id == "ACİL");
    let outcome = plan_period(&history, None, &cfg, &mut FixedOrder).unwrap();

    let names: Vec<Option<&str>> = outcome
        .roster
        .entries
        .iter()
        .map(|e| e.assignment.display_name())
        .collect();
    assert_eq!(names, vec![None, Some("Ana"), None, Some("Ana")]);
}

#[test]
fn clinician_absent_all_period_gets_nothing() {
    let history = vec![HistoryRecord::new("2024-11-29")
        .with_cell("ACİL", "Ana")
        .with_cell("DOĞUMHANE", "Bora / Cem / Deniz")];
    let mut absent = AbsenceRow::new("ana");
    for d in 1..=31 {
        absent = absent.with_cell(d.to_string(), "x");
    }
    let absences = vec![absent];

    let outcome = plan_period(
        &history,
        Some(absences.as_slice()),
        &config(1, 31),
        &mut Shuffled::seeded(3),
    )
    .unwrap();

    assert_eq!(outcome.roster.assigned_to(&key("ana")).count(), 0);
    assert!(outcome.load_of(&key("ana")).is_none());
    assert!(outcome.loads.iter().all(|l| l.total > 0));
}

#[test]
fn slot_without_candidate_is_unfilled_and_counts_nothing() {
    let history = vec![HistoryRecord::new("2024-11-29").with_cell("ACİL", "Ana")];
    let absences = vec![AbsenceRow::new("ANA").with_cell("1", "izin")];
    let outcome = plan_period(
        &history,
        Some(absences.as_slice()),
        &config(1, 1),
        &mut FixedOrder,
    )
    .unwrap();

    assert_eq!(outcome.roster.entries.len(), 2);
    assert_eq!(outcome.roster.unfilled_count(), 2);
    assert!(outcome.loads.is_empty());
}

#[test]
fn same_seed_same_roster() {
    let history = vec![
        HistoryRecord::new("2024-11-23").with_cell("ACİL", "Ana/Bora"),
        HistoryRecord::new("2024-11-24").with_cell("DOĞUMHANE", "Cem\nDeniz"),
        HistoryRecord::new("2024-11-25").with_cell("ACİL", "Ece"),
    ];
    let cfg = config(1, 31);
    let a = plan_period(&history, None, &cfg, &mut Shuffled::seeded(99)).unwrap();
    let b = plan_period(&history, None, &cfg, &mut Shuffled::seeded(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn counters_match_roster_and_audit_is_clean() {
    let history = vec![
        HistoryRecord::new("2024-11-30").with_cell("ACİL", "Ana").with_cell("DOĞUMHANE", "Bora"),
        HistoryRecord::new("2024-11-24").with_cell("ACİL", "Cem").with_cell("DOĞUMHANE", "Deniz"),
        HistoryRecord::new("2024-11-20").with_cell("ACİL", "Ece").with_cell("DOĞUMHANE", "Fuat"),
    ];
    let absences = vec![
        AbsenceRow::new("Cem").with_cell("7", "x").with_cell("8", "x"),
        AbsenceRow::new("Fuat").with_cell("2024-12-25", "yıllık izin"),
    ];
    let cfg = config(1, 31);
    let outcome = plan_period(&history, Some(absences.as_slice()), &cfg, &mut Shuffled::seeded(5)).unwrap();

    assert_eq!(outcome.roster.entries.len(), 31 * 2);
    for load in &outcome.loads {
        let mine: Vec<_> = outcome.roster.assigned_to(&load.key).collect();
        assert_eq!(mine.len() as u32, load.total);
        let weekend = mine
            .iter()
            .filter(|e| gardes::WeekendKind::of(e.slot.date).is_weekend())
            .count();
        assert_eq!(weekend as u32, load.weekend);
    }

    let index = resolve_absences(Some(absences.as_slice()), &cfg.period, &cfg.absence);
    assert!(detect_conflicts(&outcome.roster, &index, cfg.options.rest_days).is_empty());
}

#[test]
fn first_spelling_is_the_display_name() {
    let history = vec![
        HistoryRecord::new("2024-11-02").with_cell("ACİL", "Şule Kaya"),
        HistoryRecord::new("2024-11-03").with_cell("ACİL", "SULE KAYA"),
    ];
    let outcome = plan_period(&history, None, &config(2, 2), &mut FixedOrder).unwrap();
    assert_eq!(outcome.loads.len(), 1);
    assert_eq!(outcome.loads[0].display_name, "Şule Kaya");
}

#[test]
fn fatal_conditions_stop_before_allocation() {
    let no_services = vec![HistoryRecord::new("2024-11-02").with_cell("Poliklinik", "Ana")];
    assert!(matches!(
        plan_period(&no_services, None, &config(1, 31), &mut FixedOrder),
        Err(PlanError::NoServiceColumns)
    ));

    let no_names = vec![HistoryRecord::new("2024-11-02").with_cell("ACİL", "nan")];
    assert!(matches!(
        plan_period(&no_names, None, &config(1, 31), &mut FixedOrder),
        Err(PlanError::NoClinicianData)
    ));

    let mut inverted = config(1, 31);
    inverted.period = PlanningPeriod { start: day(31), end: day(1) };
    let history = vec![HistoryRecord::new("2024-11-02").with_cell("ACİL", "Ana")];
    assert!(matches!(
        plan_period(&history, None, &inverted, &mut FixedOrder),
        Err(PlanError::InvalidPeriod { .. })
    ));
}
