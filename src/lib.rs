#![forbid(unsafe_code)]
//! Gardes — répartition des gardes hospitalières sur une période fixe.
//!
//! - Noms normalisés (casse, diacritiques turcs/latins).
//! - Mémoire issue de l'historique : dernier service, dernier jour de week-end.
//! - Absences par praticien, repos d'un jour de part et d'autre d'une garde.
//! - Allocation gloutonne par score, week-ends d'abord ; créneaux non pourvus explicites.
//! - Lecture/écriture CSV et JSON en dehors du moteur.

pub mod absence;
pub mod config;
pub mod history;
pub mod identity;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use absence::{resolve_absences, AbsenceIndex, AbsenceRow, AbsenceRules};
pub use config::{export_config_json, load_config_from_file, PlanConfig};
pub use history::{aggregate_history, HistoryRecord};
pub use identity::{normalize_name, split_names};
pub use model::{
    Assignment, ClinicianKey, ClinicianMemory, ClinicianPool, DutySlot, LoadCounters, LoadSummary,
    PlanOutcome, PlanningPeriod, Roster, RosterEntry, ServiceType, WeekendKind,
};
pub use report::{load_rows, roster_rows, RosterRenderer, TextTable};
pub use scheduler::{
    detect_conflicts, plan_period, AllocOptions, Conflict, ConflictKind, DutyAllocator,
    FixedOrder, PlanError, ScoringWeights, Shuffled, SlotOrdering,
};
pub use storage::{JsonStorage, Storage};
