use crate::model::ClinicianKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Poids du score d'un candidat (plus haut = prioritaire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub base: i64,
    /// Retranché par garde déjà faite sur la période.
    pub per_assignment: i64,
    /// Retranché par garde de week-end déjà faite (jours de week-end seulement).
    pub per_weekend_assignment: i64,
    /// Samedi puis dimanche, ou l'inverse.
    pub alternation_bonus: i64,
    pub repeat_saturday_penalty: i64,
    /// Nul par défaut : dimanche puis dimanche n'est pas pénalisé.
    pub repeat_sunday_penalty: i64,
    pub continuity_penalty: i64,
    pub rotation_bonus: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 1000,
            per_assignment: 50,
            per_weekend_assignment: 150,
            alternation_bonus: 200,
            repeat_saturday_penalty: 200,
            repeat_sunday_penalty: 0,
            continuity_penalty: 100,
            rotation_bonus: 50,
        }
    }
}

/// Options d'allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocOptions {
    /// Jours de repos exigés de part et d'autre d'une garde.
    pub rest_days: u32,
    pub weights: ScoringWeights,
}

impl Default for AllocOptions {
    fn default() -> Self {
        Self {
            rest_days: 1,
            weights: ScoringWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    DoubleBooking,
    RestViolation,
    AbsenceViolation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub clinician: ClinicianKey,
    pub date_a: NaiveDate,
    pub date_b: NaiveDate,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("no recognizable service column in historical data")]
    NoServiceColumns,
    #[error("no clinician name could be read from historical data")]
    NoClinicianData,
    #[error("invalid planning period: end {end} is before start {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("no service type configured")]
    NoServices,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
