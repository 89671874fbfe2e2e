//! Résolution des absences (mazeret) en dates exclues par praticien.

use crate::history::parse_date;
use crate::identity::normalize_name;
use crate::model::{ClinicianKey, PlanningPeriod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Règles de reconnaissance d'une cellule d'absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsenceRules {
    /// Valeurs reconnues (comparées après normalisation des noms).
    pub markers: Vec<String>,
    /// Au-delà de ce nombre de caractères, la cellule est un motif en texte libre.
    pub free_text_threshold: usize,
}

impl Default for AbsenceRules {
    fn default() -> Self {
        Self {
            markers: ["x", "mazeret", "izin", "dolu", "leave", "unavailable"]
                .into_iter()
                .map(String::from)
                .collect(),
            free_text_threshold: 5,
        }
    }
}

impl AbsenceRules {
    pub fn is_marker(&self, cell: &str) -> bool {
        let value = cell.trim();
        if value.is_empty() {
            return false;
        }
        let folded = normalize_name(value);
        self.markers.iter().any(|m| normalize_name(m) == folded)
            || value.chars().count() > self.free_text_threshold
    }
}

/// Ligne du tableau d'absences : identifiant puis cellules `(en-tête, texte)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsenceRow {
    pub clinician: String,
    pub cells: Vec<(String, String)>,
}

impl AbsenceRow {
    pub fn new<S: Into<String>>(clinician: S) -> Self {
        Self {
            clinician: clinician.into(),
            cells: Vec::new(),
        }
    }

    pub fn with_cell<H: Into<String>, C: Into<String>>(mut self, header: H, cell: C) -> Self {
        self.cells.push((header.into(), cell.into()));
        self
    }
}

/// Dates d'indisponibilité par praticien. En lecture seule pendant l'allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsenceIndex {
    by_clinician: HashMap<ClinicianKey, BTreeSet<NaiveDate>>,
}

impl AbsenceIndex {
    pub fn insert(&mut self, key: ClinicianKey, date: NaiveDate) {
        self.by_clinician.entry(key).or_default().insert(date);
    }
    pub fn is_absent(&self, key: &ClinicianKey, date: NaiveDate) -> bool {
        self.by_clinician
            .get(key)
            .is_some_and(|dates| dates.contains(&date))
    }
    pub fn dates_for(&self, key: &ClinicianKey) -> Option<&BTreeSet<NaiveDate>> {
        self.by_clinician.get(key)
    }
    pub fn len(&self) -> usize {
        self.by_clinician.values().map(BTreeSet::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Date désignée par un en-tête de colonne : un petit entier est un jour du
/// mois planifié, sinon l'en-tête doit être une date.
pub fn resolve_header(header: &str, period: &PlanningPeriod) -> Option<NaiveDate> {
    let header = header.trim();
    if let Ok(day) = header.parse::<u32>() {
        if (1..=31).contains(&day) {
            return period.month_day(day);
        }
    }
    parse_date(header)
}

/// Construit l'index d'absences ; sans tableau, personne n'est exclu.
pub fn resolve_absences(
    rows: Option<&[AbsenceRow]>,
    period: &PlanningPeriod,
    rules: &AbsenceRules,
) -> AbsenceIndex {
    let mut index = AbsenceIndex::default();
    let Some(rows) = rows else {
        return index;
    };

    for row in rows {
        let key = ClinicianKey::new(&row.clinician);
        if key.is_empty() {
            continue;
        }
        for (header, cell) in &row.cells {
            if !rules.is_marker(cell) {
                continue;
            }
            match resolve_header(header, period) {
                Some(date) => index.insert(key.clone(), date),
                None => debug!(%header, clinician = %key, "skipping unresolvable absence column"),
            }
        }
    }
    info!(rows = rows.len(), dates = index.len(), "absences resolved");
    index
}
