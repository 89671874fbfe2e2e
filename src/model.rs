use crate::identity::normalize_name;
use crate::scheduler::PlanError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifiant fort d'un praticien (nom normalisé).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClinicianKey(String);

impl ClinicianKey {
    /// Normalise `raw` (majuscules, diacritiques repliés, espaces nettoyés).
    pub fn new<S: AsRef<str>>(raw: S) -> Self {
        Self(normalize_name(raw.as_ref()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClinicianKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type de jour de week-end d'une date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekendKind {
    #[default]
    NotWeekend,
    Saturday,
    Sunday,
}

impl WeekendKind {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
            _ => Self::NotWeekend,
        }
    }

    pub fn is_weekend(self) -> bool {
        self != Self::NotWeekend
    }
}

/// Service de garde à pourvoir chaque jour.
///
/// `rotation` est la catégorie comparée pour la continuité (deux services
/// de même rotation comptent comme une répétition). `keywords` reconnaît
/// les colonnes correspondantes dans l'historique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: String,
    pub rotation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl ServiceType {
    pub fn new<I: Into<String>, R: Into<String>>(id: I, rotation: R) -> Self {
        Self {
            id: id.into(),
            rotation: rotation.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords<K: Into<String>>(mut self, keywords: impl IntoIterator<Item = K>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Vrai si l'en-tête de colonne désigne ce service (comparaison normalisée).
    pub fn matches_header(&self, header: &str) -> bool {
        let header = normalize_name(header);
        if header.is_empty() {
            return false;
        }
        std::iter::once(&self.id)
            .chain(self.keywords.iter())
            .map(|k| normalize_name(k))
            .any(|k| !k.is_empty() && header.contains(&k))
    }
}

/// Mémoire glissante d'un praticien : historique puis affectations de la période.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicianMemory {
    pub last_service: Option<String>,
    pub last_weekend: WeekendKind,
    /// Informatif, n'entre pas dans le score.
    pub historical_total: u32,
}

impl ClinicianMemory {
    pub fn record_history(&mut self, rotation: &str, day: WeekendKind) {
        self.historical_total += 1;
        self.remember(rotation, day);
    }

    pub fn remember(&mut self, rotation: &str, day: WeekendKind) {
        self.last_service = Some(rotation.to_owned());
        if day.is_weekend() {
            self.last_weekend = day;
        }
    }
}

/// Compteurs de charge sur la période planifiée.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCounters {
    pub total: u32,
    pub weekend: u32,
}

impl LoadCounters {
    pub fn record(&mut self, weekend: bool) {
        self.total += 1;
        if weekend {
            self.weekend += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clinician {
    pub key: ClinicianKey,
    /// Première graphie rencontrée.
    pub display_name: String,
    pub memory: ClinicianMemory,
}

/// Univers des praticiens, dans l'ordre de première rencontre.
#[derive(Debug, Clone, Default)]
pub struct ClinicianPool {
    members: Vec<Clinician>,
    index: HashMap<ClinicianKey, usize>,
}

impl ClinicianPool {
    /// Enregistre `key` si nouvelle et renvoie sa position. Le nom affiché
    /// n'est jamais écrasé par une graphie ultérieure.
    pub fn observe(&mut self, key: ClinicianKey, raw: &str) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.members.len();
        self.index.insert(key.clone(), idx);
        self.members.push(Clinician {
            key,
            display_name: raw.trim().to_owned(),
            memory: ClinicianMemory::default(),
        });
        idx
    }

    pub fn position(&self, key: &ClinicianKey) -> Option<usize> {
        self.index.get(key).copied()
    }
    pub fn get(&self, key: &ClinicianKey) -> Option<&Clinician> {
        self.position(key).map(|idx| &self.members[idx])
    }
    pub fn members(&self) -> &[Clinician] {
        &self.members
    }
    pub fn memory_mut(&mut self, idx: usize) -> &mut ClinicianMemory {
        &mut self.members[idx].memory
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Période planifiée, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PlanningPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlanError> {
        let period = Self { start, end };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.end < self.start {
            return Err(PlanError::InvalidPeriod {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Jour `day` du mois de début de période.
    pub fn month_day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start.year(), self.start.month(), day)
    }
}

/// Créneau de garde : une date, un service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutySlot {
    pub date: NaiveDate,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assignment {
    Filled {
        key: ClinicianKey,
        display_name: String,
    },
    /// Aucun candidat éligible ; jamais omis du tableau.
    Unfilled,
}

impl Assignment {
    pub fn key(&self) -> Option<&ClinicianKey> {
        match self {
            Self::Filled { key, .. } => Some(key),
            Self::Unfilled => None,
        }
    }
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Filled { display_name, .. } => Some(display_name),
            Self::Unfilled => None,
        }
    }
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub slot: DutySlot,
    pub assignment: Assignment,
}

/// Tableau de garde : chaque créneau de la période exactement une fois,
/// par date puis dans l'ordre des services configurés.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &RosterEntry> + '_ {
        self.entries.iter().filter(move |e| e.slot.date == date)
    }
    pub fn assigned_to<'a>(&'a self, key: &'a ClinicianKey) -> impl Iterator<Item = &'a RosterEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.assignment.key() == Some(key))
    }
    pub fn find(&self, date: NaiveDate, service: &str) -> Option<&RosterEntry> {
        self.entries
            .iter()
            .find(|e| e.slot.date == date && e.slot.service == service)
    }
    pub fn unfilled_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.assignment.is_filled()).count()
    }
}

/// Charge finale d'un praticien ayant au moins une garde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub key: ClinicianKey,
    pub display_name: String,
    pub total: u32,
    pub weekend: u32,
}

/// Résultat complet d'une planification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub period: PlanningPeriod,
    pub services: Vec<String>,
    pub roster: Roster,
    pub loads: Vec<LoadSummary>,
}

impl PlanOutcome {
    pub fn load_of(&self, key: &ClinicianKey) -> Option<&LoadSummary> {
        self.loads.iter().find(|l| &l.key == key)
    }
}
