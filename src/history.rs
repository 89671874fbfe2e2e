//! Agrégation de l'historique des gardes en mémoire par praticien.

use crate::identity;
use crate::model::{ClinicianPool, ServiceType, WeekendKind};
use crate::scheduler::PlanError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Ligne d'historique : une date brute et les cellules `(en-tête, texte)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRecord {
    pub date: String,
    pub cells: Vec<(String, String)>,
}

impl HistoryRecord {
    pub fn new<D: Into<String>>(date: D) -> Self {
        Self {
            date: date.into(),
            cells: Vec::new(),
        }
    }

    pub fn with_cell<H: Into<String>, C: Into<String>>(mut self, header: H, cell: C) -> Self {
        self.cells.push((header.into(), cell.into()));
        self
    }
}

/// Parse une date de tableur (ISO, formats européens, RFC3339).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Premier service dont les mots-clés reconnaissent `header`.
pub fn service_for_header<'a>(services: &'a [ServiceType], header: &str) -> Option<&'a ServiceType> {
    services.iter().find(|s| s.matches_header(header))
}

/// Replie l'historique en un univers de praticiens avec leur mémoire.
///
/// Les lignes sont triées chronologiquement (tri stable) avant le repli :
/// la dernière écriture reflète la garde la plus récente. Une date illisible
/// fait sauter la ligne. Aucun service reconnu ou aucun nom lu est fatal.
pub fn aggregate_history(
    records: &[HistoryRecord],
    services: &[ServiceType],
) -> Result<ClinicianPool, PlanError> {
    let recognised = records
        .iter()
        .flat_map(|r| r.cells.iter())
        .any(|(header, _)| service_for_header(services, header).is_some());
    if !recognised {
        return Err(PlanError::NoServiceColumns);
    }

    let mut dated: Vec<(NaiveDate, &HistoryRecord)> = records
        .iter()
        .enumerate()
        .filter_map(|(row, record)| match parse_date(&record.date) {
            Some(date) => Some((date, record)),
            None => {
                debug!(row, date = %record.date, "skipping history row with unparseable date");
                None
            }
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut pool = ClinicianPool::default();
    for (date, record) in &dated {
        let day = WeekendKind::of(*date);
        for (header, cell) in &record.cells {
            let Some(service) = service_for_header(services, header) else {
                continue;
            };
            for (key, raw) in identity::extract_clinicians(cell) {
                let idx = pool.observe(key, raw);
                pool.memory_mut(idx).record_history(&service.rotation, day);
            }
        }
    }

    if pool.is_empty() {
        return Err(PlanError::NoClinicianData);
    }
    info!(
        rows = dated.len(),
        skipped = records.len() - dated.len(),
        clinicians = pool.len(),
        "history aggregated"
    );
    Ok(pool)
}
