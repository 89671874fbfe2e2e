use crate::absence::AbsenceRow;
use crate::history::HistoryRecord;
use crate::identity::normalize_name;
use crate::model::{PlanOutcome, ServiceType};
use crate::report::{load_rows, roster_rows};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::Path;

/// Fragments d'en-tête reconnus comme colonne de date (après normalisation).
const DATE_HEADER_KEYWORDS: &[&str] = &["TARIH", "DATE"];

/// Import de l'historique. La ligne d'en-tête est la première contenant une
/// colonne de date et une colonne de service (sinon la première ligne) ; la
/// première colonne porte la date.
pub fn import_history_csv<P: AsRef<Path>>(
    path: P,
    services: &[ServiceType],
) -> anyhow::Result<Vec<HistoryRecord>> {
    let path = path.as_ref();
    let rows = read_raw_rows(path)?;
    let header_idx = find_header_row(&rows, services).unwrap_or(0);
    let Some(header) = rows.get(header_idx) else {
        bail!("history file {} is empty", path.display());
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let out = rows
        .iter()
        .skip(header_idx + 1)
        .map(|rec| HistoryRecord {
            date: rec.get(0).unwrap_or_default().trim().to_string(),
            cells: row_cells(&headers, rec),
        })
        .collect();
    Ok(out)
}

/// Import des absences : ligne d'en-tête, première colonne = praticien.
pub fn import_absences_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AbsenceRow>> {
    let path = path.as_ref();
    let rows = read_raw_rows(path)?;
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let out = body
        .iter()
        .map(|rec| AbsenceRow {
            clinician: rec.get(0).unwrap_or_default().trim().to_string(),
            cells: row_cells(&headers, rec),
        })
        .collect();
    Ok(out)
}

fn read_raw_rows(path: &Path) -> anyhow::Result<Vec<StringRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(rows)
}

fn find_header_row(rows: &[StringRecord], services: &[ServiceType]) -> Option<usize> {
    rows.iter().position(|row| {
        let has_date = row.iter().any(|cell| {
            let cell = normalize_name(cell);
            DATE_HEADER_KEYWORDS.iter().any(|k| cell.contains(k))
        });
        let has_service = row
            .iter()
            .any(|cell| services.iter().any(|s| s.matches_header(cell)));
        has_date && has_service
    })
}

/// Cellules `(en-tête, texte)` hors première colonne.
fn row_cells(headers: &[String], rec: &StringRecord) -> Vec<(String, String)> {
    headers
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(idx, h)| rec.get(idx).map(|cell| (h.clone(), cell.to_string())))
        .collect()
}

/// Export JSON du résultat (jolie mise en forme)
pub fn export_outcome_json<P: AsRef<Path>>(path: P, outcome: &PlanOutcome) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(outcome)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du tableau : header `date,day,<services...>`
pub fn export_roster_csv<P: AsRef<Path>>(
    path: P,
    outcome: &PlanOutcome,
    unfilled_marker: &str,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    let mut header = vec!["date".to_string(), "day".to_string()];
    header.extend(outcome.services.iter().cloned());
    w.write_record(&header)?;
    for row in roster_rows(outcome, unfilled_marker) {
        let date = row.date.to_string();
        let mut record = vec![date.as_str(), row.day];
        record.extend(row.cells.iter().map(String::as_str));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des charges : header `clinician,total,weekend`
pub fn export_loads_csv<P: AsRef<Path>>(path: P, outcome: &PlanOutcome) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(["clinician", "total", "weekend"])?;
    for row in load_rows(outcome) {
        let total = row.total.to_string();
        let weekend = row.weekend.to_string();
        w.write_record([row.display_name.as_str(), total.as_str(), weekend.as_str()])?;
    }
    w.flush()?;
    Ok(())
}
