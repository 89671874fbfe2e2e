use crate::model::PlanOutcome;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Ligne du tableau par date : une cellule par service configuré.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub date: NaiveDate,
    pub day: &'static str,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRow {
    pub display_name: String,
    pub total: u32,
    pub weekend: u32,
}

pub fn day_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Regroupe le tableau par date ; un créneau non pourvu affiche `unfilled_marker`.
pub fn roster_rows(outcome: &PlanOutcome, unfilled_marker: &str) -> Vec<RosterRow> {
    outcome
        .period
        .dates()
        .map(|date| RosterRow {
            date,
            day: day_label(date),
            cells: outcome
                .services
                .iter()
                .map(|service| {
                    outcome
                        .roster
                        .find(date, service)
                        .and_then(|e| e.assignment.display_name())
                        .unwrap_or(unfilled_marker)
                        .to_string()
                })
                .collect(),
        })
        .collect()
}

/// Charges par praticien, la plus lourde d'abord.
pub fn load_rows(outcome: &PlanOutcome) -> Vec<LoadRow> {
    let mut rows: Vec<LoadRow> = outcome
        .loads
        .iter()
        .map(|l| LoadRow {
            display_name: l.display_name.clone(),
            total: l.total,
            weekend: l.weekend,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    rows
}

/// Permet de customiser le rendu (texte, tableur, etc.).
pub trait RosterRenderer {
    fn render_roster(&self, services: &[String], rows: &[RosterRow]) -> String;
    fn render_loads(&self, rows: &[LoadRow]) -> String;
}

/// Tableau texte aligné, pour la console.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextTable;

impl RosterRenderer for TextTable {
    fn render_roster(&self, services: &[String], rows: &[RosterRow]) -> String {
        let mut header = vec!["DATE".to_string(), "DAY".to_string()];
        header.extend(services.iter().cloned());
        let body = rows.iter().map(|row| {
            let mut line = vec![row.date.to_string(), row.day.to_string()];
            line.extend(row.cells.iter().cloned());
            line
        });
        format_table(header, body.collect())
    }

    fn render_loads(&self, rows: &[LoadRow]) -> String {
        let header = vec![
            "CLINICIAN".to_string(),
            "TOTAL".to_string(),
            "WEEKEND".to_string(),
        ];
        let body = rows
            .iter()
            .map(|r| vec![r.display_name.clone(), r.total.to_string(), r.weekend.to_string()])
            .collect();
        format_table(header, body)
    }
}

fn format_table(header: Vec<String>, body: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (idx, cell) in line.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    std::iter::once(&header)
        .chain(body.iter())
        .map(|line| {
            line.iter()
                .zip(widths.iter().copied())
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
