use super::{util, Conflict, ConflictKind};
use crate::absence::AbsenceIndex;
use crate::model::{ClinicianKey, Roster};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Audite un tableau : double garde, repos insuffisant, garde un jour d'absence.
pub fn detect_conflicts(roster: &Roster, absences: &AbsenceIndex, rest_days: u32) -> Vec<Conflict> {
    let mut by_clinician: BTreeMap<&ClinicianKey, Vec<NaiveDate>> = BTreeMap::new();
    for entry in &roster.entries {
        if let Some(key) = entry.assignment.key() {
            by_clinician.entry(key).or_default().push(entry.slot.date);
        }
    }

    let mut out = Vec::new();
    for (key, mut dates) in by_clinician {
        dates.sort_unstable();

        for (idx, a) in dates.iter().enumerate() {
            if absences.is_absent(key, *a) {
                out.push(Conflict {
                    clinician: key.clone(),
                    date_a: *a,
                    date_b: *a,
                    kind: ConflictKind::AbsenceViolation,
                });
            }

            for b in dates.iter().skip(idx + 1) {
                let kind = if a == b {
                    ConflictKind::DoubleBooking
                } else if util::violates_rest(*a, *b, rest_days) {
                    ConflictKind::RestViolation
                } else {
                    break;
                };
                out.push(Conflict {
                    clinician: key.clone(),
                    date_a: *a,
                    date_b: *b,
                    kind,
                });
            }
        }
    }

    out
}
