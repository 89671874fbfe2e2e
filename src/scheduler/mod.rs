mod assignment;
mod conflicts;
mod ordering;
mod scoring;
mod types;
mod util;

pub use conflicts::detect_conflicts;
pub use ordering::{day_order, FixedOrder, Shuffled, SlotOrdering};
pub use scoring::score;
pub use types::{AllocOptions, Conflict, ConflictKind, PlanError, ScoringWeights};

use crate::absence::{resolve_absences, AbsenceIndex, AbsenceRow};
use crate::config::PlanConfig;
use crate::history::{aggregate_history, HistoryRecord};
use crate::model::{
    Assignment, ClinicianPool, DutySlot, LoadCounters, LoadSummary, PlanOutcome, PlanningPeriod,
    Roster, RosterEntry, ServiceType,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::info;

/// Moteur d'allocation : possède la mémoire, les absences et les compteurs
/// d'une seule exécution.
#[derive(Debug)]
pub struct DutyAllocator {
    period: PlanningPeriod,
    services: Vec<ServiceType>,
    opts: AllocOptions,
    pool: ClinicianPool,
    absences: AbsenceIndex,
    loads: Vec<LoadCounters>,
    assigned_on: HashMap<NaiveDate, Vec<usize>>,
    slots: HashMap<(NaiveDate, usize), Option<usize>>,
}

impl DutyAllocator {
    pub fn new(
        pool: ClinicianPool,
        absences: AbsenceIndex,
        period: PlanningPeriod,
        services: Vec<ServiceType>,
        opts: AllocOptions,
    ) -> Result<Self, PlanError> {
        period.validate()?;
        if services.is_empty() {
            return Err(PlanError::NoServices);
        }
        if pool.is_empty() {
            return Err(PlanError::NoClinicianData);
        }
        let loads = vec![LoadCounters::default(); pool.len()];
        Ok(Self {
            period,
            services,
            opts,
            pool,
            absences,
            loads,
            assigned_on: HashMap::new(),
            slots: HashMap::new(),
        })
    }

    pub fn pool(&self) -> &ClinicianPool {
        &self.pool
    }

    /// Alloue toute la période et rend le tableau avec les charges finales.
    pub fn run(mut self, ordering: &mut dyn SlotOrdering) -> PlanOutcome {
        assignment::allocate(&mut self, ordering);
        let outcome = self.into_outcome();
        info!(
            slots = outcome.roster.entries.len(),
            unfilled = outcome.roster.unfilled_count(),
            clinicians = outcome.loads.len(),
            "allocation finished"
        );
        outcome
    }

    fn into_outcome(self) -> PlanOutcome {
        let members = self.pool.members();
        let mut entries = Vec::with_capacity(self.period.len_days() * self.services.len());

        for date in self.period.dates() {
            for (service_idx, service) in self.services.iter().enumerate() {
                let assignment = match self.slots.get(&(date, service_idx)).copied().flatten() {
                    Some(idx) => Assignment::Filled {
                        key: members[idx].key.clone(),
                        display_name: members[idx].display_name.clone(),
                    },
                    None => Assignment::Unfilled,
                };
                entries.push(RosterEntry {
                    slot: DutySlot {
                        date,
                        service: service.id.clone(),
                    },
                    assignment,
                });
            }
        }

        let loads = members
            .iter()
            .zip(&self.loads)
            .filter(|(_, load)| load.total > 0)
            .map(|(clinician, load)| LoadSummary {
                key: clinician.key.clone(),
                display_name: clinician.display_name.clone(),
                total: load.total,
                weekend: load.weekend,
            })
            .collect();

        PlanOutcome {
            period: self.period,
            services: self.services.iter().map(|s| s.id.clone()).collect(),
            roster: Roster { entries },
            loads,
        }
    }
}

/// Chaîne complète : historique, absences puis allocation. Les erreurs
/// fatales surviennent avant toute affectation.
pub fn plan_period(
    history: &[HistoryRecord],
    absences: Option<&[AbsenceRow]>,
    config: &PlanConfig,
    ordering: &mut dyn SlotOrdering,
) -> Result<PlanOutcome, PlanError> {
    config.validate()?;
    let pool = aggregate_history(history, &config.services)?;
    let absences = resolve_absences(absences, &config.period, &config.absence);
    let allocator = DutyAllocator::new(
        pool,
        absences,
        config.period,
        config.services.clone(),
        config.options,
    )?;
    Ok(allocator.run(ordering))
}
