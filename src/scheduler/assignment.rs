use super::ordering::{day_order, SlotOrdering};
use super::{scoring, util, DutyAllocator};
use crate::model::WeekendKind;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Parcourt chaque créneau de la période une seule fois et retient, pour
/// chacun, le candidat éligible de meilleur score.
pub(super) fn allocate(allocator: &mut DutyAllocator, ordering: &mut dyn SlotOrdering) {
    for date in day_order(&allocator.period) {
        let today = WeekendKind::of(date);
        let mut services: Vec<usize> = (0..allocator.services.len()).collect();
        ordering.order(date, &mut services);

        for service_idx in services {
            let chosen = allocator.best_candidate(date, today, service_idx);
            match chosen {
                Some(idx) => allocator.commit(date, today, service_idx, idx),
                None => warn!(
                    %date,
                    service = %allocator.services[service_idx].id,
                    "no eligible clinician, slot left unfilled"
                ),
            }
            allocator.slots.insert((date, service_idx), chosen);
        }
    }
}

impl DutyAllocator {
    /// Absence, double garde le même jour et repos de part et d'autre.
    pub(super) fn is_eligible(&self, idx: usize, date: NaiveDate) -> bool {
        let key = &self.pool.members()[idx].key;
        if self.absences.is_absent(key, date) {
            return false;
        }
        util::rest_window(date, self.opts.rest_days).all(|day| {
            self.assigned_on
                .get(&day)
                .map_or(true, |assigned| !assigned.contains(&idx))
        })
    }

    /// Score strictement le plus haut ; à égalité, le premier rencontré.
    fn best_candidate(&self, date: NaiveDate, today: WeekendKind, service_idx: usize) -> Option<usize> {
        let rotation = &self.services[service_idx].rotation;
        let mut best: Option<(usize, i64)> = None;

        for (idx, clinician) in self.pool.members().iter().enumerate() {
            if !self.is_eligible(idx, date) {
                continue;
            }
            let score = scoring::score(
                &clinician.memory,
                self.loads[idx],
                today,
                rotation,
                &self.opts.weights,
            );
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, _)| idx)
    }

    fn commit(&mut self, date: NaiveDate, today: WeekendKind, service_idx: usize, idx: usize) {
        let service = &self.services[service_idx];
        self.loads[idx].record(today.is_weekend());
        self.pool.memory_mut(idx).remember(&service.rotation, today);
        self.assigned_on.entry(date).or_default().push(idx);
        debug!(
            %date,
            service = %service.id,
            clinician = %self.pool.members()[idx].key,
            total = self.loads[idx].total,
            "slot assigned"
        );
    }
}
