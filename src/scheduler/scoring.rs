use super::ScoringWeights;
use crate::identity::normalize_name;
use crate::model::{ClinicianMemory, LoadCounters, WeekendKind};

/// Score d'un candidat éligible pour un créneau du jour `today` relevant de
/// la rotation `rotation`.
pub fn score(
    memory: &ClinicianMemory,
    load: LoadCounters,
    today: WeekendKind,
    rotation: &str,
    weights: &ScoringWeights,
) -> i64 {
    let mut score = weights.base - i64::from(load.total) * weights.per_assignment;

    if today.is_weekend() {
        score -= i64::from(load.weekend) * weights.per_weekend_assignment;
        score += weekend_adjustment(memory.last_weekend, today, weights);
    }

    score += match memory.last_service.as_deref() {
        Some(last) if same_rotation(last, rotation) => -weights.continuity_penalty,
        _ => weights.rotation_bonus,
    };
    score
}

fn weekend_adjustment(last: WeekendKind, today: WeekendKind, weights: &ScoringWeights) -> i64 {
    use WeekendKind::{Saturday, Sunday};
    match (last, today) {
        (Saturday, Sunday) | (Sunday, Saturday) => weights.alternation_bonus,
        (Saturday, Saturday) => -weights.repeat_saturday_penalty,
        (Sunday, Sunday) => -weights.repeat_sunday_penalty,
        _ => 0,
    }
}

pub(super) fn same_rotation(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
