use crate::model::{PlanningPeriod, WeekendKind};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Ordre de traitement des services d'une même journée.
///
/// Seule source de non-déterminisme de l'allocation ; l'injecter permet des
/// exécutions reproductibles.
pub trait SlotOrdering {
    /// Réordonne en place les indices de services de `date`.
    fn order(&mut self, date: NaiveDate, services: &mut [usize]);
}

/// Conserve l'ordre de configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedOrder;

impl SlotOrdering for FixedOrder {
    fn order(&mut self, _date: NaiveDate, _services: &mut [usize]) {}
}

/// Mélange les services de chaque jour avec le générateur fourni.
#[derive(Debug, Clone)]
pub struct Shuffled<R> {
    rng: R,
}

impl<R: Rng> Shuffled<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Shuffled<StdRng> {
    /// Graine fixe : même graine, même tableau.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> SlotOrdering for Shuffled<R> {
    fn order(&mut self, _date: NaiveDate, services: &mut [usize]) {
        services.shuffle(&mut self.rng);
    }
}

/// Dates de la période, week-ends d'abord, ordre calendaire dans chaque groupe.
pub fn day_order(period: &PlanningPeriod) -> Vec<NaiveDate> {
    let (mut weekend, weekdays): (Vec<NaiveDate>, Vec<NaiveDate>) = period
        .dates()
        .partition(|d| WeekendKind::of(*d).is_weekend());
    weekend.extend(weekdays);
    weekend
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekends_come_first_in_calendar_order() {
        // vendredi 6 au mercredi 11 décembre 2024
        let period = PlanningPeriod::new(
            NaiveDate::from_ymd_opt(2024, 12, 6).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 11).unwrap(),
        )
        .unwrap();
        let days: Vec<u32> = day_order(&period).iter().map(|d| chrono::Datelike::day(d)).collect();
        assert_eq!(days, vec![7, 8, 6, 9, 10, 11]);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let run = |seed| {
            let mut ordering = Shuffled::seeded(seed);
            (0..20)
                .map(|_| {
                    let mut services = vec![0, 1, 2, 3];
                    ordering.order(date, &mut services);
                    services
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let mut ordering = Shuffled::seeded(7);
        let mut services = vec![0, 1, 2];
        ordering.order(date, &mut services);
        services.sort_unstable();
        assert_eq!(services, vec![0, 1, 2]);
    }
}
