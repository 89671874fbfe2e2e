use chrono::{Duration, NaiveDate};

/// Dates à moins de `rest_days` jours de `date`, `date` incluse.
pub(super) fn rest_window(date: NaiveDate, rest_days: u32) -> impl Iterator<Item = NaiveDate> {
    let rest = i64::from(rest_days);
    (-rest..=rest).filter_map(move |offset| date.checked_add_signed(Duration::days(offset)))
}

/// Vrai si deux gardes distinctes sont trop rapprochées pour le repos exigé.
pub(super) fn violates_rest(a: NaiveDate, b: NaiveDate, rest_days: u32) -> bool {
    let gap = (b - a).num_days().abs();
    gap > 0 && gap <= i64::from(rest_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    #[test]
    fn window_spans_both_sides() {
        let window: Vec<NaiveDate> = rest_window(day(10), 1).collect();
        assert_eq!(window, vec![day(9), day(10), day(11)]);
        assert_eq!(rest_window(day(10), 0).count(), 1);
    }

    #[test]
    fn rest_is_symmetric() {
        assert!(violates_rest(day(10), day(11), 1));
        assert!(violates_rest(day(11), day(10), 1));
        assert!(!violates_rest(day(10), day(12), 1));
        assert!(!violates_rest(day(10), day(10), 1));
    }
}
