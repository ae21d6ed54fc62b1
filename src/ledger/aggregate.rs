//! Pure day-bucketed totals over a ledger snapshot. All grouping uses UTC
//! calendar dates; mixing zones would shift bucket boundaries.

use time::{Date, Duration, OffsetDateTime, UtcOffset};

use super::meal::Meal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTotals {
    pub calories: u64,
    pub protein_g: u64,
}

/// Calendar-date bucket key (`YYYY-MM-DD`) of an instant, in UTC.
pub fn day_key(instant: OffsetDateTime) -> String {
    format_day(instant.to_offset(UtcOffset::UTC).date())
}

/// Sums calories and protein over the meals logged on `day`. An empty match
/// set yields zero totals.
pub fn totals_for_day(meals: &[Meal], day: &str) -> DayTotals {
    meals
        .iter()
        .filter(|m| day_key(m.logged_at) == day)
        .fold(DayTotals::default(), |mut acc, m| {
            acc.calories += u64::from(m.calories);
            acc.protein_g += u64::from(m.protein_g);
            acc
        })
}

/// The `n` day keys ending at `reference`'s date, today first, walking
/// backward one calendar day at a time. `n = 0` yields an empty sequence.
pub fn last_n_days(n: usize, reference: OffsetDateTime) -> Vec<String> {
    let today = reference.to_offset(UtcOffset::UTC).date();
    (0..n)
        .map(|i| format_day(today - Duration::days(i as i64)))
        .collect()
}

/// Totals across a set of days. Days are expected unique; duplicates would
/// double-count.
pub fn range_totals(meals: &[Meal], days: &[String]) -> DayTotals {
    days.iter().fold(DayTotals::default(), |mut acc, day| {
        let t = totals_for_day(meals, day);
        acc.calories += t.calories;
        acc.protein_g += t.protein_g;
        acc
    })
}

fn format_day(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
