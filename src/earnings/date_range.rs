use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;
use utoipa::IntoParams;

/// Items that fall on a calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Inclusive `[start, end]` window; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
pub struct DateRange {
    /// Earliest date to include (YYYY-MM-DD)
    pub start: Option<NaiveDate>,
    /// Latest date to include (YYYY-MM-DD)
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// First to last day of a calendar month. `None` for an invalid month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self::new(Some(first), Some(last)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn filter<T: Dated>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_unbounded() {
            return items;
        }
        items.into_iter().filter(|i| self.contains(i.date())).collect()
    }
}

/// `(year, month)` pairs for the `count` months ending at the given one, oldest first.
pub fn trailing_months(year: i32, month: u32, count: u32) -> Vec<(i32, u32)> {
    let Some(anchor) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    (0..count)
        .rev()
        .filter_map(|back| anchor.checked_sub_months(Months::new(back)))
        .map(|d| (d.year(), d.month()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shift(NaiveDate);

    impl Dated for Shift {
        fn date(&self) -> NaiveDate {
            self.0
        }
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn shifts() -> Vec<Shift> {
        vec![Shift(d(1, 31)), Shift(d(2, 1)), Shift(d(2, 14)), Shift(d(2, 28))]
    }

    #[test]
    fn unbounded_keeps_everything() {
        let kept = DateRange::default().filter(shifts());
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn start_only_drops_earlier_days() {
        let kept = DateRange::new(Some(d(2, 1)), None).filter(shifts());
        let days: Vec<NaiveDate> = kept.iter().map(|s| s.0).collect();
        assert_eq!(days, vec![d(2, 1), d(2, 14), d(2, 28)]);
    }

    #[test]
    fn both_endpoints_are_inclusive() {
        let range = DateRange::new(Some(d(2, 1)), Some(d(2, 14)));
        assert!(range.contains(d(2, 1)));
        assert!(range.contains(d(2, 14)));
        assert!(!range.contains(d(1, 31)));
        assert!(!range.contains(d(2, 15)));
        assert_eq!(range.filter(shifts()).len(), 2);
    }

    #[test]
    fn month_window() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.start, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(feb.end, NaiveDate::from_ymd_opt(2024, 2, 29));
        let dec = DateRange::month(2025, 12).unwrap();
        assert_eq!(dec.end, NaiveDate::from_ymd_opt(2025, 12, 31));
        assert!(DateRange::month(2025, 13).is_none());
        assert!(DateRange::month(2025, 0).is_none());
    }

    #[test]
    fn trailing_months_cross_year_boundary() {
        assert_eq!(
            trailing_months(2025, 2, 4),
            vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]
        );
        assert_eq!(trailing_months(2025, 6, 1), vec![(2025, 6)]);
        assert!(trailing_months(2025, 13, 6).is_empty());
    }
}
