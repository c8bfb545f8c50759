use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub daily: f64,
    pub cumulative: f64,
}

/// Running total over `days`, which must already be in chronological order.
/// Days where nothing was earned and nothing has accumulated yet are dropped.
pub fn growth_series<I>(days: I) -> Vec<GrowthPoint>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut cumulative = 0.0;
    days.into_iter()
        .map(|(date, daily)| {
            cumulative += daily;
            GrowthPoint {
                date,
                daily,
                cumulative,
            }
        })
        .filter(|p| p.daily > 0.0 || p.cumulative > 0.0)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    /// Short label such as `Mar 2025`
    pub label: String,
    pub total: f64,
    pub paid: f64,
}

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_label(year: i32, month: u32) -> String {
    let name = month
        .checked_sub(1)
        .and_then(|i| MONTH_LABELS.get(i as usize))
        .copied()
        .unwrap_or("?");
    format!("{name} {year}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    #[test]
    fn cumulative_is_running_sum() {
        let points = growth_series(vec![(d(1), 100.0), (d(2), 0.0), (d(3), 250.0)]);
        let cumulative: Vec<f64> = points.iter().map(|p| p.cumulative).collect();
        assert_eq!(cumulative, vec![100.0, 100.0, 350.0]);
    }

    #[test]
    fn leading_empty_days_are_dropped() {
        let points = growth_series(vec![(d(1), 0.0), (d(2), 0.0), (d(3), 40.0), (d(4), 0.0)]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d(3));
        assert_eq!(points[1].daily, 0.0);
        assert_eq!(points[1].cumulative, 40.0);
    }

    #[test]
    fn labels() {
        assert_eq!(month_label(2025, 1), "Jan 2025");
        assert_eq!(month_label(2024, 12), "Dec 2024");
        assert_eq!(month_label(2024, 0), "? 2024");
        assert_eq!(month_label(2024, 13), "? 2024");
    }
}
