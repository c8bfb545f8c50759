use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::earnings::{Dated, LineValue};

/// One piece of work on a job, joined with the names the views show.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct JobItem {
    pub id: u64,
    pub job_id: u64,
    pub job_name: Option<String>,
    pub operation_id: u64,
    pub operation_name: Option<String>,
    pub seamstress_id: Option<u64>,
    pub seamstress_name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    pub bonus_amount: f64,
    pub bonus_note: Option<String>,
    pub item_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

/// Column list matching [`JobItem`]; callers append `WHERE`/`ORDER BY`.
pub const JOB_ITEM_SELECT: &str = r#"
    SELECT ji.id, ji.job_id, j.job_name, ji.operation_id, o.name AS operation_name,
           ji.seamstress_id, u.full_name AS seamstress_name, ji.color, ji.size,
           ji.quantity, ji.unit_price, ji.bonus_amount, ji.bonus_note,
           ji.item_date, ji.created_at
    FROM job_items ji
    LEFT JOIN jobs j ON j.id = ji.job_id
    LEFT JOIN operations o ON o.id = ji.operation_id
    LEFT JOIN users u ON u.id = ji.seamstress_id
"#;

/// SQL expression for the day an item counts towards.
pub const JOB_ITEM_DAY: &str = "COALESCE(ji.item_date, DATE(ji.created_at))";

impl LineValue for JobItem {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn bonus_amount(&self) -> f64 {
        self.bonus_amount
    }
}

impl Dated for JobItem {
    fn date(&self) -> NaiveDate {
        self.item_date.unwrap_or_else(|| self.created_at.date())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobItemWithTotal {
    #[serde(flatten)]
    pub item: JobItem,
    pub total: f64,
}

impl From<JobItem> for JobItemWithTotal {
    fn from(item: JobItem) -> Self {
        let total = item.value();
        Self { item, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(item_date: Option<NaiveDate>) -> JobItem {
        JobItem {
            id: 1,
            job_id: 7,
            job_name: Some("Shirts".into()),
            operation_id: 3,
            operation_name: Some("Collar".into()),
            seamstress_id: Some(12),
            seamstress_name: Some("Dilnoza".into()),
            color: None,
            size: Some("M".into()),
            quantity: 1,
            unit_price: 500.0,
            bonus_amount: 200.0,
            bonus_note: Some("rush".into()),
            item_date,
            created_at: NaiveDate::from_ymd_opt(2025, 4, 30)
                .unwrap()
                .and_hms_opt(23, 10, 0)
                .unwrap(),
        }
    }

    #[test]
    fn explicit_item_date_wins() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        assert_eq!(sample(Some(day)).date(), day);
        assert_eq!(
            sample(None).date(),
            NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
        );
    }

    #[test]
    fn total_carries_bonus() {
        let row = JobItemWithTotal::from(sample(None));
        assert_eq!(row.total, 700.0);
    }
}
