use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::earnings::Dated;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub user_id: u64,
    pub full_name: Option<String>,
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, example = "08:30:00")]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:05:00")]
    pub time_out: Option<NaiveTime>,
    pub job_id: Option<u64>,
    pub notes: Option<String>,
}

impl Dated for Attendance {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
