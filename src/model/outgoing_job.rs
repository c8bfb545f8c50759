use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A partial shipment of an incoming job.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OutgoingJob {
    pub id: u64,
    pub incoming_job_id: u64,
    pub date: NaiveDate,
    pub quantity_sent: u32,
    pub notes: Option<String>,
    pub created_by: u64,
    pub created_at: NaiveDateTime,
}
