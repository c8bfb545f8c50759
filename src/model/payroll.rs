use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What was paid to one seamstress for one month.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRecord {
    pub id: u64,
    pub seamstress_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub bonus_amount: f64,
    pub bonus_note: Option<String>,
    #[schema(example = "partial")]
    pub status: String,
    pub payment_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_by: u64,
}
