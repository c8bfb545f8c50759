use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::earnings::{Dated, JobRates};

/// Bulk work received from a client, with how much of it has been shipped back.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct IncomingJob {
    pub id: u64,
    pub job_name: String,
    pub date: NaiveDate,
    pub quantity: u32,
    pub defective_items: u32,
    pub extra_work: u32,
    pub client_price_per_unit: Option<f64>,
    pub worker_cost_per_unit: Option<f64>,
    pub notes: Option<String>,
    pub created_by: u64,
    pub created_at: NaiveDateTime,
    /// Sum of `outgoing_jobs.quantity_sent`
    pub total_sent: i64,
}

/// Column list matching [`IncomingJob`], including the shipped total.
pub const INCOMING_JOB_SELECT: &str = r#"
    SELECT ij.id, ij.job_name, ij.date, ij.quantity, ij.defective_items, ij.extra_work,
           ij.client_price_per_unit, ij.worker_cost_per_unit, ij.notes, ij.created_by,
           ij.created_at,
           CAST(COALESCE((SELECT SUM(og.quantity_sent) FROM outgoing_jobs og
                          WHERE og.incoming_job_id = ij.id), 0) AS SIGNED) AS total_sent
    FROM incoming_jobs ij
"#;

impl IncomingJob {
    /// Units still in the workshop. Negative only if data was edited by hand.
    pub fn remaining(&self) -> i64 {
        i64::from(self.quantity) - self.total_sent
    }
}

impl JobRates for IncomingJob {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn client_price(&self) -> Option<f64> {
        self.client_price_per_unit
    }

    fn worker_cost(&self) -> Option<f64> {
        self.worker_cost_per_unit
    }
}

impl Dated for IncomingJob {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
