use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::earnings::Dated;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Expense {
    pub id: u64,
    pub expense_name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub created_by: u64,
    pub created_at: NaiveDateTime,
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.expense_date
    }
}
