use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Operation {
    pub id: u64,
    pub name: String,
    pub code: Option<String>,
    pub unit: Option<String>,
    pub default_price: Option<f64>,
    pub created_at: NaiveDateTime,
}
