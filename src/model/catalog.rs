use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of `colors` or `sizes`; both tables share this shape.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub created_at: NaiveDateTime,
}
