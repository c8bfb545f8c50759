use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    earnings::{Totals, summarize},
    error::{AppError, AppResult},
    model::{
        job::{Job, JobStatus},
        job_item::{JOB_ITEM_SELECT, JobItem, JobItemWithTotal},
    },
    utils::db_utils::{build_update_sql, execute_update},
};

const JOB_SELECT: &str = r#"
    SELECT id, job_name, notes, status, total_estimated_amount, created_by,
           completed_at, created_at, updated_at
    FROM jobs
"#;

#[derive(Deserialize, IntoParams)]
pub struct JobQuery {
    /// Only jobs in this status
    pub status: Option<JobStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateJob {
    #[schema(example = "School uniforms, batch 3")]
    pub job_name: String,
    pub notes: Option<String>,
    #[schema(example = 2500000.0)]
    pub total_estimated_amount: Option<f64>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_estimated_amount: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct JobDetail {
    pub job: Job,
    pub items: Vec<JobItemWithTotal>,
    pub totals: Totals,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateJobItem {
    #[schema(example = 3)]
    pub operation_id: u64,
    #[schema(example = 12)]
    pub seamstress_id: Option<u64>,
    #[schema(example = "Navy blue")]
    pub color: Option<String>,
    #[schema(example = "M")]
    pub size: Option<String>,
    #[schema(example = 40)]
    pub quantity: u32,
    /// Falls back to the operation's default price
    #[schema(example = 1500.0)]
    pub unit_price: Option<f64>,
    #[schema(example = 0.0)]
    pub bonus_amount: Option<f64>,
    pub bonus_note: Option<String>,
    #[schema(value_type = Option<String>, format = "date", example = "2025-05-14")]
    pub item_date: Option<NaiveDate>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateJobItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seamstress_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date")]
    pub item_date: Option<NaiveDate>,
}

fn check_amounts(unit_price: Option<f64>, bonus_amount: Option<f64>) -> AppResult<()> {
    if unit_price.is_some_and(|p| p < 0.0) {
        return Err(AppError::bad_request("Unit price must not be negative"));
    }
    if bonus_amount.is_some_and(|b| b < 0.0) {
        return Err(AppError::bad_request("Bonus must not be negative"));
    }
    Ok(())
}

async fn fetch_job(pool: &MySqlPool, job_id: u64) -> AppResult<Job> {
    let sql = format!("{JOB_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Job>(&sql)
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Job not found"))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobQuery),
    responses((status = 200, body = [Job]), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn list_jobs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<JobQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let jobs = match query.status {
        Some(status) => {
            let sql = format!("{JOB_SELECT} WHERE status = ? ORDER BY created_at DESC");
            sqlx::query_as::<_, Job>(&sql)
                .bind(status.as_ref())
                .fetch_all(pool.get_ref())
                .await
        }
        None => {
            let sql = format!("{JOB_SELECT} ORDER BY created_at DESC");
            sqlx::query_as::<_, Job>(&sql)
                .fetch_all(pool.get_ref())
                .await
        }
    }
    .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(jobs))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJob,
    responses((status = 201, description = "Job created"), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn create_job(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateJob>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let name = payload.job_name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Job name must not be empty").into());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO jobs (job_name, notes, status, total_estimated_amount, created_by)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(&payload.notes)
    .bind(JobStatus::Open.as_ref())
    .bind(payload.total_estimated_amount)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    info!(job_id = result.last_insert_id(), created_by = auth.user_id, "Job created");

    Ok(HttpResponse::Created().json(json!({
        "message": "Job created successfully",
        "id": result.last_insert_id()
    })))
}

/// The job with every line item and the job-level aggregate.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id", Path, description = "Job ID")),
    responses((status = 200, body = JobDetail), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn get_job(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let job_id = path.into_inner();

    let job = fetch_job(pool.get_ref(), job_id).await?;

    let sql = format!("{JOB_ITEM_SELECT} WHERE ji.job_id = ? ORDER BY ji.created_at, ji.id");
    let items = sqlx::query_as::<_, JobItem>(&sql)
        .bind(job_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    let totals = summarize(&items);
    let items = items.into_iter().map(JobItemWithTotal::from).collect();

    Ok(HttpResponse::Ok().json(JobDetail { job, items, totals }))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    request_body = UpdateJob,
    params(("id", Path, description = "Job ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn update_job(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateJob>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let job_id = path.into_inner();

    if body.job_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::bad_request("Job name must not be empty").into());
    }

    let update = build_update_sql(
        "jobs",
        &*body,
        &["job_name", "notes", "status", "total_estimated_amount"],
        "id",
        job_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Job not found").into());
    }

    // closing stamps completion once; reopening clears it
    if body.status.is_some() {
        sqlx::query(
            r#"
            UPDATE jobs
            SET completed_at = CASE WHEN status = ? THEN COALESCE(completed_at, NOW()) ELSE NULL END
            WHERE id = ?
            "#,
        )
        .bind(JobStatus::Closed.as_ref())
        .bind(job_id)
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Job updated successfully" })))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id", Path, description = "Job ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn delete_job(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let job_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(AppError::from)?;

    sqlx::query("DELETE FROM job_items WHERE job_id = ?")
        .bind(job_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(job_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Job not found").into());
    }

    tx.commit().await.map_err(AppError::from)?;

    info!(job_id, deleted_by = auth.user_id, "Job deleted");

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/items",
    request_body = CreateJobItem,
    params(("id", Path, description = "Job ID")),
    responses((status = 201, description = "Item added"), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn add_job_item(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<CreateJobItem>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let job_id = path.into_inner();

    check_amounts(payload.unit_price, payload.bonus_amount)?;
    fetch_job(pool.get_ref(), job_id).await?;

    let default_price = sqlx::query_scalar::<_, Option<f64>>(
        "SELECT default_price FROM operations WHERE id = ?",
    )
    .bind(payload.operation_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(AppError::from)?
    .ok_or_else(|| AppError::bad_request("Unknown operation"))?;

    let unit_price = payload
        .unit_price
        .or(default_price)
        .ok_or_else(|| AppError::bad_request("Unit price is required for this operation"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO job_items
        (job_id, operation_id, seamstress_id, color, size, quantity, unit_price,
         bonus_amount, bonus_note, item_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(job_id)
    .bind(payload.operation_id)
    .bind(payload.seamstress_id)
    .bind(&payload.color)
    .bind(&payload.size)
    .bind(payload.quantity)
    .bind(unit_price)
    .bind(payload.bonus_amount.unwrap_or(0.0))
    .bind(&payload.bonus_note)
    .bind(payload.item_date)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Item added",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    put,
    path = "/api/job-items/{id}",
    request_body = UpdateJobItem,
    params(("id", Path, description = "Job item ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn update_job_item(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateJobItem>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    check_amounts(body.unit_price, body.bonus_amount)?;

    let update = build_update_sql(
        "job_items",
        &*body,
        &[
            "operation_id",
            "seamstress_id",
            "color",
            "size",
            "quantity",
            "unit_price",
            "bonus_amount",
            "bonus_note",
            "item_date",
        ],
        "id",
        path.into_inner(),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Job item not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Item updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/job-items/{id}",
    params(("id", Path, description = "Job item ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn delete_job_item(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let result = sqlx::query("DELETE FROM job_items WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Job item not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(check_amounts(Some(1500.0), Some(0.0)).is_ok());
        assert!(check_amounts(None, None).is_ok());
        assert!(check_amounts(Some(-1.0), None).is_err());
        assert!(check_amounts(None, Some(-0.5)).is_err());
    }

    #[test]
    fn status_patch_serializes_lowercase() {
        let patch = UpdateJob {
            job_name: None,
            notes: None,
            status: Some(JobStatus::Closed),
            total_estimated_amount: None,
        };
        let update = build_update_sql("jobs", &patch, &["status"], "id", 9).unwrap();
        assert_eq!(update.sql, "UPDATE jobs SET status = ? WHERE id = ?");
        assert_eq!(
            update.values[0],
            crate::utils::db_utils::SqlValue::String("closed".into())
        );
    }
}
