use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::{
        incoming_job::{INCOMING_JOB_SELECT, IncomingJob},
        outgoing_job::OutgoingJob,
    },
    utils::db_utils::{build_update_sql, execute_update},
};

const OUTGOING_SELECT: &str = r#"
    SELECT id, incoming_job_id, date, quantity_sent, notes, created_by, created_at
    FROM outgoing_jobs
"#;

#[derive(Serialize, ToSchema)]
pub struct IncomingJobView {
    #[serde(flatten)]
    pub job: IncomingJob,
    pub remaining: i64,
}

impl From<IncomingJob> for IncomingJobView {
    fn from(job: IncomingJob) -> Self {
        let remaining = job.remaining();
        Self { job, remaining }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateIncomingJob {
    #[schema(example = "Aprons for Hotel Registan")]
    pub job_name: String,
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[schema(example = 300)]
    pub quantity: u32,
    #[serde(default)]
    pub defective_items: u32,
    #[serde(default)]
    pub extra_work: u32,
    #[schema(example = 5000.0)]
    pub client_price_per_unit: Option<f64>,
    #[schema(example = 3000.0)]
    pub worker_cost_per_unit: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateIncomingJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defective_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_work: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_price_per_unit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_cost_per_unit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateOutgoingJob {
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[schema(example = 120)]
    pub quantity_sent: u32,
    pub notes: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateOutgoingJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_sent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub(crate) fn check_rates(client: Option<f64>, worker: Option<f64>) -> AppResult<()> {
    if client.is_some_and(|p| p < 0.0) || worker.is_some_and(|p| p < 0.0) {
        return Err(AppError::bad_request("Prices must not be negative"));
    }
    Ok(())
}

/// Rejects a shipment that would send more than is left.
/// `available` already has any quantity being replaced added back.
fn check_shipment(quantity_sent: u32, available: i64) -> AppResult<()> {
    if quantity_sent == 0 {
        return Err(AppError::bad_request("Quantity sent must be positive"));
    }
    if i64::from(quantity_sent) > available {
        return Err(AppError::bad_request(format!(
            "Cannot send {quantity_sent} items, only {} remaining",
            available.max(0)
        )));
    }
    Ok(())
}

pub(crate) async fn fetch_incoming(pool: &MySqlPool, id: u64) -> AppResult<IncomingJob> {
    let sql = format!("{INCOMING_JOB_SELECT} WHERE ij.id = ?");
    sqlx::query_as::<_, IncomingJob>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Incoming job not found"))
}

pub(crate) async fn fetch_all_incoming(pool: &MySqlPool) -> AppResult<Vec<IncomingJob>> {
    let sql = format!("{INCOMING_JOB_SELECT} ORDER BY ij.date DESC, ij.id DESC");
    Ok(sqlx::query_as::<_, IncomingJob>(&sql).fetch_all(pool).await?)
}

#[utoipa::path(
    get,
    path = "/api/incoming-jobs",
    responses((status = 200, body = [IncomingJobView]), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn list_incoming(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let jobs: Vec<IncomingJobView> = fetch_all_incoming(pool.get_ref())
        .await?
        .into_iter()
        .map(IncomingJobView::from)
        .collect();

    Ok(HttpResponse::Ok().json(jobs))
}

#[utoipa::path(
    post,
    path = "/api/incoming-jobs",
    request_body = CreateIncomingJob,
    responses((status = 201), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn create_incoming(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateIncomingJob>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let name = payload.job_name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Job name must not be empty").into());
    }
    check_rates(payload.client_price_per_unit, payload.worker_cost_per_unit)?;

    let result = sqlx::query(
        r#"
        INSERT INTO incoming_jobs
        (job_name, date, quantity, defective_items, extra_work,
         client_price_per_unit, worker_cost_per_unit, notes, created_by)
        VALUES (?, COALESCE(?, CURDATE()), ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(payload.date)
    .bind(payload.quantity)
    .bind(payload.defective_items)
    .bind(payload.extra_work)
    .bind(payload.client_price_per_unit)
    .bind(payload.worker_cost_per_unit)
    .bind(&payload.notes)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    info!(
        incoming_job_id = result.last_insert_id(),
        quantity = payload.quantity,
        "Incoming job received"
    );

    Ok(HttpResponse::Created().json(json!({
        "message": "Incoming job created",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    get,
    path = "/api/incoming-jobs/{id}",
    params(("id", Path, description = "Incoming job ID")),
    responses((status = 200, body = IncomingJobView), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn get_incoming(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let job = fetch_incoming(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(IncomingJobView::from(job)))
}

#[utoipa::path(
    put,
    path = "/api/incoming-jobs/{id}",
    request_body = UpdateIncomingJob,
    params(("id", Path, description = "Incoming job ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn update_incoming(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateIncomingJob>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let id = path.into_inner();

    check_rates(body.client_price_per_unit, body.worker_cost_per_unit)?;

    if let Some(quantity) = body.quantity {
        let current = fetch_incoming(pool.get_ref(), id).await?;
        if i64::from(quantity) < current.total_sent {
            return Err(AppError::bad_request(format!(
                "Quantity cannot drop below the {} items already sent",
                current.total_sent
            ))
            .into());
        }
    }

    let update = build_update_sql(
        "incoming_jobs",
        &*body,
        &[
            "job_name",
            "date",
            "quantity",
            "defective_items",
            "extra_work",
            "client_price_per_unit",
            "worker_cost_per_unit",
            "notes",
        ],
        "id",
        id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Incoming job not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Incoming job updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/incoming-jobs/{id}",
    params(("id", Path, description = "Incoming job ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn delete_incoming(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let id = path.into_inner();

    let mut tx = pool.begin().await.map_err(AppError::from)?;

    sqlx::query("DELETE FROM outgoing_jobs WHERE incoming_job_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

    let result = sqlx::query("DELETE FROM incoming_jobs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Incoming job not found").into());
    }

    tx.commit().await.map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/incoming-jobs/{id}/outgoing",
    params(("id", Path, description = "Incoming job ID")),
    responses((status = 200, body = [OutgoingJob]), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn list_outgoing(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let id = path.into_inner();

    fetch_incoming(pool.get_ref(), id).await?;

    let sql = format!("{OUTGOING_SELECT} WHERE incoming_job_id = ? ORDER BY date, id");
    let rows = sqlx::query_as::<_, OutgoingJob>(&sql)
        .bind(id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    post,
    path = "/api/incoming-jobs/{id}/outgoing",
    request_body = CreateOutgoingJob,
    params(("id", Path, description = "Incoming job ID")),
    responses(
        (status = 201, description = "Shipment recorded"),
        (status = 400, description = "More than remaining"),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn create_outgoing(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<CreateOutgoingJob>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let incoming_id = path.into_inner();

    let incoming = fetch_incoming(pool.get_ref(), incoming_id).await?;
    check_shipment(payload.quantity_sent, incoming.remaining())?;

    let result = sqlx::query(
        r#"
        INSERT INTO outgoing_jobs (incoming_job_id, date, quantity_sent, notes, created_by)
        VALUES (?, COALESCE(?, CURDATE()), ?, ?, ?)
        "#,
    )
    .bind(incoming_id)
    .bind(payload.date)
    .bind(payload.quantity_sent)
    .bind(&payload.notes)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Shipment recorded",
        "id": result.last_insert_id(),
        "remaining": incoming.remaining() - i64::from(payload.quantity_sent)
    })))
}

#[utoipa::path(
    put,
    path = "/api/outgoing-jobs/{id}",
    request_body = UpdateOutgoingJob,
    params(("id", Path, description = "Outgoing job ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn update_outgoing(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateOutgoingJob>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    let id = path.into_inner();

    if let Some(quantity_sent) = body.quantity_sent {
        let (incoming_id, previous) = sqlx::query_as::<_, (u64, u32)>(
            "SELECT incoming_job_id, quantity_sent FROM outgoing_jobs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Outgoing job not found"))?;

        let incoming = fetch_incoming(pool.get_ref(), incoming_id).await?;
        check_shipment(quantity_sent, incoming.remaining() + i64::from(previous))?;
    }

    let update = build_update_sql(
        "outgoing_jobs",
        &*body,
        &["date", "quantity_sent", "notes"],
        "id",
        id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Outgoing job not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Shipment updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/outgoing-jobs/{id}",
    params(("id", Path, description = "Outgoing job ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Incoming/Outgoing"
)]
pub async fn delete_outgoing(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let result = sqlx::query("DELETE FROM outgoing_jobs WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Outgoing job not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipment_within_remaining() {
        assert!(check_shipment(50, 50).is_ok());
        assert!(check_shipment(51, 50).is_err());
        assert!(check_shipment(0, 50).is_err());
    }

    #[test]
    fn editing_a_shipment_counts_its_old_quantity_back() {
        // 100 received, 80 sent of which this shipment is 30
        let remaining = 20;
        assert!(check_shipment(50, remaining + 30).is_ok());
        assert!(check_shipment(51, remaining + 30).is_err());
    }

    #[test]
    fn negative_rates_rejected() {
        assert!(check_rates(Some(5000.0), Some(3000.0)).is_ok());
        assert!(check_rates(Some(-1.0), None).is_err());
    }
}
