use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{
    api::incoming_jobs::{check_rates, fetch_all_incoming},
    auth::auth::AuthUser,
    earnings::{JobProfit, ProfitSummary, summarize_profit},
    error::AppError,
    model::incoming_job::IncomingJob,
    utils::db_utils::{build_update_sql, execute_update},
};

#[derive(Serialize, ToSchema)]
pub struct RevenueRow {
    #[serde(flatten)]
    pub job: IncomingJob,
    pub profit: JobProfit,
}

#[derive(Serialize, ToSchema)]
pub struct RevenueReport {
    pub jobs: Vec<RevenueRow>,
    pub summary: ProfitSummary,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateRates {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 5000.0)]
    pub client_price_per_unit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 3000.0)]
    pub worker_cost_per_unit: Option<f64>,
}

pub(crate) fn revenue_report(jobs: Vec<IncomingJob>) -> RevenueReport {
    let summary = summarize_profit(&jobs);
    let jobs = jobs
        .into_iter()
        .map(|job| RevenueRow {
            profit: JobProfit::of(&job),
            job,
        })
        .collect();
    RevenueReport { jobs, summary }
}

/// Per-job margins over all incoming work, with the admin profit summary.
#[utoipa::path(
    get,
    path = "/api/revenue",
    responses((status = 200, body = RevenueReport), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Revenue"
)]
pub async fn get_revenue(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let jobs = fetch_all_incoming(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(revenue_report(jobs)))
}

#[utoipa::path(
    put,
    path = "/api/revenue/{id}/rates",
    request_body = UpdateRates,
    params(("id", Path, description = "Incoming job ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Revenue"
)]
pub async fn update_rates(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateRates>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    check_rates(body.client_price_per_unit, body.worker_cost_per_unit)?;

    let update = build_update_sql(
        "incoming_jobs",
        &*body,
        &["client_price_per_unit", "worker_cost_per_unit"],
        "id",
        path.into_inner(),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Incoming job not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Rates updated" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn incoming(id: u64, quantity: u32, client: Option<f64>, worker: Option<f64>) -> IncomingJob {
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        IncomingJob {
            id,
            job_name: format!("Batch {id}"),
            date: day,
            quantity,
            defective_items: 0,
            extra_work: 0,
            client_price_per_unit: client,
            worker_cost_per_unit: worker,
            notes: None,
            created_by: 1,
            created_at: day.and_hms_opt(10, 0, 0).unwrap(),
            total_sent: 0,
        }
    }

    #[test]
    fn report_rows_and_summary_agree() {
        let report = revenue_report(vec![
            incoming(1, 100, Some(5000.0), Some(3000.0)),
            incoming(2, 10, None, Some(200.0)),
        ]);
        assert_eq!(report.jobs[0].profit.profit, 200_000.0);
        assert_eq!(report.jobs[1].profit.profit, -2_000.0);
        assert_eq!(report.summary.total_quantity, 110);
        assert_eq!(report.summary.admin_profit, 198_000.0);
    }
}
