//! Read-only views over job items: a seamstress's own earnings, the staff
//! report, and the role-dependent dashboard.

use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    earnings::{Aggregation, DateRange, Totals, summarize},
    error::{AppError, AppResult},
    model::{
        job::JobStatus,
        job_item::{JOB_ITEM_DAY, JOB_ITEM_SELECT, JobItem, JobItemWithTotal},
        role::Role,
    },
};

#[derive(Deserialize, IntoParams)]
pub struct EarningsQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// One seamstress's totals, named.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WorkerTotals {
    pub seamstress_id: u64,
    pub seamstress_name: Option<String>,
    #[serde(flatten)]
    pub totals: Totals,
}

#[derive(Serialize, ToSchema)]
pub struct MyEarnings {
    pub items: Vec<JobItemWithTotal>,
    pub totals: Totals,
}

#[derive(Serialize, ToSchema)]
pub struct Report {
    pub total_jobs: i64,
    pub active_seamstresses: i64,
    pub total_earnings: f64,
    pub total_items: u64,
    pub average_per_item: f64,
    pub workers: Vec<WorkerTotals>,
}

impl Report {
    /// Totals cover assigned items only, so they match the worker rows.
    fn new(total_jobs: i64, active_seamstresses: i64, items: &[JobItem]) -> Self {
        let all = summarize(items.iter().filter(|i| i.seamstress_id.is_some()));
        Self {
            total_jobs,
            active_seamstresses,
            total_earnings: all.total_value,
            total_items: all.count,
            average_per_item: all.average(),
            workers: rank_workers(items),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct SeamstressDashboard {
    pub item_count: u64,
    pub total_earnings: f64,
    pub checked_in_today: bool,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct StaffDashboard {
    pub total_jobs: i64,
    pub open_jobs: i64,
    pub items_today: i64,
    pub items_yesterday: i64,
    /// `items_today - items_yesterday`
    pub difference: i64,
}

impl StaffDashboard {
    fn new(total_jobs: i64, open_jobs: i64, items_today: i64, items_yesterday: i64) -> Self {
        Self {
            total_jobs,
            open_jobs,
            items_today,
            items_yesterday,
            difference: items_today - items_yesterday,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum Dashboard {
    Seamstress(SeamstressDashboard),
    Staff(StaffDashboard),
}

/// Assigned job items in the window, newest first, optionally for one
/// seamstress. Bounds are compared against the item's effective day.
pub(crate) async fn fetch_items(
    pool: &MySqlPool,
    seamstress_id: Option<u64>,
    range: DateRange,
) -> AppResult<Vec<JobItem>> {
    let sql = format!(
        r#"{JOB_ITEM_SELECT}
        WHERE ji.seamstress_id IS NOT NULL
          AND (? IS NULL OR ji.seamstress_id = ?)
          AND (? IS NULL OR {JOB_ITEM_DAY} >= ?)
          AND (? IS NULL OR {JOB_ITEM_DAY} <= ?)
        ORDER BY ji.created_at DESC, ji.id DESC"#
    );
    let items = sqlx::query_as::<_, JobItem>(&sql)
        .bind(seamstress_id)
        .bind(seamstress_id)
        .bind(range.start)
        .bind(range.start)
        .bind(range.end)
        .bind(range.end)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

/// Per-seamstress totals, highest earner first. Unassigned items are left out.
pub(crate) fn rank_workers(items: &[JobItem]) -> Vec<WorkerTotals> {
    let names: HashMap<u64, &str> = items
        .iter()
        .filter_map(|i| Some((i.seamstress_id?, i.seamstress_name.as_deref()?)))
        .collect();

    Aggregation::build(items, |i: &JobItem| i.seamstress_id)
        .ranked()
        .into_iter()
        .map(|g| WorkerTotals {
            seamstress_id: g.key,
            seamstress_name: names.get(&g.key).map(|n| n.to_string()),
            totals: g.totals,
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/earnings/me",
    params(EarningsQuery),
    responses((status = 200, body = MyEarnings), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Earnings"
)]
pub async fn my_earnings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EarningsQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_seamstress()?;

    let items = fetch_items(pool.get_ref(), Some(auth.user_id), DateRange::default()).await?;
    let items = DateRange::new(query.start, query.end).filter(items);

    let totals = summarize(&items);
    let items = items.into_iter().map(JobItemWithTotal::from).collect();

    Ok(HttpResponse::Ok().json(MyEarnings { items, totals }))
}

#[utoipa::path(
    get,
    path = "/api/reports",
    params(EarningsQuery),
    responses((status = 200, body = Report), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Earnings"
)]
pub async fn reports(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EarningsQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let total_jobs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    let active_seamstresses = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE role = ? AND is_active = TRUE",
    )
    .bind(Role::Seamstress.as_ref())
    .fetch_one(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    let range = DateRange::new(query.start, query.end);
    let items = fetch_items(pool.get_ref(), None, range).await?;

    Ok(HttpResponse::Ok().json(Report::new(total_jobs, active_seamstresses, &items)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, body = Dashboard)),
    security(("bearer_auth" = [])),
    tag = "Earnings"
)]
pub async fn dashboard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let pool = pool.get_ref();

    let view = if auth.is_seamstress() {
        let items = fetch_items(pool, Some(auth.user_id), DateRange::default()).await?;
        let totals = summarize(&items);

        let checked_in = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM attendance WHERE user_id = ? AND date = CURDATE())",
        )
        .bind(auth.user_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

        Dashboard::Seamstress(SeamstressDashboard {
            item_count: totals.count,
            total_earnings: totals.total_value,
            checked_in_today: checked_in != 0,
        })
    } else {
        let (total_jobs, open_jobs) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), CAST(COALESCE(SUM(status = ?), 0) AS SIGNED) FROM jobs",
        )
        .bind(JobStatus::Open.as_ref())
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

        let day_sql = format!(
            r#"
            SELECT CAST(COALESCE(SUM({JOB_ITEM_DAY} = CURDATE()), 0) AS SIGNED),
                   CAST(COALESCE(SUM({JOB_ITEM_DAY} = CURDATE() - INTERVAL 1 DAY), 0) AS SIGNED)
            FROM job_items ji
            "#
        );
        let (today, yesterday) = sqlx::query_as::<_, (i64, i64)>(&day_sql)
            .fetch_one(pool)
            .await
            .map_err(AppError::from)?;

        Dashboard::Staff(StaffDashboard::new(total_jobs, open_jobs, today, yesterday))
    };

    Ok(HttpResponse::Ok().json(view))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn item(
        id: u64,
        seamstress: Option<(u64, &str)>,
        quantity: u32,
        unit_price: f64,
        bonus: f64,
        day: u32,
    ) -> JobItem {
        let date = NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        JobItem {
            id,
            job_id: 1,
            job_name: Some("Uniforms".into()),
            operation_id: 1,
            operation_name: Some("Sleeve".into()),
            seamstress_id: seamstress.map(|s| s.0),
            seamstress_name: seamstress.map(|s| s.1.to_string()),
            color: None,
            size: None,
            quantity,
            unit_price,
            bonus_amount: bonus,
            bonus_note: None,
            item_date: None,
            created_at: date.and_hms_opt(12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn workers_are_ranked_and_named() {
        let a = Some((1, "Aziza"));
        let b = Some((2, "Barno"));
        let items = vec![
            item(1, a, 2, 1000.0, 0.0, 1),
            item(2, a, 1, 500.0, 200.0, 2),
            item(3, a, 3, 300.0, 0.0, 3),
            item(4, b, 10, 500.0, 0.0, 3),
            item(5, None, 99, 99.0, 0.0, 3),
        ];

        let ranked = rank_workers(&items);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].seamstress_id, 2);
        assert_eq!(ranked[0].totals.total_value, 5000.0);
        assert_eq!(ranked[1].seamstress_name.as_deref(), Some("Aziza"));
        assert_eq!(ranked[1].totals.total_value, 3600.0);
        assert_eq!(ranked[1].totals.count, 3);
    }

    #[test]
    fn report_totals_match_worker_rows() {
        let items = vec![
            item(1, Some((1, "Aziza")), 2, 1000.0, 0.0, 3),
            item(2, None, 10, 100.0, 0.0, 3),
        ];

        let report = Report::new(5, 1, &items);
        let workers: f64 = report.workers.iter().map(|w| w.totals.total_value).sum();
        assert_eq!(report.total_earnings, 2000.0);
        assert_eq!(report.total_earnings, workers);
        assert_eq!(report.total_items, 1);
        assert_eq!(report.average_per_item, 2000.0);
    }

    #[test]
    fn staff_dashboard_difference() {
        let d = StaffDashboard::new(12, 4, 7, 10);
        assert_eq!(d.difference, -3);
    }

    #[test]
    fn untagged_dashboard_serializes_flat() {
        let value = serde_json::to_value(Dashboard::Seamstress(SeamstressDashboard {
            item_count: 3,
            total_earnings: 3600.0,
            checked_in_today: true,
        }))
        .unwrap();
        assert_eq!(value["item_count"], 3);
        assert_eq!(value["checked_in_today"], true);
    }
}
