//! Monthly payroll: per-seamstress earnings for a calendar month merged with
//! what has been paid, plus the daily, growth and trend breakdowns.

use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::earnings::{WorkerTotals, fetch_items, rank_workers},
    auth::auth::AuthUser,
    earnings::{
        Aggregation, DateRange, Dated, GrowthPoint, LineValue, PayrollStatus, Totals, TrendPoint,
        growth_series, month_label, summarize, trailing_months,
    },
    error::{AppError, AppResult},
    model::{
        job_item::{JobItem, JobItemWithTotal},
        payroll::PayrollRecord,
    },
    utils::csv_export::to_csv_bytes,
};

const RECORD_SELECT: &str = r#"
    SELECT id, seamstress_id, month, year, total_amount, paid_amount, bonus_amount,
           bonus_note, status, payment_date, notes, created_by
    FROM payroll_records
"#;

const DEFAULT_TREND_MONTHS: u32 = 6;
const MAX_TREND_MONTHS: u32 = 24;

#[derive(Deserialize, IntoParams)]
pub struct PeriodQuery {
    #[param(example = 2025)]
    pub year: i32,
    #[param(example = 5)]
    pub month: u32,
}

impl PeriodQuery {
    fn range(&self) -> AppResult<DateRange> {
        month_range(self.year, self.month)
    }
}

#[derive(Deserialize, IntoParams)]
pub struct WorkerPeriodQuery {
    pub year: i32,
    pub month: u32,
    pub seamstress_id: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct TrendQuery {
    pub year: i32,
    pub month: u32,
    /// How many months back to include, counting the given one (default 6)
    pub months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollRow {
    pub seamstress_id: u64,
    pub seamstress_name: Option<String>,
    #[serde(flatten)]
    pub totals: Totals,
    pub record_id: Option<u64>,
    pub paid_amount: f64,
    pub bonus_amount: f64,
    pub bonus_note: Option<String>,
    pub status: PayrollStatus,
    #[schema(value_type = Option<String>)]
    pub payment_date: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub paid: usize,
    pub partial: usize,
    pub unpaid: usize,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct PayrollSummary {
    pub worker_count: usize,
    pub total_earnings: f64,
    /// Paid amounts including bonuses
    pub total_paid: f64,
    pub outstanding: f64,
    pub total_items: u64,
    pub average_per_worker: f64,
    pub status_counts: StatusCounts,
}

#[derive(Serialize, ToSchema)]
pub struct MonthlyPayroll {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<PayrollRow>,
    pub summary: PayrollSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayBreakdown {
    pub date: NaiveDate,
    pub totals: Totals,
    pub workers: Vec<WorkerTotals>,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollDetails {
    pub items: Vec<JobItemWithTotal>,
    pub totals: Totals,
    pub record: Option<PayrollRecord>,
}

#[derive(Deserialize, ToSchema)]
pub struct PaymentRequest {
    #[schema(example = 12)]
    pub seamstress_id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 5)]
    pub month: u32,
    #[schema(example = 3000.0)]
    pub paid_amount: f64,
    #[serde(default)]
    #[schema(example = 600.0)]
    pub bonus_amount: f64,
    pub bonus_note: Option<String>,
    pub notes: Option<String>,
}

fn month_range(year: i32, month: u32) -> AppResult<DateRange> {
    DateRange::month(year, month).ok_or_else(|| AppError::bad_request("Invalid year or month"))
}

fn validate_payment(req: &PaymentRequest) -> AppResult<()> {
    if req.paid_amount < 0.0 || req.bonus_amount < 0.0 {
        return Err(AppError::bad_request("Amounts must not be negative"));
    }
    if !req.paid_amount.is_finite() || !req.bonus_amount.is_finite() {
        return Err(AppError::bad_request("Amounts must be numbers"));
    }
    Ok(())
}

/// Ranked worker totals joined with the month's payroll records.
/// Status is resolved against the freshly computed total, not the stored one.
pub(crate) fn merge_records(
    workers: Vec<WorkerTotals>,
    records: &[PayrollRecord],
) -> Vec<PayrollRow> {
    let by_worker: HashMap<u64, &PayrollRecord> =
        records.iter().map(|r| (r.seamstress_id, r)).collect();

    workers
        .into_iter()
        .map(|w| {
            let record = by_worker.get(&w.seamstress_id);
            let paid_amount = record.map_or(0.0, |r| r.paid_amount);
            let bonus_amount = record.map_or(0.0, |r| r.bonus_amount);
            PayrollRow {
                seamstress_id: w.seamstress_id,
                seamstress_name: w.seamstress_name,
                record_id: record.map(|r| r.id),
                paid_amount,
                bonus_amount,
                bonus_note: record.and_then(|r| r.bonus_note.clone()),
                status: PayrollStatus::resolve(w.totals.total_value, paid_amount, bonus_amount),
                payment_date: record.and_then(|r| r.payment_date),
                totals: w.totals,
            }
        })
        .collect()
}

pub(crate) fn summarize_rows(rows: &[PayrollRow]) -> PayrollSummary {
    let mut summary = rows.iter().fold(PayrollSummary::default(), |mut acc, row| {
        let settled = row.paid_amount + row.bonus_amount;
        acc.total_earnings += row.totals.total_value;
        acc.total_paid += settled;
        acc.outstanding += (row.totals.total_value - settled).max(0.0);
        acc.total_items += row.totals.count;
        match row.status {
            PayrollStatus::Paid => acc.status_counts.paid += 1,
            PayrollStatus::Partial => acc.status_counts.partial += 1,
            PayrollStatus::Unpaid => acc.status_counts.unpaid += 1,
        }
        acc
    });
    summary.worker_count = rows.len();
    summary.average_per_worker = if rows.is_empty() {
        0.0
    } else {
        summary.total_earnings / rows.len() as f64
    };
    summary
}

/// Effective day of an assigned item; unassigned items belong to no day.
fn worker_day(item: &JobItem) -> Option<NaiveDate> {
    item.seamstress_id.map(|_| item.date())
}

/// Days in ascending order, each with its seamstresses ranked by earnings.
pub(crate) fn daily_breakdown(items: Vec<JobItem>) -> Vec<DayBreakdown> {
    let days = Aggregation::build(&items, worker_day);

    let mut per_day: HashMap<NaiveDate, Vec<JobItem>> = HashMap::new();
    for item in items.into_iter().filter(|i| i.seamstress_id.is_some()) {
        per_day.entry(item.date()).or_default().push(item);
    }

    days.chronological()
        .into_iter()
        .map(|g| DayBreakdown {
            workers: per_day
                .get(&g.key)
                .map(|day_items| rank_workers(day_items))
                .unwrap_or_default(),
            date: g.key,
            totals: g.totals,
        })
        .collect()
}

/// Daily and running earnings for each day that has items.
pub(crate) fn month_growth(items: &[JobItem]) -> Vec<GrowthPoint> {
    let days = Aggregation::build(items, worker_day);

    growth_series(
        days.chronological()
            .into_iter()
            .map(|g| (g.key, g.totals.total_value)),
    )
}

/// Earned vs paid for each of `months`.
pub(crate) fn monthly_trend(
    months: &[(i32, u32)],
    items: &[JobItem],
    records: &[PayrollRecord],
) -> Vec<TrendPoint> {
    let earned = Aggregation::build(items, |i: &JobItem| {
        worker_day(i).map(|d| (d.year(), d.month()))
    });

    let mut paid: HashMap<(i32, u32), f64> = HashMap::new();
    for r in records {
        *paid.entry((r.year, r.month)).or_default() += r.paid_amount + r.bonus_amount;
    }

    months
        .iter()
        .map(|&(year, month)| TrendPoint {
            year,
            month,
            label: month_label(year, month),
            total: earned.get(&(year, month)).map_or(0.0, |t| t.total_value),
            paid: paid.get(&(year, month)).copied().unwrap_or(0.0),
        })
        .collect()
}

async fn fetch_records(
    pool: &MySqlPool,
    year: i32,
    month: u32,
) -> AppResult<Vec<PayrollRecord>> {
    let sql = format!("{RECORD_SELECT} WHERE year = ? AND month = ?");
    Ok(sqlx::query_as::<_, PayrollRecord>(&sql)
        .bind(year)
        .bind(month)
        .fetch_all(pool)
        .await?)
}

async fn monthly_payroll(
    pool: &MySqlPool,
    year: i32,
    month: u32,
) -> AppResult<MonthlyPayroll> {
    let range = month_range(year, month)?;
    let items = fetch_items(pool, None, range).await?;
    let records = fetch_records(pool, year, month).await?;

    let rows = merge_records(rank_workers(&items), &records);
    let summary = summarize_rows(&rows);

    Ok(MonthlyPayroll {
        year,
        month,
        rows,
        summary,
    })
}

#[utoipa::path(
    get,
    path = "/api/payroll/monthly",
    params(PeriodQuery),
    responses((status = 200, body = MonthlyPayroll), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn monthly(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let payroll = monthly_payroll(pool.get_ref(), query.year, query.month).await?;

    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/payroll/daily",
    params(PeriodQuery),
    responses((status = 200, body = [DayBreakdown]), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn daily(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let items = fetch_items(pool.get_ref(), None, query.range()?).await?;

    Ok(HttpResponse::Ok().json(daily_breakdown(items)))
}

#[utoipa::path(
    get,
    path = "/api/payroll/growth",
    params(WorkerPeriodQuery),
    responses((status = 200, body = [GrowthPoint]), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn growth(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<WorkerPeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let range = month_range(query.year, query.month)?;
    let items = fetch_items(pool.get_ref(), Some(query.seamstress_id), range).await?;

    Ok(HttpResponse::Ok().json(month_growth(&items)))
}

#[utoipa::path(
    get,
    path = "/api/payroll/trend",
    params(TrendQuery),
    responses((status = 200, body = [TrendPoint]), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn trend(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TrendQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let count = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    if !(1..=MAX_TREND_MONTHS).contains(&count) {
        return Err(AppError::bad_request(format!(
            "months must be between 1 and {MAX_TREND_MONTHS}"
        ))
        .into());
    }
    month_range(query.year, query.month)?;

    let months = trailing_months(query.year, query.month, count);
    let (Some(&(first_y, first_m)), Some(&(last_y, last_m))) = (months.first(), months.last())
    else {
        return Ok(HttpResponse::Ok().json(Vec::<TrendPoint>::new()));
    };

    let span = DateRange::new(
        month_range(first_y, first_m)?.start,
        month_range(last_y, last_m)?.end,
    );
    let items = fetch_items(pool.get_ref(), None, span).await?;

    let sql = format!("{RECORD_SELECT} WHERE year * 12 + month BETWEEN ? AND ?");
    let records = sqlx::query_as::<_, PayrollRecord>(&sql)
        .bind(i64::from(first_y) * 12 + i64::from(first_m))
        .bind(i64::from(last_y) * 12 + i64::from(last_m))
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(monthly_trend(&months, &items, &records)))
}

/// One seamstress's items for the month, newest first.
#[utoipa::path(
    get,
    path = "/api/payroll/details",
    params(WorkerPeriodQuery),
    responses((status = 200, body = PayrollDetails), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn details(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<WorkerPeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let range = month_range(query.year, query.month)?;
    let items = fetch_items(pool.get_ref(), Some(query.seamstress_id), range).await?;

    let sql = format!("{RECORD_SELECT} WHERE seamstress_id = ? AND year = ? AND month = ?");
    let record = sqlx::query_as::<_, PayrollRecord>(&sql)
        .bind(query.seamstress_id)
        .bind(query.year)
        .bind(query.month)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    let totals = summarize(&items);
    let items = items.into_iter().map(JobItemWithTotal::from).collect();

    Ok(HttpResponse::Ok().json(PayrollDetails {
        items,
        totals,
        record,
    }))
}

/// Records a payment for one seamstress and month, replacing any earlier one.
#[utoipa::path(
    post,
    path = "/api/payroll/payments",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = Object, example = json!({
            "message": "Payment recorded",
            "total_amount": 3600.0,
            "status": "partial"
        })),
        (status = 400, description = "Negative amount or invalid month"),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn record_payment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PaymentRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    validate_payment(&payload)?;

    let range = month_range(payload.year, payload.month)?;
    let items = fetch_items(pool.get_ref(), Some(payload.seamstress_id), range).await?;
    let total_amount: f64 = items.iter().map(LineValue::value).sum();

    let status = PayrollStatus::resolve(total_amount, payload.paid_amount, payload.bonus_amount);

    sqlx::query(
        r#"
        INSERT INTO payroll_records
        (seamstress_id, month, year, total_amount, paid_amount, bonus_amount,
         bonus_note, status, payment_date, notes, created_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), ?, ?)
        ON DUPLICATE KEY UPDATE
            total_amount = VALUES(total_amount),
            paid_amount = VALUES(paid_amount),
            bonus_amount = VALUES(bonus_amount),
            bonus_note = VALUES(bonus_note),
            status = VALUES(status),
            payment_date = VALUES(payment_date),
            notes = VALUES(notes)
        "#,
    )
    .bind(payload.seamstress_id)
    .bind(payload.month)
    .bind(payload.year)
    .bind(total_amount)
    .bind(payload.paid_amount)
    .bind(payload.bonus_amount)
    .bind(&payload.bonus_note)
    .bind(status.as_ref())
    .bind(&payload.notes)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    info!(
        seamstress_id = payload.seamstress_id,
        year = payload.year,
        month = payload.month,
        %status,
        recorded_by = auth.user_id,
        "Payroll payment recorded"
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payment recorded",
        "total_amount": total_amount,
        "status": status
    })))
}

pub(crate) const CSV_HEADER: [&str; 5] = ["Seamstress", "Items", "Total", "Status", "Paid"];

pub(crate) fn csv_rows(rows: &[PayrollRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.seamstress_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", r.seamstress_id)),
                r.totals.quantity.to_string(),
                r.totals.total_value.to_string(),
                r.status.to_string(),
                (r.paid_amount + r.bonus_amount).to_string(),
            ]
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/payroll/export",
    params(PeriodQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 400),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn export_csv(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let payroll = monthly_payroll(pool.get_ref(), query.year, query.month).await?;

    let body = to_csv_bytes(&CSV_HEADER, csv_rows(&payroll.rows)).map_err(|e| {
        tracing::error!(error = %e, "CSV export failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let filename = format!("payroll_{}_{}.csv", query.year, query.month);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::earnings::tests::item;

    fn record(seamstress_id: u64, paid: f64, bonus: f64) -> PayrollRecord {
        PayrollRecord {
            id: seamstress_id * 10,
            seamstress_id,
            month: 5,
            year: 2025,
            total_amount: 0.0,
            paid_amount: paid,
            bonus_amount: bonus,
            bonus_note: None,
            status: "unpaid".into(),
            payment_date: None,
            notes: None,
            created_by: 1,
        }
    }

    fn may_items() -> Vec<JobItem> {
        let a = Some((1, "Aziza"));
        let b = Some((2, "Barno"));
        vec![
            item(1, a, 2, 1000.0, 0.0, 1),
            item(2, a, 1, 500.0, 200.0, 3),
            item(3, a, 3, 300.0, 0.0, 3),
            item(4, b, 10, 500.0, 0.0, 2),
        ]
    }

    #[test]
    fn monthly_rows_merge_records_and_resolve_status() {
        let rows = merge_records(
            rank_workers(&may_items()),
            &[record(1, 3000.0, 600.0), record(2, 1000.0, 0.0)],
        );

        assert_eq!(rows[0].seamstress_id, 2);
        assert_eq!(rows[0].status, PayrollStatus::Partial);
        assert_eq!(rows[1].seamstress_id, 1);
        assert_eq!(rows[1].totals.total_value, 3600.0);
        assert_eq!(rows[1].status, PayrollStatus::Paid);
        assert_eq!(rows[1].record_id, Some(10));
    }

    #[test]
    fn summary_counts_and_outstanding() {
        let rows = merge_records(rank_workers(&may_items()), &[record(1, 3000.0, 600.0)]);
        let s = summarize_rows(&rows);

        assert_eq!(s.worker_count, 2);
        assert_eq!(s.total_earnings, 8600.0);
        assert_eq!(s.total_paid, 3600.0);
        assert_eq!(s.outstanding, 5000.0);
        assert_eq!(s.total_items, 4);
        assert_eq!(s.average_per_worker, 4300.0);
        assert_eq!(
            s.status_counts,
            StatusCounts {
                paid: 1,
                partial: 0,
                unpaid: 1
            }
        );
    }

    #[test]
    fn empty_month_has_zero_average() {
        let s = summarize_rows(&[]);
        assert_eq!(s.average_per_worker, 0.0);
        assert_eq!(s.worker_count, 0);
    }

    #[test]
    fn daily_breakdown_is_chronological() {
        let days = daily_breakdown(may_items());
        let dates: Vec<u32> = days.iter().map(|d| d.date.day()).collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert_eq!(days[2].totals.total_value, 1600.0);
        assert_eq!(days[2].workers.len(), 1);
    }

    #[test]
    fn growth_has_one_point_per_working_day() {
        let items: Vec<JobItem> = may_items()
            .into_iter()
            .filter(|i| i.seamstress_id == Some(1))
            .collect();
        let points = month_growth(&items);

        let days: Vec<u32> = points.iter().map(|p| p.date.day()).collect();
        assert_eq!(days, vec![1, 3]);
        assert_eq!(points[0].cumulative, 2000.0);
        assert_eq!(points[1].daily, 1600.0);
        assert_eq!(points[1].cumulative, 3600.0);
    }

    #[test]
    fn unassigned_items_stay_out_of_day_and_month_totals() {
        let items = vec![
            item(1, Some((1, "Aziza")), 2, 1000.0, 0.0, 3),
            item(2, None, 10, 100.0, 0.0, 3),
        ];

        let days = daily_breakdown(items.clone());
        assert_eq!(days.len(), 1);
        let workers: f64 = days[0].workers.iter().map(|w| w.totals.total_value).sum();
        assert_eq!(days[0].totals.total_value, 2000.0);
        assert_eq!(days[0].totals.total_value, workers);

        let months = trailing_months(2025, 5, 1);
        let trend = monthly_trend(&months, &items, &[]);
        assert_eq!(trend[0].total, 2000.0);

        let only_unassigned = vec![item(3, None, 5, 100.0, 0.0, 4)];
        assert!(month_growth(&only_unassigned).is_empty());
        assert!(daily_breakdown(only_unassigned).is_empty());
    }

    #[test]
    fn trend_spans_year_boundary() {
        let months = trailing_months(2025, 2, 3);
        let points = monthly_trend(&months, &may_items(), &[]);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec 2024", "Jan 2025", "Feb 2025"]);
        assert!(points.iter().all(|p| p.total == 0.0 && p.paid == 0.0));
    }

    #[test]
    fn trend_sums_paid_with_bonus() {
        let months = trailing_months(2025, 5, 2);
        let points = monthly_trend(&months, &may_items(), &[record(1, 3000.0, 600.0)]);
        assert_eq!(points[1].total, 8600.0);
        assert_eq!(points[1].paid, 3600.0);
        assert_eq!(points[0].total, 0.0);
    }

    #[test]
    fn negative_payment_rejected() {
        let mut req = PaymentRequest {
            seamstress_id: 1,
            year: 2025,
            month: 5,
            paid_amount: 100.0,
            bonus_amount: 0.0,
            bonus_note: None,
            notes: None,
        };
        assert!(validate_payment(&req).is_ok());
        req.bonus_amount = -1.0;
        assert!(validate_payment(&req).is_err());
    }

    #[test]
    fn csv_has_header_and_one_line_per_worker() {
        let rows = merge_records(rank_workers(&may_items()), &[]);
        let bytes = to_csv_bytes(&CSV_HEADER, csv_rows(&rows)).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with('\u{feff}'));
        let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Seamstress,Items,Total,Status,Paid");
        assert_eq!(lines[1], "Barno,10,5000,unpaid,0");
        assert_eq!(lines[2], "Aziza,6,3600,unpaid,0");
    }
}
