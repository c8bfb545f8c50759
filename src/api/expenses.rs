use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::incoming_jobs::fetch_all_incoming,
    auth::auth::AuthUser,
    earnings::{DateRange, summarize_profit},
    error::{AppError, AppResult},
    model::expense::Expense,
    utils::{
        db_errors::empty_if_missing,
        db_utils::{build_update_sql, execute_update},
    },
};

#[derive(Deserialize, IntoParams)]
pub struct ExpenseQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateExpense {
    #[schema(example = "Thread and needles")]
    pub expense_name: String,
    pub description: Option<String>,
    #[schema(example = 180000.0)]
    pub amount: f64,
    #[schema(value_type = Option<String>, format = "date")]
    pub expense_date: Option<NaiveDate>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateExpense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date")]
    pub expense_date: Option<NaiveDate>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct ExpenseSummary {
    pub admin_profit: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
}

impl ExpenseSummary {
    pub fn new(admin_profit: f64, expenses: &[Expense]) -> Self {
        let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
        Self {
            admin_profit,
            total_expenses,
            net_profit: admin_profit - total_expenses,
        }
    }
}

async fn fetch_expenses(pool: &MySqlPool, range: DateRange) -> AppResult<Vec<Expense>> {
    let result = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, expense_name, description, amount, expense_date, created_by, created_at
        FROM expenses
        ORDER BY expense_date DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await;

    let rows = empty_if_missing(result, "expenses")?;
    Ok(range.filter(rows))
}

#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ExpenseQuery),
    responses((status = 200, body = [Expense]), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Expenses"
)]
pub async fn list_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ExpenseQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let range = DateRange::new(query.start, query.end);
    let expenses = fetch_expenses(pool.get_ref(), range).await?;

    Ok(HttpResponse::Ok().json(expenses))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpense,
    responses((status = 201), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Expenses"
)]
pub async fn create_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateExpense>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let name = payload.expense_name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Expense name must not be empty").into());
    }
    if payload.amount < 0.0 {
        return Err(AppError::bad_request("Amount must not be negative").into());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO expenses (expense_name, description, amount, expense_date, created_by)
        VALUES (?, ?, ?, COALESCE(?, CURDATE()), ?)
        "#,
    )
    .bind(name)
    .bind(&payload.description)
    .bind(payload.amount)
    .bind(payload.expense_date)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Expense recorded",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    request_body = UpdateExpense,
    params(("id", Path, description = "Expense ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Expenses"
)]
pub async fn update_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateExpense>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    if body.amount.is_some_and(|a| a < 0.0) {
        return Err(AppError::bad_request("Amount must not be negative").into());
    }

    let update = build_update_sql(
        "expenses",
        &*body,
        &["expense_name", "description", "amount", "expense_date"],
        "id",
        path.into_inner(),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Expense not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Expense updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    params(("id", Path, description = "Expense ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Expenses"
)]
pub async fn delete_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Expense not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

/// Admin profit from incoming work less the expenses in the window.
#[utoipa::path(
    get,
    path = "/api/expenses/summary",
    params(ExpenseQuery),
    responses((status = 200, body = ExpenseSummary), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Expenses"
)]
pub async fn expense_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ExpenseQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let range = DateRange::new(query.start, query.end);
    let jobs = range.filter(fetch_all_incoming(pool.get_ref()).await?);
    let expenses = fetch_expenses(pool.get_ref(), range).await?;

    let profit = summarize_profit(&jobs);

    Ok(HttpResponse::Ok().json(ExpenseSummary::new(profit.admin_profit, &expenses)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64) -> Expense {
        let day = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        Expense {
            id: 1,
            expense_name: "Rent".into(),
            description: None,
            amount,
            expense_date: day,
            created_by: 1,
            created_at: day.and_hms_opt(8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn net_profit_subtracts_expenses() {
        let summary = ExpenseSummary::new(200_000.0, &[expense(50_000.0), expense(30_000.0)]);
        assert_eq!(summary.total_expenses, 80_000.0);
        assert_eq!(summary.net_profit, 120_000.0);
    }

    #[test]
    fn no_expenses_keeps_profit() {
        let summary = ExpenseSummary::new(1_000.0, &[]);
        assert_eq!(summary.net_profit, 1_000.0);
    }
}
