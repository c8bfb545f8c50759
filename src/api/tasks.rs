//! Daily tasks handed to seamstresses. The table is optional; reads degrade
//! to empty lists when it has not been created.

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::daily_task::{DailyTask, TaskCounts, TaskStatus},
    utils::{
        db_errors::empty_if_missing,
        db_utils::{build_update_sql, execute_update},
    },
};

const TASK_SELECT: &str = r#"
    SELECT t.id, t.seamstress_id, u.full_name AS seamstress_name, t.task_date,
           t.task_description, t.notes, t.status, t.created_by, t.created_at, t.updated_at
    FROM daily_tasks t
    LEFT JOIN users u ON u.id = t.seamstress_id
"#;

#[derive(Deserialize, IntoParams)]
pub struct TaskQuery {
    pub seamstress_id: Option<u64>,
    /// Exact task date (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

#[derive(Deserialize, IntoParams)]
pub struct MyTaskQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTask {
    #[schema(example = 12)]
    pub seamstress_id: u64,
    /// Defaults to today
    #[schema(value_type = Option<String>, format = "date")]
    pub task_date: Option<NaiveDate>,
    #[schema(example = "Hem 40 skirts")]
    pub task_description: String,
    pub notes: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seamstress_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date")]
    pub task_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

#[derive(Serialize, ToSchema)]
pub struct MyTasks {
    pub tasks: Vec<DailyTask>,
    pub counts: TaskCounts,
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskQuery),
    responses((status = 200, body = [DailyTask]), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn list_tasks(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TaskQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let status = query.status.map(|s| s.as_ref().to_string());
    let sql = format!(
        r#"{TASK_SELECT}
        WHERE (? IS NULL OR t.seamstress_id = ?)
          AND (? IS NULL OR t.task_date = ?)
          AND (? IS NULL OR t.status = ?)
        ORDER BY t.task_date DESC, t.id DESC"#
    );
    let result = sqlx::query_as::<_, DailyTask>(&sql)
        .bind(query.seamstress_id)
        .bind(query.seamstress_id)
        .bind(query.date)
        .bind(query.date)
        .bind(&status)
        .bind(&status)
        .fetch_all(pool.get_ref())
        .await;

    let tasks = empty_if_missing(result, "daily_tasks").map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(tasks))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTask,
    responses((status = 201), (status = 400), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn create_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTask>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let description = payload.task_description.trim();
    if description.is_empty() {
        return Err(AppError::bad_request("Task description must not be empty").into());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO daily_tasks (seamstress_id, task_date, task_description, notes, status, created_by)
        VALUES (?, COALESCE(?, CURDATE()), ?, ?, ?, ?)
        "#,
    )
    .bind(payload.seamstress_id)
    .bind(payload.task_date)
    .bind(description)
    .bind(&payload.notes)
    .bind(TaskStatus::Pending.as_ref())
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    request_body = UpdateTask,
    params(("id", Path, description = "Task ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn update_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateTask>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let update = build_update_sql(
        "daily_tasks",
        &*body,
        &["seamstress_id", "task_date", "task_description", "notes", "status"],
        "id",
        path.into_inner(),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("Task not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id", Path, description = "Task ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn delete_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let result = sqlx::query("DELETE FROM daily_tasks WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Task not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

/// The caller's own tasks with a done/partial/pending tally.
#[utoipa::path(
    get,
    path = "/api/tasks/mine",
    params(MyTaskQuery),
    responses((status = 200, body = MyTasks), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn my_tasks(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MyTaskQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_seamstress()?;

    let sql = format!(
        "{TASK_SELECT} WHERE t.seamstress_id = ? AND (? IS NULL OR t.task_date = ?) ORDER BY t.task_date DESC, t.id"
    );
    let result = sqlx::query_as::<_, DailyTask>(&sql)
        .bind(auth.user_id)
        .bind(query.date)
        .bind(query.date)
        .fetch_all(pool.get_ref())
        .await;

    let tasks = empty_if_missing(result, "daily_tasks").map_err(AppError::from)?;
    let counts = TaskCounts::tally(&tasks);

    Ok(HttpResponse::Ok().json(MyTasks { tasks, counts }))
}

/// Seamstresses may only move their own tasks; staff may move any.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/status",
    request_body = TaskStatusUpdate,
    params(("id", Path, description = "Task ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn update_task_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<TaskStatusUpdate>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();
    let owner = auth.is_seamstress().then_some(auth.user_id);

    let result = sqlx::query(
        "UPDATE daily_tasks SET status = ? WHERE id = ? AND (? IS NULL OR seamstress_id = ?)",
    )
    .bind(body.status.as_ref())
    .bind(task_id)
    .bind(owner)
    .bind(owner)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Task not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Status updated" })))
}
