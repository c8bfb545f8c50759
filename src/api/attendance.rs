use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    earnings::DateRange,
    error::AppError,
    model::attendance::Attendance,
    utils::db_errors,
};

const ATTENDANCE_SELECT: &str = r#"
    SELECT a.id, a.user_id, u.full_name, a.date, a.time_in, a.time_out, a.job_id, a.notes
    FROM attendance a
    LEFT JOIN users u ON u.id = a.user_id
"#;

#[derive(Deserialize, ToSchema, Default)]
pub struct CheckIn {
    /// Job the seamstress is working on today
    pub job_id: Option<u64>,
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Ignored for seamstresses, who only ever see their own rows
    pub seamstress_id: Option<u64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Whose rows a caller may see: seamstresses are pinned to themselves.
fn visible_user(auth: &AuthUser, requested: Option<u64>) -> Option<u64> {
    if auth.is_seamstress() {
        Some(auth.user_id)
    } else {
        requested
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body(content = CheckIn, description = "Optional job and notes"),
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: Option<web::Json<CheckIn>>,
) -> actix_web::Result<impl Responder> {
    auth.require_seamstress()?;
    let payload = payload.map(web::Json::into_inner).unwrap_or_default();

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, time_in, job_id, notes)
        VALUES (?, CURDATE(), CURTIME(), ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.job_id)
    .bind(&payload.notes)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "message": "Checked in successfully" }))),
        // one row per user and day
        Err(e) if db_errors::is_duplicate(&e) => {
            Err(AppError::bad_request("Already checked in today").into())
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = auth.user_id, "Check-in failed");
            Err(AppError::from(e).into())
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully"),
        (status = 400, description = "No active check-in found for today"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_seamstress()?;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET time_out = CURTIME()
        WHERE user_id = ? AND date = CURDATE() AND time_out IS NULL
        "#,
    )
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::bad_request("No active check-in found for today").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Checked out successfully" })))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses((status = 200, body = [Attendance])),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = visible_user(&auth, query.seamstress_id);

    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE (? IS NULL OR a.user_id = ?) ORDER BY a.date DESC, a.time_in"
    );
    let rows = sqlx::query_as::<_, Attendance>(&sql)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    let range = DateRange::new(query.start, query.end);

    Ok(HttpResponse::Ok().json(range.filter(rows)))
}

/// Today's rows: everyone for staff, the caller's own for a seamstress.
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses((status = 200, body = [Attendance])),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let user_id = visible_user(&auth, None);

    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE a.date = CURDATE() AND (? IS NULL OR a.user_id = ?) ORDER BY a.time_in"
    );
    let rows = sqlx::query_as::<_, Attendance>(&sql)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 5,
            email: "s@atelier.uz".into(),
            role,
        }
    }

    #[test]
    fn seamstress_cannot_look_at_others() {
        assert_eq!(visible_user(&user(Role::Seamstress), Some(9)), Some(5));
        assert_eq!(visible_user(&user(Role::Seamstress), None), Some(5));
    }

    #[test]
    fn staff_filter_is_optional() {
        assert_eq!(visible_user(&user(Role::Manager), Some(9)), Some(9));
        assert_eq!(visible_user(&user(Role::Admin), None), None);
    }
}
