use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::{
        auth::AuthUser,
        handlers::{insert_user, validate_new_account},
    },
    error::AppError,
    model::{role::Role, user::Profile},
    utils::db_utils::{build_update_sql, execute_update},
};

const PROFILE_COLUMNS: &str =
    "SELECT id, email, full_name, role, is_active, last_login_at, created_at FROM users";

#[derive(Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "nodira@atelier.uz")]
    pub email: String,
    pub password: String,
    #[schema(example = "Nodira Yusupova")]
    pub full_name: String,
    pub role: Role,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct SeamstressOption {
    pub id: u64,
    pub full_name: String,
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, body = [Profile]), (status = 403)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let sql = format!("{PROFILE_COLUMNS} ORDER BY created_at DESC");
    let users = sqlx::query_as::<_, Profile>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(users))
}

/// Admin creates an account with any role.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created"),
        (status = 400),
        (status = 403),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    validate_new_account(&payload.email, &payload.password, &payload.full_name)?;

    let id = insert_user(
        &payload.email,
        &payload.password,
        &payload.full_name,
        payload.role,
        pool.get_ref(),
    )
    .await?;

    info!(user_id = id, role = %payload.role, created_by = auth.user_id, "User created");

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "id": id
    })))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    request_body = UpdateUser,
    params(("user_id", Path, description = "User ID")),
    responses((status = 200), (status = 400), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateUser>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    if body.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::bad_request("Full name must not be empty").into());
    }
    let demotes = body.is_active == Some(false) || body.role.is_some_and(|r| r != Role::Admin);
    if user_id == auth.user_id && demotes {
        return Err(AppError::bad_request("Admins cannot demote or disable themselves").into());
    }

    let update = build_update_sql(
        "users",
        &*body,
        &["full_name", "role", "is_active"],
        "id",
        user_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("User not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "User updated successfully" })))
}

/// Active seamstresses for assignment pickers, by name.
#[utoipa::path(
    get,
    path = "/api/users/seamstresses",
    responses((status = 200, body = [SeamstressOption])),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_seamstresses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let rows = sqlx::query_as::<_, (u64, String)>(
        r#"
        SELECT id, full_name
        FROM users
        WHERE role = ? AND is_active = TRUE
        ORDER BY full_name
        "#,
    )
    .bind(Role::Seamstress.as_ref())
    .fetch_all(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    let data: Vec<SeamstressOption> = rows
        .into_iter()
        .map(|(id, full_name)| SeamstressOption { id, full_name })
        .collect();

    Ok(HttpResponse::Ok().json(data))
}
