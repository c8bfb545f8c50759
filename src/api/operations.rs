use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::operation::Operation,
    utils::db_utils::{build_update_sql, execute_update},
};

#[derive(Deserialize, ToSchema)]
pub struct CreateOperation {
    #[schema(example = "Sew collar")]
    pub name: String,
    #[schema(example = "COL")]
    pub code: Option<String>,
    #[schema(example = "pcs")]
    pub unit: Option<String>,
    #[schema(example = 1500.0)]
    pub default_price: Option<f64>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateOperation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_price: Option<f64>,
}

fn check_price(price: Option<f64>) -> Result<(), AppError> {
    if price.is_some_and(|p| p < 0.0) {
        return Err(AppError::bad_request("Default price must not be negative"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/operations",
    responses((status = 200, body = [Operation])),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_operations(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let ops = sqlx::query_as::<_, Operation>(
        "SELECT id, name, code, unit, default_price, created_at FROM operations ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ops))
}

#[utoipa::path(
    post,
    path = "/api/operations",
    request_body = CreateOperation,
    responses((status = 201), (status = 400), (status = 409)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_operation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateOperation>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Operation name must not be empty").into());
    }
    check_price(payload.default_price)?;

    let result = sqlx::query(
        "INSERT INTO operations (name, code, unit, default_price) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(&payload.code)
    .bind(&payload.unit)
    .bind(payload.default_price)
    .execute(pool.get_ref())
    .await
    .map_err(|e| AppError::conflict_on_duplicate(e, "Operation already exists"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Operation created",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    put,
    path = "/api/operations/{id}",
    request_body = UpdateOperation,
    params(("id", Path, description = "Operation ID")),
    responses((status = 200), (status = 400), (status = 404), (status = 409)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn update_operation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateOperation>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let mut patch = body.into_inner();
    if let Some(name) = patch.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("Operation name must not be empty").into());
        }
    }
    check_price(patch.default_price)?;

    let update = build_update_sql(
        "operations",
        &patch,
        &["name", "code", "unit", "default_price"],
        "id",
        path.into_inner(),
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| AppError::conflict_on_duplicate(e, "Operation already exists"))?;

    if affected == 0 {
        return Err(AppError::not_found("Operation not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Operation updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/operations/{id}",
    params(("id", Path, description = "Operation ID")),
    responses((status = 200), (status = 404), (status = 409, description = "Operation is in use")),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_operation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let result = sqlx::query("DELETE FROM operations WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(|e| AppError::conflict_on_duplicate(e, "Operation is used by job items"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Operation not found").into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}
