//! Colors and sizes: flat name lists used as tags on job items.

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::catalog::CatalogEntry,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateCatalogEntry {
    #[schema(example = "Navy blue")]
    pub name: String,
}

#[derive(Clone, Copy)]
enum Catalog {
    Colors,
    Sizes,
}

impl Catalog {
    fn table(self) -> &'static str {
        match self {
            Catalog::Colors => "colors",
            Catalog::Sizes => "sizes",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Catalog::Colors => "Color",
            Catalog::Sizes => "Size",
        }
    }
}

async fn list(pool: &MySqlPool, catalog: Catalog) -> AppResult<Vec<CatalogEntry>> {
    let sql = format!("SELECT id, name, created_at FROM {} ORDER BY name", catalog.table());
    Ok(sqlx::query_as::<_, CatalogEntry>(&sql).fetch_all(pool).await?)
}

async fn create(pool: &MySqlPool, catalog: Catalog, name: &str) -> AppResult<HttpResponse> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request(format!(
            "{} name must not be empty",
            catalog.label()
        )));
    }

    let sql = format!("INSERT INTO {} (name) VALUES (?)", catalog.table());
    let result = sqlx::query(&sql)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::conflict_on_duplicate(e, &format!("{} already exists", catalog.label()))
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": format!("{} created", catalog.label()),
        "id": result.last_insert_id()
    })))
}

async fn delete(pool: &MySqlPool, catalog: Catalog, id: u64) -> AppResult<HttpResponse> {
    let sql = format!("DELETE FROM {} WHERE id = ?", catalog.table());
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("{} not found", catalog.label())));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/colors",
    responses((status = 200, body = [CatalogEntry])),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_colors(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(list(pool.get_ref(), Catalog::Colors).await?))
}

#[utoipa::path(
    post,
    path = "/api/colors",
    request_body = CreateCatalogEntry,
    responses((status = 201), (status = 400), (status = 409)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_color(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCatalogEntry>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    Ok(create(pool.get_ref(), Catalog::Colors, &payload.name).await?)
}

#[utoipa::path(
    delete,
    path = "/api/colors/{id}",
    params(("id", Path, description = "Color ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_color(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    Ok(delete(pool.get_ref(), Catalog::Colors, path.into_inner()).await?)
}

#[utoipa::path(
    get,
    path = "/api/sizes",
    responses((status = 200, body = [CatalogEntry])),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_sizes(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(list(pool.get_ref(), Catalog::Sizes).await?))
}

#[utoipa::path(
    post,
    path = "/api/sizes",
    request_body = CreateCatalogEntry,
    responses((status = 201), (status = 400), (status = 409)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_size(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCatalogEntry>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    Ok(create(pool.get_ref(), Catalog::Sizes, &payload.name).await?)
}

#[utoipa::path(
    delete,
    path = "/api/sizes/{id}",
    params(("id", Path, description = "Size ID")),
    responses((status = 200), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn delete_size(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;
    Ok(delete(pool.get_ref(), Catalog::Sizes, path.into_inner()).await?)
}
