use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    error::AppError,
    model::{role::Role, user::Profile},
    models::{Claims, LoginReqDto, RegisterReq, TokenPair, TokenType, UserSql},
    utils::{db_errors, email_index},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::{debug, error, info, instrument};

/// Inserts a new user and records the email in the in-memory index.
pub(crate) async fn insert_user(
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
    pool: &MySqlPool,
) -> Result<u64, AppError> {
    let email = email_index::normalize(email);
    let hashed = hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::bad_request("Password could not be processed")
    })?;

    let result = sqlx::query(
        r#"INSERT INTO users (email, password, full_name, role) VALUES (?, ?, ?, ?)"#,
    )
    .bind(&email)
    .bind(hashed)
    .bind(full_name.trim())
    .bind(role.as_ref())
    .execute(pool)
    .await
    .map_err(|e| AppError::conflict_on_duplicate(e, "Email already registered"))?;

    email_index::mark_taken(&email).await;
    Ok(result.last_insert_id())
}

/// Shared checks for self-registration and admin-created accounts.
pub(crate) fn validate_new_account(
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || full_name.trim().is_empty() {
        return Err(AppError::bad_request(
            "Email, password and full name must not be empty",
        ));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("Email is not valid"));
    }
    if password.len() < 6 {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

/// Self-registration; always creates a seamstress account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    user: web::Json<RegisterReq>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    validate_new_account(&user.email, &user.password, &user.full_name)?;

    if !email_index::is_available(&user.email, pool.get_ref()).await {
        return Err(AppError::Conflict("Email already registered".into()).into());
    }

    let id = insert_user(
        &user.email,
        &user.password,
        &user.full_name,
        Role::Seamstress,
        pool.get_ref(),
    )
    .await?;

    info!(user_id = id, "User registered");

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "id": id
    })))
}

async fn store_refresh_token(
    pool: &MySqlPool,
    user_id: u64,
    claims: &Claims,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(user_id)
    .bind(&claims.jti)
    .bind(claims.exp as i64)
    .execute(pool)
    .await
    .map(|_| ())
}

fn issue_pair(
    user_id: u64,
    email: &str,
    role: Role,
    config: &Config,
) -> Result<(String, String, Claims), jsonwebtoken::errors::Error> {
    let access = generate_access_token(
        user_id,
        email.to_string(),
        role,
        &config.jwt_secret,
        config.access_token_ttl,
    )?;
    let (refresh, refresh_claims) = generate_refresh_token(
        user_id,
        email.to_string(),
        role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    )?;
    Ok((access, refresh, refresh_claims))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, body = TokenPair),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().body("Email or password required");
    }

    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, email, password, role, is_active
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email_index::normalize(&user.email))
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if !db_user.is_active {
        info!(user_id = db_user.id, "Login refused: account disabled");
        return HttpResponse::Unauthorized().body("Account disabled");
    }

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    let role = match Role::from_str(&db_user.role) {
        Ok(r) => r,
        Err(_) => {
            error!(user_id = db_user.id, role = %db_user.role, "Unknown role stored for user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!("Generating tokens");

    let (access_token, refresh_token, refresh_claims) =
        match issue_pair(db_user.id, &db_user.email, role, &config) {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "Failed to sign tokens");
                return HttpResponse::InternalServerError().finish();
            }
        };

    debug!(user_id = db_user.id, jti = %refresh_claims.jti, "Storing refresh token");

    if let Err(e) = store_refresh_token(pool.get_ref(), db_user.id, &refresh_claims).await {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // non-fatal
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");

    HttpResponse::Ok().json(TokenPair {
        access_token,
        refresh_token,
    })
}

fn bearer(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Rotates a refresh token: the presented one is revoked and a new pair issued.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, body = TokenPair),
        (status = 401, description = "Missing, invalid or revoked refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let token = match bearer(&req) {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    let record = sqlx::query_as::<_, (u64, u64, bool)>(
        r#"
        SELECT id, user_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await;

    let (record_id, user_id) = match record {
        Ok(Some((id, user_id, false))) => (id, user_id),
        Ok(_) => return HttpResponse::Unauthorized().finish(),
        Err(e) => {
            error!(error = %e, "Failed to look up refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    // the role may have changed since the token was issued
    let current = sqlx::query_as::<_, (String, String, bool)>(
        "SELECT email, role, is_active FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await;

    let (email, role) = match current {
        Ok(Some((email, role, true))) => match Role::from_str(&role) {
            Ok(role) => (email, role),
            Err(_) => return HttpResponse::Unauthorized().finish(),
        },
        Ok(_) => return HttpResponse::Unauthorized().finish(),
        Err(e) => {
            error!(error = %e, user_id, "Failed to load user for refresh");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let (access_token, refresh_token, new_claims) =
        match issue_pair(user_id, &email, role, &config) {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "Failed to sign tokens");
                return HttpResponse::InternalServerError().finish();
            }
        };

    if let Err(e) = store_refresh_token(pool.get_ref(), user_id, &new_claims).await {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok().json(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Revokes the presented refresh token. Always 204.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let Some(token) = bearer(&req) else {
        return HttpResponse::NoContent().finish();
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE jti = ?")
        .bind(&claims.jti)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token on logout");
    }

    HttpResponse::NoContent().finish()
}

/// Profile of the calling user.
#[utoipa::path(
    get,
    path = "/api/me",
    responses((status = 200, body = Profile), (status = 404)),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser, pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, email, full_name, role, is_active, last_login_at, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(AppError::from)?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_validation() {
        assert!(validate_new_account("a@b.uz", "secret1", "Aziza").is_ok());
        assert!(validate_new_account("", "secret1", "Aziza").is_err());
        assert!(validate_new_account("a@b.uz", "secret1", "  ").is_err());
        assert!(validate_new_account("nobody", "secret1", "Aziza").is_err());
        assert!(validate_new_account("a@b.uz", "123", "Aziza").is_err());
    }
}
