/// User Routes
///
/// Registration, login, authenticated user info, and the user admin
/// endpoints (list/fetch/update/delete). Registration and login are the two
/// places a session token is issued.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password, Claims};
use crate::configuration::AuthSettings;
use crate::error::AppError;
use crate::models::User;
use crate::store;

/// User registration request. Fields are optional so that an absent field
/// reaches the handler's own validation instead of a deserializer rejection.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub message: String,
    pub users: Vec<User>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: Option<User>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// The authenticated identity as carried by the session token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: Uuid,
    pub user_email: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct UserInfoResponse {
    pub message: String,
    pub user: UserInfo,
}

/// A field counts as provided when it is present and non-empty.
fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// GET /api/users
///
/// List every registered identity. Left unauthenticated on purpose; see
/// DESIGN.md.
pub async fn get_users(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let users = store::users::find_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(UsersResponse {
        message: "Users successfully retrieved!".to_string(),
        users,
    }))
}

/// POST /api/users
///
/// Register a new identity and issue its first session token.
///
/// # Errors
/// - 400: username, email, or password missing
/// - 500: duplicate username (store-level uniqueness violation)
pub async fn create_user(
    form: web::Json<RegisterRequest>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let (username, email, password) = match (
        provided(&form.username),
        provided(&form.email),
        provided(&form.password),
    ) {
        (Some(username), Some(email), Some(password)) => (username, email, password),
        _ => {
            return Err(AppError::bad_request(
                "Please provide a username, email and password.",
            ));
        }
    };

    let password_hash = hash_password(password)?;
    let user = store::users::insert(pool.get_ref(), username, email, &password_hash).await?;

    let claims = Claims::new(user.id, user.email.clone(), user.username.clone());
    let token = issue_token(&claims, auth_config.get_ref())?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User successfully created!".to_string(),
        user,
        token,
    }))
}

/// POST /api/users/login
///
/// Authenticate by username and password and issue a session token. An
/// unknown username and a wrong password fail with the same message so the
/// response never confirms which one was wrong.
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let (username, password) = match (provided(&form.username), provided(&form.password)) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            return Err(AppError::bad_request(
                "Please provide username and password",
            ));
        }
    };

    let user = store::users::find_by_username(pool.get_ref(), username)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Username or password does not match"))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::unauthenticated(
            "Username or password does not match",
        ));
    }

    let claims = Claims::new(user.id, user.email, user.username);
    let token = issue_token(&claims, auth_config.get_ref())?;

    tracing::info!(user_id = %claims.sub, "user logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "User successfully logged in!".to_string(),
        token,
    }))
}

/// GET /api/users/user-info (protected)
///
/// Echo the authenticated identity straight from the verified claims; the
/// store is never consulted.
pub async fn get_user_info(claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    let claims = claims.into_inner();
    let user = UserInfo {
        user_id: claims.user_id()?,
        user_email: claims.email,
        username: claims.username,
    };

    Ok(HttpResponse::Ok().json(UserInfoResponse {
        message: "User info successfully retrieved!".to_string(),
        user,
    }))
}

/// GET /api/users/{user_id}
///
/// An unknown id is not an error: the body carries a null user.
pub async fn get_user(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user = store::users::find_by_id(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User successfully retrieved!".to_string(),
        user,
    }))
}

/// PATCH /api/users/{user_id}
///
/// Apply any subset of username/email/password. A supplied password is
/// re-hashed before storage; the plaintext never reaches the store.
pub async fn update_user(
    path: web::Path<Uuid>,
    form: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let password_hash = match provided(&form.password) {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = store::users::update_by_id(
        pool.get_ref(),
        path.into_inner(),
        provided(&form.username),
        provided(&form.email),
        password_hash.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User successfully updated!".to_string(),
        user,
    }))
}

/// DELETE /api/users/{user_id}
///
/// Returns the deleted identity; owned job records are left in place.
pub async fn delete_user(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user = store::users::delete_by_id(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User successfully deleted!".to_string(),
        user,
    }))
}
