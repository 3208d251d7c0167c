use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::pagination;
use crate::models::{
    CreateUserRequest, Envelope, LoginRequest, MessageData, UpdateUserRequest, UserDetailData,
    UserListData, UserListQuery, UserMutationData,
};
use crate::routes::{ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(user_detail))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
    cfg.route("/login", web::post().to(login));
}

async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, ApiError> {
    let name = query.name.as_deref().filter(|s| !s.is_empty());
    let window = pagination::resolve(query.page, query.limit, &state.pagination);

    let total = state.store.count_users(name).await?;
    let users = state
        .store
        .list_users(name, window.limit, window.offset)
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success(UserListData {
        users,
        total,
        page: window.page,
        total_pages: pagination::total_pages(total, window.limit),
        limit: window.limit,
    })))
}

async fn user_detail(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let user = state
        .store
        .user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("not found".to_string()))?;

    Ok(HttpResponse::Ok().json(Envelope::success(UserDetailData { user })))
}

async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|_| ApiError::BadRequest("name, password and role are required".to_string()))?;

    if state.store.user_name_exists(&body.name, None).await? {
        return Err(ApiError::BadRequest("user name already exists".to_string()));
    }

    let user = state
        .store
        .create_user(&body.name, &body.password, &body.role)
        .await?;

    tracing::info!("created user {} ({})", user.name, user.id);

    Ok(HttpResponse::Ok().json(Envelope::success(UserMutationData {
        user,
        message: "user created".to_string(),
    })))
}

async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if body.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".to_string()));
    }
    if state.store.user_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound("not found".to_string()));
    }
    if let Some(name) = &body.name {
        if state.store.user_name_exists(name, Some(id)).await? {
            return Err(ApiError::BadRequest("user name already exists".to_string()));
        }
    }

    let user = state.store.update_user(id, &body).await?;

    Ok(HttpResponse::Ok().json(Envelope::success(UserMutationData {
        user,
        message: "user updated".to_string(),
    })))
}

async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !state.store.delete_user(id).await? {
        return Err(ApiError::NotFound("not found".to_string()));
    }

    tracing::info!("deleted user {}", id);

    Ok(HttpResponse::Ok().json(Envelope::success(MessageData {
        message: "user deleted".to_string(),
    })))
}

/// `POST /login`: plaintext credential check against `user_info`. Not an
/// authentication layer; it issues no token or session.
async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|_| ApiError::BadRequest("name and password are required".to_string()))?;

    let user = state
        .store
        .find_by_credentials(&body.name, &body.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid user name or password".to_string()))?;

    tracing::info!("user {} logged in", user.name);

    Ok(HttpResponse::Ok().json(Envelope::success(UserMutationData {
        user,
        message: "login successful".to_string(),
    })))
}
