use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, RegisterUserModel},
    },
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
};

use crate::{
    auth::AuthUser, axum_http::error_responses::AppResult, config::config_model::JwtSecret,
    usecases::users::UserUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, jwt: JwtSecret) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository), jwt);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .with_state(Arc::new(user_usecase))
}

pub async fn register<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> AppResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
{
    let auth_response = user_usecase.register(register_user_model).await?;
    Ok((StatusCode::CREATED, Json(auth_response)))
}

pub async fn login<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Json(login_model): Json<LoginModel>,
) -> AppResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
{
    let auth_response = user_usecase.login(login_model).await?;
    Ok(Json(auth_response))
}

pub async fn profile<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
{
    let user = user_usecase.profile(auth.user_id).await?;
    Ok(Json(user))
}
