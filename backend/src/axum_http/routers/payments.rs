use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::{
            payments::PaymentRepository, subscriptions::SubscriptionRepository,
            users::UserRepository,
        },
        value_objects::{pagination::PageQuery, payments::InsertPaymentModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            payments::PaymentPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
        },
    },
    payments::gateway::PaymentGateway,
};
use uuid::Uuid;

use crate::{auth::AuthUser, axum_http::error_responses::AppResult, usecases::payments::PaymentUseCase};

pub fn routes<G>(db_pool: Arc<PgPoolSquad>, payment_gateway: Arc<G>, currency: String) -> Router
where
    G: PaymentGateway + Send + Sync + 'static,
{
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(subscription_repository),
        Arc::new(user_repository),
        payment_gateway,
        currency,
    );

    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/:payment_id", get(get_payment))
        .with_state(Arc::new(payment_usecase))
}

pub async fn create_payment<P, S, U, G>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, S, U, G>>>,
    auth: AuthUser,
    Json(insert_payment_model): Json<InsertPaymentModel>,
) -> AppResult<impl IntoResponse>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let payment = payment_usecase
        .create_payment(&auth, insert_payment_model)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list_payments<P, S, U, G>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, S, U, G>>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let payments = payment_usecase.list_payments(&auth, &query).await?;
    Ok(Json(payments))
}

pub async fn get_payment<P, S, U, G>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, S, U, G>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let payment = payment_usecase.get_payment(&auth, payment_id).await?;
    Ok(Json(payment))
}
