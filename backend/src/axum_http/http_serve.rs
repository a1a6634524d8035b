use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::{infra::db::postgres::postgres_connection::PgPoolSquad, payments::gateway::PaymentGateway};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub fn app<G>(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>, payment_gateway: Arc<G>) -> Result<Router>
where
    G: PaymentGateway + Send + Sync + 'static,
{
    let api = Router::new()
        .nest(
            "/users",
            routers::users::routes(Arc::clone(&db_pool), config.jwt.clone()),
        )
        .nest("/plans", routers::plans::routes(Arc::clone(&db_pool)))
        .nest(
            "/subscriptions",
            routers::subscriptions::routes(Arc::clone(&db_pool), Arc::clone(&payment_gateway)),
        )
        .nest("/brands", routers::brands::routes(Arc::clone(&db_pool)))
        .nest("/products", routers::products::routes(Arc::clone(&db_pool)))
        .nest("/videos", routers::videos::routes(Arc::clone(&db_pool)))
        .nest(
            "/payments",
            routers::payments::routes(
                Arc::clone(&db_pool),
                Arc::clone(&payment_gateway),
                config.stripe.currency.clone(),
            ),
        )
        .route("/health-check", get(default_routers::health_check));

    let app = Router::new()
        .nest("/api/v1", api)
        .fallback(default_routers::not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start<G>(
    config: Arc<DotEnvyConfig>,
    db_pool: Arc<PgPoolSquad>,
    payment_gateway: Arc<G>,
) -> Result<()>
where
    G: PaymentGateway + Send + Sync + 'static,
{
    let app = app(Arc::clone(&config), db_pool, payment_gateway)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
