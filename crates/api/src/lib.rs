//! HTTP API server with observability for the order system.
//!
//! Provides REST endpoints for order placement and the surrounding
//! customer/product management, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::{
    CustomerRepository, InMemoryCustomerRepository, InMemoryOrderRepository,
    InMemoryProductRepository, OrderRepository, ProductRepository,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, P, O>(state: Arc<AppState<C, P, O>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CustomerRepository + Clone + 'static,
    P: ProductRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<C, P, O>))
        .route("/orders/{id}", get(routes::orders::get::<C, P, O>))
        .route("/customers", post(routes::customers::create::<C, P, O>))
        .route("/customers/{id}", get(routes::customers::get::<C, P, O>))
        .route(
            "/products",
            get(routes::products::list::<C, P, O>).post(routes::products::create::<C, P, O>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the in-memory repositories.
pub fn create_in_memory_state() -> Arc<
    AppState<InMemoryCustomerRepository, InMemoryProductRepository, InMemoryOrderRepository>,
> {
    let customers = InMemoryCustomerRepository::new();
    let products = InMemoryProductRepository::new();
    let orders = InMemoryOrderRepository::new();
    Arc::new(AppState::new(customers, products, orders))
}

/// Creates application state over the PostgreSQL repositories.
pub fn create_postgres_state(
    pool: sqlx::PgPool,
) -> Arc<
    AppState<
        storage::PostgresCustomerRepository,
        storage::PostgresProductRepository,
        storage::PostgresOrderRepository,
    >,
> {
    let customers = storage::PostgresCustomerRepository::new(pool.clone());
    let products = storage::PostgresProductRepository::new(pool.clone());
    let orders = storage::PostgresOrderRepository::new(pool);
    Arc::new(AppState::new(customers, products, orders))
}
