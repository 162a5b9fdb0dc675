//! HTTP API for selling and reading orders.
//!
//! Exposes the sell workflow under `/api/v1`, plus health and Prometheus
//! endpoints. Requests are traced through `tower-http`.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use fulfillment::{LogNotifier, OrderWorkflow, SimulatedPaymentGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{OrderStore, PaymentRepository};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Bound shared by every store the server can run on.
pub trait AppStore: OrderStore + PaymentRepository + Clone + 'static {}

impl<S> AppStore for S where S: OrderStore + PaymentRepository + Clone + 'static {}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: AppStore>(state: Arc<AppState<S>>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    let orders_router = Router::new()
        .route(
            "/orders",
            get(routes::orders::list::<S>).post(routes::orders::sell::<S>),
        )
        .route("/orders/{id}", get(routes::orders::get::<S>));

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .nest("/api/v1", orders_router)
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

/// Creates the application state over `store`.
///
/// Payments are charged by the simulated gateway and recorded in the same
/// store. Confirmation e-mails are written to the log.
pub fn create_default_state<S: AppStore>(store: S, storage: &'static str) -> Arc<AppState<S>> {
    let gateway = SimulatedPaymentGateway::new(store.clone());
    let workflow = OrderWorkflow::new(store, gateway, LogNotifier);

    Arc::new(AppState { workflow, storage })
}
