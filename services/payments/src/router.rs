use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;

use tiffin_core::health::{healthz, readiness};
use tiffin_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    account::get_account, distribution::get_distribution, payout::list_payouts,
    webhook::payout_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Gateway webhooks
        .route("/payments/webhooks/payout", post(payout_webhook))
        // Read APIs
        .route("/payments/orders/{order_id}/distribution", get(get_distribution))
        .route(
            "/payments/accounts/{recipient_type}/{recipient_id}",
            get(get_account),
        )
        .route("/payments/payouts", get(list_payouts))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}
