use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use tiffin_core::tracing::init_tracing;
use tiffin_proto::payments::payment_service_server::PaymentServiceServer;

use tiffin_payments::config::PaymentsConfig;
use tiffin_payments::grpc_server::PaymentsGrpcServer;
use tiffin_payments::infra::gateway::HttpPayoutGateway;
use tiffin_payments::router::build_router;
use tiffin_payments::state::AppState;
use tiffin_payments::worker::run_retry_worker;

#[tokio::main]
async fn main() {
    init_tracing("info,tiffin_payments=debug");

    let config = PaymentsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let gateway = HttpPayoutGateway::new(
        &config.payout_api_url,
        &config.payout_api_key_id,
        &config.payout_api_key_secret,
        &config.payout_source_account,
        config.payout_timeout,
    )
    .expect("failed to build payout gateway client");

    let state = AppState {
        db,
        gateway,
        platform_account_id: config.platform_account_id,
        payout_timeout: config.payout_timeout,
        distribution_lease: config.distribution_lease,
        webhook_secret: Arc::from(config.payout_webhook_secret.as_str()),
        retry_delay: config.retry_poll_interval,
    };

    // Spawn retry worker
    tokio::spawn(run_retry_worker(
        state.clone(),
        config.retry_poll_interval,
        config.retry_max_attempts,
    ));

    // Spawn gRPC server
    let grpc_state = state.clone();
    let grpc_addr = format!("0.0.0.0:{}", config.payments_grpc_port);
    tokio::spawn(async move {
        let server = PaymentsGrpcServer { state: grpc_state };
        info!("payments gRPC server listening on {grpc_addr}");
        tonic::transport::Server::builder()
            .add_service(PaymentServiceServer::new(server))
            .serve(grpc_addr.parse().expect("invalid gRPC address"))
            .await
            .expect("gRPC server error");
    });

    // HTTP server
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.payments_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("payments service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
