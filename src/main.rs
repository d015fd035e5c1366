use std::net::SocketAddr;

use dotenvy::dotenv;
use sproutplan::logging::{init_tracing, shutdown_tracer};
use sproutplan::metrics::{init_metrics, metrics_app};
use sproutplan::router::init_router;
use sproutplan::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    // Prometheus scrapes a separate listener so /metrics never shares the
    // public port
    if let Some(handle) = init_metrics() {
        let metrics_port = std::env::var("METRICS_PORT").unwrap_or_else(|_| "9000".to_string());
        let metrics_addr = format!("0.0.0.0:{}", metrics_port);
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&metrics_addr)
                .await
                .expect("Failed to bind metrics listener");
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %e, "Metrics server error");
            }
        });
        println!(
            "📈 Metrics available at http://localhost:{}/metrics",
            metrics_port
        );
    }

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");

    // Rate limiting keys on the peer IP, which only exists in the request
    // extensions when the server is driven with connect info
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();

    shutdown_tracer().await;
}
