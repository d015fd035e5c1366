use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true) // Enabled by default
    })
}

/// Initialize Prometheus metrics exporter with upkeep task
/// Returns None if observability is disabled
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )
        .expect("Failed to set buckets")
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    // Upkeep task cleans out stale metric series
    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    // Group by route template rather than raw path to keep cardinality down
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);

    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

/// Track a lesson plan submission and whether it skipped review
pub fn track_plan_submitted(auto_approved: bool) {
    if !is_observability_enabled() {
        return;
    }
    let outcome = if auto_approved {
        "auto_approved"
    } else {
        "pending_review"
    };
    counter!("lesson_plans_submitted_total", "outcome" => outcome).increment(1);
}

pub fn track_plan_approved() {
    if !is_observability_enabled() {
        return;
    }
    counter!("lesson_plans_reviewed_total", "decision" => "approved").increment(1);
}

pub fn track_plan_rejected() {
    if !is_observability_enabled() {
        return;
    }
    counter!("lesson_plans_reviewed_total", "decision" => "rejected").increment(1);
}

/// Track a copy operation's fan-out
pub fn track_plan_copied(created: usize, conflicts: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("lesson_plans_copied_total", "result" => "created").increment(created as u64);
    counter!("lesson_plans_copied_total", "result" => "conflict").increment(conflicts as u64);
}

/// Track permission override writes
pub fn track_override_saved(permission: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("permission_overrides_saved_total", "permission" => permission.to_string())
        .increment(1);
}

/// Track permission resolution outcomes
pub fn track_permission_check(allowed: bool, role: &str) {
    if !is_observability_enabled() {
        return;
    }
    let status = if allowed { "allowed" } else { "denied" };
    counter!("permission_checks_total", "role" => role.to_string(), "status" => status)
        .increment(1);
}

/// Track notification creation
pub fn track_notification_created(notification_type: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("notifications_created_total", "type" => notification_type.to_string()).increment(1);
}

/// Set gauge metrics for current state
#[allow(dead_code)]
pub fn set_pending_review_plans(count: i64) {
    if !is_observability_enabled() {
        return;
    }
    gauge!("lesson_plans_pending_review_total").set(count as f64);
}
