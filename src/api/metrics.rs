use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

/// Keyed by (method, route pattern) so `/users/1` and `/users/2` share a series
static ROUTE_COUNTS: Mutex<BTreeMap<(String, String), u64>> = Mutex::new(BTreeMap::new());

/// Label used for requests that matched no registered route
pub const UNMATCHED_ROUTE: &str = "unmatched";

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn record_route(method: &str, route: &str) {
    if let Ok(mut counts) = ROUTE_COUNTS.lock() {
        *counts.entry((method.to_string(), route.to_string())).or_insert(0) += 1;
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RouteCount {
    pub method: String,
    pub route: String,
    pub count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub requests_by_route: Vec<RouteCount>,
}

pub fn snapshot() -> MetricsResponse {
    let requests_by_route = ROUTE_COUNTS
        .lock()
        .map(|counts| {
            counts
                .iter()
                .map(|((method, route), count)| RouteCount {
                    method: method.clone(),
                    route: route.clone(),
                    count: *count,
                })
                .collect()
        })
        .unwrap_or_default();

    MetricsResponse {
        http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
        http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
        requests_by_route,
    }
}

/// Prometheus text exposition of a snapshot
pub fn render_prometheus(counters: &MetricsResponse) -> String {
    let mut out = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP error responses\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n\
         \n\
         # HELP http_requests_by_route_total HTTP requests per method and route pattern\n\
         # TYPE http_requests_by_route_total counter\n",
        counters.http_requests_total, counters.http_errors_total
    );

    for entry in &counters.requests_by_route {
        let _ = writeln!(
            out,
            "http_requests_by_route_total{{method=\"{}\",route=\"{}\"}} {}",
            entry.method,
            entry.route.replace('\\', "\\\\").replace('"', "\\\""),
            entry.count
        );
    }

    out
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Request counters in Prometheus text format")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render_prometheus(&snapshot()))
}
