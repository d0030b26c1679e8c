use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
};

// Prometheus metrics (default registry)
pub static CONTACTS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "contacts_added_total",
        "Total contacts created via POST /contacts"
    )
    .expect("register contacts_added_total")
});

pub static CONTACTS_DUPLICATE_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "contacts_duplicate_rejected_total",
        "Total submissions rejected because the email already exists"
    )
    .expect("register contacts_duplicate_rejected_total")
});

pub static CONTACTS_REMOVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "contacts_removed_total",
        "Total contacts removed via DELETE /contacts/:id"
    )
    .expect("register contacts_removed_total")
});

pub static CONTACTS_REMOVE_NOT_FOUND_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "contacts_remove_not_found_total",
        "Total deletes of ids that were not present"
    )
    .expect("register contacts_remove_not_found_total")
});

pub static CONTACTS_CURRENT: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "contacts_current",
        "Number of contacts currently stored"
    )
    .expect("register contacts_current")
});

pub fn set_current(count: usize) {
    CONTACTS_CURRENT.set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

pub async fn metrics_handler() -> (StatusCode, String) {
    encode_metrics()
}
