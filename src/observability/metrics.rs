//! Metrics collection.
//!
//! # Metrics
//! - `console_kit_http_requests_total` (counter): vendor API calls by route, outcome
//! - `console_kit_inbound_messages_total` (counter): inbound messages by outcome
//! - `console_kit_pending_requests` (gauge): correlator entries awaiting a response
//! - `console_kit_poll_attempts_total` (counter): poll attempts by outcome
//!
//! # Design Decisions
//! - Emits through the `metrics` facade; no-op until the host installs a recorder
//! - Labels are static strings to keep cardinality bounded

/// Record a completed vendor API call.
pub fn record_http_request(route: &'static str, outcome: &'static str) {
    metrics::counter!(
        "console_kit_http_requests_total",
        "route" => route,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an inbound message and how the correlator handled it.
pub fn record_inbound_message(outcome: &'static str) {
    metrics::counter!("console_kit_inbound_messages_total", "outcome" => outcome).increment(1);
}

/// Update the number of requests awaiting a response.
pub fn record_pending_requests(count: usize) {
    metrics::gauge!("console_kit_pending_requests").set(count as f64);
}

/// Record a single poll attempt.
pub fn record_poll_attempt(outcome: &'static str) {
    metrics::counter!("console_kit_poll_attempts_total", "outcome" => outcome).increment(1);
}
