use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};
use std::sync::OnceLock;

/// Messages handled by the ingestion loop, labelled by outcome
static USER_TEXT_MESSAGES_PROCESSED: OnceLock<CounterVec> = OnceLock::new();
static KAFKA_FETCH_ERRORS: OnceLock<Counter> = OnceLock::new();
static KAFKA_COMMITS: OnceLock<CounterVec> = OnceLock::new();

pub const OUTCOME_STORED: &str = "stored";
pub const OUTCOME_DUPLICATE: &str = "duplicate";
pub const OUTCOME_DECODE_ERROR: &str = "decode_error";
pub const OUTCOME_PERSISTENCE_ERROR: &str = "persistence_error";

/// Initialize all Prometheus metrics.
/// Safe to call multiple times - will only initialize once
pub fn init_metrics() {
    USER_TEXT_MESSAGES_PROCESSED.get_or_init(|| {
        register_counter_vec!(
            "user_text_messages_processed_total",
            "Total number of user text messages handled, by outcome",
            &["outcome"]
        )
        .expect("Failed to register user_text_messages_processed_total counter")
    });
    KAFKA_FETCH_ERRORS.get_or_init(|| {
        register_counter!(
            "kafka_fetch_errors_total",
            "Total number of failed attempts to fetch a message from Kafka"
        )
        .expect("Failed to register kafka_fetch_errors_total counter")
    });
    KAFKA_COMMITS.get_or_init(|| {
        register_counter_vec!(
            "kafka_commits_total",
            "Total number of offset commits, by result",
            &["result"]
        )
        .expect("Failed to register kafka_commits_total counter")
    });
}

pub fn increment_messages_processed(outcome: &str) {
    if let Some(counter_vec) = USER_TEXT_MESSAGES_PROCESSED.get() {
        counter_vec.with_label_values(&[outcome]).inc();
    }
}

pub fn increment_fetch_errors() {
    if let Some(counter) = KAFKA_FETCH_ERRORS.get() {
        counter.inc();
    }
}

pub fn increment_commits(ok: bool) {
    if let Some(counter_vec) = KAFKA_COMMITS.get() {
        counter_vec
            .with_label_values(&[if ok { "ok" } else { "failed" }])
            .inc();
    }
}

pub fn get_messages_processed_count(outcome: &str) -> f64 {
    USER_TEXT_MESSAGES_PROCESSED
        .get()
        .map(|counter_vec| counter_vec.with_label_values(&[outcome]).get())
        .unwrap_or(0.0)
}

pub fn get_fetch_errors_count() -> f64 {
    KAFKA_FETCH_ERRORS
        .get()
        .map(|counter| counter.get())
        .unwrap_or(0.0)
}

pub fn get_commits_count(ok: bool) -> f64 {
    KAFKA_COMMITS
        .get()
        .map(|counter_vec| {
            counter_vec
                .with_label_values(&[if ok { "ok" } else { "failed" }])
                .get()
        })
        .unwrap_or(0.0)
}
