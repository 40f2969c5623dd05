pub mod app_state;
pub mod config;
pub mod database;
pub mod errors;
pub mod kafka;
pub mod logging;
pub mod metrics;
pub mod nais_http_apis;
pub mod user_text;

pub use kafka::message_processor::{
    process_next, run_ingestion_loop, Iteration, KafkaMessage, MessageSource, Processed,
};
pub use user_text::{UserTextMessage, UserTextRecord};
