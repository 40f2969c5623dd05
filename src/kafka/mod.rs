pub mod kafka_connection;
pub mod message_processor;
