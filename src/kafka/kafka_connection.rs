use crate::config::KafkaConfig;
use crate::errors::{AppDomain, AppError};
use crate::kafka::message_processor::{KafkaMessage, MessageSource};
use log::info;
use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::{Offset, TopicPartitionList};

pub fn create_kafka_consumer(config: &KafkaConfig) -> Result<StreamConsumer, AppError> {
    let brokers = config.broker_list().join(",");
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", &config.group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        .set_log_level(RDKafkaLogLevel::Info)
        .create()
        .map_err(|e| {
            AppError::new(AppDomain::Connection, format!("Failed to create Kafka consumer: {}", e))
        })?;
    consumer.subscribe(&[config.topic.as_str()]).map_err(|e| {
        AppError::new(
            AppDomain::Connection,
            format!("Failed to subscribe to topic {}: {}", config.topic, e),
        )
    })?;
    info!(
        "Connected to Kafka topic {}, located on Kafka brokers {} (group {})",
        config.topic, brokers, config.group_id
    );
    Ok(consumer)
}

pub struct KafkaSource {
    consumer: StreamConsumer,
}

impl KafkaSource {
    pub fn new(consumer: StreamConsumer) -> Self {
        KafkaSource { consumer }
    }
}

impl MessageSource for KafkaSource {
    async fn fetch_next(&mut self) -> Result<KafkaMessage, AppError> {
        self.consumer
            .recv()
            .await
            .map(|msg| KafkaMessage::from_borrowed_message(&msg))
            .map_err(|e| AppError::new(AppDomain::Fetch, e.to_string()))
    }

    async fn acknowledge(&mut self, msg: &KafkaMessage) -> Result<(), AppError> {
        let mut offsets = TopicPartitionList::new();
        offsets
            .add_partition_offset(&msg.topic, msg.partition, Offset::Offset(msg.offset + 1))
            .map_err(|e| AppError::new(AppDomain::Ack, e.to_string()))?;
        self.consumer
            .commit(&offsets, CommitMode::Sync)
            .map_err(|e| AppError::new(AppDomain::Ack, e.to_string()))
    }
}
