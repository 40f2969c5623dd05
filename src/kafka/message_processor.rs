use crate::database::{UpsertOutcome, UserTextStore};
use crate::errors::AppError;
use crate::metrics;
use crate::user_text::{UserTextMessage, UserTextRecord};
use log::{error, info, warn};
use rdkafka::message::BorrowedMessage;
use rdkafka::Message;
use std::future::Future;

/// Owned copy of a delivered Kafka message, safe to hold across awaits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
}

impl KafkaMessage {
    pub fn from_borrowed_message(msg: &BorrowedMessage<'_>) -> Self {
        KafkaMessage {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key: msg.key().map(<[u8]>::to_vec),
            payload: msg.payload().map(<[u8]>::to_vec),
        }
    }
}

/// A consumer-group bound subscription: hands out one message at a time and
/// takes acknowledgements back.
pub trait MessageSource {
    fn fetch_next(&mut self) -> impl Future<Output = Result<KafkaMessage, AppError>> + Send;

    fn acknowledge(
        &mut self,
        msg: &KafkaMessage,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    Stored,
    Duplicate,
    Undecodable,
    StoreFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    FetchFailed,
    Handled { processed: Processed, acknowledged: bool },
}

/// Fetches one message, stores its word count and acknowledges it.
///
/// Decode and write failures are logged and the message is still acknowledged.
/// A failed fetch is logged and nothing is acknowledged.
pub async fn process_next<S, St>(source: &mut S, store: &St) -> Iteration
where
    S: MessageSource,
    St: UserTextStore,
{
    let msg = match source.fetch_next().await {
        Ok(msg) => msg,
        Err(e) => {
            error!("could not read message: {}", e);
            metrics::increment_fetch_errors();
            return Iteration::FetchFailed;
        }
    };

    let processed = handle_message(&msg, store).await;

    let acknowledged = match source.acknowledge(&msg).await {
        Ok(()) => {
            info!(
                "committed message from topic {}, partition {} and offset {}",
                msg.topic, msg.partition, msg.offset
            );
            true
        }
        Err(e) => {
            error!(
                "failed to commit message from topic {}, partition {} and offset {}: {}",
                msg.topic, msg.partition, msg.offset, e
            );
            false
        }
    };
    metrics::increment_commits(acknowledged);

    Iteration::Handled {
        processed,
        acknowledged,
    }
}

async fn handle_message<St: UserTextStore>(msg: &KafkaMessage, store: &St) -> Processed {
    let decoded = match UserTextMessage::decode(msg.payload.as_deref()) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(
                "skipping message from topic {}, partition {} and offset {}: {}",
                msg.topic, msg.partition, msg.offset, e
            );
            metrics::increment_messages_processed(metrics::OUTCOME_DECODE_ERROR);
            return Processed::Undecodable;
        }
    };

    let record = UserTextRecord::new(msg.key.as_deref(), decoded);
    info!(
        "Received message id={} words={} (topic={}, partition={}, offset={})",
        record.id, record.word_count, msg.topic, msg.partition, msg.offset
    );

    match store.upsert_record(&record).await {
        Ok(UpsertOutcome::Inserted) => {
            metrics::increment_messages_processed(metrics::OUTCOME_STORED);
            Processed::Stored
        }
        Ok(UpsertOutcome::Duplicate) => {
            info!("id={} already stored, treating as re-delivery", record.id);
            metrics::increment_messages_processed(metrics::OUTCOME_DUPLICATE);
            Processed::Duplicate
        }
        Err(e) => {
            error!("failed to handle message id={}: {}", record.id, e);
            metrics::increment_messages_processed(metrics::OUTCOME_PERSISTENCE_ERROR);
            Processed::StoreFailed
        }
    }
}

/// Consumes messages one at a time until the surrounding task is dropped.
pub async fn run_ingestion_loop<S, St>(mut source: S, store: St)
where
    S: MessageSource,
    St: UserTextStore,
{
    loop {
        process_next(&mut source, &store).await;
    }
}
