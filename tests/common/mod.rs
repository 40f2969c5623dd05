#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use user_text_word_counter::database::{UpsertOutcome, UserTextStore};
use user_text_word_counter::errors::{AppDomain, AppError};
use user_text_word_counter::{KafkaMessage, MessageSource, UserTextRecord};

pub const TOPIC: &str = "user-text-messages";

pub fn message(offset: i64, key: Option<&str>, payload: &str) -> KafkaMessage {
    KafkaMessage {
        topic: TOPIC.to_string(),
        partition: 0,
        offset,
        key: key.map(|k| k.as_bytes().to_vec()),
        payload: Some(payload.as_bytes().to_vec()),
    }
}

/// Replays a fixed script of fetch results and records acknowledged offsets.
#[derive(Default)]
pub struct ScriptedSource {
    pub script: VecDeque<Result<KafkaMessage, AppError>>,
    pub acknowledged: Vec<i64>,
    pub failing_acks: HashSet<i64>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<KafkaMessage, AppError>>) -> Self {
        ScriptedSource {
            script: script.into(),
            ..Default::default()
        }
    }
}

impl MessageSource for ScriptedSource {
    async fn fetch_next(&mut self) -> Result<KafkaMessage, AppError> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(AppError::new(AppDomain::Fetch, "script exhausted")))
    }

    async fn acknowledge(&mut self, msg: &KafkaMessage) -> Result<(), AppError> {
        if self.failing_acks.contains(&msg.offset) {
            return Err(AppError::new(AppDomain::Ack, "broker went away"));
        }
        self.acknowledged.push(msg.offset);
        Ok(())
    }
}

/// Keyed in-memory table with insert-or-ignore semantics.
#[derive(Default)]
pub struct InMemoryStore {
    pub rows: Mutex<HashMap<String, UserTextRecord>>,
    pub fail_writes: bool,
}

impl InMemoryStore {
    pub fn failing() -> Self {
        InMemoryStore {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn row(&self, id: &str) -> Option<UserTextRecord> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl UserTextStore for InMemoryStore {
    async fn upsert_record(&self, record: &UserTextRecord) -> Result<UpsertOutcome, AppError> {
        if self.fail_writes {
            return Err(AppError::new(AppDomain::Persistence, "disk full"));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.id) {
            return Ok(UpsertOutcome::Duplicate);
        }
        rows.insert(record.id.clone(), record.clone());
        Ok(UpsertOutcome::Inserted)
    }
}
