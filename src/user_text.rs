use crate::errors::{AppDomain, AppError};
use serde_json::{Map, Value};
use uuid::Uuid;

const USER_TEXT_FIELD: &str = "userText";

/// Body of a message on the user text topic. Unknown fields are ignored, field
/// names match case-insensitively (an exact `userText` wins), and a missing or
/// null `userText` reads as an empty string, as does a `null` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTextMessage {
    pub user_text: String,
}

impl UserTextMessage {
    pub fn decode(payload: Option<&[u8]>) -> Result<Self, AppError> {
        let payload = payload.unwrap_or(&[]);
        let fields: Option<Map<String, Value>> =
            serde_json::from_slice(payload).map_err(|e| decode_error(e.to_string()))?;
        let Some(fields) = fields else {
            return Ok(UserTextMessage::default());
        };
        let user_text = fields.get(USER_TEXT_FIELD).or_else(|| {
            fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(USER_TEXT_FIELD))
                .map(|(_, value)| value)
        });
        match user_text {
            None | Some(Value::Null) => Ok(UserTextMessage::default()),
            Some(Value::String(text)) => Ok(UserTextMessage {
                user_text: text.clone(),
            }),
            Some(other) => Err(decode_error(format!(
                "{} must be a string, got {}",
                USER_TEXT_FIELD, other
            ))),
        }
    }
}

fn decode_error(reason: String) -> AppError {
    AppError {
        domain: AppDomain::Decode,
        value: format!("could not unmarshal message: {}", reason),
    }
}

/// Row stored in `user_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTextRecord {
    pub id: String,
    pub text: String,
    pub word_count: i32,
}

impl UserTextRecord {
    pub fn new(key: Option<&[u8]>, message: UserTextMessage) -> Self {
        let word_count = word_count(&message.user_text);
        UserTextRecord {
            id: derive_id(key),
            text: message.user_text,
            word_count,
        }
    }
}

/// Number of maximal runs of non-whitespace characters.
pub fn word_count(text: &str) -> i32 {
    i32::try_from(text.split_whitespace().count()).unwrap_or(i32::MAX)
}

/// The message key as text when there is one, otherwise a fresh UUID.
pub fn derive_id(key: Option<&[u8]>) -> String {
    match key {
        Some(key) if !key.is_empty() => String::from_utf8_lossy(key).into_owned(),
        _ => Uuid::new_v4().to_string(),
    }
}
