use crate::errors::{AppDomain, AppError};
use serde::Deserialize;
use serde_env_field::{env_field_wrap, EnvField};
use std::path::Path;
use std::time::Duration;

#[env_field_wrap]
#[derive(Deserialize)]
struct KafkaSection {
    brokers: String,
    topic: String,
    group_id: String,
}

#[derive(Deserialize)]
struct DatabaseSection {
    url: EnvField<String>,
    #[serde(default = "default_connect_retry_count")]
    connect_retry_count: u32,
    #[serde(default = "default_connect_retry_delay_secs")]
    connect_retry_delay_secs: u64,
}

#[derive(Deserialize)]
struct HttpSection {
    #[serde(default = "default_http_port")]
    port: u16,
}

impl Default for HttpSection {
    fn default() -> Self {
        HttpSection {
            port: default_http_port(),
        }
    }
}

#[derive(Deserialize)]
struct RawConfig {
    kafka: KafkaSection,
    database: DatabaseSection,
    #[serde(default)]
    http: HttpSection,
}

fn default_connect_retry_count() -> u32 {
    10
}

fn default_connect_retry_delay_secs() -> u64 {
    5
}

fn default_http_port() -> u16 {
    8080
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
}

impl KafkaConfig {
    pub fn broker_list(&self) -> Vec<String> {
        self.brokers
            .split(',')
            .map(str::trim)
            .filter(|broker| !broker.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub connect_retry_count: u32,
    pub connect_retry_delay: Duration,
}

impl DatabaseConfig {
    /// Connection URL with the password replaced, for log output.
    pub fn masked_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match credentials.split_once(':') {
            Some((user, _)) => format!("{}://{}:********@{}", scheme, user, host),
            None => self.url.clone(),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.masked_url())
            .field("connect_retry_count", &self.connect_retry_count)
            .field("connect_retry_delay", &self.connect_retry_delay)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub kafka: KafkaConfig,
    pub database: DatabaseConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_string(file_content: &str) -> Result<Self, AppError> {
        let raw: RawConfig = toml::from_str(file_content)
            .map_err(|e| AppError::new(AppDomain::Config, format!("Invalid config: {}", e)))?;
        let config = Config {
            kafka: KafkaConfig {
                brokers: resolved("kafka.brokers", &raw.kafka.brokers)?,
                topic: resolved("kafka.topic", &raw.kafka.topic)?,
                group_id: resolved("kafka.group_id", &raw.kafka.group_id)?,
            },
            database: DatabaseConfig {
                url: resolved("database.url", &raw.database.url)?,
                connect_retry_count: raw.database.connect_retry_count,
                connect_retry_delay: Duration::from_secs(raw.database.connect_retry_delay_secs),
            },
            http: HttpConfig {
                port: raw.http.port,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_default_file() -> Result<Self, AppError> {
        let file_content = include_str!("../config/config.toml");
        Self::from_string(file_content)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.kafka.broker_list().is_empty() {
            return Err(AppError::new(
                AppDomain::Config,
                "kafka.brokers must list at least one host:port",
            ));
        }
        Ok(())
    }
}

/// Loads `path` into the process environment. Returns `Ok(false)` when the file
/// does not exist and an error when it exists but cannot be parsed.
pub fn load_env_file(path: &Path) -> Result<bool, AppError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(AppError::new(
            AppDomain::Config,
            format!("Could not load {}: {}", path.display(), e),
        )),
    }
}

fn resolved(name: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('$') {
        return Err(AppError::new(
            AppDomain::Config,
            format!("{} is not set or has invalid value", name),
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [(&str, Option<&str>); 4] = [
        ("KAFKA_BROKERS", Some("kafka-1:9092, kafka-2:9092")),
        ("USER_TEXT_MESSAGES_TOPIC", Some("user-text-messages")),
        ("KAFKA_GROUP_ID", Some("word-counter")),
        (
            "DATABASE_URL",
            Some("postgres://counter:hemmelig@db:5432/words"),
        ),
    ];

    #[test]
    fn test_config_parsing_file() {
        temp_env::with_vars(ALL_VARS, || {
            let config = Config::from_default_file().unwrap();
            assert_eq!(config.kafka.topic, "user-text-messages");
            assert_eq!(config.kafka.group_id, "word-counter");
            assert_eq!(
                config.kafka.broker_list(),
                vec!["kafka-1:9092".to_string(), "kafka-2:9092".to_string()]
            );
            assert_eq!(config.database.url, "postgres://counter:hemmelig@db:5432/words");
            assert_eq!(config.database.connect_retry_count, 10);
            assert_eq!(config.database.connect_retry_delay, Duration::from_secs(5));
            assert_eq!(config.http.port, 8080);
        });
    }

    #[test]
    fn test_config_parsing_content_uses_defaults() {
        temp_env::with_var("WORDS_DB", Some("postgres://localhost/words"), || {
            let toml_content = r#"
            [kafka]
            brokers = "localhost:9092"
            topic = "texts"
            group_id = "counter"

            [database]
            url = "$WORDS_DB"
        "#;
            let config = Config::from_string(toml_content).unwrap();
            assert_eq!(config.database.url, "postgres://localhost/words");
            assert_eq!(config.database.connect_retry_count, 10);
            assert_eq!(config.http.port, 8080);
        });
    }

    #[test]
    fn test_missing_env_var_is_config_error() {
        temp_env::with_vars(
            [
                ("KAFKA_BROKERS", Some("localhost:9092")),
                ("USER_TEXT_MESSAGES_TOPIC", Some("texts")),
                ("KAFKA_GROUP_ID", Some("counter")),
                ("DATABASE_URL", None),
            ],
            || {
                let err = Config::from_default_file().unwrap_err();
                assert_eq!(err.domain, AppDomain::Config);
            },
        );
    }

    #[test]
    fn test_blank_topic_or_group_id_is_rejected() {
        for (topic, group_id) in [("  ", "counter"), ("texts", "")] {
            let toml_content = format!(
                r#"
            [kafka]
            brokers = "localhost:9092"
            topic = "{}"
            group_id = "{}"

            [database]
            url = "postgres://localhost/words"
        "#,
                topic, group_id
            );
            let err = Config::from_string(&toml_content).unwrap_err();
            assert_eq!(err.domain, AppDomain::Config);
        }
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let path = std::env::temp_dir().join(format!("absent-{}.env", uuid::Uuid::new_v4()));
        assert_eq!(load_env_file(&path), Ok(false));
    }

    #[test]
    fn test_malformed_env_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("broken-{}.env", uuid::Uuid::new_v4()));
        std::fs::write(&path, "no equals sign here\n").unwrap();
        let result = load_env_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(result.unwrap_err().domain, AppDomain::Config);
    }

    #[test]
    fn test_blank_broker_list_is_rejected() {
        let toml_content = r#"
            [kafka]
            brokers = " , "
            topic = "texts"
            group_id = "counter"

            [database]
            url = "postgres://localhost/words"
        "#;
        let err = Config::from_string(toml_content).unwrap_err();
        assert_eq!(err.domain, AppDomain::Config);
    }

    #[test]
    fn test_debug_output_masks_password() {
        let config = DatabaseConfig {
            url: "postgres://counter:hemmelig@db:5432/words".to_string(),
            connect_retry_count: 1,
            connect_retry_delay: Duration::from_secs(1),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hemmelig"));
        assert!(debug.contains("postgres://counter:********@db:5432/words"));
    }
}
