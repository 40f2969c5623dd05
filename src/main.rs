use log::{error, info, warn};
use std::path::Path;
use std::process::exit;
use tokio::signal::unix::{signal, SignalKind};
use user_text_word_counter::app_state::AppState;
use user_text_word_counter::config::{load_env_file, Config};
use user_text_word_counter::database::{connect_with_retry, PgUserTextStore};
use user_text_word_counter::errors::{AppDomain, AppError};
use user_text_word_counter::kafka::kafka_connection::{create_kafka_consumer, KafkaSource};
use user_text_word_counter::logging::init_log;
use user_text_word_counter::metrics::init_metrics;
use user_text_word_counter::nais_http_apis::register_nais_http_apis;
use user_text_word_counter::run_ingestion_loop;

#[tokio::main]
async fn main() {
    match run_app().await {
        Ok(()) => {
            info!("Application stopped without errors");
        }
        Err(e) => {
            error!("Application failed, shutting down: {}", e);
            exit(1);
        }
    }
}

async fn run_app() -> Result<(), AppError> {
    init_log();
    match load_env_file(Path::new(".env")) {
        Ok(true) => info!("Loaded environment from .env"),
        Ok(false) => {}
        Err(e) => warn!("{}", e),
    }
    init_metrics();
    let config = Config::from_default_file()?;
    info!("Configuration loaded: {:?}", config.database);

    let app_state = AppState::started();
    let mut http_server_task =
        register_nais_http_apis(app_state.clone(), config.http.port).await?;

    let pg_pool = connect_with_retry(
        &config.database.url,
        config.database.connect_retry_count,
        config.database.connect_retry_delay,
    )
    .await?;
    info!("Connected to PostgreSQL");

    let consumer = create_kafka_consumer(&config.kafka)?;
    app_state.set_ready(true);

    let store = PgUserTextStore::new(pg_pool.clone());
    let reader = run_ingestion_loop(KafkaSource::new(consumer), store);
    let shutdown = await_signal();
    let result = tokio::select! {
        result = &mut http_server_task => {
            match result {
                Ok(Ok(())) => {
                    info!("HTTP server stopped.");
                    Ok(())
                }
                Ok(Err(e)) => Err(e),
                Err(join_error) => Err(AppError::new(
                    AppDomain::HttpServer,
                    format!("HTTP server task panicked: {}", join_error),
                )),
            }
        }
        _ = reader => {
            info!("Reading from Kafka stopped.");
            Ok(())
        }
        result = shutdown => {
            match result {
                Ok(signal) => info!("Signal '{}' received, shutting down....", signal),
                Err(e) => error!("Shutting down due to error handling SIGINT/SIGTERM: {}", e),
            }
            Ok(())
        }
    };
    app_state.set_ready(false);
    http_server_task.abort();
    pg_pool.close().await;
    info!("Pg pool closed");
    result
}

async fn await_signal() -> Result<String, std::io::Error> {
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = term_signal.recv() => Ok("SIGTERM".to_string()),
        _ = interrupt_signal.recv() => Ok("SIGINT".to_string())
    }
}
