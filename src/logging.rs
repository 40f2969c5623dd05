use chrono::{SecondsFormat, Utc};
use env_logger::{Builder, Env};
use std::io::Write;

/// Installs a JSON-lines logger on stdout. Level defaults to `info` and can be
/// overridden with `RUST_LOG`. Calling it more than once is harmless.
pub fn init_log() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let line = serde_json::json!({
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "level": record.level().as_str(),
                "logger": record.target(),
                "message": record.args().to_string(),
            });
            writeln!(buf, "{}", line)
        })
        .target(env_logger::Target::Stdout)
        .try_init();
}
