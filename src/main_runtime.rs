use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use keepsake::actions::ActionContext;
use keepsake::adapters::SuiRpcClient;
use keepsake::config::AppConfig;
use keepsake::error::{KeepsakeError, Result};
use keepsake::signing::Wallet;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Load config and key, then connect the signer to the node.
pub fn build_context(config_dir: &std::path::Path) -> Result<ActionContext> {
    let config = AppConfig::load_from(config_dir)?;
    if let Err(problems) = config.validate() {
        return Err(KeepsakeError::InvalidConfig(problems.join("; ")));
    }

    let wallet = Wallet::from_env()?;
    let address = wallet.address().to_string();

    let client = SuiRpcClient::new(
        &config.rpc.url,
        wallet,
        Duration::from_millis(config.rpc.request_timeout_ms),
    )?;
    info!("using address {} on {}", address, client.url());
    Ok(ActionContext::new(config, Arc::new(client)))
}

/// Log line for a failed action. Configuration problems are reported as
/// such since nothing reached the node.
pub fn failure_message(action: &str, err: &KeepsakeError) -> String {
    if err.is_configuration() {
        format!("{} not started, configuration problem: {}", action, err)
    } else {
        format!("{} failed: {}", action, err)
    }
}

/// Daily log file in `log_dir`. Fails instead of panicking when the
/// directory or today's file cannot be written.
pub fn file_appender(log_dir: &Path) -> std::result::Result<RollingFileAppender, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("cannot create log directory {}: {}", log_dir.display(), e))?;

    let test_path = log_dir.join(".keepsake_write_test");
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&test_path)
        .map_err(|e| format!("cannot write to log directory {}: {}", log_dir.display(), e))?;
    let _ = std::fs::remove_file(&test_path);

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("keepsake.log")
        .build(log_dir)
        .map_err(|e| format!("cannot open log file in {}: {}", log_dir.display(), e))
}

/// Console logging, plus a daily log file when `KEEPSAKE_LOG_DIR` is set.
/// Keep the returned guard alive until exit so buffered lines reach the file.
pub fn init_logging() -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,keepsake=debug"));

    let mut guard = None;
    let file_layer = match std::env::var("KEEPSAKE_LOG_DIR") {
        Ok(log_dir) => match file_appender(Path::new(&log_dir)) {
            Ok(appender) => {
                let (non_blocking, worker) = tracing_appender::non_blocking(appender);
                guard = Some(worker);
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!("Warning: {e}, file logging disabled");
                None
            }
        },
        Err(_) => None,
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}

pub fn init_logging_simple() {
    // Minimal logging for offline commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .try_init();
}
