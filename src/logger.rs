//! Logging setup for the client.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use chrono::Local;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utility::get_folder_path;

/// Initialize tracing with a console layer and, optionally, a per-day
/// log file under the application directory.
///
/// `filter` is an env-filter directive such as `"level3_client=debug,info"`;
/// `RUST_LOG` takes precedence when set.
pub fn init_logger(filter: &str, log_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let console_layer = fmt::layer().with_target(true).with_ansi(true);
    let subscriber = tracing_subscriber::registry().with(filter).with(console_layer);

    if log_file {
        let log_path = get_log_file_path();
        if let Some(parent) = log_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .expect("failed to open log file");

        let file_layer = fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false);
        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }
}

/// Log file path for today.
fn get_log_file_path() -> PathBuf {
    let log_folder = get_folder_path("log");
    let today = Local::now().format("%Y%m%d").to_string();
    log_folder.join(format!("rpc_{}.log", today))
}
