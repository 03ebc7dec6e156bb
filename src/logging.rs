use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
}

/// Path of the log file inside the config directory
pub fn log_file_path(config_dir: &Path, config: &LoggingConfig) -> PathBuf {
    config_dir.join(&config.file_name)
}

/// Initialize the logging system.
///
/// Logs go to a file in the config directory so stdout only carries the
/// interactive protocol. With file output disabled the configured level goes
/// to stderr; when the directory cannot be created only warnings and errors
/// do. The returned guard must be held until exit
/// so buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    if config.file_output {
        if let Ok(config_dir) = Config::get_config_dir() {
            match fs::create_dir_all(&config_dir) {
                Ok(()) => {
                    let appender =
                        tracing_appender::rolling::never(&config_dir, &config.file_name);
                    let (writer, guard) = tracing_appender::non_blocking(appender);

                    let installed = tracing_subscriber::fmt()
                        .with_env_filter(env_filter(config))
                        .with_writer(writer)
                        .with_ansi(false)
                        .try_init()
                        .is_ok();

                    if installed {
                        tracing::debug!(
                            "Log file path: {}",
                            log_file_path(&config_dir, config).display()
                        );
                        return Some(guard);
                    }
                    return None;
                }
                Err(e) => {
                    eprintln!("Failed to create config directory for logs: {e}");
                }
            }
        }
    }

    let filter = if config.file_output {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        env_filter(config)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    None
}
