//! Console logging for the relay process.

use crate::config::Config;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Transport and bus dependencies whose logs only help when tracing.
const NOISY_DEPENDENCIES: &[&str] = &[
    "tokio_tungstenite",
    "tungstenite",
    "hyper",
    "tower",
    "axum",
    "redis",
];

pub struct Logger {}

impl Logger {
    /// Installs a terminal logger at the configured level.
    ///
    /// Below `TRACE`, records from [`NOISY_DEPENDENCIES`] are dropped so that
    /// session and delivery logs stay readable under load.
    pub fn init_logger(config: &Config) {
        let level = config.log_level_filter;

        TermLogger::init(
            level,
            Self::log_config(level),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder
            .set_time_format_rfc3339()
            .set_thread_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Error);

        if Self::filters_dependencies(level) {
            for module in NOISY_DEPENDENCIES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }

    fn filters_dependencies(level: LevelFilter) -> bool {
        level < LevelFilter::Trace
    }
}
