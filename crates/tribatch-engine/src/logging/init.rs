use std::sync::Once;

/// Logger configuration.
///
/// `filter` uses `env_logger` directive syntax (e.g. `"debug"`,
/// `"tribatch_engine=trace,wgpu=warn"`). When unset, `RUST_LOG` is read, then
/// `default_level` applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(config.default_level);

        // wgpu is chatty at info; keep it at warn unless asked otherwise.
        builder.filter_module("wgpu_core", log::LevelFilter::Warn);
        builder.filter_module("wgpu_hal", log::LevelFilter::Warn);

        if let Some(filter) = config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            builder.parse_filters(&filter);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::warn!("a logger was already installed; keeping it");
            return;
        }
        log::debug!("logging initialized");
    });
}
