use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Install the `env_logger` backend once; `RUST_LOG` overrides the defaults.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("gengrid", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        let _ = builder.try_init();
    });
}
