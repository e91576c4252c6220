use log::{debug, LevelFilter};

pub fn init_logger(level_filter: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_filter)
        .format_timestamp_millis()
        .parse_default_env();
    if builder.try_init().is_ok() {
        debug!("Logger initialized with level: {}", level_filter);
    }
}
