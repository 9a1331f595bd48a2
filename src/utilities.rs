use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn level_for(verbosity_level: u8) -> LevelFilter {
    match verbosity_level {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Logs go to stderr, `RUST_LOG` wins over the verbosity level when set
pub fn setup_tracing(verbosity_level: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity_level).to_string()));

    let stderr_writer = fmt::Layer::default()
        .with_thread_names(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_writer)
        .init();
}
