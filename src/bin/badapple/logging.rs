use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

/// Maps the `-v` count to a level; `RUST_LOG` directives take precedence.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    // sqlx logs every statement at info
    let quiet_driver = verbosity < 3;
    let driver_filter = filter_fn(move |meta| {
        !(quiet_driver && meta.target().starts_with("sqlx") && *meta.level() > Level::WARN)
    });

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .with_thread_names(false)
        .with_filter(filter)
        .with_filter(driver_filter);

    let _ = tracing_subscriber::registry().with(layer).try_init();

    match verbosity {
        0 => {}
        1 => tracing::info!("verbosity: info"),
        2 => tracing::debug!("verbosity: debug"),
        _ => tracing::trace!("verbosity: trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(3), LevelFilter::TRACE);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }
}
