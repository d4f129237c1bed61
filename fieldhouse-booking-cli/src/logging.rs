use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Layer as _};

/// Console output at INFO (or ERROR with `--quiet`, `RUST_LOG` wins either
/// way) plus a daily-rolling file that always records everything at INFO.
/// The returned guard must stay alive for the file writer to flush.
pub fn init(quiet: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all("logs")?;
    let file_appender = tracing_appender::rolling::daily("logs", "fieldhouse-booking.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_default = if quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_default.to_string()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::INFO),
        )
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .init();
    Ok(guard)
}
