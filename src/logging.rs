use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";

/// Installs the global subscriber.
///
/// Human-readable output always goes to stderr so rendered dashboards can be
/// piped from stdout. When `log_dir` is set, a JSON copy of every event is
/// also written there with daily rotation.
pub fn init_logging(log_dir: Option<&str>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let file_layer = log_dir.map(|dir| {
        let file_appender = rolling::daily(dir, "statusboard.log");
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .json()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
