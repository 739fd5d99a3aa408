use crate::args::CommonArgs;
use sentry::ClientInitGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str =
    "bootstrap=info,presentation=info,application=info,infrastructure=info,domain=info,tower_http=info";

/// Installs the tracing subscriber and, when a DSN is configured, the Sentry
/// client. The returned guard flushes Sentry events on drop.
pub fn init(common_args: &CommonArgs) -> Option<ClientInitGuard> {
    let guard = common_args.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: common_args.sentry_environment.clone().map(Into::into),
                sample_rate: common_args.sentry_sample_rate.unwrap_or(1.0),
                traces_sample_rate: common_args.sentry_traces_sample_rate.unwrap_or(0.0),
                ..Default::default()
            },
        ))
    });

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    guard
}
