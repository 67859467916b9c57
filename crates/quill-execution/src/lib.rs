//! Runtime plumbing for Quill: log initialisation and the event stream that
//! feeds action progress back to the host UI.

pub mod tracing_layer;

pub use tracing_layer::{ActionEvent, ActionEventLayer, QUILL_TARGET_PREFIX};

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Output format of the stderr log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Log lines go to stderr; every
/// `quill*` event is also delivered on the returned receiver.
pub fn init_tracing(
    default_filter: &str,
    format: LogFormat,
) -> Result<mpsc::UnboundedReceiver<ActionEvent>, TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let (events, receiver) = ActionEventLayer::channel();

    let registry = tracing_subscriber::registry().with(filter).with(events);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    Ok(receiver)
}
