use std::sync::Arc;

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::layer::DebugLogLayer;
use crate::logger::RequestLogger;

/// Configuration of the `tracing` bridge.
///
/// **Fields**
/// - `min_level`: least severe level forwarded to the debug log.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of [`DebugLogLayer`] and events are printed to the
///   console as well.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::INFO,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber that forwards events into
/// `logger`.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`DebugLogLayer`] (and a `fmt`
/// layer when `config.enable_stdout` is set) as the global default, so
/// every `tracing` event in the process reaches the debug log.
///
/// **Errors**
///
/// Fails if a global subscriber was already installed.
pub fn init_tracing_with_config(
    logger: Arc<RequestLogger>,
    config: LayerConfig,
) -> Result<(), SetGlobalDefaultError> {
    let layer = DebugLogLayer::new(logger, config.min_level);

    // Two subscriber shapes because the layer stacks differ in type.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Initialize the bridge with [`LayerConfig::default`].
pub fn init_tracing(logger: Arc<RequestLogger>) -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(logger, LayerConfig::default())
}
