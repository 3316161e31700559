//! Streaming error types.

/// Errors raised while starting the streamer.
#[derive(Debug, thiserror::Error)]
pub enum StreamingError {
    /// The configuration cannot describe a streamable terrain.
    #[error(transparent)]
    Config(#[from] terra_config::ConfigError),

    /// The worker thread could not be spawned.
    #[error("failed to spawn terrain worker: {0}")]
    Spawn(#[source] std::io::Error),
}
