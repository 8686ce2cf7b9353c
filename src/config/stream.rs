//! Fact stream configuration.

use serde::Deserialize;

/// Configuration of the in-process fact stream.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamConfig {
    /// Replay the full emission history to late subscribers.
    ///
    /// The core stream contract promises no replay; this adapter-level
    /// option adds it for consumers that join after facts were emitted.
    #[serde(default)]
    pub replay_on_subscribe: bool,
}
