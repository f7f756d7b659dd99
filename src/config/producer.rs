//! Event producer configuration

use std::time::Duration;

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Event producer configuration.
///
/// Selects which producer variant runs: the live adapter when stream
/// credentials are fully configured, the simulator otherwise. Selection
/// happens once at startup; there is no runtime failover between variants.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerConfig {
    /// Seconds between synthesized simulator events
    #[serde(default = "default_simulator_interval")]
    pub simulator_interval_secs: u64,

    /// Streaming endpoint of the live event source
    #[serde(default)]
    pub live_stream_url: Option<String>,

    /// Bearer token for the live event source
    #[serde(default)]
    pub live_stream_token: Option<Secret<String>>,
}

impl ProducerConfig {
    /// Simulator tick period as a Duration
    pub fn simulator_interval(&self) -> Duration {
        Duration::from_secs(self.simulator_interval_secs)
    }

    /// Live credentials when both URL and token are present
    pub fn live_settings(&self) -> Option<(&str, &Secret<String>)> {
        match (&self.live_stream_url, &self.live_stream_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token)),
            _ => None,
        }
    }

    /// Validate producer configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.simulator_interval_secs == 0 {
            return Err(ValidationError::InvalidSimulatorInterval);
        }
        if self.live_stream_url.is_some() != self.live_stream_token.is_some() {
            return Err(ValidationError::IncompleteLiveCredentials);
        }
        if let Some(url) = &self.live_stream_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidLiveStreamUrl);
            }
        }
        Ok(())
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            simulator_interval_secs: default_simulator_interval(),
            live_stream_url: None,
            live_stream_token: None,
        }
    }
}

fn default_simulator_interval() -> u64 {
    2
}
