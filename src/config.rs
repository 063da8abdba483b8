//! Function configuration.

use std::time::Duration;

/// How long a response may be cached when nothing else is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// FunctionConfig holds settings that apply to every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    /// Cache lifetime advertised in every response.
    pub ttl: Duration,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl FunctionConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}
