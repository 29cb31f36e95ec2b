use std::time::Duration;

use super::ProviderSetting;

/// Offline mode: every external collaborator is swapped for an in-process
/// mock, regardless of the configured providers.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub mock_response_delay: Duration,
}

impl ScaffoldConfig {
    /// Reads `SCAFFOLD_MODE` and `MOCK_RESPONSE_DELAY` (milliseconds).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            enabled: lookup("SCAFFOLD_MODE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            mock_response_delay: lookup("MOCK_RESPONSE_DELAY")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or_default(),
        }
    }

    pub fn resolve(&self, configured: ProviderSetting) -> ProviderSetting {
        if self.enabled {
            ProviderSetting::Mock
        } else {
            configured
        }
    }
}
