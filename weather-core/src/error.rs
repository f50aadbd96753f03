use std::fmt;

/// Stage of the pipeline that talked to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderStage {
    ForwardGeocode,
    ReverseGeocode,
    Forecast,
}

impl ProviderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStage::ForwardGeocode => "geocoding",
            ProviderStage::ReverseGeocode => "reverse geocoding",
            ProviderStage::Forecast => "forecast",
        }
    }
}

impl fmt::Display for ProviderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification a frontend can switch on to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No such place.
    NotFound,
    /// Provider unreachable or failed.
    Unavailable,
    /// Provider answered with something we cannot interpret.
    Malformed,
}

/// Errors surfaced by the resolve/fetch/normalize pipeline.
///
/// `Clone` so that one in-flight result can be handed to every caller
/// waiting on the same cache key.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("Location not found: '{0}'")]
    NotFound(String),

    #[error("{stage} request failed{}: {message}", status_suffix(.status))]
    Provider {
        stage: ProviderStage,
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed provider payload: {0}")]
    MalformedPayload(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

impl WeatherError {
    pub fn provider(stage: ProviderStage, message: impl Into<String>) -> Self {
        WeatherError::Provider {
            stage,
            status: None,
            message: message.into(),
        }
    }

    pub fn provider_status(stage: ProviderStage, status: u16, message: impl Into<String>) -> Self {
        WeatherError::Provider {
            stage,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, WeatherError::Provider { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::NotFound(_) => ErrorKind::NotFound,
            WeatherError::Provider { .. } => ErrorKind::Unavailable,
            WeatherError::MalformedPayload(_) => ErrorKind::Malformed,
        }
    }
}
