use tariffcalc_core::{ValidationError, WarningMessage};
use thiserror::Error;

/// Errors returned by [`crate::TariffClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A list endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The calculate endpoint rejected the request. The backend's reason is
    /// not shown to users; it is logged instead.
    #[error("tariff calculation failed, please try again later")]
    Calculation { status: u16 },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Errors returned by [`crate::TariffSession::calculate`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationError),

    /// The selection is not eligible; `warning` is the message shown to the
    /// user, if any.
    #[error("calculation is not available for this selection{}", warning_suffix(.warning))]
    Ineligible { warning: Option<WarningMessage> },

    #[error(transparent)]
    Client(#[from] ClientError),
}

fn warning_suffix(warning: &Option<WarningMessage>) -> String {
    warning
        .as_ref()
        .map(|w| format!(": {w}"))
        .unwrap_or_default()
}
