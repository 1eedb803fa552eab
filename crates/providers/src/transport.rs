//! Shared HTTP plumbing for the adapters.

use siemguide_core::ProviderError;

/// Wording an adapter uses for transport-level failures.
pub(crate) struct TransportMessages {
    pub timeout: &'static str,
    pub connect: &'static str,
}

/// Classify a reqwest failure that happened before a status was received.
pub(crate) fn classify(err: reqwest::Error, messages: &TransportMessages) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(messages.timeout.into())
    } else if err.is_connect() {
        ProviderError::Connection(messages.connect.into())
    } else {
        ProviderError::Request(err.to_string())
    }
}

/// Read an error body for diagnostics, capped so a large HTML error page
/// doesn't end up in the reply.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    const MAX: usize = 500;
    let body = response.text().await.unwrap_or_default();
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body,
    }
}
