use thiserror::Error;

/// Unified error type for the entire market-dashboard-core library.
///
/// Only the gateway and configuration layers produce errors. The
/// `Dashboard` facade absorbs every one of them into fallback data.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({resource}, status {status}): {message}")]
    Api {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Domain ──────────────────────────────────────────────────────
    #[error("Invalid period: {0} (expected one of 1M, 3M, 6M, 1A)")]
    InvalidPeriod(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters: reqwest errors carry the full URL.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
