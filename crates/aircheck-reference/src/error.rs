//! ---
//! act_section: "03-reference-data"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Best-effort reference data clients and caching."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
/// Failures reported by the reference clients.
///
/// These never escape [`crate::ReferenceService`]; the service logs them
/// and substitutes the static defaults.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// No OpenWeather API key was configured, so the fetch was skipped.
    #[error("no OpenWeather API key configured")]
    MissingApiKey,
    /// The provider answered with a non-success status code.
    #[error("provider returned HTTP {0}")]
    Status(u16),
    /// Connection, timeout, or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response decoded but lacked the fields we need.
    #[error("payload missing expected fields: {0}")]
    Payload(String),
}
