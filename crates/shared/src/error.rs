use std::time::Duration;

/// The incident listing could not be fetched. The cached set stays as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("could not decode incident list: {0}")]
    Decode(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// A stored packed coordinate string did not have the `"(x, y)"` shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed coordinates {raw:?}: {reason}")]
pub struct MalformedCoordinateError {
    pub raw: String,
    pub reason: &'static str,
}

/// The map image has no measurable size yet (not loaded or not laid out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("map image geometry is not available yet")]
pub struct GeometryUnavailableError;
