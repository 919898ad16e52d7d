use thiserror::Error;

/// Errors raised while loading datasets or building configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload was not valid JSON or did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A region feature carried geometry that could not be interpreted.
    #[error("invalid geometry in feature {feature}: {reason}")]
    InvalidGeometry { feature: String, reason: String },

    /// A dwell record failed a range check.
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// The region collection envelope was malformed.
    #[error("invalid feature collection: {0}")]
    InvalidCollection(String),

    /// A dataset could not be retrieved from any of its URLs.
    #[error("dataset {0} unavailable")]
    Unavailable(String),

    /// Geographic bounds violate their ordering invariant.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),
}

pub type Result<T> = std::result::Result<T, Error>;
