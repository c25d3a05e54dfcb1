use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShadingError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShadingError {
    /// Non-positive or non-finite height/distance feeding an angle computation.
    #[error("invalid obstacle geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Solar elevation outside the open interval (0°, 90°).
    #[error("invalid solar elevation {0}°: must lie strictly between 0° and 90°")]
    InvalidElevation(f64),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ShadingError {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
