/// Convenience result type used across path-anatomy.
pub type AnatomyResult<T> = Result<T, AnatomyError>;

/// Top-level error taxonomy used by the public operations.
///
/// Geometric degeneracies (collinear triples, zero-length segments) never show up here: the
/// constructors substitute a documented degenerate value instead.
#[derive(thiserror::Error, Debug)]
pub enum AnatomyError {
    /// Missing or vanished user selection (no source layer, no control layer).
    #[error("user input error: {0}")]
    UserInput(String),

    /// The chosen source contains no discoverable paths.
    #[error("empty source: {0}")]
    EmptySource(String),

    /// Invalid document or path data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Bake could not locate the frozen source or the control layer.
    #[error("bake error: {0}")]
    Bake(String),

    /// Unexpected failure while emitting the scene; the surrounding operation is rolled back.
    #[error("construction error in {location}: {message}")]
    Construction {
        /// Layer or element being constructed when the failure happened.
        location: String,
        /// Human-readable cause.
        message: String,
    },

    /// A formula referenced something the evaluation context cannot resolve.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing documents and options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnatomyError {
    /// Build an [`AnatomyError::UserInput`] value.
    pub fn user_input(msg: impl Into<String>) -> Self {
        Self::UserInput(msg.into())
    }

    /// Build an [`AnatomyError::EmptySource`] value.
    pub fn empty_source(msg: impl Into<String>) -> Self {
        Self::EmptySource(msg.into())
    }

    /// Build an [`AnatomyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AnatomyError::Bake`] value.
    pub fn bake(msg: impl Into<String>) -> Self {
        Self::Bake(msg.into())
    }

    /// Build an [`AnatomyError::Construction`] value.
    pub fn construction(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Build an [`AnatomyError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build an [`AnatomyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Re-tag an error with the layer or element it happened in.
    ///
    /// Errors that already carry a location keep the innermost one.
    pub fn at(self, location: impl Into<String>) -> Self {
        match self {
            Self::Construction { .. } => self,
            other => Self::construction(location, other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
