/// Convenience result type used across Billboard.
pub type BillboardResult<T> = Result<T, BillboardError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum BillboardError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Words and placement directives could not be resolved into coordinates.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Errors while decoding or preparing an asset.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while producing or consuming rendered frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BillboardError {
    /// Build a [`BillboardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BillboardError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`BillboardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BillboardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Reasons a word list and its placement directives cannot be laid out.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The first word has a relative directive, so there is no anchor to continue from.
    #[error("first directive must be absolute (got '{got}')")]
    FirstDirectiveNotAbsolute {
        /// Token of the offending directive.
        got: &'static str,
    },

    /// Fewer directives than words.
    #[error("missing directive for word {index} ('{word}')")]
    MissingDirective {
        /// Index of the first word without a directive.
        index: usize,
        /// The word itself.
        word: String,
    },

    /// An explicit coordinate pair after the first word.
    #[error("absolute directive only valid for the first word (found at index {index})")]
    AbsoluteAfterFirst {
        /// Index of the offending directive.
        index: usize,
    },

    /// A style option set that cannot produce a usable value.
    #[error("invalid style '{option}': {reason}")]
    InvalidStyle {
        /// Which style option failed.
        option: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
