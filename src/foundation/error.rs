use std::path::PathBuf;

/// Convenience result type used across layermerge.
pub type MergeResult<T> = Result<T, MergeError>;

/// Axis of an overlay offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal offset (`x`).
    X,
    /// Vertical offset (`y`).
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Errors produced while turning descriptor text into a [`crate::LayerStack`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed descriptor syntax.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the offending token.
        line: usize,
        /// 1-based column of the offending token.
        column: usize,
        /// Human-readable description.
        message: String,
    },

    /// The descriptor has no usable `base` entry.
    #[error("descriptor has no base layer")]
    MissingBase,

    /// An overlay entry is not a table with a string `file` field.
    #[error("layer {index}: {reason}")]
    InvalidLayer {
        /// 1-based layer index.
        index: usize,
        /// Human-readable description.
        reason: String,
    },

    /// An overlay offset is missing or not integer-coercible.
    #[error("layer {index}: offset {axis} is not an integer: {value}")]
    InvalidOffset {
        /// 1-based layer index.
        index: usize,
        /// Which offset failed.
        axis: Axis,
        /// Rendering of the offending value.
        value: String,
    },
}

/// Fatal errors for a single descriptor's composite.
#[derive(thiserror::Error, Debug)]
pub enum CompositeError {
    /// The base asset does not exist.
    #[error("base image not found: {}", path.display())]
    MissingBase {
        /// Path that was probed.
        path: PathBuf,
    },

    /// The base asset exists but could not be decoded.
    #[error("failed to decode base image {}: {message}", path.display())]
    DecodeFailure {
        /// Path of the undecodable image.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
}

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    /// Descriptor could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Composite could not be produced.
    #[error("composite error: {0}")]
    Composite(#[from] CompositeError),

    /// Invalid caller-provided options or paths.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MergeError {
    /// Build a [`MergeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
