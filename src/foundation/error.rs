use std::path::PathBuf;

/// Crate-wide result alias.
pub type SketchResult<T> = Result<T, SketchError>;

/// Error taxonomy of the sketch runtime.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    /// Degenerate logical interval or unusable pixel dimensions.
    #[error("invalid canvas extent: {0}")]
    InvalidCanvasExtent(String),

    /// `pop` called while only the base style frame remains.
    #[error("style stack underflow: pop past the base frame")]
    StackUnderflow,

    /// The render target could not rasterize or submit a frame.
    #[error("render failure at frame {frame}: {message}")]
    RenderFailure {
        /// Frame count at the time of the failure.
        frame: u64,
        /// Collaborator-provided description.
        message: String,
    },

    /// Image encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Image decoding failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// The image header does not match any readable format.
    #[error("unknown image format: {0}")]
    UnknownImageFormat(String),

    /// Two images differ beyond the comparison tolerance.
    #[error("image mismatch: {0}")]
    ImageMismatch(String),

    /// A golden reference file is absent and regeneration was not requested.
    #[error("missing golden file '{}'", .0.display())]
    MissingGolden(PathBuf),

    /// Invalid configuration file content or environment override.
    #[error("config error: {0}")]
    Config(String),

    /// File system error with the offending path.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Error delivered by a shutdown event, propagated verbatim.
    #[error(transparent)]
    Shutdown(anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchError {
    /// Build an [`SketchError::InvalidCanvasExtent`].
    pub fn invalid_extent(msg: impl Into<String>) -> Self {
        Self::InvalidCanvasExtent(msg.into())
    }

    /// Build a [`SketchError::RenderFailure`] for frame `frame`.
    pub fn render(frame: u64, msg: impl Into<String>) -> Self {
        Self::RenderFailure {
            frame,
            message: msg.into(),
        }
    }

    /// Build an [`SketchError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SketchError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SketchError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`SketchError::Io`] naming the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
