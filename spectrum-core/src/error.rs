//! Error types

/// Result type alias for spectrum operations.
pub type Result<T> = std::result::Result<T, Error>;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The analyzer was handed a window of the wrong length
    #[error("invalid window size: expected {expected} samples, got {actual}")]
    InvalidWindowSize { expected: usize, actual: usize },

    /// A bar index outside of `0..count` was requested
    #[error("bar {index} out of range ({count} bars)")]
    BarOutOfRange { index: usize, count: usize },

    /// Bar count and window length do not give at least one bucket per bar
    #[error("cannot split a window of {window} samples into {count} bars")]
    InvalidBarLayout { count: usize, window: usize },

    /// The decoder could not read the stream.  Ends the session.
    #[error("decode failure: {0}")]
    DecodeFailure(#[source] BoxedError),

    /// The output device refused samples
    #[error("output failure: {0}")]
    OutputFailure(#[source] BoxedError),

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("playback thread panicked")]
    PlaybackPanicked,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn decode<E: Into<BoxedError>>(err: E) -> Error {
        Error::DecodeFailure(err.into())
    }

    pub fn output<E: Into<BoxedError>>(err: E) -> Error {
        Error::OutputFailure(err.into())
    }
}
