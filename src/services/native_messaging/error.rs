use std::io;

/// Errors that end the native-messaging stream
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// The stream ended before a full length prefix arrived
    #[error("stream closed after {received} of {expected} length-prefix bytes")]
    Closed {
        /// Prefix bytes read before end of stream
        received: usize,
        /// Width of the length prefix
        expected: usize,
    },

    /// A length prefix declared more bytes than allowed
    #[error("frame of {len} bytes exceeds the {max}-byte limit")]
    TooLarge {
        /// Declared or actual payload length
        len: u64,
        /// Configured maximum
        max: usize,
    },

    /// Reading or writing the stream failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FrameError {
    /// Whether this is a clean end of stream between frames
    pub fn is_clean_eof(&self) -> bool {
        matches!(self, FrameError::Closed { received: 0, .. })
    }
}
