use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::FrameError;
use crate::config::{FramingConfig, LengthWidth};

/// Result of reading one frame off the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete payload
    Payload(Vec<u8>),

    /// The stream ended partway through the payload
    Truncated {
        /// Declared payload length
        expected: usize,
        /// Bytes actually received
        received: usize,
    },
}

/// Length-prefixed frame codec for the native-messaging pipe.
///
/// Each frame is an unsigned length in the host's native byte order
/// followed by exactly that many payload bytes.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    width: LengthWidth,
    max_frame_bytes: usize,
}

impl FrameCodec {
    /// Create a codec from the framing configuration
    pub fn new(config: &FramingConfig) -> Self {
        Self {
            width: config.length_width,
            max_frame_bytes: config.max_frame_bytes,
        }
    }

    /// Encode `payload` as prefix plus payload bytes
    ///
    /// # Errors
    /// Returns `FrameError::TooLarge` if the payload exceeds the limit
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
        let prefix = self.encode_len(payload.len())?;
        let mut frame = Vec::with_capacity(prefix.len() + payload.len());
        frame.extend_from_slice(&prefix);
        frame.extend_from_slice(payload);
        Ok(frame)
    }

    /// Read the next frame.
    ///
    /// # Errors
    /// - `FrameError::Closed` if fewer prefix bytes than the width arrive
    /// - `FrameError::TooLarge` if the declared length exceeds the limit
    /// - `FrameError::Io` if the underlying read fails
    pub async fn read_frame<R>(&self, reader: &mut R) -> Result<ReadOutcome, FrameError>
    where
        R: AsyncRead + Unpin,
    {
        let mut prefix = [0u8; 8];
        let prefix = &mut prefix[..self.width.bytes()];
        let received = read_full(reader, prefix).await?;
        if received < prefix.len() {
            return Err(FrameError::Closed {
                received,
                expected: prefix.len(),
            });
        }

        let len = self.decode_len(prefix);
        if len > self.max_frame_bytes as u64 {
            return Err(FrameError::TooLarge {
                len,
                max: self.max_frame_bytes,
            });
        }

        let expected = len as usize;
        let mut payload = vec![0u8; expected];
        let received = read_full(reader, &mut payload).await?;
        if received < expected {
            return Ok(ReadOutcome::Truncated { expected, received });
        }

        Ok(ReadOutcome::Payload(payload))
    }

    /// Write one frame and flush it
    ///
    /// # Errors
    /// Returns error if the payload is too large or the write fails
    pub async fn write_frame<W>(&self, writer: &mut W, payload: &[u8]) -> Result<(), FrameError>
    where
        W: AsyncWrite + Unpin,
    {
        let prefix = self.encode_len(payload.len())?;
        writer.write_all(&prefix).await?;
        writer.write_all(payload).await?;
        writer.flush().await?;
        Ok(())
    }

    fn encode_len(&self, len: usize) -> Result<Vec<u8>, FrameError> {
        if len > self.max_frame_bytes {
            return Err(FrameError::TooLarge {
                len: len as u64,
                max: self.max_frame_bytes,
            });
        }

        let too_large = || FrameError::TooLarge {
            len: len as u64,
            max: self.max_frame_bytes,
        };

        let bytes = match self.width {
            LengthWidth::U16 => u16::try_from(len)
                .map_err(|_| too_large())?
                .to_ne_bytes()
                .to_vec(),
            LengthWidth::U32 => u32::try_from(len)
                .map_err(|_| too_large())?
                .to_ne_bytes()
                .to_vec(),
            LengthWidth::U64 => (len as u64).to_ne_bytes().to_vec(),
        };
        Ok(bytes)
    }

    fn decode_len(&self, prefix: &[u8]) -> u64 {
        match self.width {
            LengthWidth::U16 => u64::from(u16::from_ne_bytes([prefix[0], prefix[1]])),
            LengthWidth::U32 => u64::from(u32::from_ne_bytes([
                prefix[0], prefix[1], prefix[2], prefix[3],
            ])),
            LengthWidth::U64 => u64::from_ne_bytes([
                prefix[0], prefix[1], prefix[2], prefix[3], prefix[4], prefix[5], prefix[6],
                prefix[7],
            ]),
        }
    }
}

/// Read until `buf` is full or the stream ends, returning the byte count
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
