use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Width of the length prefix in front of every native-messaging frame.
///
/// The prefix is always written in the host's native byte order; both ends
/// of the pipe must agree on the width out of band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthWidth {
    /// Two-byte prefix.
    U16,

    /// Four-byte prefix, what browsers use for native messaging.
    #[default]
    U32,

    /// Eight-byte prefix.
    U64,
}

impl LengthWidth {
    /// Number of bytes the prefix occupies on the wire.
    pub fn bytes(self) -> usize {
        match self {
            LengthWidth::U16 => 2,
            LengthWidth::U32 => 4,
            LengthWidth::U64 => 8,
        }
    }

    /// Largest payload length the prefix can express.
    pub fn max_len(self) -> u64 {
        match self {
            LengthWidth::U16 => u64::from(u16::MAX),
            LengthWidth::U32 => u64::from(u32::MAX),
            LengthWidth::U64 => u64::MAX,
        }
    }
}

/// Native-messaging framing configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FramingConfig {
    /// Width of the length prefix.
    pub length_width: LengthWidth,

    /// Largest payload accepted in either direction, in bytes.
    pub max_frame_bytes: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            length_width: LengthWidth::default(),
            max_frame_bytes: 1024 * 1024,
        }
    }
}
