//! Native-messaging channel to the browser extension.
//!
//! Length-prefixed JSON frames over the host's stdin/stdout: inbound media
//! state and tab-close events, outbound acknowledgements and control
//! commands.

/// Stream termination errors
pub mod error;
/// Length-prefixed frame codec
pub mod frame;
/// Inbound frame processing
pub mod handler;
/// Inbound message types and decoding
pub mod message;
/// Outbound message types and queue
pub mod outbound;
/// Outbound frame writer task
pub mod writer;

pub use error::FrameError;
pub use frame::{FrameCodec, ReadOutcome};
pub use handler::UpstreamHandler;
pub use message::{Decoded, InboundMessage, MediaState, TabClosed, decode};
pub use outbound::{OutboundMessage, OutboundReceiver, OutboundSender, outbound_channel};
pub use writer::FrameWriter;
