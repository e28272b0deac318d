use thiserror::Error;

use crate::sitop::frame::Frame;

/// Failures raised by the frame codec.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The input does not match the wire grammar.
    #[error("malformed frame: {}", .0.escape_ascii())]
    MalformedFrame(Vec<u8>),

    /// The grammar matched but the transmitted checksum disagrees with the
    /// one recomputed over the decoded fields.
    #[error("checksum mismatch: frame carries {received:#04X}, computed {computed:#04X}")]
    ChecksumMismatch { received: u8, computed: u8 },

    /// Frames carry exactly eight payload bytes.
    #[error("payload must be exactly 8 bytes, got {0}")]
    InvalidPayloadLength(usize),

    /// An address larger than its two-digit wire field can carry.
    #[error("{field} address {value} does not fit in two decimal digits (max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },
}

/// Failures raised by the capture replay store.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// No recorded exchange has a byte-identical request.
    #[error("no recorded exchange matches request {0}")]
    PairNotFound(Frame),

    /// A capture line that cannot yield a byte at the configured offset.
    #[error("capture line {line}: {reason}")]
    CaptureLine { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
