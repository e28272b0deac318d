use crate::prelude::*;

use bytes::{BufMut, Bytes, BytesMut};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// Capture format defaults, matching the dump tool this store replays.
pub const DEFAULT_HEX_OFFSET: usize = 4;
pub const DEFAULT_INCOMING_PREFIX: &str = "> ";

// DumpPair {{{

/// One reconstructed request/response exchange, in capture order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DumpPair {
    pub request: Frame,
    pub response: Frame,
}
// }}}

// DroppedPair {{{

/// A reconstructed exchange whose bytes did not decode as frames. Dropped
/// during ingestion and kept for diagnostics; never served by lookup.
#[derive(Debug)]
pub struct DroppedPair {
    pub request: Bytes,
    pub response: Bytes,
    pub reason: FrameError,
}
// }}}

// ReplayStore {{{

/// Serves recorded responses for previously captured request traffic.
///
/// The capture file is read fully during construction; the store is
/// read-only afterwards, so concurrent lookups need no synchronization.
#[derive(Debug)]
pub struct ReplayStore {
    pairs: Vec<DumpPair>,
    dropped: Vec<DroppedPair>,
}

impl ReplayStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        Self::with_format(path, DEFAULT_HEX_OFFSET, DEFAULT_INCOMING_PREFIX)
    }

    pub fn from_config(dump: &config::Dump) -> Result<Self, ReplayError> {
        Self::with_format(dump.file(), dump.hex_offset(), dump.incoming_prefix())
    }

    pub fn with_format<P: AsRef<Path>>(
        path: P,
        hex_offset: usize,
        incoming_prefix: &str,
    ) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        info!("loading capture dump from {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let store = Self::from_reader(reader, hex_offset, incoming_prefix)?;

        info!(
            "capture dump loaded: {} exchanges, {} dropped",
            store.pairs.len(),
            store.dropped.len()
        );
        Ok(store)
    }

    /// Reconstructs exchanges from capture lines.
    ///
    /// Every line carries one byte as two hex characters at `hex_offset`;
    /// lines starting with `incoming_prefix` are response traffic, all
    /// others request traffic. A pair is complete once an outgoing line
    /// follows incoming traffic, so a capture ending mid-exchange drops
    /// its in-flight pair.
    pub fn from_reader<R: BufRead>(
        reader: R,
        hex_offset: usize,
        incoming_prefix: &str,
    ) -> Result<Self, ReplayError> {
        let mut pairs = Vec::new();
        let mut dropped = Vec::new();

        let mut request = BytesMut::new();
        let mut response = BytesMut::new();
        let mut response_seen = false;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let byte = capture_byte(&line, hex_offset).map_err(|reason| {
                ReplayError::CaptureLine {
                    line: idx + 1,
                    reason,
                }
            })?;

            if line.starts_with(incoming_prefix) {
                response_seen = true;
                response.put_u8(byte);
            } else {
                if response_seen {
                    response_seen = false;
                    let pair = (request.split().freeze(), response.split().freeze());
                    Self::decode_pair(pair, &mut pairs, &mut dropped);
                }
                request.put_u8(byte);
            }
        }

        if response_seen {
            debug!(
                "discarding in-flight exchange at end of capture ({} request / {} response bytes)",
                request.len(),
                response.len()
            );
        }

        Ok(Self { pairs, dropped })
    }

    fn decode_pair(
        (request, response): (Bytes, Bytes),
        pairs: &mut Vec<DumpPair>,
        dropped: &mut Vec<DroppedPair>,
    ) {
        let decoded = Frame::parse(&request).and_then(|request| {
            Ok(DumpPair {
                request,
                response: Frame::parse(&response)?,
            })
        });

        match decoded {
            Ok(pair) => {
                debug!("captured exchange: {} -> {}", pair.request, pair.response);
                pairs.push(pair);
            }
            Err(reason) => {
                warn!("dropping undecodable exchange: {}", reason);
                dropped.push(DroppedPair {
                    request,
                    response,
                    reason,
                });
            }
        }
    }

    /// The recorded response for a byte-identical request.
    ///
    /// Linear scan in capture order; the first match wins.
    pub fn lookup(&self, request: &Frame) -> Result<&Frame, ReplayError> {
        self.pairs
            .iter()
            .find(|pair| pair.request == *request)
            .map(|pair| &pair.response)
            .ok_or_else(|| ReplayError::PairNotFound(request.clone()))
    }

    pub fn pairs(&self) -> &[DumpPair] {
        &self.pairs
    }

    /// Exchanges dropped during ingestion, for diagnostics.
    pub fn dropped(&self) -> &[DroppedPair] {
        &self.dropped
    }
}
// }}}

fn capture_byte(line: &str, offset: usize) -> Result<u8, String> {
    let field = line
        .as_bytes()
        .get(offset..offset + 2)
        .ok_or_else(|| format!("shorter than the hex field at column {}", offset))?;

    Ok((hex_digit(field[0])? << 4) | hex_digit(field[1])?)
}

fn hex_digit(b: u8) -> Result<u8, String> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        _ => Err(format!("invalid hex digit {:?}", b as char)),
    }
}
