use crate::prelude::*;

use bytes::{BufMut, Bytes, BytesMut};
use nom::bytes::complete::{tag, take, take_while_m_n};
use nom::combinator::{all_consuming, map, map_res};
use nom::sequence::{preceded, terminated};
use nom::IResult;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Total wire length of one frame, terminator included.
pub const WIRE_LEN: usize = 23;
/// Raw payload bytes carried by every frame.
pub const PAYLOAD_LEN: usize = 8;

// largest address representable in the two-decimal-digit wire field
const ADDRESS_MAX: u8 = 99;

// FrameKind {{{
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FrameKind {
    Request = b'$',
    Response = b'&',
}
// }}}

// Frame {{{

/// One request or response unit exchanged with the inverter.
///
/// Obtained either by parsing wire bytes or by building from field values;
/// immutable afterwards. The exact wire image is retained and is the sole
/// basis for equality and hashing.
#[derive(Clone, Debug)]
pub struct Frame {
    pub kind: FrameKind,
    pub to: u8,
    pub from: u8,
    pub command: u8,
    pub payload: [u8; PAYLOAD_LEN],
    pub checksum: u8,
    raw: Bytes,
}

impl Frame {
    /// Decodes a complete wire frame, anchored at both ends.
    ///
    /// The transmitted checksum is recomputed over the decoded fields; a
    /// disagreement is reported separately from a grammar failure.
    pub fn parse(input: &[u8]) -> Result<Self, FrameError> {
        if input.len() != WIRE_LEN {
            return Err(FrameError::MalformedFrame(input.to_vec()));
        }

        let (_, (kind, to, from, command, data, received)) = all_consuming(wire_parts)(input)
            .map_err(|_| FrameError::MalformedFrame(input.to_vec()))?;

        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(data);

        let computed = Self::checksum(to, from, command, &payload);
        if computed != received {
            return Err(FrameError::ChecksumMismatch { received, computed });
        }

        Ok(Self {
            kind,
            to,
            from,
            command,
            payload,
            checksum: received,
            raw: Bytes::copy_from_slice(input),
        })
    }

    /// Formats a frame from field values, the structural inverse of
    /// [`Frame::parse`]. The checksum is always computed, never supplied.
    pub fn build(
        kind: FrameKind,
        to: u8,
        from: u8,
        command: u8,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        if payload.len() != PAYLOAD_LEN {
            return Err(FrameError::InvalidPayloadLength(payload.len()));
        }
        for (field, value) in [("to", to), ("from", from)] {
            if value > ADDRESS_MAX {
                return Err(FrameError::FieldOutOfRange {
                    field,
                    value,
                    max: ADDRESS_MAX,
                });
            }
        }

        let mut data = [0u8; PAYLOAD_LEN];
        data.copy_from_slice(payload);
        let checksum = Self::checksum(to, from, command, &data);

        let mut raw = BytesMut::with_capacity(WIRE_LEN);
        raw.put_u8(u8::from(kind));
        raw.extend_from_slice(format!("{:02};{:02};{:02X};", to, from, command).as_bytes());
        raw.extend_from_slice(&data);
        raw.extend_from_slice(format!("*{:02X}\r\n", checksum).as_bytes());

        Ok(Self {
            kind,
            to,
            from,
            command,
            payload: data,
            checksum,
            raw: raw.freeze(),
        })
    }

    /// Checksum over the addressing fields and payload.
    ///
    /// The device sums to/from/command modulo 0xff (not 0x100), then
    /// XOR-folds the payload bytes over that seed in a single accumulator.
    pub fn checksum(to: u8, from: u8, command: u8, payload: &[u8; PAYLOAD_LEN]) -> u8 {
        let mut sum = 0u16;
        for field in [to, from, command] {
            sum = (sum + u16::from(field)) % 0xff;
        }
        payload.iter().fold(sum as u8, |acc, byte| acc ^ byte)
    }

    /// The exact wire image this frame was parsed from or built to.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn bytes(&self) -> Bytes {
        self.raw.clone()
    }
}

// equality and hashing are over the wire image, nothing else
impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl Eq for Frame {}

impl std::hash::Hash for Frame {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw.escape_ascii())
    }
}
// }}}

// wire grammar {{{
//
// <marker:1> <to:2> ; <from:2> ; <cmd:2> ; <payload:8> * <checksum:2> \r\n
//
// to/from are decimal digit pairs, cmd/checksum uppercase hex pairs, the
// payload is taken positionally and may hold any byte value.

type WireParts<'a> = (FrameKind, u8, u8, u8, &'a [u8], u8);

fn wire_parts(input: &[u8]) -> IResult<&[u8], WireParts<'_>> {
    let (input, kind) = map_res(take(1usize), |m: &[u8]| FrameKind::try_from(m[0]))(input)?;
    let (input, to) = terminated(dec2, tag(b";"))(input)?;
    let (input, from) = terminated(dec2, tag(b";"))(input)?;
    let (input, command) = terminated(hex2, tag(b";"))(input)?;
    let (input, payload) = take(PAYLOAD_LEN)(input)?;
    let (input, checksum) = preceded(tag(b"*"), hex2)(input)?;
    let (input, _) = tag(b"\r\n")(input)?;

    Ok((input, (kind, to, from, command, payload, checksum)))
}

fn dec2(input: &[u8]) -> IResult<&[u8], u8> {
    map(
        take_while_m_n(2, 2, |b: u8| b.is_ascii_digit()),
        |digits: &[u8]| (digits[0] - b'0') * 10 + (digits[1] - b'0'),
    )(input)
}

fn hex2(input: &[u8]) -> IResult<&[u8], u8> {
    map(
        take_while_m_n(2, 2, is_upper_hex),
        |digits: &[u8]| (hex_val(digits[0]) << 4) | hex_val(digits[1]),
    )(input)
}

fn is_upper_hex(b: u8) -> bool {
    b.is_ascii_digit() || (b'A'..=b'F').contains(&b)
}

fn hex_val(b: u8) -> u8 {
    if b.is_ascii_digit() {
        b - b'0'
    } else {
        b - b'A' + 10
    }
}
// }}}
