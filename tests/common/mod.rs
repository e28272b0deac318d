#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

use sitop_bridge::prelude::*;

/// Canonical status poll captured from a live installation.
pub const STATUS_REQUEST: &[u8] = b"$01;00;4B;00000000*4C\r\n";
/// The recorded reply, payload is raw (non-ASCII) telemetry bytes.
pub const STATUS_RESPONSE: &[u8] = b"&00;01;4C;\x1c\x00\x1b\x00\x00\x00\xb6\x00*FC\r\n";

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Copy)]
pub enum Dir {
    Out,
    In,
}

pub struct Factory;
impl Factory {
    pub fn status_request() -> Frame {
        Frame::parse(STATUS_REQUEST).expect("canonical request frame")
    }

    pub fn status_response() -> Frame {
        Frame::parse(STATUS_RESPONSE).expect("canonical response frame")
    }

    /// A second, distinct response to the same command.
    pub fn idle_response() -> Frame {
        Frame::build(FrameKind::Response, 0, 1, 0x4C, &[0; 8]).expect("idle response frame")
    }

    pub fn outgoing_line(byte: u8) -> String {
        format!("<   {:02X}", byte)
    }

    pub fn incoming_line(byte: u8) -> String {
        format!(">   {:02X}", byte)
    }

    /// One capture line per byte, tagged with its direction.
    pub fn capture_lines(traffic: &[(Dir, &[u8])]) -> String {
        let mut lines = String::new();
        for (dir, bytes) in traffic {
            for byte in *bytes {
                match dir {
                    Dir::Out => lines.push_str(&Self::outgoing_line(*byte)),
                    Dir::In => lines.push_str(&Self::incoming_line(*byte)),
                }
                lines.push('\n');
            }
        }
        lines
    }

    pub fn capture_file(traffic: &[(Dir, &[u8])]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create capture file");
        file.write_all(Self::capture_lines(traffic).as_bytes())
            .expect("write capture file");
        file
    }
}
