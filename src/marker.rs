//! JPEG marker identification and segment framing.
//!
//! Markers are a 0xFF byte followed by a non-zero code. Outside the
//! entropy-coded data every segment other than SOI/EOI/RSTn/TEM carries a
//! two-byte big-endian length that includes the length field itself.

use crate::consts::marker;
use crate::error::{Error, Result};

/// The closed set of marker kinds the decoder dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Soi,
    Eoi,
    /// SOFn; the payload discriminates baseline (n = 0) from the rest
    Sof(u8),
    Dht,
    Dqt,
    Sos,
    Dri,
    Dnl,
    /// APPn with n in 0..=15
    App(u8),
    Com,
    /// RSTn with n in 0..=7
    Rst(u8),
    Tem,
    /// Reserved or unknown code
    Other(u8),
}

impl Marker {
    /// Classifies a marker code byte.
    #[must_use]
    pub fn from_code(code: u8) -> Marker {
        match code {
            marker::SOI => Marker::Soi,
            marker::EOI => Marker::Eoi,
            marker::DHT => Marker::Dht,
            marker::DQT => Marker::Dqt,
            marker::SOS => Marker::Sos,
            marker::DRI => Marker::Dri,
            marker::DNL => Marker::Dnl,
            marker::COM => Marker::Com,
            marker::TEM => Marker::Tem,
            marker::SOF0..=0xCF => Marker::Sof(code - marker::SOF0),
            marker::RST0..=0xD7 => Marker::Rst(code - marker::RST0),
            marker::APP0..=0xEF => Marker::App(code - marker::APP0),
            other => Marker::Other(other),
        }
    }
}

/// Reads the next marker at `pos`, skipping 0xFF fill bytes.
///
/// Returns the marker and the position just past its code byte. Anything
/// other than fill bytes before the marker is a framing error.
pub fn next_marker(data: &[u8], pos: usize) -> Result<(Marker, usize)> {
    let mut pos = pos;
    if pos >= data.len() {
        return Err(Error::MalformedStream {
            reason: "stream ended before EOI",
        });
    }
    if data[pos] != 0xFF {
        return Err(Error::MalformedStream {
            reason: "expected a marker",
        });
    }
    // Optional fill bytes: any number of 0xFF before the code.
    while pos < data.len() && data[pos] == 0xFF {
        pos += 1;
    }
    let code = *data.get(pos).ok_or(Error::MalformedStream {
        reason: "stream ended before EOI",
    })?;
    if code == 0x00 {
        return Err(Error::MalformedStream {
            reason: "stuffed byte outside entropy-coded data",
        });
    }
    Ok((Marker::from_code(code), pos + 1))
}

/// Reads a length-delimited segment payload starting at `pos`.
///
/// Returns the payload (without the length field) and the position of the
/// first byte after the segment.
pub fn read_segment(data: &[u8], pos: usize) -> Result<(&[u8], usize)> {
    let header = data.get(pos..pos + 2).ok_or(Error::MalformedStream {
        reason: "segment length field overruns the input",
    })?;
    let length = u16::from_be_bytes([header[0], header[1]]) as usize;
    if length < 2 {
        return Err(Error::MalformedStream {
            reason: "segment length shorter than the length field",
        });
    }
    let payload = data.get(pos + 2..pos + length).ok_or(Error::MalformedStream {
        reason: "segment overruns the input",
    })?;
    Ok((payload, pos + length))
}
