//! Error types for zendec

use std::fmt;

use crate::huffman::TableClass;

/// Result type for zendec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for zendec operations
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Underlying read or write failed
    Io(std::io::Error),
    /// The byte stream is not a well-formed baseline JPEG
    MalformedStream {
        reason: &'static str,
    },
    /// The stream is valid JPEG but uses a feature outside baseline
    /// sequential DCT with three components
    UnsupportedFeature {
        feature: &'static str,
    },
    /// No Huffman code matched within the 16-bit maximum code length
    InvalidHuffmanCode {
        class: TableClass,
        slot: u8,
    },
    /// An AC run-length would write past the last coefficient of a block
    BlockOverflow {
        index: usize,
    },
    /// The scan references a table slot that was never defined
    TableMissing {
        kind: &'static str,
        slot: u8,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::MalformedStream { reason } => {
                write!(f, "Malformed JPEG stream: {}", reason)
            }
            Error::UnsupportedFeature { feature } => {
                write!(f, "Unsupported JPEG feature: {}", feature)
            }
            Error::InvalidHuffmanCode { class, slot } => {
                write!(
                    f,
                    "No Huffman code matched within 16 bits ({} table {})",
                    class, slot
                )
            }
            Error::BlockOverflow { index } => {
                write!(f, "Coefficient run overflows 8x8 block (position {})", index)
            }
            Error::TableMissing { kind, slot } => {
                write!(f, "Scan references undefined {} table {}", kind, slot)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
