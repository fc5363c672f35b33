//! # zendec - Baseline JPEG Decoder
//!
//! zendec decodes baseline sequential DCT JPEG (JFIF) streams with three
//! color components and chroma subsampling up to 2x2 into 8-bit RGB
//! rasters.
//!
//! The decode pipeline is strictly sequential: marker parsing builds the
//! quantization and Huffman table store, the entropy decoder demultiplexes
//! the interleaved scan into per-component 8x8 coefficient blocks, and each
//! block runs through dequantization, zigzag reordering, and the inverse
//! DCT before chroma upsampling and YCbCr to RGB conversion.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let data = std::fs::read("photo.jpg")?;
//! let image = zendec::decode(&data)?;
//! assert_eq!(image.pixels().len(), image.width() * image.height() * 3);
//! ```
//!
//! Progressive, hierarchical, and arithmetic-coded streams are rejected
//! with [`Error::UnsupportedFeature`]; malformed streams are rejected
//! rather than resynchronized.

// Stream structure
mod consts;
mod error;
mod marker;
mod types;

// Table construction
mod huffman;
mod quant;

// Scan pipeline
mod bitstream;
mod color;
mod dct;
mod decode;
mod entropy;

// Output serialization
pub mod ppm;

// Public API
pub use decode::{decode, DecodedImage, Decoder};
pub use error::{Error, Result};
pub use huffman::{HuffmanTable, TableClass};
pub use types::JfifInfo;
