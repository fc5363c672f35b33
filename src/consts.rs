//! Constants and tables for JPEG decoding

/// DCT block dimension
pub const DCTSIZE: usize = 8;

/// DCT block size (8x8 = 64)
pub const DCTSIZE2: usize = 64;

/// Zigzag scan order: maps zigzag position to natural (row-major) position.
/// Coefficients arrive from the entropy stream (and quantization tables from
/// DQT) in zigzag order; `ZIGZAG[k]` is where the k-th stored coefficient
/// lands in the natural 8x8 layout.
#[rustfmt::skip]
pub const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// JPEG markers
pub mod marker {
    pub const SOI: u8 = 0xD8; // Start of image
    pub const EOI: u8 = 0xD9; // End of image
    pub const SOF0: u8 = 0xC0; // Baseline DCT
    pub const DHT: u8 = 0xC4; // Define Huffman table
    pub const DQT: u8 = 0xDB; // Define quantization table
    pub const DRI: u8 = 0xDD; // Define restart interval
    pub const DNL: u8 = 0xDC; // Define number of lines
    pub const SOS: u8 = 0xDA; // Start of scan
    pub const APP0: u8 = 0xE0; // JFIF marker (first of APP0..APP15)
    pub const COM: u8 = 0xFE; // Comment
    pub const RST0: u8 = 0xD0; // First restart marker (RST0..RST7)
    pub const TEM: u8 = 0x01; // Temporary / standalone reserved marker
}
