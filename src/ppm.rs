//! Raw PPM (P6) serialization of a decoded raster.

use std::io::Write;

use crate::error::Result;

/// Writes an RGB buffer as binary PPM: `P6\n<W> <H>\n255\n` followed by
/// the raw bytes.
pub fn write_ppm<W: Write>(out: &mut W, width: usize, height: usize, pixels: &[u8]) -> Result<()> {
    debug_assert_eq!(pixels.len(), width * height * 3);
    write!(out, "P6\n{} {}\n255\n", width, height)?;
    out.write_all(pixels)?;
    Ok(())
}
