//! Main decoder implementation.
//!
//! Walks the marker stream, builds the table store, and for each scan runs
//! the entropy decoder and the per-block pipeline (dequantize, zigzag
//! reorder, inverse DCT) before upsampling and color-converting into the
//! output raster. The raster is allocated at the declared image size, so
//! MCU padding on the right and bottom edges is discarded as it is
//! rendered.

use imgref::{Img, ImgVec};
use rgb::RGB8;

use crate::color::ycbcr_to_rgb;
use crate::dct::{zigzag_to_natural, Idct};
use crate::entropy::EntropyDecoder;
use crate::error::{Error, Result};
use crate::huffman::{parse_dht, HuffmanStore, TableClass};
use crate::marker::{next_marker, read_segment, Marker};
use crate::quant::{dequantize, parse_dqt, QuantStore};
use crate::types::{Component, FrameInfo, JfifInfo, Mcu, NUM_COMPONENTS};

/// Decodes a baseline JFIF JPEG byte stream into an RGB image.
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    Decoder::new(data).decode()
}

/// One decode session over an in-memory JPEG byte stream.
///
/// All decode state (tables, frame layout, bit cursor, DC predictors) is
/// owned by the session; nothing outlives `decode()`.
pub struct Decoder<'a> {
    data: &'a [u8],
    quant: QuantStore,
    huffman: HuffmanStore,
    frame: Option<FrameInfo>,
    jfif: Option<JfifInfo>,
    trace: bool,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over a complete JPEG file image.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            quant: QuantStore::default(),
            huffman: HuffmanStore::default(),
            frame: None,
            jfif: None,
            trace: std::env::var("DEBUG_MARKERS").is_ok(),
        }
    }

    /// Runs the decode to completion.
    pub fn decode(mut self) -> Result<DecodedImage> {
        let data = self.data;

        let (first, mut pos) = next_marker(data, 0)?;
        if first != Marker::Soi {
            return Err(Error::MalformedStream {
                reason: "missing SOI",
            });
        }

        let mut pixels: Option<Vec<u8>> = None;
        loop {
            let (m, after) = next_marker(data, pos)?;
            pos = after;
            if self.trace {
                eprintln!("marker: {:?}", m);
            }
            match m {
                Marker::Eoi => break,
                Marker::Soi => {
                    return Err(Error::MalformedStream {
                        reason: "duplicate SOI",
                    })
                }
                Marker::Sof(0) => {
                    let (payload, next) = read_segment(data, pos)?;
                    self.parse_sof(payload)?;
                    pos = next;
                }
                Marker::Sof(_) => {
                    return Err(Error::UnsupportedFeature {
                        feature: "non-baseline SOF",
                    })
                }
                Marker::Dqt => {
                    let (payload, next) = read_segment(data, pos)?;
                    parse_dqt(payload, &mut self.quant)?;
                    pos = next;
                }
                Marker::Dht => {
                    let (payload, next) = read_segment(data, pos)?;
                    parse_dht(payload, &mut self.huffman)?;
                    pos = next;
                }
                Marker::Sos => {
                    let (payload, next) = read_segment(data, pos)?;
                    let order = self.parse_sos(payload)?;
                    let (scan_pixels, consumed) = self.decode_scan(next, &order)?;
                    pixels = Some(scan_pixels);
                    pos = next + consumed;
                }
                Marker::App(0) => {
                    let (payload, next) = read_segment(data, pos)?;
                    if let Some(info) = parse_app0(payload) {
                        self.jfif = Some(info);
                    }
                    pos = next;
                }
                Marker::App(_) | Marker::Com | Marker::Dri | Marker::Dnl => {
                    let (_, next) = read_segment(data, pos)?;
                    pos = next;
                }
                Marker::Tem => {}
                Marker::Rst(_) => {
                    return Err(Error::MalformedStream {
                        reason: "unexpected restart marker",
                    })
                }
                Marker::Other(_) => {
                    return Err(Error::MalformedStream {
                        reason: "unexpected marker",
                    })
                }
            }
        }

        let frame = self.frame.take().ok_or(Error::MalformedStream {
            reason: "missing SOF",
        })?;
        let pixels = pixels.ok_or(Error::MalformedStream {
            reason: "missing scan data",
        })?;
        Ok(DecodedImage {
            width: frame.width,
            height: frame.height,
            pixels,
            jfif: self.jfif,
        })
    }

    fn parse_sof(&mut self, payload: &[u8]) -> Result<()> {
        if self.frame.is_some() {
            return Err(Error::MalformedStream {
                reason: "duplicate frame header",
            });
        }
        if payload.len() < 6 {
            return Err(Error::MalformedStream {
                reason: "frame header too short",
            });
        }
        if payload[0] != 8 {
            return Err(Error::UnsupportedFeature {
                feature: "sample precision other than 8",
            });
        }
        let height = u16::from_be_bytes([payload[1], payload[2]]) as usize;
        let width = u16::from_be_bytes([payload[3], payload[4]]) as usize;
        if width == 0 || height == 0 {
            return Err(Error::MalformedStream {
                reason: "zero image dimensions",
            });
        }
        if payload[5] as usize != NUM_COMPONENTS {
            return Err(Error::UnsupportedFeature {
                feature: "component count other than 3",
            });
        }
        if payload.len() < 6 + 3 * NUM_COMPONENTS {
            return Err(Error::MalformedStream {
                reason: "frame header too short",
            });
        }

        let mut components = [Component {
            id: 0,
            h: 1,
            v: 1,
            quant_slot: 0,
            dc_slot: 0,
            ac_slot: 0,
        }; NUM_COMPONENTS];
        let mut h_max = 0u8;
        let mut v_max = 0u8;
        for (i, comp) in components.iter_mut().enumerate() {
            let base = 6 + 3 * i;
            let hv = payload[base + 1];
            let (h, v) = (hv >> 4, hv & 0x0F);
            if h == 0 || v == 0 {
                return Err(Error::MalformedStream {
                    reason: "zero sampling factor",
                });
            }
            if h > 2 || v > 2 {
                return Err(Error::UnsupportedFeature {
                    feature: "sampling factors above 2x2",
                });
            }
            let quant_slot = payload[base + 2];
            if quant_slot >= 4 {
                return Err(Error::MalformedStream {
                    reason: "quantization table slot out of range",
                });
            }
            comp.id = payload[base];
            comp.h = h;
            comp.v = v;
            comp.quant_slot = quant_slot;
            h_max = h_max.max(h);
            v_max = v_max.max(v);
        }

        self.frame = Some(FrameInfo {
            width,
            height,
            components,
            h_max,
            v_max,
        });
        Ok(())
    }

    /// Parses the scan header, assigning entropy-table slots to the frame
    /// components, and returns the interleave order of the scan.
    fn parse_sos(&mut self, payload: &[u8]) -> Result<[usize; NUM_COMPONENTS]> {
        let frame = self.frame.as_mut().ok_or(Error::MalformedStream {
            reason: "SOS before SOF",
        })?;
        if payload.is_empty() {
            return Err(Error::MalformedStream {
                reason: "scan header too short",
            });
        }
        if payload[0] as usize != NUM_COMPONENTS {
            return Err(Error::UnsupportedFeature {
                feature: "scan component count other than 3",
            });
        }
        // Component selectors plus the three spectral-selection bytes,
        // which are fixed for baseline and skipped.
        if payload.len() < 1 + 2 * NUM_COMPONENTS + 3 {
            return Err(Error::MalformedStream {
                reason: "scan header too short",
            });
        }

        let mut order = [0usize; NUM_COMPONENTS];
        for (i, slot) in order.iter_mut().enumerate() {
            let selector = payload[1 + 2 * i];
            let tables = payload[2 + 2 * i];
            let idx = frame
                .components
                .iter()
                .position(|c| c.id == selector)
                .ok_or(Error::MalformedStream {
                    reason: "scan references unknown component",
                })?;
            frame.components[idx].dc_slot = tables >> 4;
            frame.components[idx].ac_slot = tables & 0x0F;
            *slot = idx;
        }
        Ok(order)
    }

    /// Decodes the entropy-coded data of one scan into an RGB raster.
    ///
    /// Returns the raster and the number of entropy bytes consumed.
    fn decode_scan(
        &self,
        start: usize,
        order: &[usize; NUM_COMPONENTS],
    ) -> Result<(Vec<u8>, usize)> {
        let frame = self.frame.as_ref().ok_or(Error::MalformedStream {
            reason: "SOS before SOF",
        })?;

        // Every table the scan references must exist before the first MCU.
        for &ci in order {
            let comp = &frame.components[ci];
            self.quant.get(comp.quant_slot)?;
            self.huffman.get(TableClass::Dc, comp.dc_slot)?;
            self.huffman.get(TableClass::Ac, comp.ac_slot)?;
        }

        let mut pixels = vec![0u8; frame.width * frame.height * 3];
        let mut entropy = EntropyDecoder::new(&self.data[start..]);
        let idct = Idct::new();

        for mcu_row in 0..frame.mcu_rows() {
            for mcu_col in 0..frame.mcu_cols() {
                let mut mcu = entropy.decode_mcu(frame, order, &self.huffman)?;
                self.process_blocks(&mut mcu, frame, &idct)?;
                render_mcu(&mcu, frame, mcu_row, mcu_col, &mut pixels);
            }
        }

        Ok((pixels, entropy.position()))
    }

    /// Runs dequantize, zigzag reorder, and inverse DCT on every block.
    fn process_blocks(&self, mcu: &mut Mcu, frame: &FrameInfo, idct: &Idct) -> Result<()> {
        for (ci, comp) in frame.components.iter().enumerate() {
            let table = self.quant.get(comp.quant_slot)?;
            for v in 0..comp.v as usize {
                for h in 0..comp.h as usize {
                    let block = &mut mcu.blocks[ci][v][h];
                    dequantize(block, table);
                    *block = zigzag_to_natural(block);
                    idct.transform(block);
                }
            }
        }
        Ok(())
    }
}

/// Upsamples, color-converts, and writes one MCU into the raster,
/// dropping any part that falls outside the declared image bounds.
fn render_mcu(mcu: &Mcu, frame: &FrameInfo, mcu_row: usize, mcu_col: usize, pixels: &mut [u8]) {
    let mcu_w = frame.mcu_width();
    let mcu_h = frame.mcu_height();
    for py in 0..mcu_h {
        let row = mcu_row * mcu_h + py;
        if row >= frame.height {
            break;
        }
        for px in 0..mcu_w {
            let col = mcu_col * mcu_w + px;
            if col >= frame.width {
                break;
            }
            let y = mcu.sample(0, &frame.components[0], py, px, frame.h_max, frame.v_max);
            let cb = mcu.sample(1, &frame.components[1], py, px, frame.h_max, frame.v_max);
            let cr = mcu.sample(2, &frame.components[2], py, px, frame.h_max, frame.v_max);
            let (r, g, b) = ycbcr_to_rgb(y, cb, cr);
            let idx = (row * frame.width + col) * 3;
            pixels[idx] = r;
            pixels[idx + 1] = g;
            pixels[idx + 2] = b;
        }
    }
}

/// Extracts JFIF version and density from an APP0 payload, if present.
fn parse_app0(payload: &[u8]) -> Option<JfifInfo> {
    if payload.len() < 12 || &payload[..5] != b"JFIF\0" {
        return None;
    }
    Some(JfifInfo {
        version: (payload[5], payload[6]),
        density_unit: payload[7],
        x_density: u16::from_be_bytes([payload[8], payload[9]]),
        y_density: u16::from_be_bytes([payload[10], payload[11]]),
    })
}

/// A decoded RGB image: row-major, top-left origin, three bytes per pixel.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    jfif: Option<JfifInfo>,
}

impl DecodedImage {
    /// Image width in pixels
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGB bytes, `3 * width * height` long
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image, returning the raw RGB buffer
    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// JFIF version and density from APP0, when the stream carried one
    #[must_use]
    pub fn jfif(&self) -> Option<JfifInfo> {
        self.jfif
    }

    /// The pixels as typed RGB values
    #[must_use]
    pub fn to_rgb_pixels(&self) -> Vec<RGB8> {
        self.pixels
            .chunks_exact(3)
            .map(|c| RGB8::new(c[0], c[1], c[2]))
            .collect()
    }

    /// Converts into an [`imgref`] 2-D view of typed pixels
    #[must_use]
    pub fn into_img(self) -> ImgVec<RGB8> {
        let (width, height) = (self.width, self.height);
        Img::new(self.to_rgb_pixels(), width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app0_parse() {
        let payload = [b'J', b'F', b'I', b'F', 0, 1, 2, 1, 0, 72, 0, 72, 0, 0];
        let info = parse_app0(&payload).unwrap();
        assert_eq!(info.version, (1, 2));
        assert_eq!(info.density_unit, 1);
        assert_eq!(info.x_density, 72);
        assert_eq!(info.y_density, 72);

        assert!(parse_app0(b"Exif\0\0").is_none());
        assert!(parse_app0(b"JFIF\0").is_none());
    }

    #[test]
    fn test_missing_soi() {
        let err = decode(&[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, Error::MalformedStream { .. }), "{:?}", err);
        let err = decode(&[0xFF, 0xDB, 0x00]).unwrap_err();
        assert!(matches!(err, Error::MalformedStream { .. }), "{:?}", err);
    }
}
