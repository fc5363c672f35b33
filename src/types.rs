//! Core types for zendec

use crate::consts::{DCTSIZE, DCTSIZE2};

/// Number of color components in a baseline JFIF frame (Y, Cb, Cr)
pub const NUM_COMPONENTS: usize = 3;

/// Largest sampling factor supported per axis
pub const MAX_SAMPLING: usize = 2;

/// An 8x8 block of real-valued coefficients, flat in row-major order
pub type Block = [f32; DCTSIZE2];

/// One color component as declared by SOF, with the entropy-table slots
/// assigned later by SOS.
#[derive(Debug, Clone, Copy)]
pub struct Component {
    /// Component identifier from the frame header (1=Y, 2=Cb, 3=Cr)
    pub id: u8,
    /// Horizontal sampling factor (1 or 2)
    pub h: u8,
    /// Vertical sampling factor (1 or 2)
    pub v: u8,
    /// Quantization table slot (0-3)
    pub quant_slot: u8,
    /// DC Huffman table slot, assigned at SOS
    pub dc_slot: u8,
    /// AC Huffman table slot, assigned at SOS
    pub ac_slot: u8,
}

/// Frame geometry and component layout from SOF0
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub width: usize,
    pub height: usize,
    pub components: [Component; NUM_COMPONENTS],
    /// Largest horizontal sampling factor across components
    pub h_max: u8,
    /// Largest vertical sampling factor across components
    pub v_max: u8,
}

impl FrameInfo {
    /// Width of one MCU in pixels
    #[must_use]
    pub fn mcu_width(&self) -> usize {
        DCTSIZE * self.h_max as usize
    }

    /// Height of one MCU in pixels
    #[must_use]
    pub fn mcu_height(&self) -> usize {
        DCTSIZE * self.v_max as usize
    }

    /// Number of MCU columns covering the image width
    #[must_use]
    pub fn mcu_cols(&self) -> usize {
        (self.width + self.mcu_width() - 1) / self.mcu_width()
    }

    /// Number of MCU rows covering the image height
    #[must_use]
    pub fn mcu_rows(&self) -> usize {
        (self.height + self.mcu_height() - 1) / self.mcu_height()
    }
}

/// JFIF identification data from APP0 (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JfifInfo {
    /// JFIF version as (major, minor)
    pub version: (u8, u8),
    /// Density unit: 0 = aspect ratio only, 1 = dots/inch, 2 = dots/cm
    pub density_unit: u8,
    pub x_density: u16,
    pub y_density: u16,
}

/// One Minimum Coded Unit: for each component, a V x H grid of 8x8 blocks.
///
/// Indexed `blocks[component][v][h]`. Components with sampling factors
/// below the frame maximum leave their unused grid slots zeroed.
#[derive(Clone)]
pub struct Mcu {
    pub blocks: [[[Block; MAX_SAMPLING]; MAX_SAMPLING]; NUM_COMPONENTS],
}

impl Default for Mcu {
    fn default() -> Self {
        Self {
            blocks: [[[[0.0; DCTSIZE2]; MAX_SAMPLING]; MAX_SAMPLING]; NUM_COMPONENTS],
        }
    }
}

impl Mcu {
    /// Sample one component at MCU-local pixel coordinates, applying
    /// nearest-neighbor chroma upsampling.
    ///
    /// `row` and `col` address the full-resolution luma grid of the MCU;
    /// they are scaled down by the component's sampling factors relative to
    /// the frame maxima before indexing into the component's block grid.
    #[inline]
    pub fn sample(&self, idx: usize, comp: &Component, row: usize, col: usize, h_max: u8, v_max: u8) -> f32 {
        let rv = row * comp.v as usize / v_max as usize;
        let cv = col * comp.h as usize / h_max as usize;
        self.blocks[idx][rv / DCTSIZE][cv / DCTSIZE][(rv % DCTSIZE) * DCTSIZE + cv % DCTSIZE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(h: u8, v: u8) -> Component {
        Component {
            id: 1,
            h,
            v,
            quant_slot: 0,
            dc_slot: 0,
            ac_slot: 0,
        }
    }

    #[test]
    fn test_mcu_grid_covers_image() {
        let frame = FrameInfo {
            width: 17,
            height: 17,
            components: [comp(1, 1); 3],
            h_max: 1,
            v_max: 1,
        };
        assert_eq!(frame.mcu_cols(), 3);
        assert_eq!(frame.mcu_rows(), 3);

        let frame = FrameInfo {
            width: 16,
            height: 16,
            components: [comp(2, 2), comp(1, 1), comp(1, 1)],
            h_max: 2,
            v_max: 2,
        };
        assert_eq!(frame.mcu_cols(), 1);
        assert_eq!(frame.mcu_rows(), 1);
    }

    #[test]
    fn test_sample_subsampled_component() {
        let mut mcu = Mcu::default();
        // Single chroma block in a 2x2-luma MCU; mark its four corners.
        mcu.blocks[1][0][0][0] = 1.0;
        mcu.blocks[1][0][0][7] = 2.0;
        mcu.blocks[1][0][0][56] = 3.0;
        mcu.blocks[1][0][0][63] = 4.0;

        let c = comp(1, 1);
        // Every 2x2 luma-grid pixel maps back onto one chroma sample.
        assert_eq!(mcu.sample(1, &c, 0, 0, 2, 2), 1.0);
        assert_eq!(mcu.sample(1, &c, 1, 1, 2, 2), 1.0);
        assert_eq!(mcu.sample(1, &c, 0, 14, 2, 2), 2.0);
        assert_eq!(mcu.sample(1, &c, 15, 1, 2, 2), 3.0);
        assert_eq!(mcu.sample(1, &c, 15, 15, 2, 2), 4.0);
    }

    #[test]
    fn test_sample_full_resolution_component() {
        let mut mcu = Mcu::default();
        mcu.blocks[0][1][1][9] = 5.0;

        let c = comp(2, 2);
        // Full-resolution component addresses its block grid directly.
        assert_eq!(mcu.sample(0, &c, 9, 9, 2, 2), 5.0);
    }
}
