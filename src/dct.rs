//! Inverse DCT for JPEG decoding.
//!
//! Implements the 8x8 inverse DCT-II as two separable 1-D passes over a
//! table of precomputed cosines, reducing the naive O(64^2) evaluation to
//! 2 x 8 x 64 multiply-adds per block:
//!
//! ```text
//! f(x,y) = (1/4) * sum_u sum_v C(u) C(v) F(u,v) cos((2x+1)u pi/16) cos((2y+1)v pi/16)
//! ```
//!
//! with C(0) = 1/sqrt(2) and C(k) = 1 otherwise.

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use crate::consts::{DCTSIZE, DCTSIZE2, ZIGZAG};
use crate::types::Block;

/// Size of the cosine lookup table; indices reach (2*7 + 1) * 7 = 105.
const COS_TABLE_SIZE: usize = 200;

/// Inverse DCT engine owned by a decode session.
///
/// Holds the cosine table cos(k * pi/16) so the separable passes can index
/// it directly with (2x+1)*u.
pub struct Idct {
    cos: [f32; COS_TABLE_SIZE],
}

impl Default for Idct {
    fn default() -> Self {
        Self::new()
    }
}

impl Idct {
    #[must_use]
    pub fn new() -> Self {
        let mut cos = [0.0f32; COS_TABLE_SIZE];
        for (k, entry) in cos.iter_mut().enumerate() {
            *entry = (k as f32 * PI / 16.0).cos();
        }
        Self { cos }
    }

    /// Transforms a block of frequency coefficients (natural order) into
    /// spatial samples, in place.
    pub fn transform(&self, block: &mut Block) {
        // Pass 1: 1-D inverse transform along each row.
        let mut tmp = [0.0f32; DCTSIZE2];
        for row in 0..DCTSIZE {
            for x in 0..DCTSIZE {
                let mut sum = 0.0;
                for u in 0..DCTSIZE {
                    sum += scale(u) * block[row * DCTSIZE + u] * self.cos[(2 * x + 1) * u];
                }
                tmp[row * DCTSIZE + x] = sum / 2.0;
            }
        }

        // Pass 2: along each column.
        for col in 0..DCTSIZE {
            for y in 0..DCTSIZE {
                let mut sum = 0.0;
                for u in 0..DCTSIZE {
                    sum += scale(u) * tmp[u * DCTSIZE + col] * self.cos[(2 * y + 1) * u];
                }
                block[y * DCTSIZE + col] = sum / 2.0;
            }
        }
    }
}

#[inline]
fn scale(u: usize) -> f32 {
    if u == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// Reorders a block from stored (zigzag) order to natural row-major order.
#[must_use]
pub fn zigzag_to_natural(block: &Block) -> Block {
    let mut out: Block = [0.0; DCTSIZE2];
    for (stored, &natural) in ZIGZAG.iter().enumerate() {
        out[natural] = block[stored];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct evaluation of the 2-D inverse DCT definition.
    fn reference_idct(coeffs: &Block) -> Block {
        let mut out: Block = [0.0; DCTSIZE2];
        for x in 0..DCTSIZE {
            for y in 0..DCTSIZE {
                let mut sum = 0.0f64;
                for u in 0..DCTSIZE {
                    for v in 0..DCTSIZE {
                        let cu = if u == 0 { 1.0 / 2f64.sqrt() } else { 1.0 };
                        let cv = if v == 0 { 1.0 / 2f64.sqrt() } else { 1.0 };
                        sum += cu
                            * cv
                            * f64::from(coeffs[u * DCTSIZE + v])
                            * ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos()
                            * ((2 * y + 1) as f64 * v as f64 * std::f64::consts::PI / 16.0).cos();
                    }
                }
                out[x * DCTSIZE + y] = (sum / 4.0) as f32;
            }
        }
        out
    }

    #[test]
    fn test_dc_only_block_is_flat() {
        let idct = Idct::new();
        let mut block: Block = [0.0; DCTSIZE2];
        block[0] = 128.0;
        idct.transform(&mut block);

        for (i, &v) in block.iter().enumerate() {
            assert!((v - 16.0).abs() < 1e-3, "sample {} = {}", i, v);
        }
    }

    #[test]
    fn test_matches_direct_evaluation() {
        let idct = Idct::new();
        let mut coeffs: Block = [0.0; DCTSIZE2];
        coeffs[0] = 80.0;
        coeffs[1] = -30.0;
        coeffs[8] = 25.0;
        coeffs[9] = 12.5;
        coeffs[34] = -7.0;
        coeffs[63] = 3.0;

        let expected = reference_idct(&coeffs);
        let mut block = coeffs;
        idct.transform(&mut block);

        for i in 0..DCTSIZE2 {
            assert!(
                (block[i] - expected[i]).abs() < 1e-2,
                "sample {}: {} vs {}",
                i,
                block[i],
                expected[i]
            );
        }
    }

    #[test]
    fn test_single_ac_basis_function() {
        // F(0,1) alone produces a horizontal cosine ramp, constant down
        // each column.
        let idct = Idct::new();
        let mut block: Block = [0.0; DCTSIZE2];
        block[1] = 64.0;
        idct.transform(&mut block);

        for col in 0..DCTSIZE {
            for row in 1..DCTSIZE {
                assert!(
                    (block[row * DCTSIZE + col] - block[col]).abs() < 1e-3,
                    "column {} not constant",
                    col
                );
            }
        }
        // Antisymmetric left/right for the first harmonic.
        for col in 0..DCTSIZE {
            assert!((block[col] + block[DCTSIZE - 1 - col]).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zigzag_round_trip() {
        let mut stored: Block = [0.0; DCTSIZE2];
        for (i, v) in stored.iter_mut().enumerate() {
            *v = i as f32;
        }
        let natural = zigzag_to_natural(&stored);

        // Spot-check the standard permutation: natural (0,1) comes from
        // stored index 1, (1,0) from 2, (7,7) from 63.
        assert_eq!(natural[1], 1.0);
        assert_eq!(natural[8], 2.0);
        assert_eq!(natural[16], 3.0);
        assert_eq!(natural[9], 4.0);
        assert_eq!(natural[63], 63.0);

        // Invert the permutation and recover the stored order exactly.
        let mut recovered: Block = [0.0; DCTSIZE2];
        for (stored_idx, &natural_idx) in ZIGZAG.iter().enumerate() {
            recovered[stored_idx] = natural[natural_idx];
        }
        assert_eq!(recovered, stored);
    }
}
