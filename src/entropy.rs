//! Entropy decoding for JPEG scans.
//!
//! Decodes the interleaved Huffman-coded coefficient stream into per-MCU
//! blocks. Each block starts with a DC differential (a category symbol
//! followed by that many magnitude bits) and continues with AC run/length
//! symbols until EOB or position 63. DC values accumulate across blocks of
//! the same component for the whole scan.

use crate::bitstream::BitReader;
use crate::consts::DCTSIZE2;
use crate::error::{Error, Result};
use crate::huffman::{HuffmanStore, HuffmanTable, TableClass};
use crate::types::{Block, FrameInfo, Mcu, NUM_COMPONENTS};

/// End-of-block: all remaining coefficients are zero
const EOB: u8 = 0x00;
/// Zero run length: sixteen zero coefficients
const ZRL: u8 = 0xF0;

/// Decoder state for one scan: the bit cursor plus DC predictors.
#[derive(Debug)]
pub struct EntropyDecoder<'a> {
    reader: BitReader<'a>,
    dc_pred: [i32; NUM_COMPONENTS],
}

impl<'a> EntropyDecoder<'a> {
    /// Creates a decoder over the entropy-coded bytes following SOS.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(data),
            dc_pred: [0; NUM_COMPONENTS],
        }
    }

    /// Bytes of entropy data consumed so far (including stuffed zeros).
    #[must_use]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Decodes one MCU in the interleaved component order of the scan.
    ///
    /// For each component, V x H blocks are decoded row by row.
    pub fn decode_mcu(
        &mut self,
        frame: &FrameInfo,
        order: &[usize; NUM_COMPONENTS],
        huffman: &HuffmanStore,
    ) -> Result<Mcu> {
        let mut mcu = Mcu::default();
        for &ci in order {
            let comp = frame.components[ci];
            let dc = huffman.get(TableClass::Dc, comp.dc_slot)?;
            let ac = huffman.get(TableClass::Ac, comp.ac_slot)?;
            for v in 0..comp.v as usize {
                for h in 0..comp.h as usize {
                    mcu.blocks[ci][v][h] = self.decode_block(ci, dc, ac)?;
                }
            }
        }
        Ok(mcu)
    }

    /// Decodes one 8x8 block, in stored (zigzag) coefficient order.
    pub fn decode_block(
        &mut self,
        component: usize,
        dc_table: &HuffmanTable,
        ac_table: &HuffmanTable,
    ) -> Result<Block> {
        let mut block: Block = [0.0; DCTSIZE2];

        // DC: category symbol, then the signed differential.
        let category = dc_table.decode(&mut self.reader)?;
        if category > 15 {
            return Err(Error::MalformedStream {
                reason: "DC category out of range",
            });
        }
        let diff = if category == 0 {
            0
        } else {
            self.receive_extend(category)?
        };
        self.dc_pred[component] += diff;
        block[0] = self.dc_pred[component] as f32;

        // AC: run/length symbols fill positions 1..63.
        let mut k = 1usize;
        while k < DCTSIZE2 {
            let symbol = ac_table.decode(&mut self.reader)?;
            match symbol {
                EOB => break,
                ZRL => {
                    if k + 16 > DCTSIZE2 {
                        return Err(Error::BlockOverflow { index: k + 15 });
                    }
                    k += 16;
                }
                _ => {
                    let zeros = (symbol >> 4) as usize;
                    let length = symbol & 0x0F;
                    if length == 0 {
                        return Err(Error::MalformedStream {
                            reason: "AC symbol with zero magnitude length",
                        });
                    }
                    k += zeros;
                    if k >= DCTSIZE2 {
                        return Err(Error::BlockOverflow { index: k });
                    }
                    block[k] = self.receive_extend(length)? as f32;
                    k += 1;
                }
            }
        }

        Ok(block)
    }

    /// Reads a `category`-bit magnitude and applies the signed-category
    /// convention: a leading 1 bit means the value is positive and read
    /// verbatim; a leading 0 means the remaining bits are complemented and
    /// the result negated.
    fn receive_extend(&mut self, category: u8) -> Result<i32> {
        let leading = self.reader.next_bit()?;
        let mut value: i32 = 1;
        for _ in 1..category {
            let bit = self.reader.next_bit()?;
            value = (value << 1)
                + if leading == 1 {
                    i32::from(bit)
                } else {
                    i32::from(bit == 0)
                };
        }
        Ok(if leading == 1 { value } else { -value })
    }
}
