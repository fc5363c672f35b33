//! Huffman table construction and symbol decoding for JPEG entropy data.
//!
//! Tables are built from the DHT payload's 16-entry length histogram plus
//! symbol list by the canonical construction: walk lengths 1..=16 with a
//! rolling code, assign one code per symbol, then shift the code left when
//! moving to the next length. Decoding accumulates bits MSB-first and checks
//! the accumulated (length, code) pair against the table at every length.

use std::fmt;

use crate::bitstream::BitReader;
use crate::error::{Error, Result};

/// Maximum Huffman code length in bits
pub const MAX_CODE_LENGTH: usize = 16;

/// Table class: DC difference tables or AC run/length tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc,
    Ac,
}

impl fmt::Display for TableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableClass::Dc => write!(f, "DC"),
            TableClass::Ac => write!(f, "AC"),
        }
    }
}

/// Canonical Huffman decode table.
///
/// Conceptually a map from (code length, code value) to symbol; stored as
/// length-indexed first/last code ranges over the symbol list, which
/// preserves the same lookup contract without a per-code allocation.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    class: TableClass,
    slot: u8,
    /// Symbols in code order (shorter codes first)
    values: Vec<u8>,
    /// Smallest code of each length (index 1-16)
    min_code: [u32; MAX_CODE_LENGTH + 1],
    /// Largest code of each length, or -1 when the length is unused
    max_code: [i32; MAX_CODE_LENGTH + 1],
    /// Index into `values` of the first symbol of each length
    val_index: [usize; MAX_CODE_LENGTH + 1],
}

impl HuffmanTable {
    /// Builds a table from a DHT length histogram and symbol list.
    ///
    /// `bits[i]` is the number of codes of length i+1; `values` holds the
    /// symbols in order of increasing code length.
    pub fn new(class: TableClass, slot: u8, bits: &[u8; 16], values: Vec<u8>) -> Result<Self> {
        let total: usize = bits.iter().map(|&b| b as usize).sum();
        if values.len() != total {
            return Err(Error::MalformedStream {
                reason: "DHT symbol count does not match length histogram",
            });
        }

        let mut table = Self {
            class,
            slot,
            values,
            min_code: [0; MAX_CODE_LENGTH + 1],
            max_code: [-1; MAX_CODE_LENGTH + 1],
            val_index: [0; MAX_CODE_LENGTH + 1],
        };

        let mut code: u32 = 0;
        let mut index = 0usize;
        for length in 1..=MAX_CODE_LENGTH {
            let count = bits[length - 1] as u32;
            if count > 0 {
                // All codes of one length are consecutive.
                if code + count - 1 >= (1 << length) {
                    return Err(Error::MalformedStream {
                        reason: "oversubscribed Huffman code lengths",
                    });
                }
                table.min_code[length] = code;
                table.max_code[length] = (code + count - 1) as i32;
                table.val_index[length] = index;
                code += count;
                index += count as usize;
            }
            code <<= 1;
        }

        Ok(table)
    }

    /// Number of codes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of codes with the given bit length.
    #[must_use]
    pub fn count_at_length(&self, length: usize) -> usize {
        if self.max_code[length] < 0 {
            0
        } else {
            (self.max_code[length] as u32 - self.min_code[length] + 1) as usize
        }
    }

    /// Looks up the symbol for a (length, code) pair, if one exists.
    #[must_use]
    pub fn lookup(&self, length: usize, code: u32) -> Option<u8> {
        if length == 0 || length > MAX_CODE_LENGTH || self.max_code[length] < 0 {
            return None;
        }
        if code < self.min_code[length] || code as i32 > self.max_code[length] {
            return None;
        }
        let offset = (code - self.min_code[length]) as usize;
        Some(self.values[self.val_index[length] + offset])
    }

    /// Decodes one symbol from the bit stream.
    ///
    /// Accumulates bits until the running (length, code) pair matches a
    /// table entry; more than 16 bits without a match is a hard error.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let mut code: u32 = 0;
        for length in 1..=MAX_CODE_LENGTH {
            code = (code << 1) | u32::from(reader.next_bit()?);
            if let Some(symbol) = self.lookup(length, code) {
                return Ok(symbol);
            }
        }
        Err(Error::InvalidHuffmanCode {
            class: self.class,
            slot: self.slot,
        })
    }
}

/// Holds the four Huffman table slots: class in {DC, AC} x id in {0, 1}.
#[derive(Debug, Default)]
pub struct HuffmanStore {
    tables: [[Option<HuffmanTable>; 2]; 2],
}

impl HuffmanStore {
    fn class_index(class: TableClass) -> usize {
        match class {
            TableClass::Dc => 0,
            TableClass::Ac => 1,
        }
    }

    /// Installs a table, replacing any previous table in the same slot.
    pub fn set(&mut self, class: TableClass, slot: u8, table: HuffmanTable) {
        self.tables[Self::class_index(class)][slot as usize] = Some(table);
    }

    /// Fetches the table for a scan, failing if it was never defined.
    pub fn get(&self, class: TableClass, slot: u8) -> Result<&HuffmanTable> {
        if slot as usize >= 2 {
            return Err(Error::MalformedStream {
                reason: "Huffman table slot out of range",
            });
        }
        self.tables[Self::class_index(class)][slot as usize]
            .as_ref()
            .ok_or(Error::TableMissing {
                kind: "Huffman",
                slot,
            })
    }
}

/// Parses a DHT payload, which may define several tables back to back.
///
/// Each table is a class/id byte, 16 length counts, then the symbols.
pub fn parse_dht(payload: &[u8], store: &mut HuffmanStore) -> Result<()> {
    let mut pos = 0usize;
    while pos < payload.len() {
        let header = payload[pos];
        pos += 1;
        let class = match header >> 4 {
            0 => TableClass::Dc,
            1 => TableClass::Ac,
            _ => {
                return Err(Error::MalformedStream {
                    reason: "invalid Huffman table class",
                })
            }
        };
        let slot = header & 0x0F;
        if slot >= 2 {
            return Err(Error::MalformedStream {
                reason: "Huffman table slot out of range",
            });
        }

        let counts = payload.get(pos..pos + 16).ok_or(Error::MalformedStream {
            reason: "DHT segment shorter than its length histogram",
        })?;
        let mut bits = [0u8; 16];
        bits.copy_from_slice(counts);
        pos += 16;

        let total: usize = bits.iter().map(|&b| b as usize).sum();
        let symbols = payload.get(pos..pos + total).ok_or(Error::MalformedStream {
            reason: "DHT segment shorter than its symbol list",
        })?;
        pos += total;

        store.set(class, slot, HuffmanTable::new(class, slot, &bits, symbols.to_vec())?);
    }
    Ok(())
}
