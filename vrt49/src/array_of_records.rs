// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the array-of-records container
(ANSI/VITA-49.2-2017 section 9.13.1).

Several CIF1 fields share this layout: sector scan/step, the CIF array
field, and the 2D pointing-angle structure. The container is a
total-size word, a header-size/record-size/record-count word, a
bit-mapped indicator word, an optional application-specific header, and
the concatenated fixed-size records.
*/

use deku::prelude::*;

/// Base array-of-records data structure.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayOfRecords {
    total_size: u32,
    w2: u32,
    bitmapped_indicators: u32,
    #[deku(count = "((w2 >> 24) & 0xFF).saturating_sub(3)")]
    app_header: Vec<u32>,
    #[deku(count = "((w2 >> 12) & 0xFFF) * (w2 & 0xFFF)")]
    records: Vec<u32>,
}

impl Default for ArrayOfRecords {
    fn default() -> Self {
        ArrayOfRecords {
            total_size: 3,
            w2: 3 << 24, // header is the three leading words
            bitmapped_indicators: 0,
            app_header: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl ArrayOfRecords {
    /// Gets the size of the array in 32-bit words.
    pub fn size_words(&self) -> u16 {
        self.total_size.max(3) as u16
    }

    /// Gets the header size in words (the three fixed words plus any
    /// application-specific header).
    pub fn header_size(&self) -> u32 {
        (self.w2 >> 24) & 0xFF
    }

    /// Gets the size of one record in words.
    pub fn record_size(&self) -> u32 {
        (self.w2 >> 12) & 0xFFF
    }

    /// Gets the number of records.
    pub fn num_records(&self) -> u32 {
        self.w2 & 0xFFF
    }

    /// Gets the bit-mapped indicator word describing which subfields
    /// each record carries.
    pub fn bitmapped_indicators(&self) -> u32 {
        self.bitmapped_indicators
    }

    /// Sets the bit-mapped indicator word.
    pub fn set_bitmapped_indicators(&mut self, indicators: u32) {
        self.bitmapped_indicators = indicators;
    }

    /// Gets the application-specific header words.
    pub fn app_header(&self) -> &[u32] {
        &self.app_header
    }

    /// Sets the application-specific header words.
    pub fn set_app_header(&mut self, header: Vec<u32>) {
        self.app_header = header;
        self.update_sizes();
    }

    /// Gets the record at the given index as a word slice.
    pub fn record(&self, index: u32) -> Option<&[u32]> {
        if index >= self.num_records() {
            return None;
        }
        let size = self.record_size() as usize;
        let start = index as usize * size;
        self.records.get(start..start + size)
    }

    /// Iterates over the records as word slices.
    pub fn records(&self) -> impl Iterator<Item = &[u32]> {
        self.records.chunks_exact(self.record_size().max(1) as usize)
    }

    /// Replaces the record array. All records share `record_size`
    /// words; `records` must be a whole number of them.
    pub fn set_records(&mut self, record_size: u32, records: Vec<u32>) {
        debug_assert!(record_size == 0 || records.len() % record_size as usize == 0);
        let count = if record_size == 0 {
            0
        } else {
            records.len() as u32 / record_size
        };
        self.records = records;
        self.w2 = (self.w2 & !0xFF_FFFF)
            | ((record_size & 0xFFF) << 12)
            | (count & 0xFFF);
        self.update_sizes();
    }

    fn update_sizes(&mut self) {
        let header = 3 + self.app_header.len() as u32;
        self.w2 = (self.w2 & 0x00FF_FFFF) | ((header & 0xFF) << 24);
        self.total_size = header + self.records.len() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        let mut arr = ArrayOfRecords::default();
        arr.set_bitmapped_indicators(0x8000_0000);
        arr.set_records(2, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(arr.num_records(), 3);
        assert_eq!(arr.record_size(), 2);
        assert_eq!(arr.size_words(), 9);
        assert_eq!(arr.record(1).unwrap(), &[3, 4]);
        assert_eq!(arr.record(3), None);
        assert_eq!(arr.records().count(), 3);
    }

    #[test]
    fn app_header_accounting() {
        let mut arr = ArrayOfRecords::default();
        arr.set_app_header(vec![0xAB, 0xCD]);
        arr.set_records(1, vec![7]);
        assert_eq!(arr.header_size(), 5);
        assert_eq!(arr.size_words(), 6);
        assert_eq!(arr.app_header(), &[0xAB, 0xCD]);
    }
}
