// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the index list field
(ANSI/VITA-49.2-2017 section 9.3.2).

The list carries a total-size word, an entry-size/entry-count word,
and the entries themselves packed 4, 2, or 1 per 32-bit word.
*/

use deku::prelude::*;

use crate::VitaError;

/// Octet width of one index list entry.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexEntrySize {
    /// One-octet entries, four per word.
    OneOctet = 1,
    /// Two-octet entries, two per word.
    TwoOctets = 2,
    /// Four-octet entries, one per word.
    FourOctets = 4,
}

/// Base index list data structure.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexList {
    total_size: u32,
    w2: u32,
    #[deku(count = "total_size.saturating_sub(2)")]
    entry_words: Vec<u32>,
}

impl IndexList {
    /// Gets the size of the index list in 32-bit words.
    pub fn size_words(&self) -> u16 {
        self.total_size.max(2) as u16
    }

    /// Gets the entry size.
    pub fn entry_size(&self) -> Result<IndexEntrySize, VitaError> {
        match (self.w2 >> 24) & 0xFF {
            1 => Ok(IndexEntrySize::OneOctet),
            2 => Ok(IndexEntrySize::TwoOctets),
            4 => Ok(IndexEntrySize::FourOctets),
            _ => Err(VitaError::OutOfRange),
        }
    }

    /// Gets the number of entries (20-bit field).
    pub fn num_entries(&self) -> u32 {
        self.w2 & 0xF_FFFF
    }

    /// Unpacks the entries into 32-bit values.
    pub fn entries(&self) -> Result<Vec<u32>, VitaError> {
        let size = self.entry_size()?;
        let count = self.num_entries() as usize;
        let per_word = 4 / size as usize;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let word = *self
                .entry_words
                .get(i / per_word)
                .ok_or(VitaError::OutOfRange)?;
            let slot = i % per_word;
            let v = match size {
                IndexEntrySize::OneOctet => (word >> (24 - slot * 8)) & 0xFF,
                IndexEntrySize::TwoOctets => (word >> (16 - slot * 16)) & 0xFFFF,
                IndexEntrySize::FourOctets => word,
            };
            out.push(v);
        }
        Ok(out)
    }

    /// Packs entries of the given size, updating the count and total
    /// size words.
    pub fn set_entries(&mut self, size: IndexEntrySize, entries: &[u32]) {
        let per_word = 4 / size as usize;
        let n_words = (entries.len() + per_word - 1) / per_word;
        let mut words = vec![0u32; n_words];
        for (i, e) in entries.iter().enumerate() {
            let slot = i % per_word;
            match size {
                IndexEntrySize::OneOctet => words[i / per_word] |= (e & 0xFF) << (24 - slot * 8),
                IndexEntrySize::TwoOctets => {
                    words[i / per_word] |= (e & 0xFFFF) << (16 - slot * 16)
                }
                IndexEntrySize::FourOctets => words[i] = *e,
            }
        }
        self.entry_words = words;
        self.w2 = ((size as u32) << 24) | ((entries.len() as u32) & 0xF_FFFF);
        self.total_size = 2 + n_words as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_octet_packing() {
        let mut list = IndexList::default();
        list.set_entries(IndexEntrySize::OneOctet, &[1, 2, 3, 4, 5]);
        assert_eq!(list.num_entries(), 5);
        assert_eq!(list.size_words(), 4);
        assert_eq!(list.entries().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(list.entry_words[0], 0x0102_0304);
        assert_eq!(list.entry_words[1], 0x0500_0000);
    }

    #[test]
    fn two_and_four_octet_packing() {
        let mut list = IndexList::default();
        list.set_entries(IndexEntrySize::TwoOctets, &[0xAAAA, 0xBBBB, 0xCCCC]);
        assert_eq!(list.entries().unwrap(), vec![0xAAAA, 0xBBBB, 0xCCCC]);
        assert_eq!(list.size_words(), 4);

        list.set_entries(IndexEntrySize::FourOctets, &[0xDEAD_BEEF]);
        assert_eq!(list.entries().unwrap(), vec![0xDEAD_BEEF]);
        assert_eq!(list.size_words(), 3);
    }
}
