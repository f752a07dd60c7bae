// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the ASCII GPS sentences record
(ANSI/VITA-49.2-2017 section 9.4.7).
*/

use deku::prelude::*;

use crate::encoding;

/// Base ASCII GPS data structure: an OUI word, a length-in-words word,
/// and NUL-padded ASCII sentence data.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsAscii {
    w1: u32,
    num_words: u32,
    #[deku(count = "num_words")]
    ascii: Vec<u32>,
}

impl GpsAscii {
    /// Gets the size of the ASCII GPS field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        (2 + self.num_words) as u16
    }

    /// Gets the GPS manufacturer OUI.
    pub fn manufacturer_oui(&self) -> u32 {
        self.w1 & 0xFF_FFFF
    }
    /// Sets the GPS manufacturer OUI (low 24 bits used).
    pub fn set_manufacturer_oui(&mut self, oui: u32) {
        self.w1 = (self.w1 & !0xFF_FFFF) | (oui & 0xFF_FFFF);
    }

    /// Gets the sentence data as a string (stops at the padding NULs).
    pub fn sentences(&self) -> String {
        let bytes: Vec<u8> = self.ascii.iter().flat_map(|w| w.to_be_bytes()).collect();
        encoding::unpack_ascii(&bytes, 0, bytes.len())
    }

    /// Sets the sentence data, padding to a word boundary with NULs.
    pub fn set_sentences(&mut self, sentences: &str) {
        let n_words = (sentences.len() + 3) / 4;
        let mut bytes = vec![0u8; n_words * 4];
        let bytes_len = bytes.len();
        encoding::pack_ascii(&mut bytes, 0, sentences, bytes_len);
        self.ascii = bytes
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes(c.try_into().unwrap()))
            .collect();
        self.num_words = n_words as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_round_trip() {
        let mut gps = GpsAscii::default();
        gps.set_manufacturer_oui(0x00_1234);
        gps.set_sentences("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M*47");
        assert_eq!(gps.manufacturer_oui(), 0x00_1234);
        assert_eq!(
            gps.sentences(),
            "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M*47"
        );
        // 57 bytes pad to 15 words, plus the two header words.
        assert_eq!(gps.size_words(), 17);
    }
}
