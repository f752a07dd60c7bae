// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Structures and methods related to the class identifier
field (ANSI/VITA-49.2-2017 section 5.1.3).
*/
use core::fmt;

use deku::prelude::*;

use crate::utils;
use crate::VitaError;

/// Base class identifier data structure.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassIdentifier {
    word_1: u32,
    information_class_code: u16,
    packet_class_code: u16,
}

impl ClassIdentifier {
    /// Build a class identifier from an OUI and the two class codes.
    pub fn new(oui: u32, information_class_code: u16, packet_class_code: u16) -> ClassIdentifier {
        let mut ret = ClassIdentifier::default();
        ret.set_oui(oui);
        ret.set_information_class_code(information_class_code);
        ret.set_packet_class_code(packet_class_code);
        ret
    }

    /// Gets the number of padding bits.
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let mut packet = Vrt::new_signal_data_packet();
    /// packet.set_class_id(Some(ClassIdentifier::default()));
    /// packet.class_id_mut().unwrap().set_pad_bit_count(4);
    /// assert_eq!(packet.class_id().unwrap().pad_bit_count(), 4);
    /// ```
    pub fn pad_bit_count(&self) -> u8 {
        ((self.word_1 >> 27) & 0x1F) as u8
    }
    /// Set the number of padding bits.
    pub fn set_pad_bit_count(&mut self, count: u8) {
        self.word_1 = self.word_1 & !(0x1F << 27) | ((count as u32) << 27);
    }

    /// Gets the Organizational Unique Identifier (OUI).
    pub fn oui(&self) -> u32 {
        self.word_1 & 0xFF_FFFF
    }
    /// Sets the Organizational Unique Identifier (OUI).
    ///
    /// Note: while this API takes a 32-bit integer, only the least
    /// significant 24 bits are used.
    pub fn set_oui(&mut self, oui: u32) {
        self.word_1 = self.word_1 & !(0xFF_FFFF) | (oui & 0xFF_FFFF);
    }

    /// Gets the information class code.
    pub fn information_class_code(&self) -> u16 {
        self.information_class_code
    }
    /// Sets the information class code.
    pub fn set_information_class_code(&mut self, code: u16) {
        self.information_class_code = code;
    }

    /// Gets the packet class code.
    pub fn packet_class_code(&self) -> u16 {
        self.packet_class_code
    }
    /// Sets the packet class code.
    pub fn set_packet_class_code(&mut self, code: u16) {
        self.packet_class_code = code;
    }

    /// Packs the identifier into the 56-bit OUI+ICC+PCC form used for
    /// stream keying and standard-data class matching (pad bits dropped).
    pub fn as_u64(&self) -> u64 {
        ((self.oui() as u64) << 32)
            | ((self.information_class_code as u64) << 16)
            | (self.packet_class_code as u64)
    }

    /// Builds an identifier from the 56-bit OUI+ICC+PCC form.
    ///
    /// # Errors
    /// Returns an error when the top 8 bits are non-zero (a valid OUI
    /// only spans 24 bits).
    pub fn from_u64(id: u64) -> Result<ClassIdentifier, VitaError> {
        if id >> 56 != 0 {
            return Err(VitaError::InvalidOui);
        }
        Ok(ClassIdentifier {
            word_1: ((id >> 32) & 0xFF_FFFF) as u32,
            information_class_code: ((id >> 16) & 0xFFFF) as u16,
            packet_class_code: (id & 0xFFFF) as u16,
        })
    }
}

impl fmt::Display for ClassIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:04X}.{:04X}",
            utils::oui_string(self.oui()),
            self.information_class_code,
            self.packet_class_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_id_u64_round_trip() {
        let id = ClassIdentifier::new(0xFF_FFFA, 0x0003, 0x0000);
        assert_eq!(id.as_u64(), 0x00FF_FFFA_0003_0000);
        assert_eq!(ClassIdentifier::from_u64(id.as_u64()).unwrap(), id);
        assert_eq!(format!("{id}"), "FF-FF-FA:0003.0000");
    }

    #[test]
    fn class_id_rejects_bad_oui() {
        assert!(ClassIdentifier::from_u64(0x0100_0000_0000_0000).is_err());
    }
}
