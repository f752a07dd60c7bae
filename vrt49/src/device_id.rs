// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the device identifier field
(ANSI/VITA-49.2-2017 section 9.10.1).
*/

use core::fmt;
use deku::prelude::*;

use crate::utils;

/// Base device ID data structure: a 24-bit manufacturer OUI in bits
/// 55..32 and a 16-bit device code in bits 15..0.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceId(u64);

impl DeviceId {
    /// Builds a device ID from an OUI and a device code.
    pub fn new(oui: u32, device_code: u16) -> DeviceId {
        let mut ret = DeviceId::default();
        ret.set_manufacturer_oui(oui);
        ret.set_device_code(device_code);
        ret
    }

    /// Gets the size of the device ID structure in 32-bit words.
    pub fn size_words(&self) -> u16 {
        (std::mem::size_of_val(&self.0) / std::mem::size_of::<u32>()) as u16
    }

    /// Gets the manufacturer Organizational Unique Identifier (OUI).
    pub fn manufacturer_oui(&self) -> u32 {
        ((self.0 >> 32) & 0xFF_FFFF) as u32
    }

    /// Sets the manufacturer Organizational Unique Identifier (OUI).
    ///
    /// Note: while this API takes a 32-bit integer, only the least
    /// significant 24 bits are used.
    pub fn set_manufacturer_oui(&mut self, oui: u32) {
        let val = (oui as u64 & 0xFF_FFFF) << 32;
        self.0 = self.0 & !(0xFF_FFFF << 32) | val;
    }

    /// Gets the device code.
    pub fn device_code(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Sets the device code.
    pub fn set_device_code(&mut self, code: u16) {
        self.0 = self.0 & !(0xFFFF) | code as u64;
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:04X}",
            utils::oui_string(self.manufacturer_oui()),
            self.device_code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oui_and_code_packing() {
        let id = DeviceId::new(0x12_34_56, 0xABCD);
        assert_eq!(id.manufacturer_oui(), 0x12_34_56);
        assert_eq!(id.device_code(), 0xABCD);
        assert_eq!(format!("{id}"), "12-34-56:ABCD");
    }
}
