// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the state and event indicator
field (ANSI/VITA-49.2-2017 section 9.10.8).

This is the context-packet cousin of the data trailer: enable bits in
the top byte pair with indicator bits 12 positions below, and a flag is
null unless enabled.
*/

use deku::prelude::*;

/// Base state and event indicator data structure.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateEventIndicators(u32);

macro_rules! state_flag {
    ($get:ident, $set:ident, $enable_bit:literal) => {
        /// Returns the indicator status if its enable bit is set.
        pub fn $get(&self) -> Option<bool> {
            if self.0 & (1 << $enable_bit) != 0 {
                Some(self.0 & (1 << ($enable_bit - 12)) != 0)
            } else {
                None
            }
        }
        /// Sets or clears the enable/indicator bit pair.
        pub fn $set(&mut self, state: Option<bool>) {
            match state {
                Some(v) => {
                    self.0 |= 1 << $enable_bit;
                    self.0 = (self.0 & !(1 << ($enable_bit - 12)))
                        | ((v as u32) << ($enable_bit - 12));
                }
                None => {
                    self.0 &= !(1 << $enable_bit);
                    self.0 &= !(1 << ($enable_bit - 12));
                }
            }
        }
    };
}

impl StateEventIndicators {
    /// Gets the size of the field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        1
    }

    /// Gets the raw 32-bit word.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    state_flag!(calibrated_time_indicator, set_calibrated_time_indicator, 31);
    state_flag!(valid_data_indicator, set_valid_data_indicator, 30);
    state_flag!(reference_lock_indicator, set_reference_lock_indicator, 29);
    state_flag!(agc_mgc_indicator, set_agc_mgc_indicator, 28);
    state_flag!(detected_signal_indicator, set_detected_signal_indicator, 27);
    state_flag!(
        spectral_inversion_indicator,
        set_spectral_inversion_indicator,
        26
    );
    state_flag!(over_range_indicator, set_over_range_indicator, 25);
    state_flag!(sample_loss_indicator, set_sample_loss_indicator, 24);

    /// Gets the user-defined byte (bits 7..0).
    pub fn user_defined(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
    /// Sets the user-defined byte (bits 7..0).
    pub fn set_user_defined(&mut self, value: u8) {
        self.0 = (self.0 & !0xFF) | value as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paired_bits() {
        let mut s = StateEventIndicators::default();
        assert_eq!(s.over_range_indicator(), None);
        s.set_over_range_indicator(Some(true));
        assert_eq!(s.as_u32(), (1 << 25) | (1 << 13));
        s.set_over_range_indicator(Some(false));
        assert_eq!(s.as_u32(), 1 << 25);
        s.set_user_defined(0xA5);
        assert_eq!(s.user_defined(), 0xA5);
    }
}
