// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the trailer field
(ANSI/VITA-49.2-2017 section 5.1.6).

Each trailer state/event flag is a pair of bits: an enable bit in the
upper half of the word and an indicator bit 12 positions below it. A
flag reads as `None` unless its enable bit is set.
*/

use deku::prelude::*;

/// Sample frame indicator enumeration.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleFrameIndicator {
    /// Sample framing is not in use.
    NotApplicable,
    /// First data packet of the current sample frame.
    FirstDataPacket,
    /// Middle data packet of the current sample frame.
    MiddleDataPacket,
    /// Final data packet of the current sample frame.
    FinalDataPacket,
}

impl TryFrom<u32> for SampleFrameIndicator {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SampleFrameIndicator::NotApplicable),
            1 => Ok(SampleFrameIndicator::FirstDataPacket),
            2 => Ok(SampleFrameIndicator::MiddleDataPacket),
            3 => Ok(SampleFrameIndicator::FinalDataPacket),
            _ => Err(()),
        }
    }
}

/// Base trailer field data structure.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trailer(u32);

macro_rules! trailer_flag {
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

impl Trailer {
    /// Gets the raw 32-bit trailer word.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    trailer_flag!(calibrated_time_indicator, set_calibrated_time_indicator, 31);
    trailer_flag!(valid_data_indicator, set_valid_data_indicator, 30);
    trailer_flag!(reference_lock_indicator, set_reference_lock_indicator, 29);
    trailer_flag!(agc_mgc_indicator, set_agc_mgc_indicator, 28);
    trailer_flag!(detected_signal_indicator, set_detected_signal_indicator, 27);
    trailer_flag!(
        spectral_inversion_indicator,
        set_spectral_inversion_indicator,
        26
    );
    trailer_flag!(over_range_indicator, set_over_range_indicator, 25);
    trailer_flag!(sample_loss_indicator, set_sample_loss_indicator, 24);

    fn sample_frame_enabled(&self) -> bool {
        self.0 & (1 << 23) != 0 && self.0 & (1 << 22) != 0
    }
    fn user_defined_enabled(&self) -> bool {
        self.0 & (1 << 21) != 0 && self.0 & (1 << 20) != 0
    }

    /// Returns the sample frame indicator status if present.
    pub fn sample_frame_indicator(&self) -> Option<SampleFrameIndicator> {
        if self.sample_frame_enabled() {
            Some(((self.0 >> 10) & 0b11).try_into().unwrap())
        } else {
            None
        }
    }
    /// Sets or clears the sample frame indicator.
    pub fn set_sample_frame_indicator(&mut self, state: Option<SampleFrameIndicator>) {
        match state {
            Some(v) => {
                self.0 |= 0b11 << 22;
                self.0 = (self.0 & !(0b11 << 10)) | (((v as u32) & 0b11) << 10);
            }
            None => {
                self.0 &= !(0b11 << 22);
                self.0 &= !(0b11 << 10);
            }
        }
    }

    /// Returns the user-defined indicator bits if present.
    pub fn user_defined_indicator(&self) -> Option<u8> {
        if self.user_defined_enabled() {
            Some(((self.0 >> 8) & 0b11) as u8)
        } else {
            None
        }
    }
    /// Sets or clears the user-defined indicator bits.
    pub fn set_user_defined_indicator(&mut self, state: Option<u8>) {
        match state {
            Some(v) => {
                self.0 |= 0b11 << 20;
                self.0 = (self.0 & !(0b11 << 8)) | (((v as u32) & 0b11) << 8);
            }
            None => {
                self.0 &= !(0b11 << 20);
                self.0 &= !(0b11 << 8);
            }
        }
    }

    fn associated_context_packet_count_enabled(&self) -> bool {
        self.0 & (1 << 7) != 0
    }
    /// Returns the associated context packet count if present.
    pub fn associated_context_packet_count(&self) -> Option<u8> {
        if self.associated_context_packet_count_enabled() {
            Some((self.0 & 0x7F) as u8)
        } else {
            None
        }
    }
    /// Sets or clears the associated context packet count.
    pub fn set_associated_context_packet_count(&mut self, count: Option<u8>) {
        match count {
            Some(v) => {
                self.0 |= 1 << 7;
                self.0 = (self.0 & !0x7F) | ((v as u32) & 0x7F);
            }
            None => self.0 &= !((1 << 7) | 0x7F),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_none() {
        let t = Trailer::default();
        assert_eq!(t.valid_data_indicator(), None);
        assert_eq!(t.sample_frame_indicator(), None);
        assert_eq!(t.associated_context_packet_count(), None);
    }

    #[test]
    fn enable_and_indicator_pair() {
        let mut t = Trailer::default();
        t.set_valid_data_indicator(Some(true));
        assert_eq!(t.valid_data_indicator(), Some(true));
        assert_eq!(t.as_u32(), (1 << 30) | (1 << 18));
        t.set_valid_data_indicator(Some(false));
        assert_eq!(t.valid_data_indicator(), Some(false));
        t.set_valid_data_indicator(None);
        assert_eq!(t.as_u32(), 0);
    }

    #[test]
    fn context_packet_count() {
        let mut t = Trailer::default();
        t.set_associated_context_packet_count(Some(5));
        assert_eq!(t.associated_context_packet_count(), Some(5));
        t.set_sample_frame_indicator(Some(SampleFrameIndicator::FinalDataPacket));
        assert_eq!(
            t.sample_frame_indicator(),
            Some(SampleFrameIndicator::FinalDataPacket)
        );
    }
}
