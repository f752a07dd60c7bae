// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use deku::prelude::*;

/// ACK response field. Each warning or error field in an ACK packet uses one of these regardless
/// of the underlying field's data type. For example, even though `bandwidth` is a 64-bit field in
/// VITA 49, the response field is always 32-bits that represent various things that might be wrong
/// with the bandwidth.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AckResponse(u32);

macro_rules! response_bit {
    ($get:ident, $set:ident, $unset:ident, $bit:literal) => {
        /// Returns true if the response bit is set.
        pub fn $get(&self) -> bool {
            self.0 & (1 << $bit) != 0
        }
        /// Sets the response bit.
        pub fn $set(&mut self) {
            self.0 |= 1 << $bit;
        }
        /// Clears the response bit.
        pub fn $unset(&mut self) {
            self.0 &= !(1 << $bit);
        }
    };
}

impl AckResponse {
    /// Gets the size of the response field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        1
    }

    // The field was NOT executed because of a warning or error.
    response_bit!(field_not_executed, set_field_not_executed, unset_field_not_executed, 31);
    // The field was NOT executed properly because of a device/hardware failure.
    response_bit!(device_failure, set_device_failure, unset_device_failure, 30);
    // The device does NOT accept this particular control field.
    response_bit!(erroneous_field, set_erroneous_field, unset_erroneous_field, 29);
    // The supplied value is beyond the capability or operational range of the device.
    response_bit!(param_out_of_range, set_param_out_of_range, unset_param_out_of_range, 28);
    // The supplied value specifies precision beyond the device's capability.
    response_bit!(
        parameter_unsupported_precision,
        set_parameter_unsupported_precision,
        unset_parameter_unsupported_precision,
        27
    );
    // The supplied value is not valid for the field.
    response_bit!(field_value_invalid, set_field_value_invalid, unset_field_value_invalid, 26);
    // The packet timestamp puts execution outside the permitted window.
    response_bit!(timestamp_problem, set_timestamp_problem, unset_timestamp_problem, 25);
    response_bit!(hazardous_power_levels, set_hazardous_power_levels, unset_hazardous_power_levels, 24);
    response_bit!(distortion, set_distortion, unset_distortion, 23);
    response_bit!(
        in_band_power_compliance,
        set_in_band_power_compliance,
        unset_in_band_power_compliance,
        22
    );
    response_bit!(
        out_of_band_power_compliance,
        set_out_of_band_power_compliance,
        unset_out_of_band_power_compliance,
        21
    );
    response_bit!(cosite_interference, set_cosite_interference, unset_cosite_interference, 20);
    response_bit!(regional_interference, set_regional_interference, unset_regional_interference, 19);

    /// Gets the user-defined response bits (low 12 bits).
    pub fn user_defined(&self) -> u16 {
        (self.0 & 0xFFF) as u16
    }
    /// Sets the user-defined response bits (low 12 bits).
    pub fn set_user_defined(&mut self, bits: u16) {
        self.0 = (self.0 & !0xFFF) | (bits as u32 & 0xFFF);
    }
}

impl fmt::Display for AckResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AckResponse({:#010x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_bits() {
        let mut r = AckResponse::default();
        r.set_param_out_of_range();
        r.set_device_failure();
        assert!(r.param_out_of_range());
        assert!(r.device_failure());
        assert!(!r.erroneous_field());
        r.unset_device_failure();
        assert!(!r.device_failure());
        r.set_user_defined(0xABC);
        assert_eq!(r.user_defined(), 0xABC);
    }
}
