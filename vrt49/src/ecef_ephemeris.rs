// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the ECEF and relative ephemeris
records (ANSI/VITA-49.2-2017 sections 9.4.3 and 9.4.9).

The record is 13 words: the same timestamp prologue as the geolocation
record followed by position, attitude, and velocity triples.
*/

use deku::prelude::*;
use fixed::{
    types::extra::{U16, U22, U5},
    FixedI32,
};

use crate::formatted_gps::GEOLOCATION_NULL;
use crate::packet_header::{Tsf, Tsi};

const TS_INT_NULL: u32 = 0xFFFF_FFFF;
const TS_FRAC_NULL: u64 = 0xFFFF_FFFF_FFFF_FFFF;

macro_rules! ephem_field {
    ($get:ident, $set:ident, $field:ident, $radix:ty) => {
        /// Returns the field value, or `None` when it holds the null
        /// pattern.
        pub fn $get(&self) -> Option<f64> {
            if self.$field == GEOLOCATION_NULL {
                None
            } else {
                Some(FixedI32::<$radix>::from_bits(self.$field).to_num())
            }
        }
        /// Sets the field value (`None` writes the null pattern).
        pub fn $set(&mut self, val: Option<f64>) {
            self.$field = match val {
                Some(v) => FixedI32::<$radix>::from_num(v).to_bits(),
                None => GEOLOCATION_NULL,
            };
        }
    };
}

/// Base ECEF ephemeris data structure (also used for relative
/// ephemeris).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EcefEphemeris {
    w1: u32,
    ts_int: u32,
    ts_frac: u64,
    position_x: i32,
    position_y: i32,
    position_z: i32,
    attitude_alpha: i32,
    attitude_beta: i32,
    attitude_phi: i32,
    velocity_dx: i32,
    velocity_dy: i32,
    velocity_dz: i32,
}

impl Default for EcefEphemeris {
    fn default() -> Self {
        EcefEphemeris {
            w1: 0,
            ts_int: TS_INT_NULL,
            ts_frac: TS_FRAC_NULL,
            position_x: GEOLOCATION_NULL,
            position_y: GEOLOCATION_NULL,
            position_z: GEOLOCATION_NULL,
            attitude_alpha: GEOLOCATION_NULL,
            attitude_beta: GEOLOCATION_NULL,
            attitude_phi: GEOLOCATION_NULL,
            velocity_dx: GEOLOCATION_NULL,
            velocity_dy: GEOLOCATION_NULL,
            velocity_dz: GEOLOCATION_NULL,
        }
    }
}

impl EcefEphemeris {
    /// Gets the size of the ECEF ephemeris field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        13
    }

    /// Gets the producer OUI.
    pub fn manufacturer_oui(&self) -> u32 {
        self.w1 & 0xFF_FFFF
    }
    /// Sets the producer OUI (low 24 bits used).
    pub fn set_manufacturer_oui(&mut self, oui: u32) {
        self.w1 = (self.w1 & !0xFF_FFFF) | (oui & 0xFF_FFFF);
    }

    /// Gets the record's integer timestamp mode.
    pub fn tsi(&self) -> Tsi {
        (((self.w1 >> 26) & 0b11) as u8).try_into().unwrap()
    }
    /// Sets the record's integer timestamp mode.
    pub fn set_tsi(&mut self, tsi: Tsi) {
        self.w1 = (self.w1 & !(0b11 << 26)) | ((tsi as u32) << 26);
    }

    /// Gets the record's fractional timestamp mode.
    pub fn tsf(&self) -> Tsf {
        (((self.w1 >> 24) & 0b11) as u8).try_into().unwrap()
    }
    /// Sets the record's fractional timestamp mode.
    pub fn set_tsf(&mut self, tsf: Tsf) {
        self.w1 = (self.w1 & !(0b11 << 24)) | ((tsf as u32) << 24);
    }

    /// Gets the integer-seconds timestamp, or `None` when null.
    pub fn integer_timestamp(&self) -> Option<u32> {
        (self.ts_int != TS_INT_NULL).then_some(self.ts_int)
    }
    /// Sets the integer-seconds timestamp (`None` writes the null
    /// pattern).
    pub fn set_integer_timestamp(&mut self, ts: Option<u32>) {
        self.ts_int = ts.unwrap_or(TS_INT_NULL);
    }

    /// Gets the fractional timestamp, or `None` when null.
    pub fn fractional_timestamp(&self) -> Option<u64> {
        (self.ts_frac != TS_FRAC_NULL).then_some(self.ts_frac)
    }
    /// Sets the fractional timestamp (`None` writes the null pattern).
    pub fn set_fractional_timestamp(&mut self, ts: Option<u64>) {
        self.ts_frac = ts.unwrap_or(TS_FRAC_NULL);
    }

    ephem_field!(position_x_m, set_position_x_m, position_x, U5);
    ephem_field!(position_y_m, set_position_y_m, position_y, U5);
    ephem_field!(position_z_m, set_position_z_m, position_z, U5);
    ephem_field!(attitude_alpha_deg, set_attitude_alpha_deg, attitude_alpha, U22);
    ephem_field!(attitude_beta_deg, set_attitude_beta_deg, attitude_beta, U22);
    ephem_field!(attitude_phi_deg, set_attitude_phi_deg, attitude_phi, U22);
    ephem_field!(velocity_dx_mps, set_velocity_dx_mps, velocity_dx, U16);
    ephem_field!(velocity_dy_mps, set_velocity_dy_mps, velocity_dy, U16);
    ephem_field!(velocity_dz_mps, set_velocity_dz_mps, velocity_dz, U16);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn position_and_velocity() {
        let mut eph = EcefEphemeris::default();
        assert_eq!(eph.position_x_m(), None);
        eph.set_position_x_m(Some(1_234_567.5));
        eph.set_velocity_dz_mps(Some(-42.125));
        eph.set_attitude_phi_deg(Some(1.5));
        assert_relative_eq!(eph.position_x_m().unwrap(), 1_234_567.5, epsilon = 1e-1);
        assert_relative_eq!(eph.velocity_dz_mps().unwrap(), -42.125, epsilon = 1e-4);
        assert_relative_eq!(eph.attitude_phi_deg().unwrap(), 1.5, epsilon = 1e-6);
    }
}
