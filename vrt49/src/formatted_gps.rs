// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the formatted GPS/INS
geolocation record (ANSI/VITA-49.2-2017 sections 9.4.5 and 9.4.6).

The record is 11 words: a TSI/TSF/OUI word, a one-word integer
timestamp, a two-word fractional timestamp, and seven fixed-point
fields. Any field (timestamps included) may hold the null pattern.
*/

use deku::prelude::*;
use fixed::{
    types::extra::{U16, U22, U5},
    FixedI32,
};

use crate::packet_header::{Tsf, Tsi};

/// The per-field null pattern for geolocation and ephemeris records.
pub const GEOLOCATION_NULL: i32 = 0x7FFF_FFFF;

/// Null pattern for the one-word integer timestamp.
const TS_INT_NULL: u32 = 0xFFFF_FFFF;
/// Null pattern for the two-word fractional timestamp.
const TS_FRAC_NULL: u64 = 0xFFFF_FFFF_FFFF_FFFF;

macro_rules! geo_angle {
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

/// Base formatted GPS data structure (also used for formatted INS).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormattedGps {
    w1: u32,
    ts_int: u32,
    ts_frac: u64,
    latitude: i32,
    longitude: i32,
    altitude: i32,
    speed_over_ground: i32,
    heading_angle: i32,
    track_angle: i32,
    magnetic_variation: i32,
}

impl Default for FormattedGps {
    fn default() -> Self {
        FormattedGps {
            w1: 0,
            ts_int: TS_INT_NULL,
            ts_frac: TS_FRAC_NULL,
            latitude: GEOLOCATION_NULL,
            longitude: GEOLOCATION_NULL,
            altitude: GEOLOCATION_NULL,
            speed_over_ground: GEOLOCATION_NULL,
            heading_angle: GEOLOCATION_NULL,
            track_angle: GEOLOCATION_NULL,
            magnetic_variation: GEOLOCATION_NULL,
        }
    }
}

impl FormattedGps {
    /// Gets the size of the formatted GPS structure in 32-bit words.
    pub fn size_words(&self) -> u16 {
        11
    }

    /// Gets the GPS/INS manufacturer OUI.
    pub fn manufacturer_oui(&self) -> u32 {
        self.w1 & 0xFF_FFFF
    }
    /// Sets the GPS/INS manufacturer OUI (low 24 bits used).
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

    geo_angle!(latitude_deg, set_latitude_deg, latitude, U22);
    geo_angle!(longitude_deg, set_longitude_deg, longitude, U22);
    geo_angle!(altitude_m, set_altitude_m, altitude, U5);
    geo_angle!(
        speed_over_ground_mps,
        set_speed_over_ground_mps,
        speed_over_ground,
        U16
    );
    geo_angle!(heading_angle_deg, set_heading_angle_deg, heading_angle, U22);
    geo_angle!(track_angle_deg, set_track_angle_deg, track_angle, U22);
    geo_angle!(
        magnetic_variation_deg,
        set_magnetic_variation_deg,
        magnetic_variation,
        U22
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn null_by_default() {
        let gps = FormattedGps::default();
        assert_eq!(gps.latitude_deg(), None);
        assert_eq!(gps.integer_timestamp(), None);
        assert_eq!(gps.fractional_timestamp(), None);
    }

    #[test]
    fn fixed_point_radices() {
        let mut gps = FormattedGps::default();
        gps.set_latitude_deg(Some(38.889484));
        gps.set_longitude_deg(Some(-77.035278));
        gps.set_altitude_m(Some(125.5));
        gps.set_speed_over_ground_mps(Some(2.25));
        assert_relative_eq!(gps.latitude_deg().unwrap(), 38.889484, epsilon = 1e-6);
        assert_relative_eq!(gps.longitude_deg().unwrap(), -77.035278, epsilon = 1e-6);
        assert_relative_eq!(gps.altitude_m().unwrap(), 125.5, epsilon = 1e-1);
        assert_relative_eq!(gps.speed_over_ground_mps().unwrap(), 2.25, epsilon = 1e-4);
    }

    #[test]
    fn timestamp_modes() {
        let mut gps = FormattedGps::default();
        gps.set_tsi(Tsi::Utc);
        gps.set_tsf(Tsf::RealTimePs);
        gps.set_manufacturer_oui(0xAB_CDEF);
        assert_eq!(gps.tsi(), Tsi::Utc);
        assert_eq!(gps.tsf(), Tsf::RealTimePs);
        assert_eq!(gps.manufacturer_oui(), 0xAB_CDEF);
    }
}
