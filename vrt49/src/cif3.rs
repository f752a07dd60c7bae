// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Defines fields and methods related to CIF3 (ANSI/VITA-49.2-2017 9.1).
Fields here are compatible with VITA 49.2 and later.

CIF3 holds the two timestamp-sized fields (Age and Shelf Life), whose
wire width follows the enclosing packet's TSI/TSF modes. They are
parsed as [`TsField`] with the header layout threaded through the
payload parse context.
*/

use core::fmt;

use crate::command_prelude::*;
use crate::packet_header::TsLayout;
use crate::{ack_response::AckResponse, cif0::Cif0, cif7::Cif7Opts};
use deku::prelude::*;
use fixed::{types::extra::U6, FixedI16};
use vrt49_macros::{cif_ack, cif_bit, cif_fields, cif_fixed_masked, cif_plain};

/// A timestamp-sized CIF3 field value: an integer-seconds word when the
/// packet carries an integer timestamp, and a fractional double-word
/// when it carries a fractional timestamp.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian, ts: TsLayout")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TsField {
    #[deku(cond = "ts.tsi")]
    integer: Option<u32>,
    #[deku(cond = "ts.tsf")]
    fractional: Option<u64>,
}

impl TsField {
    /// Builds a timestamp-sized value from its parts. The parts present
    /// must mirror the packet's TSI/TSF modes or the field won't
    /// serialize.
    pub fn new(integer: Option<u32>, fractional: Option<u64>) -> TsField {
        TsField { integer, fractional }
    }

    /// Gets the integer-seconds part.
    pub fn integer(&self) -> Option<u32> {
        self.integer
    }

    /// Gets the fractional part.
    pub fn fractional(&self) -> Option<u64> {
        self.fractional
    }

    /// Gets the size of the field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        let mut ret = 0;
        if self.integer.is_some() {
            ret += 1;
        }
        if self.fractional.is_some() {
            ret += 2;
        }
        ret
    }
}

impl fmt::Display for TsField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}/{:?}", self.integer, self.fractional)
    }
}

/// Base data structure for the CIF3 single-bit indicators
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cif3(u32);

impl Cif3 {
    cif_bit!(timestamp_details, 31);
    cif_bit!(timestamp_skew, 30);
    // Bits 28-29 are reserved
    cif_bit!(rise_time, 27);
    cif_bit!(fall_time, 26);
    cif_bit!(offset_time, 25);
    cif_bit!(pulse_width, 24);
    cif_bit!(period, 23);
    cif_bit!(duration, 22);
    cif_bit!(dwell, 21);
    cif_bit!(jitter, 20);
    // Bits 18-19 are reserved
    cif_bit!(age, 17);
    cif_bit!(shelf_life, 16);
    // Bits 8-15 are reserved
    cif_bit!(air_temp, 7);
    cif_bit!(ground_temp, 6);
    cif_bit!(humidity, 5);
    cif_bit!(barometric_pressure, 4);
    cif_bit!(sea_and_swell_state, 3);
    cif_bit!(tropospheric_state, 2);
    cif_bit!(network_id, 1);
    // Bit 0 is reserved

    fn empty(&self) -> bool {
        self.0 == 0
    }
}

#[cif_fields(cif3, timestamped)]
pub struct Cif3Fields {
    timestamp_details: u64,
    timestamp_skew: i64,
    rise_time: i64,
    fall_time: i64,
    offset_time: i64,
    pulse_width: i64,
    period: i64,
    duration: i64,
    dwell: i64,
    jitter: i64,
    age: TsField,
    shelf_life: TsField,
    air_temp: i32,
    ground_temp: i32,
    humidity: u32,
    barometric_pressure: u32,
    sea_and_swell_state: u32,
    tropospheric_state: u32,
    network_id: u32,
}

#[cif_fields(cif3)]
pub struct Cif3AckFields {
    timestamp_details: AckResponse,
    timestamp_skew: AckResponse,
    rise_time: AckResponse,
    fall_time: AckResponse,
    offset_time: AckResponse,
    pulse_width: AckResponse,
    period: AckResponse,
    duration: AckResponse,
    dwell: AckResponse,
    jitter: AckResponse,
    age: AckResponse,
    shelf_life: AckResponse,
    air_temp: AckResponse,
    ground_temp: AckResponse,
    humidity: AckResponse,
    barometric_pressure: AckResponse,
    sea_and_swell_state: AckResponse,
    tropospheric_state: AckResponse,
    network_id: AckResponse,
}

/// Trait for common CIF3 manipulation methods. Used by Context and
/// Command packets.
#[rustfmt::skip]
pub trait Cif3Manipulators {
    /// Get a reference to the packet's CIF0 (indicators)
    fn cif0(&self) -> &Cif0;
    /// Get a mutable reference to the packet's CIF0 (indicators)
    fn cif0_mut(&mut self) -> &mut Cif0;
    /// Get a reference to the packet's CIF3 (indicators)
    fn cif3(&self) -> Option<&Cif3>;
    /// Get a mutable reference to the packet's CIF3 (indicators)
    fn cif3_mut(&mut self) -> &mut Option<Cif3>;
    /// Get a reference to the packet's CIF3 data fields
    fn cif3_fields(&self) -> Option<&Cif3Fields>;
    /// Get a mutable reference to the packet's CIF3 data fields
    fn cif3_fields_mut(&mut self) -> &mut Option<Cif3Fields>;

    cif_plain!(cif3, timestamp_details, timestamp_details, u64);
    cif_plain!(cif3, timestamp_skew, timestamp_skew, i64);
    cif_plain!(cif3, rise_time, rise_time, i64);
    cif_plain!(cif3, fall_time, fall_time, i64);
    cif_plain!(cif3, offset_time, offset_time, i64);
    cif_plain!(cif3, pulse_width, pulse_width, i64);
    cif_plain!(cif3, period, period, i64);
    cif_plain!(cif3, duration, duration, i64);
    cif_plain!(cif3, dwell, dwell, i64);
    cif_plain!(cif3, jitter, jitter, i64);
    cif_plain!(cif3, age, age, TsField);
    cif_plain!(cif3, shelf_life, shelf_life, TsField);
    cif_fixed_masked!(cif3, air_temp, air_temp_c, f32, FixedI16::<U6>, i32, i16);
    cif_fixed_masked!(cif3, ground_temp, ground_temp_c, f32, FixedI16::<U6>, i32, i16);
    cif_plain!(cif3, humidity, humidity, u32);
    cif_plain!(cif3, barometric_pressure, barometric_pressure, u32);
    cif_plain!(cif3, sea_and_swell_state, sea_and_swell_state, u32);
    cif_plain!(cif3, tropospheric_state, tropospheric_state, u32);
    cif_plain!(cif3, network_id, network_id, u32);
}

/// Shared trait for manipulating CIF3 ACK fields.
pub trait Cif3AckManipulators {
    /// Get a reference to the packet's WIF0 (indicators)
    fn wif0(&self) -> Option<&Cif0>;
    /// Get a mutable reference to the packet's WIF0 (indicators)
    fn wif0_mut(&mut self) -> &mut Option<Cif0>;
    /// Get a reference to the packet's WIF0 data fields
    fn wif0_fields(&self) -> Option<&Cif0AckFields>;
    /// Get a mutable reference to the packet's WIF0 data fields
    fn wif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields>;

    /// Get a reference to the packet's EIF0 (indicators)
    fn eif0(&self) -> Option<&Cif0>;
    /// Get a mutable reference to the packet's EIF0 (indicators)
    fn eif0_mut(&mut self) -> &mut Option<Cif0>;
    /// Get a reference to the packet's EIF0 data fields
    fn eif0_fields(&self) -> Option<&Cif0AckFields>;
    /// Get a mutable reference to the packet's EIF0 data fields
    fn eif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields>;

    /// Get a reference to the packet's WIF3 (indicators)
    fn wif3(&self) -> Option<&Cif3>;
    /// Get a mutable reference to the packet's WIF3 (indicators)
    fn wif3_mut(&mut self) -> &mut Option<Cif3>;
    /// Get a reference to the packet's WIF3 data fields
    fn wif3_fields(&self) -> Option<&Cif3AckFields>;
    /// Get a mutable reference to the packet's WIF3 data fields
    fn wif3_fields_mut(&mut self) -> &mut Option<Cif3AckFields>;

    /// Get a reference to the packet's EIF3 (indicators)
    fn eif3(&self) -> Option<&Cif3>;
    /// Get a mutable reference to the packet's EIF3 (indicators)
    fn eif3_mut(&mut self) -> &mut Option<Cif3>;
    /// Get a reference to the packet's EIF3 data fields
    fn eif3_fields(&self) -> Option<&Cif3AckFields>;
    /// Get a mutable reference to the packet's EIF3 data fields
    fn eif3_fields_mut(&mut self) -> &mut Option<Cif3AckFields>;

    cif_ack!(3, timestamp_details);
    cif_ack!(3, timestamp_skew);
    cif_ack!(3, rise_time);
    cif_ack!(3, fall_time);
    cif_ack!(3, offset_time);
    cif_ack!(3, pulse_width);
    cif_ack!(3, period);
    cif_ack!(3, duration);
    cif_ack!(3, dwell);
    cif_ack!(3, jitter);
    cif_ack!(3, age);
    cif_ack!(3, shelf_life);
    cif_ack!(3, air_temp);
    cif_ack!(3, ground_temp);
    cif_ack!(3, humidity);
    cif_ack!(3, barometric_pressure);
    cif_ack!(3, sea_and_swell_state);
    cif_ack!(3, tropospheric_state);
    cif_ack!(3, network_id);
}

impl fmt::Display for Cif3 {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CIF3:")?;
        writeln!(f, "  Timestamp details: {}", self.timestamp_details())?;
        writeln!(f, "  Timestamp skew: {}", self.timestamp_skew())?;
        writeln!(f, "  Rise time: {}", self.rise_time())?;
        writeln!(f, "  Fall time: {}", self.fall_time())?;
        writeln!(f, "  Offset time: {}", self.offset_time())?;
        writeln!(f, "  Pulse width: {}", self.pulse_width())?;
        writeln!(f, "  Period: {}", self.period())?;
        writeln!(f, "  Duration: {}", self.duration())?;
        writeln!(f, "  Dwell: {}", self.dwell())?;
        writeln!(f, "  Jitter: {}", self.jitter())?;
        writeln!(f, "  Age: {}", self.age())?;
        writeln!(f, "  Shelf life: {}", self.shelf_life())?;
        writeln!(f, "  Air temperature: {}", self.air_temp())?;
        writeln!(f, "  Ground temperature: {}", self.ground_temp())?;
        writeln!(f, "  Humidity: {}", self.humidity())?;
        writeln!(f, "  Barometric pressure: {}", self.barometric_pressure())?;
        writeln!(f, "  Sea and swell state: {}", self.sea_and_swell_state())?;
        writeln!(f, "  Tropospheric state: {}", self.tropospheric_state())?;
        writeln!(f, "  Network ID: {}", self.network_id())?;
        Ok(())
    }
}
