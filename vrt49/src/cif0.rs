// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Defines fields and methods related to CIF0 (ANSI/VITA-49.2-2017 9.1).
Fields here are compatible with VITA 49.0 and later.
*/

use core::fmt;

use crate::ack::AckLevel;
use crate::ack_response::AckResponse;
use crate::device_id::DeviceId;
use crate::payload_format::PayloadFormat;
use crate::state_event::StateEventIndicators;
use crate::{
    cif7::Cif7Opts, context_association_lists::ContextAssociationLists,
    ecef_ephemeris::EcefEphemeris, formatted_gps::FormattedGps, gain::Gain, gps_ascii::GpsAscii,
};
use deku::prelude::*;
use fixed::types::extra::{U20, U6, U7};
use fixed::{FixedI16, FixedI64, FixedU64};
use vrt49_macros::{cif_ack, cif_bit, cif_fields, cif_fixed, cif_fixed_masked, cif_plain};

/// Base data structure for the CIF0 single-bit indicators.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cif0(u32);

impl Cif0 {
    cif_bit!(context_field_changed, 31);
    cif_bit!(reference_point_id, 30);
    cif_bit!(bandwidth, 29);
    cif_bit!(if_ref_freq, 28);
    cif_bit!(rf_ref_freq, 27);
    cif_bit!(rf_ref_freq_offset, 26);
    cif_bit!(if_band_offset, 25);
    cif_bit!(reference_level, 24);
    cif_bit!(gain, 23);
    cif_bit!(over_range_count, 22);
    cif_bit!(sample_rate, 21);
    cif_bit!(timestamp_adjustment, 20);
    cif_bit!(timestamp_cal_time, 19);
    cif_bit!(temperature, 18);
    cif_bit!(device_id, 17);
    cif_bit!(state_indicators, 16);
    cif_bit!(signal_data_payload_format, 15);
    cif_bit!(formatted_gps, 14);
    cif_bit!(formatted_ins, 13);
    cif_bit!(ecef_ephemeris, 12);
    cif_bit!(relative_ephemeris, 11);
    cif_bit!(ephemeris_ref_id, 10);
    cif_bit!(gps_ascii, 9);
    cif_bit!(context_association_lists, 8);
    cif_bit!(field_attributes_enabled, 7);
    // Bits 4-6 are reserved
    cif_bit!(cif3_enabled, 3);
    cif_bit!(cif2_enabled, 2);
    cif_bit!(cif1_enabled, 1);
    // Bit 0 is reserved

    /// Get the CIF field as a raw u32.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true if the whole CIF is empty.
    pub fn empty(&self) -> bool {
        self.0 == 0
    }
}

#[cif_fields(cif0)]
pub struct Cif0Fields {
    reference_point_id: u32,
    bandwidth: u64,
    if_ref_freq: i64,
    rf_ref_freq: u64,
    rf_ref_freq_offset: i64,
    if_band_offset: i64,
    reference_level: i32,
    gain: Gain,
    over_range_count: u32,
    sample_rate: u64,
    timestamp_adjustment: u64,
    timestamp_cal_time: u32,
    temperature: i32,
    device_id: DeviceId,
    state_indicators: StateEventIndicators,
    signal_data_payload_format: PayloadFormat,
    formatted_gps: FormattedGps,
    formatted_ins: FormattedGps,
    ecef_ephemeris: EcefEphemeris,
    relative_ephemeris: EcefEphemeris,
    ephemeris_ref_id: u32,
    gps_ascii: GpsAscii,
    context_association_lists: ContextAssociationLists,
}

#[cif_fields(cif0)]
pub struct Cif0AckFields {
    reference_point_id: AckResponse,
    bandwidth: AckResponse,
    if_ref_freq: AckResponse,
    rf_ref_freq: AckResponse,
    rf_ref_freq_offset: AckResponse,
    if_band_offset: AckResponse,
    reference_level: AckResponse,
    gain: AckResponse,
    over_range_count: AckResponse,
    sample_rate: AckResponse,
    timestamp_adjustment: AckResponse,
    timestamp_cal_time: AckResponse,
    temperature: AckResponse,
    device_id: AckResponse,
    state_indicators: AckResponse,
    signal_data_payload_format: AckResponse,
    formatted_gps: AckResponse,
    formatted_ins: AckResponse,
    ecef_ephemeris: AckResponse,
    relative_ephemeris: AckResponse,
    ephemeris_ref_id: AckResponse,
    gps_ascii: AckResponse,
    context_association_lists: AckResponse,
}

/// Trait for common CIF0 manipulation methods. Used by Context and
/// Command packets.
#[rustfmt::skip]
pub trait Cif0Manipulators {
    /// Get a reference to the packet's CIF0 (indicators)
    fn cif0(&self) -> &Cif0;
    /// Get a mutable reference to the packet's CIF0 (indicators)
    fn cif0_mut(&mut self) -> &mut Cif0;
    /// Get a reference to the packet's CIF0 data fields
    fn cif0_fields(&self) -> &Cif0Fields;
    /// Get a mutable reference to the packet's CIF0 data fields
    fn cif0_fields_mut(&mut self) -> &mut Cif0Fields;

    cif_plain!(cif0, reference_point_id, reference_point_id, u32);
    cif_fixed!(cif0, bandwidth, bandwidth_hz, f64, FixedU64::<U20>);
    cif_fixed!(cif0, if_ref_freq, if_ref_freq_hz, f64, FixedI64::<U20>);
    cif_fixed!(cif0, rf_ref_freq, rf_ref_freq_hz, f64, FixedU64::<U20>);
    cif_fixed!(cif0, rf_ref_freq_offset, rf_ref_freq_offset_hz, f64, FixedI64::<U20>);
    cif_fixed!(cif0, if_band_offset, if_band_offset_hz, f64, FixedI64::<U20>);
    cif_fixed_masked!(cif0, reference_level, reference_level_db, f32, FixedI16::<U7>, i32, i16);
    cif_plain!(cif0, gain, gain, Gain);
    cif_plain!(cif0, over_range_count, over_range_count, u32);
    cif_fixed!(cif0, sample_rate, sample_rate_sps, f64, FixedU64::<U20>);
    cif_plain!(cif0, timestamp_adjustment, timestamp_adjustment, u64);
    cif_plain!(cif0, timestamp_cal_time, timestamp_cal_time, u32);
    cif_fixed_masked!(cif0, temperature, temperature_c, f32, FixedI16::<U6>, i32, i16);
    cif_plain!(cif0, device_id, device_id, DeviceId);
    cif_plain!(cif0, state_indicators, state_indicators, StateEventIndicators);
    cif_plain!(cif0, signal_data_payload_format, signal_data_payload_format, PayloadFormat);
    cif_plain!(cif0, formatted_gps, formatted_gps, FormattedGps);
    cif_plain!(cif0, formatted_ins, formatted_ins, FormattedGps);
    cif_plain!(cif0, ecef_ephemeris, ecef_ephemeris, EcefEphemeris);
    cif_plain!(cif0, relative_ephemeris, relative_ephemeris, EcefEphemeris);
    cif_plain!(cif0, ephemeris_ref_id, ephemeris_ref_id, u32);
    cif_plain!(cif0, gps_ascii, gps_ascii, GpsAscii);
    cif_plain!(cif0, context_association_lists, context_association_lists, ContextAssociationLists);
}

/// Shared trait for manipulating CIF0 ACK fields.
pub trait Cif0AckManipulators {
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

    cif_ack!(0, reference_point_id);
    cif_ack!(0, bandwidth);
    cif_ack!(0, if_ref_freq);
    cif_ack!(0, rf_ref_freq);
    cif_ack!(0, rf_ref_freq_offset);
    cif_ack!(0, if_band_offset);
    cif_ack!(0, reference_level);
    cif_ack!(0, gain);
    cif_ack!(0, over_range_count);
    cif_ack!(0, sample_rate);
    cif_ack!(0, timestamp_adjustment);
    cif_ack!(0, timestamp_cal_time);
    cif_ack!(0, temperature);
    cif_ack!(0, device_id);
    cif_ack!(0, state_indicators);
    cif_ack!(0, signal_data_payload_format);
    cif_ack!(0, formatted_gps);
    cif_ack!(0, formatted_ins);
    cif_ack!(0, ecef_ephemeris);
    cif_ack!(0, relative_ephemeris);
    cif_ack!(0, ephemeris_ref_id);
    cif_ack!(0, gps_ascii);
    cif_ack!(0, context_association_lists);
}

impl fmt::Display for Cif0 {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CIF0:")?;
        writeln!(f, "  Context field change indicator: {}", self.context_field_changed())?;
        writeln!(f, "  Reference point identifier: {}", self.reference_point_id())?;
        writeln!(f, "  Bandwidth: {}", self.bandwidth())?;
        writeln!(f, "  IF reference frequency: {}", self.if_ref_freq())?;
        writeln!(f, "  RF reference frequency: {}", self.rf_ref_freq())?;
        writeln!(f, "  RF reference frequency offset: {}", self.rf_ref_freq_offset())?;
        writeln!(f, "  IF band offset: {}", self.if_band_offset())?;
        writeln!(f, "  Reference level: {}", self.reference_level())?;
        writeln!(f, "  Gain: {}", self.gain())?;
        writeln!(f, "  Over-range count: {}", self.over_range_count())?;
        writeln!(f, "  Sample rate: {}", self.sample_rate())?;
        writeln!(f, "  Timestamp adjustment: {}", self.timestamp_adjustment())?;
        writeln!(f, "  Timestamp calibration time: {}", self.timestamp_cal_time())?;
        writeln!(f, "  Temperature: {}", self.temperature())?;
        writeln!(f, "  Device identifier: {}", self.device_id())?;
        writeln!(f, "  State/event indicators: {}", self.state_indicators())?;
        writeln!(f, "  Signal data format: {}", self.signal_data_payload_format())?;
        writeln!(f, "  Formatted GPS: {}", self.formatted_gps())?;
        writeln!(f, "  Formatted INS: {}", self.formatted_ins())?;
        writeln!(f, "  ECEF ephemeris: {}", self.ecef_ephemeris())?;
        writeln!(f, "  Relative ephemeris: {}", self.relative_ephemeris())?;
        writeln!(f, "  Ephemeris ref ID: {}", self.ephemeris_ref_id())?;
        writeln!(f, "  GPS ASCII: {}", self.gps_ascii())?;
        writeln!(f, "  Context association lists: {}", self.context_association_lists())?;
        writeln!(f, "  CIF7: {}", self.field_attributes_enabled())?;
        writeln!(f, "  CIF3: {}", self.cif3_enabled())?;
        writeln!(f, "  CIF2: {}", self.cif2_enabled())?;
        writeln!(f, "  CIF1: {}", self.cif1_enabled())?;
        Ok(())
    }
}
