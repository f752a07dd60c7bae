// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Defines fields and methods related to CIF2 (ANSI/VITA-49.2-2017 9.1).
Fields here are compatible with VITA 49.2 and later.
*/

use core::fmt;

use crate::command_prelude::*;
use crate::{ack_response::AckResponse, cif0::Cif0, cif7::Cif7Opts, Cif0AckFields};
use deku::prelude::*;
use vrt49_macros::{cif_ack, cif_bit, cif_fields, cif_plain};

/// Base data structure for the CIF2 single-bit indicators
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cif2(u32);

impl Cif2 {
    cif_bit!(bind, 31);
    cif_bit!(cited_sid, 30);
    cif_bit!(sibling_sid, 29);
    cif_bit!(parent_sid, 28);
    cif_bit!(child_sid, 27);
    cif_bit!(cited_message_id, 26);
    cif_bit!(controllee_id, 25);
    cif_bit!(controllee_uuid, 24);
    cif_bit!(controller_id, 23);
    cif_bit!(controller_uuid, 22);
    cif_bit!(info_source_id, 21);
    cif_bit!(track_id, 20);
    cif_bit!(country_code, 19);
    cif_bit!(operator_id, 18);
    cif_bit!(platform_class, 17);
    cif_bit!(platform_instance, 16);
    cif_bit!(platform_display, 15);
    cif_bit!(ems_device_class, 14);
    cif_bit!(ems_device_type, 13);
    cif_bit!(ems_device_instance, 12);
    cif_bit!(modulation_class, 11);
    cif_bit!(modulation_type, 10);
    cif_bit!(function_id, 9);
    cif_bit!(mode_id, 8);
    cif_bit!(event_id, 7);
    cif_bit!(function_priority_id, 6);
    cif_bit!(comms_priority_id, 5);
    cif_bit!(rf_footprint, 4);
    cif_bit!(rf_footprint_range, 3);
    // Bits 0-2 are reserved

    fn empty(&self) -> bool {
        self.0 == 0
    }
}

#[cif_fields(cif2)]
pub struct Cif2Fields {
    bind: u32,
    cited_sid: u32,
    sibling_sid: u32,
    parent_sid: u32,
    child_sid: u32,
    cited_message_id: u32,
    controllee_id: u32,
    controllee_uuid: u128,
    controller_id: u32,
    controller_uuid: u128,
    info_source_id: u32,
    track_id: u32,
    country_code: u32,
    operator_id: u32,
    platform_class: u32,
    platform_instance: u32,
    platform_display: u32,
    ems_device_class: u32,
    ems_device_type: u32,
    ems_device_instance: u32,
    modulation_class: u32,
    modulation_type: u32,
    function_id: u32,
    mode_id: u32,
    event_id: u32,
    function_priority_id: u32,
    comms_priority_id: u32,
    rf_footprint: u32,
    rf_footprint_range: u32,
}

#[cif_fields(cif2)]
pub struct Cif2AckFields {
    bind: AckResponse,
    cited_sid: AckResponse,
    sibling_sid: AckResponse,
    parent_sid: AckResponse,
    child_sid: AckResponse,
    cited_message_id: AckResponse,
    controllee_id: AckResponse,
    controllee_uuid: AckResponse,
    controller_id: AckResponse,
    controller_uuid: AckResponse,
    info_source_id: AckResponse,
    track_id: AckResponse,
    country_code: AckResponse,
    operator_id: AckResponse,
    platform_class: AckResponse,
    platform_instance: AckResponse,
    platform_display: AckResponse,
    ems_device_class: AckResponse,
    ems_device_type: AckResponse,
    ems_device_instance: AckResponse,
    modulation_class: AckResponse,
    modulation_type: AckResponse,
    function_id: AckResponse,
    mode_id: AckResponse,
    event_id: AckResponse,
    function_priority_id: AckResponse,
    comms_priority_id: AckResponse,
    rf_footprint: AckResponse,
    rf_footprint_range: AckResponse,
}

/// Trait for common CIF2 manipulation methods. Used by Context and
/// Command packets.
#[rustfmt::skip]
pub trait Cif2Manipulators {
    /// Get a reference to the packet's CIF0 (indicators)
    fn cif0(&self) -> &Cif0;
    /// Get a mutable reference to the packet's CIF0 (indicators)
    fn cif0_mut(&mut self) -> &mut Cif0;
    /// Get a reference to the packet's CIF2 (indicators)
    fn cif2(&self) -> Option<&Cif2>;
    /// Get a mutable reference to the packet's CIF2 (indicators)
    fn cif2_mut(&mut self) -> &mut Option<Cif2>;
    /// Get a reference to the packet's CIF2 data fields
    fn cif2_fields(&self) -> Option<&Cif2Fields>;
    /// Get a mutable reference to the packet's CIF2 data fields
    fn cif2_fields_mut(&mut self) -> &mut Option<Cif2Fields>;

    cif_plain!(cif2, bind, bind, u32);
    cif_plain!(cif2, cited_sid, cited_sid, u32);
    cif_plain!(cif2, sibling_sid, sibling_sid, u32);
    cif_plain!(cif2, parent_sid, parent_sid, u32);
    cif_plain!(cif2, child_sid, child_sid, u32);
    cif_plain!(cif2, cited_message_id, cited_message_id, u32);
    cif_plain!(cif2, controllee_id, controllee_id, u32);
    cif_plain!(cif2, controllee_uuid, controllee_uuid, u128);
    cif_plain!(cif2, controller_id, controller_id, u32);
    cif_plain!(cif2, controller_uuid, controller_uuid, u128);
    cif_plain!(cif2, info_source_id, info_source_id, u32);
    cif_plain!(cif2, track_id, track_id, u32);
    cif_plain!(cif2, country_code, country_code, u32);
    cif_plain!(cif2, operator_id, operator_id, u32);
    cif_plain!(cif2, platform_class, platform_class, u32);
    cif_plain!(cif2, platform_instance, platform_instance, u32);
    cif_plain!(cif2, platform_display, platform_display, u32);
    cif_plain!(cif2, ems_device_class, ems_device_class, u32);
    cif_plain!(cif2, ems_device_type, ems_device_type, u32);
    cif_plain!(cif2, ems_device_instance, ems_device_instance, u32);
    cif_plain!(cif2, modulation_class, modulation_class, u32);
    cif_plain!(cif2, modulation_type, modulation_type, u32);
    cif_plain!(cif2, function_id, function_id, u32);
    cif_plain!(cif2, mode_id, mode_id, u32);
    cif_plain!(cif2, event_id, event_id, u32);
    cif_plain!(cif2, function_priority_id, function_priority_id, u32);
    cif_plain!(cif2, comms_priority_id, comms_priority_id, u32);
    cif_plain!(cif2, rf_footprint, rf_footprint, u32);
    cif_plain!(cif2, rf_footprint_range, rf_footprint_range, u32);
}

/// Shared trait for manipulating CIF2 ACK fields.
pub trait Cif2AckManipulators {
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

    /// Get a reference to the packet's WIF2 (indicators)
    fn wif2(&self) -> Option<&Cif2>;
    /// Get a mutable reference to the packet's WIF2 (indicators)
    fn wif2_mut(&mut self) -> &mut Option<Cif2>;
    /// Get a reference to the packet's WIF2 data fields
    fn wif2_fields(&self) -> Option<&Cif2AckFields>;
    /// Get a mutable reference to the packet's WIF2 data fields
    fn wif2_fields_mut(&mut self) -> &mut Option<Cif2AckFields>;

    /// Get a reference to the packet's EIF2 (indicators)
    fn eif2(&self) -> Option<&Cif2>;
    /// Get a mutable reference to the packet's EIF2 (indicators)
    fn eif2_mut(&mut self) -> &mut Option<Cif2>;
    /// Get a reference to the packet's EIF2 data fields
    fn eif2_fields(&self) -> Option<&Cif2AckFields>;
    /// Get a mutable reference to the packet's EIF2 data fields
    fn eif2_fields_mut(&mut self) -> &mut Option<Cif2AckFields>;

    cif_ack!(2, bind);
    cif_ack!(2, cited_sid);
    cif_ack!(2, sibling_sid);
    cif_ack!(2, parent_sid);
    cif_ack!(2, child_sid);
    cif_ack!(2, cited_message_id);
    cif_ack!(2, controllee_id);
    cif_ack!(2, controllee_uuid);
    cif_ack!(2, controller_id);
    cif_ack!(2, controller_uuid);
    cif_ack!(2, info_source_id);
    cif_ack!(2, track_id);
    cif_ack!(2, country_code);
    cif_ack!(2, operator_id);
    cif_ack!(2, platform_class);
    cif_ack!(2, platform_instance);
    cif_ack!(2, platform_display);
    cif_ack!(2, ems_device_class);
    cif_ack!(2, ems_device_type);
    cif_ack!(2, ems_device_instance);
    cif_ack!(2, modulation_class);
    cif_ack!(2, modulation_type);
    cif_ack!(2, function_id);
    cif_ack!(2, mode_id);
    cif_ack!(2, event_id);
    cif_ack!(2, function_priority_id);
    cif_ack!(2, comms_priority_id);
    cif_ack!(2, rf_footprint);
    cif_ack!(2, rf_footprint_range);
}

impl fmt::Display for Cif2 {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CIF2:")?;
        writeln!(f, "  Bind: {}", self.bind())?;
        writeln!(f, "  Cited SID: {}", self.cited_sid())?;
        writeln!(f, "  Sibling SID: {}", self.sibling_sid())?;
        writeln!(f, "  Parent SID: {}", self.parent_sid())?;
        writeln!(f, "  Child SID: {}", self.child_sid())?;
        writeln!(f, "  Cited message ID: {}", self.cited_message_id())?;
        writeln!(f, "  Controllee ID: {}", self.controllee_id())?;
        writeln!(f, "  Controllee UUID: {}", self.controllee_uuid())?;
        writeln!(f, "  Controller ID: {}", self.controller_id())?;
        writeln!(f, "  Controller UUID: {}", self.controller_uuid())?;
        writeln!(f, "  Info source ID: {}", self.info_source_id())?;
        writeln!(f, "  Track ID: {}", self.track_id())?;
        writeln!(f, "  Country code: {}", self.country_code())?;
        writeln!(f, "  Operator: {}", self.operator_id())?;
        writeln!(f, "  Platform class: {}", self.platform_class())?;
        writeln!(f, "  Platform instance: {}", self.platform_instance())?;
        writeln!(f, "  Platform display: {}", self.platform_display())?;
        writeln!(f, "  EMS device class: {}", self.ems_device_class())?;
        writeln!(f, "  EMS device type: {}", self.ems_device_type())?;
        writeln!(f, "  EMS device instance: {}", self.ems_device_instance())?;
        writeln!(f, "  Modulation class: {}", self.modulation_class())?;
        writeln!(f, "  Modulation type: {}", self.modulation_type())?;
        writeln!(f, "  Function ID: {}", self.function_id())?;
        writeln!(f, "  Mode ID: {}", self.mode_id())?;
        writeln!(f, "  Event ID: {}", self.event_id())?;
        writeln!(f, "  Function priority ID: {}", self.function_priority_id())?;
        writeln!(f, "  Comms priority ID: {}", self.comms_priority_id())?;
        writeln!(f, "  RF footprint: {}", self.rf_footprint())?;
        writeln!(f, "  RF footprint range: {}", self.rf_footprint_range())?;
        Ok(())
    }
}
