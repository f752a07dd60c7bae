// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![deny(missing_docs)]
#![deny(unstable_features, unused_import_braces, unreachable_pub)]
// The generated CIF accessor docs cross-link Vrt from modules that
// don't import it.
#![allow(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::unescaped_backticks)]

mod ack;
mod ack_response;
mod array_of_records;
mod cancellation;
mod cif0;
mod cif1;
mod cif2;
mod cif3;
mod cif7;
mod class_id;
mod command;
mod command_payload;
mod context;
mod context_association_lists;
mod control;
mod control_ack_mode;
mod device_id;
mod ecef_ephemeris;
pub mod encoding;
mod errors;
mod factory;
pub mod fixed_point;
mod formatted_gps;
mod frame;
mod gain;
mod gps_ascii;
mod index_list;
mod leap_seconds;
mod packet_header;
mod payload;
mod payload_format;
mod query_ack;
mod reader;
mod signal_data;
mod socket;
mod spectrum;
pub mod standard_data;
mod state_event;
mod threshold;
mod timestamp;
mod trailer;
pub mod utils;
mod vrt;
pub mod vrt_float;

// Public exports
pub use crate::ack::{Ack, AckLevel};
pub use crate::ack_response::AckResponse;
pub use crate::array_of_records::ArrayOfRecords;
pub use crate::cancellation::Cancellation;
pub use crate::cif0::*;
pub use crate::cif1::*;
pub use crate::cif2::*;
pub use crate::cif3::*;
pub use crate::cif7::Cif7;
pub use crate::class_id::ClassIdentifier;
pub use crate::command::Command;
pub use crate::command_payload::CommandPayload;
pub use crate::context::Context;
pub use crate::context_association_lists::ContextAssociationLists;
pub use crate::control::Control;
pub use crate::control_ack_mode::*;
pub use crate::device_id::DeviceId;
pub use crate::ecef_ephemeris::EcefEphemeris;
pub use crate::errors::VitaError;
pub use crate::factory::{AnyPacket, DefaultPacketFactory, PacketFactory, PacketFactoryChain};
pub use crate::formatted_gps::{FormattedGps, GEOLOCATION_NULL};
pub use crate::frame::{crc32, VrlFrame, MAX_FRAME_WORDS, MAX_UDP_FRAME_BYTES, VRL_FAW, VRL_VEND};
pub use crate::gain::Gain;
pub use crate::gps_ascii::GpsAscii;
pub use crate::index_list::{IndexEntrySize, IndexList};
pub use crate::leap_seconds::LeapSeconds;
pub use crate::packet_header::*;
pub use crate::payload::Payload;
pub use crate::payload_format::{DataItemFormat, DataType, PayloadFormat, RealComplexType};
pub use crate::query_ack::QueryAck;
pub use crate::reader::{
    PacketDispatcher, PacketQueue, QueueItem, VrtContextListener, VrtEvent, VrtReader,
    VrtReaderConfig, DEFAULT_QUEUE_SIZE, NO_CONTEXT_STREAM, NO_DATA_STREAM,
};
pub use crate::signal_data::SignalData;
pub use crate::socket::{MulticastSocket, RECV_TIMEOUT};
pub use crate::spectrum::*;
pub use crate::standard_data::StandardDataPacket;
pub use crate::state_event::StateEventIndicators;
pub use crate::threshold::Threshold;
pub use crate::timestamp::{Timestamp, GPS2PTP, GPS2UTC, MIDAS2POSIX, ONE_SEC_PS};
pub use crate::trailer::{SampleFrameIndicator, Trailer};
pub use crate::vrt::{VitaVersion, Vrt};

/// Standard imports for the most commonly used structures and
/// traits in the vrt49 crate.
pub mod prelude {
    pub use crate::cif0::{Cif0, Cif0Fields, Cif0Manipulators};
    pub use crate::cif1::{Cif1, Cif1Fields, Cif1Manipulators};
    pub use crate::cif2::{Cif2, Cif2Fields, Cif2Manipulators};
    pub use crate::cif3::{Cif3, Cif3Fields, Cif3Manipulators};
    pub use crate::cif7::Cif7;
    pub use crate::class_id::ClassIdentifier;
    pub use crate::command::Command;
    pub use crate::context::Context;
    pub use crate::errors::VitaError;
    pub use crate::packet_header::*;
    pub use crate::payload::Payload;
    pub use crate::signal_data::SignalData;
    pub use crate::vrt::Vrt;
    pub use deku::writer::Writer;
    pub use deku::{DekuContainerRead, DekuContainerWrite, DekuReader, DekuWriter};
}

/// Imports for working with the command packet family (control,
/// cancellation, and the ACK forms).
pub mod command_prelude {
    pub use crate::ack::{Ack, AckLevel};
    pub use crate::ack_response::AckResponse;
    pub use crate::cancellation::Cancellation;
    pub use crate::cif0::{Cif0AckFields, Cif0AckManipulators};
    pub use crate::cif1::{Cif1AckFields, Cif1AckManipulators};
    pub use crate::cif2::{Cif2AckFields, Cif2AckManipulators};
    pub use crate::cif3::{Cif3AckFields, Cif3AckManipulators};
    pub use crate::command::Command;
    pub use crate::command_payload::CommandPayload;
    pub use crate::control::Control;
    pub use crate::control_ack_mode::{ActionMode, ControlAckMode, IdFormat, TimingControlMode};
    pub use crate::query_ack::QueryAck;
}
