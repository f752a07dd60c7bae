// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use deku::prelude::*;

use crate::packet_header::{PacketHeader, PacketType};
use crate::signal_data::SignalData;
use crate::Command;
use crate::Context;
use crate::VitaError;

/// Generic payload enumeration. The payload format will differ depending on the
/// type of packet.
///
/// Normally, when using this enum, you'd unwrap the inner type using one of the
/// helper functions.
///
/// # Example
/// ```
/// use vrt49::prelude::*;
/// let mut packet = Vrt::new_context_packet();
/// // Safe to unwrap as you just made it a context packet above.
/// let context = packet.payload_mut().context_mut().unwrap();
/// context.set_bandwidth_hz(Some(8e6));
/// ```
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, DekuRead, DekuWrite)]
#[deku(
    endian = "endian",
    ctx = "endian: deku::ctx::Endian, packet_header: &PacketHeader",
    id = "packet_header.packet_type()"
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::large_enum_variant)]
pub enum Payload {
    /// Payload for a context packet.
    #[deku(id = "PacketType::Context | PacketType::ExtensionContext")]
    Context(#[deku(ctx = "packet_header")] Context),
    /// Payload for a command packet.
    #[deku(id = "PacketType::Command | PacketType::ExtensionCommand")]
    Command(#[deku(ctx = "packet_header")] Command),
    /// Payload for signal data.
    #[deku(id_pat = "_")]
    SignalData(#[deku(ctx = "packet_header")] SignalData),
}

impl Payload {
    /// Gets a reference to the signal data payload. This "unwraps"
    /// the generic `Payload` into a `SignalData` payload.
    ///
    /// # Errors
    /// This function will return an error if run on a packet other
    /// than a signal data packet.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let packet = Vrt::new_signal_data_packet();
    /// let signal_data = packet.payload().signal_data().unwrap();
    /// assert_eq!(signal_data.payload_size_bytes(), 0);
    /// ```
    pub fn signal_data(&self) -> Result<&SignalData, VitaError> {
        match self {
            Payload::SignalData(p) => Ok(p),
            _ => Err(VitaError::SignalDataOnly),
        }
    }
    /// Gets a mutable reference to the signal data payload.
    ///
    /// # Errors
    /// This function will return an error if run on a packet other
    /// than a signal data packet.
    pub fn signal_data_mut(&mut self) -> Result<&mut SignalData, VitaError> {
        match self {
            Payload::SignalData(p) => Ok(p),
            _ => Err(VitaError::SignalDataOnly),
        }
    }

    /// Gets a reference to the context payload. This "unwraps"
    /// the generic `Payload` into a `Context` payload.
    ///
    /// # Errors
    /// This function will return an error if run on a packet other
    /// than a context packet.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let packet = Vrt::new_context_packet();
    /// let context = packet.payload().context().unwrap();
    /// assert_eq!(context.bandwidth_hz(), None);
    /// ```
    pub fn context(&self) -> Result<&Context, VitaError> {
        match self {
            Payload::Context(p) => Ok(p),
            _ => Err(VitaError::ContextOnly),
        }
    }
    /// Gets a mutable reference to the context payload.
    ///
    /// # Errors
    /// This function will return an error if run on a packet other
    /// than a context packet.
    pub fn context_mut(&mut self) -> Result<&mut Context, VitaError> {
        match self {
            Payload::Context(p) => Ok(p),
            _ => Err(VitaError::ContextOnly),
        }
    }

    /// Gets a reference to the command payload. This "unwraps"
    /// the generic `Payload` into a `Command` payload.
    ///
    /// # Errors
    /// This function will return an error if run on a packet other
    /// than a command packet.
    pub fn command(&self) -> Result<&Command, VitaError> {
        match self {
            Payload::Command(p) => Ok(p),
            _ => Err(VitaError::CommandOnly),
        }
    }
    /// Gets a mutable reference to the command payload.
    ///
    /// # Errors
    /// This function will return an error if run on a packet other
    /// than a command packet.
    pub fn command_mut(&mut self) -> Result<&mut Command, VitaError> {
        match self {
            Payload::Command(p) => Ok(p),
            _ => Err(VitaError::CommandOnly),
        }
    }

    /// Gets the payload size in 32-bit words.
    pub fn size_words(&self) -> u16 {
        match self {
            Payload::SignalData(p) => p.size_words(),
            Payload::Context(p) => p.size_words(),
            Payload::Command(p) => p.size_words(),
        }
    }
}
