// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the packet header format
(ANSI/VITA-49.2-2017 section 5.1.1).
*/

use deku::prelude::*;

use crate::VitaError;

/// Base packet header data structure.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketHeader {
    hword_1: u16,
    packet_size: u16,
}

/// The type of VRT packet being worked on.
///
/// Note: the packet type is used throughout this crate to determine
/// how to serialize and deserialize various fields, so it's important
/// that this field is correctly set.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, DekuRead, DekuWrite)]
#[deku(id_type = "u8", endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketType {
    /// Signal data packet without a stream ID.
    #[deku(id = 0x0)]
    SignalDataWithoutStreamId,
    /// Signal data packet *with* a stream ID.
    #[deku(id = 0x1)]
    SignalData,
    /// Extension data packet without a stream ID.
    #[deku(id = 0x2)]
    ExtensionDataWithoutStreamId,
    /// Extension data packet *with* a stream ID.
    #[deku(id = 0x3)]
    ExtensionData,
    /// Context packet.
    #[deku(id = 0x4)]
    Context,
    /// Extension context packet.
    #[deku(id = 0x5)]
    ExtensionContext,
    /// Command packet.
    #[deku(id = 0x6)]
    Command,
    /// Extension command packet.
    #[deku(id = 0x7)]
    ExtensionCommand,
    // All other values are reserved
}

impl PacketType {
    /// Returns true for the four data packet types.
    pub fn is_data(&self) -> bool {
        matches!(
            &self,
            PacketType::SignalData
                | PacketType::SignalDataWithoutStreamId
                | PacketType::ExtensionData
                | PacketType::ExtensionDataWithoutStreamId
        )
    }
    /// Returns true for the context packet types.
    pub fn is_context(&self) -> bool {
        matches!(&self, PacketType::Context | PacketType::ExtensionContext)
    }
    /// Returns true for the command packet types.
    pub fn is_command(&self) -> bool {
        matches!(&self, PacketType::Command | PacketType::ExtensionCommand)
    }
}

impl TryFrom<u8> for PacketType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(PacketType::SignalDataWithoutStreamId),
            0x1 => Ok(PacketType::SignalData),
            0x2 => Ok(PacketType::ExtensionDataWithoutStreamId),
            0x3 => Ok(PacketType::ExtensionData),
            0x4 => Ok(PacketType::Context),
            0x5 => Ok(PacketType::ExtensionContext),
            0x6 => Ok(PacketType::Command),
            0x7 => Ok(PacketType::ExtensionCommand),
            _ => Err(()),
        }
    }
}

/// Indicator field enumeration. The three indicator bits
/// have different meaning depending on if the packet is a
/// signal data, context, or command packet.
///
/// See ANSI/VITA-49.2-2017 section 5.1.1.1 for more details.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Indicators {
    /// The bits represent signal data indicators.
    SignalData(SignalDataIndicators),
    /// The bits represent context indicators.
    Context(ContextIndicators),
    /// The bits represent command indicators.
    Command(CommandIndicators),
}

/// Signal data indicator fields.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalDataIndicators {
    /// The packet includes a trailer.
    pub trailer_included: bool,
    /// The packet is not compliant with VITA 49.0. A VITA 49.0 parser may
    /// break if trying to parse this packet.
    pub not_a_vita490_packet: bool,
    /// The signal data represents spectral data.
    pub signal_spectral_data: bool,
}

/// Timestamp mode
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimestampMode {
    /// Used to convey the precise timing of events or Context changes.
    /// The resolution of this Timestamp Mode could be up to highest
    /// resolution supported by the TSF setting (either sample or picosecond
    /// resolution).
    PreciseTiming,
    /// Used to convey the general timing of events or Context changes.
    /// The resolution of this Timestamp Mode is the Data Sampling Interval
    /// of a Data packet.
    GeneralTiming,
}

impl From<bool> for TimestampMode {
    fn from(value: bool) -> Self {
        if value {
            TimestampMode::GeneralTiming
        } else {
            TimestampMode::PreciseTiming
        }
    }
}

/// Context packet indicator fields.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextIndicators {
    /// The packet is not compliant with VITA 49.0. A VITA 49.0 parser may
    /// break if trying to parse this packet.
    pub not_a_vita490_packet: bool,
    /// Context timestamp mode (TSM).
    pub timestamp_mode: TimestampMode,
}

/// Command packet indicators.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandIndicators {
    /// The command packet is an ACK packet.
    pub ack_packet: bool,
    /// The command packet is a cancellation packet.
    pub cancellation_packet: bool,
}

/// TimeStamp-Integer (TSI) field.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tsi {
    /// Timestamp is not included.
    Null,
    /// Timestamp represents UTC time.
    Utc,
    /// Timestamp represents GPS time.
    Gps,
    /// Timestamp represents some other time.
    Other,
}

impl TryFrom<u8> for Tsi {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(Tsi::Null),
            0x1 => Ok(Tsi::Utc),
            0x2 => Ok(Tsi::Gps),
            0x3 => Ok(Tsi::Other),
            _ => Err(()),
        }
    }
}

/// TimeStamp-Fractional (TSF) field.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tsf {
    /// Timestamp is not included.
    Null,
    /// Timestamp represents a sample counter.
    SampleCount,
    /// Timestamp represents a real fractional time (in picoseconds).
    RealTimePs,
    /// Timestamp represents a free-running count.
    FreeRunningCount,
}

impl TryFrom<u8> for Tsf {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(Tsf::Null),
            0x1 => Ok(Tsf::SampleCount),
            0x2 => Ok(Tsf::RealTimePs),
            0x3 => Ok(Tsf::FreeRunningCount),
            _ => Err(()),
        }
    }
}

/// Wire layout of a timestamp under the current header TSI/TSF modes.
/// Threaded into the parse of timestamp-sized CIF3 fields (Age,
/// Shelf Life), whose width follows the packet's own timestamp width.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TsLayout {
    /// An integer-seconds word is present (TSI != Null).
    pub tsi: bool,
    /// A fractional double-word is present (TSF != Null).
    pub tsf: bool,
}

impl TsLayout {
    /// Derive the timestamp layout from a packet header.
    pub fn from(header: &PacketHeader) -> TsLayout {
        TsLayout {
            tsi: header.integer_timestamp_included(),
            tsf: header.fractional_timestamp_included(),
        }
    }
}

impl PacketHeader {
    /// Gets the raw 32-bit value of the packet header.
    pub fn as_u32(&self) -> u32 {
        ((self.hword_1 as u32) << 16) | (self.packet_size as u32)
    }
    /// Gets the packet type.
    pub fn packet_type(&self) -> PacketType {
        (((self.hword_1 >> 12) & 0b1111) as u8).try_into().unwrap()
    }
    /// Sets the packet type.
    pub fn set_packet_type(&mut self, packet_type: PacketType) {
        self.hword_1 &= !(0b1111 << 12);
        self.hword_1 |= (packet_type as u16) << 12
    }
    /// Returns true if a class identifier is included in the packet.
    pub fn class_id_included(&self) -> bool {
        self.hword_1 & (1 << 11) != 0
    }

    /// Sets the class_id_included flag.
    pub(crate) fn set_class_id_included(&mut self, included: bool) {
        self.hword_1 = (self.hword_1 & !(1 << 11)) | ((included as u16) << 11);
    }

    /// Returns the packet indicators.
    /// Note: these indicators will be different depending on
    /// the type of packet you're working with, so you'll need
    /// to disambiguate.
    ///
    /// # Example
    /// ```
    /// # use vrt49::prelude::*;
    /// use vrt49::Indicators;
    /// # fn main() -> Result<(), VitaError> {
    /// # let packet = Vrt::new_signal_data_packet();
    /// match packet.header().indicators() {
    ///     Indicators::SignalData(i) => {
    ///         println!("Trailer included: {}", i.trailer_included);
    ///     },
    ///     _ => panic!("unexpected indicators")
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn indicators(&self) -> Indicators {
        let i1 = self.hword_1 & (1 << 10) != 0;
        let i2 = self.hword_1 & (1 << 9) != 0;
        let i3 = self.hword_1 & (1 << 8) != 0;
        match self.packet_type() {
            PacketType::SignalData
            | PacketType::SignalDataWithoutStreamId
            | PacketType::ExtensionData
            | PacketType::ExtensionDataWithoutStreamId => {
                Indicators::SignalData(SignalDataIndicators {
                    trailer_included: i1,
                    not_a_vita490_packet: i2,
                    signal_spectral_data: i3,
                })
            }
            PacketType::Context | PacketType::ExtensionContext => {
                Indicators::Context(ContextIndicators {
                    // i1 is reserved
                    not_a_vita490_packet: i2,
                    timestamp_mode: i3.into(),
                })
            }
            PacketType::Command | PacketType::ExtensionCommand => {
                Indicators::Command(CommandIndicators {
                    ack_packet: i1,
                    // i2 is reserved
                    cancellation_packet: i3,
                })
            }
        }
    }
    /// Sets the header indicators.
    pub fn set_indicators(&mut self, indicators: Indicators) {
        self.hword_1 &= !(0b111 << 8);
        match indicators {
            Indicators::SignalData(i) => {
                self.hword_1 |= (i.trailer_included as u16) << 10;
                self.hword_1 |= (i.not_a_vita490_packet as u16) << 9;
                self.hword_1 |= (i.signal_spectral_data as u16) << 8;
            }
            Indicators::Context(i) => {
                self.hword_1 |= (i.not_a_vita490_packet as u16) << 9;
                self.hword_1 |= (i.timestamp_mode as u16) << 8;
            }
            Indicators::Command(i) => {
                self.hword_1 |= (i.ack_packet as u16) << 10;
                self.hword_1 |= (i.cancellation_packet as u16) << 8;
            }
        }
    }
    /// Returns Ok(true) if the packet is an Ack packet, Ok(false) if
    /// it's some other kind of Command packet, and an error if it's
    /// some other type of packet entirely.
    pub fn is_ack_packet(&self) -> Result<bool, VitaError> {
        match self.indicators() {
            Indicators::Command(i) => Ok(i.ack_packet),
            _ => Err(VitaError::CommandOnly),
        }
    }
    /// Returns Ok(true) if the packet is a cancellation packet, Ok(false)
    /// if it's some other kind of Command packet, and an error if it's
    /// some other type of packet entirely.
    pub fn is_cancellation_packet(&self) -> Result<bool, VitaError> {
        match self.indicators() {
            Indicators::Command(i) => Ok(i.cancellation_packet),
            _ => Err(VitaError::CommandOnly),
        }
    }
    /// Gets the TimeStamp-Integer (TSI) field.
    pub fn tsi(&self) -> Tsi {
        (((self.hword_1 >> 6) & 0b11) as u8).try_into().unwrap()
    }

    /// Sets the TimeStamp-Integer (TSI) field.
    pub(crate) fn set_tsi(&mut self, tsi: Tsi) {
        self.hword_1 = (self.hword_1 & !(0b11 << 6)) | ((tsi as u16) << 6);
    }

    /// Gets the TimeStamp-Fractional (TSF) field.
    pub fn tsf(&self) -> Tsf {
        (((self.hword_1 >> 4) & 0b11) as u8).try_into().unwrap()
    }

    /// Sets the TimeStamp-Fractional (TSF) field.
    pub(crate) fn set_tsf(&mut self, tsf: Tsf) {
        self.hword_1 = (self.hword_1 & !(0b11 << 4)) | ((tsf as u16) << 4);
    }

    /// Gets the modulo-16 packet counter field.
    pub fn packet_count(&self) -> u8 {
        (self.hword_1 & 0b1111) as u8
    }
    /// Sets the modulo-16 packet counter field.
    pub fn set_packet_count(&mut self, count: u8) {
        let masked_count = (count & 0b1111) as u16;
        self.hword_1 = (self.hword_1 & (!0b1111)) | masked_count;
    }
    /// Increments the packet counter by one (wrapping at 16).
    pub fn inc_packet_count(&mut self) {
        self.set_packet_count((self.packet_count() + 1) % 16);
    }

    /// Gets the packet size field (32-bit words).
    pub fn packet_size(&self) -> u16 {
        self.packet_size
    }
    /// Sets the packet size field (32-bit words).
    pub fn set_packet_size(&mut self, n_words: u16) {
        self.packet_size = n_words;
    }

    /// Returns true if a stream ID is included, false if not.
    pub fn stream_id_included(&self) -> bool {
        !matches!(
            &self.packet_type(),
            PacketType::SignalDataWithoutStreamId | PacketType::ExtensionDataWithoutStreamId
        )
    }

    /// Returns true if an integer timestamp is included, false if not.
    pub fn integer_timestamp_included(&self) -> bool {
        self.tsi() != Tsi::Null
    }

    /// Returns true if a fractional timestamp is included, false if not.
    pub fn fractional_timestamp_included(&self) -> bool {
        self.tsf() != Tsf::Null
    }

    /// Returns true if a trailer is included, false if not.
    pub fn trailer_included(&self) -> bool {
        match &self.indicators() {
            Indicators::SignalData(i) => i.trailer_included,
            _ => false,
        }
    }

    /// Returns the number of 32-bit words the prologue occupies (header,
    /// stream ID, class ID, and timestamps -- everything ahead of the
    /// payload).
    pub fn prologue_size_words(&self) -> u16 {
        let mut ret = 1;
        if self.stream_id_included() {
            ret += 1;
        }
        if self.class_id_included() {
            ret += 2;
        }
        if self.integer_timestamp_included() {
            ret += 1;
        }
        if self.fractional_timestamp_included() {
            ret += 2;
        }
        ret
    }

    /// Returns the payload size in 32-bit words.
    pub fn payload_size_words(&self) -> usize {
        let mut ret = (self.packet_size as usize).saturating_sub(self.prologue_size_words() as usize);
        if self.trailer_included() {
            ret = ret.saturating_sub(1);
        }
        ret
    }

    /// Creates a new signal data packet header with some sane defaults.
    pub fn new_signal_data_header() -> PacketHeader {
        let mut ret = PacketHeader::default();
        ret.set_packet_type(PacketType::SignalData);
        ret.set_indicators(Indicators::SignalData(SignalDataIndicators {
            trailer_included: false,
            not_a_vita490_packet: false,
            signal_spectral_data: false,
        }));
        ret
    }

    /// Creates a new context packet header with some sane defaults.
    pub fn new_context_header() -> PacketHeader {
        let mut ret = PacketHeader::default();
        ret.set_packet_type(PacketType::Context);
        ret.set_indicators(Indicators::Context(ContextIndicators {
            not_a_vita490_packet: false,
            timestamp_mode: TimestampMode::GeneralTiming,
        }));
        ret
    }

    /// Creates a new control packet header.
    pub fn new_control_header() -> PacketHeader {
        let mut ret = PacketHeader::default();
        ret.set_packet_type(PacketType::Command);
        ret.set_indicators(Indicators::Command(CommandIndicators {
            ack_packet: false,
            cancellation_packet: false,
        }));
        ret
    }

    /// Creates a new cancellation packet header.
    pub fn new_cancellation_header() -> PacketHeader {
        let mut ret = PacketHeader::default();
        ret.set_packet_type(PacketType::Command);
        ret.set_indicators(Indicators::Command(CommandIndicators {
            ack_packet: false,
            cancellation_packet: true,
        }));
        ret
    }

    /// Creates a new ack packet header.
    pub fn new_ack_header() -> PacketHeader {
        let mut ret = PacketHeader::default();
        ret.set_packet_type(PacketType::Command);
        ret.set_indicators(Indicators::Command(CommandIndicators {
            ack_packet: true,
            cancellation_packet: false,
        }));
        ret
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn packet_header() {
        use crate::prelude::*;
        let packet = Vrt::new_control_packet();
        assert_eq!(packet.header().packet_type(), PacketType::Command);
        assert_eq!(packet.header().as_u32() >> 28, 0b0110);
    }

    #[test]
    fn set_class_id_sets_class_id_included_bit() {
        use crate::prelude::*;
        let mut packet = Vrt::new_signal_data_packet();

        assert!(!packet.header().class_id_included());
        packet.set_class_id(Some(ClassIdentifier::default()));
        assert!(packet.header().class_id_included());
    }

    #[test]
    fn counter_wraps_at_16() {
        use crate::prelude::*;
        let mut packet = Vrt::new_signal_data_packet();
        packet.header_mut().set_packet_count(15);
        packet.header_mut().inc_packet_count();
        assert_eq!(packet.header().packet_count(), 0);
    }
}
