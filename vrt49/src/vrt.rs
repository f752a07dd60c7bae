// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Primary module for parsing/generating VRT data. This should
be the main entrypoint for any users of this crate.
*/

use crate::prelude::*;
use crate::standard_data;
use crate::Trailer;
use deku::prelude::*;

/// The VITA-49 minor version a consumer targets. Affects only
/// validation: under [`VitaVersion::V49`], packets flagged as not
/// 49.0-compatible are rejected.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VitaVersion {
    /// Baseline ANSI/VITA-49.0.
    V49,
    /// VITA-49.0b and later (accepts the extension indicator).
    #[default]
    V49b,
}

/// The main VRT data structure that encapsulates all types
/// of VRT packets.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, DekuRead, DekuWrite)]
#[deku(endian = "big")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vrt {
    /// VRT packet header (present on all packets).
    header: PacketHeader,
    /// Stream identifier.
    #[deku(cond = "header.stream_id_included()")]
    stream_id: Option<u32>,
    /// Class identifier.
    #[deku(cond = "header.class_id_included()")]
    class_id: Option<ClassIdentifier>,
    /// Integer timestamp.
    #[deku(cond = "header.integer_timestamp_included()")]
    integer_timestamp: Option<u32>,
    /// Fractional timestamp.
    #[deku(cond = "header.fractional_timestamp_included()")]
    fractional_timestamp: Option<u64>,
    /// Packet payload. For signal data, this would be raw bytes. For
    /// context, this would be context information, etc..
    #[deku(ctx = "header")]
    payload: Payload,
    /// Data trailer.
    #[deku(cond = "header.trailer_included()")]
    trailer: Option<Trailer>,
}

impl Vrt {
    fn new_with(header: PacketHeader, payload: Payload) -> Vrt {
        let mut ret = Vrt {
            header,
            stream_id: Some(0),
            class_id: None,
            integer_timestamp: None,
            fractional_timestamp: None,
            payload,
            trailer: None,
        };
        ret.update_packet_size();
        ret
    }

    /// Produce a new signal data packet with some sane defaults.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// # fn main() -> Result<(), VitaError> {
    /// let mut packet = Vrt::new_signal_data_packet();
    /// packet.set_stream_id(Some(0xDEADBEEF));
    /// packet.set_signal_payload(&[1, 2, 3, 4, 5, 6, 7, 8])?;
    /// assert_eq!(packet.stream_id(), Some(0xDEADBEEF));
    /// assert_eq!(packet.signal_payload()?, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_signal_data_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_signal_data_header(),
            Payload::SignalData(SignalData::new()),
        )
    }

    /// Produce a new context packet with some sane defaults.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let mut packet = Vrt::new_context_packet();
    /// let context: &mut Context = packet.payload_mut().context_mut().unwrap();
    /// context.set_bandwidth_hz(Some(8e6));
    /// assert_eq!(context.bandwidth_hz(), Some(8e6));
    /// ```
    pub fn new_context_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_context_header(),
            Payload::Context(Context::new()),
        )
    }

    /// Produce a new control packet.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let mut packet = Vrt::new_control_packet();
    /// let command = packet.payload_mut().command_mut().unwrap();
    /// let control = command.payload_mut().control_mut().unwrap();
    /// control.set_bandwidth_hz(Some(8e6));
    /// assert_eq!(control.bandwidth_hz(), Some(8e6));
    /// ```
    pub fn new_control_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_control_header(),
            Payload::Command(Command::new_control()),
        )
    }

    /// Produce a new cancellation packet.
    pub fn new_cancellation_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_cancellation_header(),
            Payload::Command(Command::new_cancellation()),
        )
    }

    /// Produce a new validation ACK packet.
    pub fn new_validation_ack_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_ack_header(),
            Payload::Command(Command::new_validation_ack()),
        )
    }

    /// Produce a new execution ACK packet.
    pub fn new_exec_ack_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_ack_header(),
            Payload::Command(Command::new_exec_ack()),
        )
    }

    /// Produce a new query ACK packet.
    pub fn new_query_ack_packet() -> Vrt {
        Vrt::new_with(
            PacketHeader::new_ack_header(),
            Payload::Command(Command::new_query_ack()),
        )
    }

    /// Gets a reference to the packet header.
    pub fn header(&self) -> &PacketHeader {
        &self.header
    }
    /// Gets a mutable reference to the packet header.
    pub fn header_mut(&mut self) -> &mut PacketHeader {
        &mut self.header
    }

    /// Get the packet stream ID.
    pub fn stream_id(&self) -> Option<u32> {
        self.stream_id
    }

    /// Sets the packet's stream ID. If `None` is passed, the stream ID
    /// field will be unset.
    ///
    /// Note: if the packet type does not match after setting/unsetting,
    /// the packet type will be updated to reflect the change. For example,
    /// if you did `packet.set_stream_id(1)` on a `PacketType::SignalDataWithoutStreamId`,
    /// it would change the packet to a `PacketType::SignalData`.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let mut packet = Vrt::new_signal_data_packet();
    /// packet.set_stream_id(Some(0xDEADBEEF));
    /// assert!(matches!(packet.header().packet_type(), PacketType::SignalData));
    /// packet.set_stream_id(None);
    /// assert!(matches!(packet.header().packet_type(), PacketType::SignalDataWithoutStreamId));
    /// ```
    pub fn set_stream_id(&mut self, stream_id: Option<u32>) {
        self.stream_id = stream_id;
        if self.stream_id.is_some() {
            match self.header.packet_type() {
                PacketType::SignalDataWithoutStreamId => {
                    self.header.set_packet_type(PacketType::SignalData);
                }
                PacketType::ExtensionDataWithoutStreamId => {
                    self.header.set_packet_type(PacketType::ExtensionData);
                }
                _ => (),
            }
        } else {
            match self.header.packet_type() {
                PacketType::SignalData => {
                    self.header
                        .set_packet_type(PacketType::SignalDataWithoutStreamId);
                }
                PacketType::ExtensionData => {
                    self.header
                        .set_packet_type(PacketType::ExtensionDataWithoutStreamId);
                }
                _ => (),
            }
        }
    }

    /// Gets a reference to the packet class identifier.
    pub fn class_id(&self) -> Option<&ClassIdentifier> {
        self.class_id.as_ref()
    }
    /// Gets the packet class identifier as a mutable reference.
    pub fn class_id_mut(&mut self) -> Option<&mut ClassIdentifier> {
        self.class_id.as_mut()
    }
    /// Set the packet class identifier.
    pub fn set_class_id(&mut self, class_id: Option<ClassIdentifier>) {
        self.header.set_class_id_included(class_id.is_some());
        self.class_id = class_id;
    }

    /// Gets the integer timestamp field.
    pub fn integer_timestamp(&self) -> Option<u32> {
        self.integer_timestamp
    }
    /// Sets the integer timestamp field.
    ///
    /// When setting this field, you must also provide a [`Tsi`] mode to indicate what
    /// kind of timestamp is being represented.
    ///
    /// # Errors
    /// If a timestamp and TSI mode are passed that don't work together, this function
    /// will return an error. For example, if `timestamp = Some(123)` and `tsi = Tsi::Null`.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// # fn main() -> Result<(), VitaError> {
    /// let mut packet = Vrt::new_signal_data_packet();
    /// packet.set_integer_timestamp(Some(12345), Tsi::Utc)?;
    /// assert_eq!(packet.integer_timestamp(), Some(12345));
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_integer_timestamp(
        &mut self,
        timestamp: Option<u32>,
        tsi: Tsi,
    ) -> Result<(), VitaError> {
        if (timestamp.is_some() && matches!(tsi, Tsi::Null))
            || (timestamp.is_none() && !matches!(tsi, Tsi::Null))
        {
            return Err(VitaError::TimestampModeMismatch);
        }
        self.integer_timestamp = timestamp;
        self.header.set_tsi(tsi);
        Ok(())
    }

    /// Gets the fractional timestamp field.
    pub fn fractional_timestamp(&self) -> Option<u64> {
        self.fractional_timestamp
    }
    /// Sets the fractional timestamp field.
    ///
    /// When setting this field, you must also provide a [`Tsf`] mode to indicate what
    /// kind of timestamp is being represented.
    ///
    /// # Errors
    /// If a timestamp and TSF mode are passed that don't work together, this function
    /// will return an error.
    pub fn set_fractional_timestamp(
        &mut self,
        timestamp: Option<u64>,
        tsf: Tsf,
    ) -> Result<(), VitaError> {
        if (timestamp.is_some() && matches!(tsf, Tsf::Null))
            || (timestamp.is_none() && !matches!(tsf, Tsf::Null))
        {
            return Err(VitaError::TimestampModeMismatch);
        }
        self.fractional_timestamp = timestamp;
        self.header.set_tsf(tsf);
        Ok(())
    }

    /// Gets the packet's prologue timestamp as a [`Timestamp`], using
    /// the given leap-seconds table.
    pub fn timestamp(
        &self,
        ls: std::sync::Arc<crate::LeapSeconds>,
    ) -> Result<crate::Timestamp, VitaError> {
        crate::Timestamp::new(
            self.header.tsi(),
            self.header.tsf(),
            self.integer_timestamp.unwrap_or(0),
            self.fractional_timestamp.unwrap_or(0),
            ls,
        )
    }

    /// Sets the packet's prologue timestamp fields from a [`Timestamp`].
    pub fn set_timestamp(&mut self, ts: &crate::Timestamp) -> Result<(), VitaError> {
        match ts.tsi_mode() {
            Tsi::Null => self.set_integer_timestamp(None, Tsi::Null)?,
            mode => self.set_integer_timestamp(Some(ts.integer()), mode)?,
        }
        match ts.tsf_mode() {
            Tsf::Null => self.set_fractional_timestamp(None, Tsf::Null)?,
            mode => self.set_fractional_timestamp(Some(ts.fractional()), mode)?,
        }
        Ok(())
    }

    /// Gets a reference to the payload enumeration.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Gets a mutable reference to the payload enumeration.
    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Gets a reference to the trailer.
    pub fn trailer(&self) -> Option<&Trailer> {
        self.trailer.as_ref()
    }

    /// Gets a mutable reference to the trailer.
    pub fn trailer_mut(&mut self) -> Option<&mut Trailer> {
        self.trailer.as_mut()
    }

    /// Sets or removes the data trailer, updating the header indicator.
    ///
    /// # Errors
    /// Only signal data packets carry a trailer.
    pub fn set_trailer(&mut self, trailer: Option<Trailer>) -> Result<(), VitaError> {
        if !self.header.packet_type().is_data() {
            return Err(VitaError::SignalDataOnly);
        }
        if let Indicators::SignalData(mut i) = self.header.indicators() {
            i.trailer_included = trailer.is_some();
            self.header.set_indicators(Indicators::SignalData(i));
        }
        self.trailer = trailer;
        Ok(())
    }

    /// Get the packet payload as a vector of bytes.
    ///
    /// # Errors
    /// This function should only be used with a signal data packet type. Use
    /// of this function on other packet types will return an error.
    pub fn signal_payload(&self) -> Result<Vec<u8>, VitaError> {
        Ok(self.payload.signal_data()?.payload())
    }

    /// Set the packet payload to some raw bytes (signal data only).
    ///
    /// # Errors
    /// This function should only be used with a signal data packet type. Use
    /// of this function on other packet types will return an error.
    ///
    /// Internally, the payload is represented as a vector of 32-bit integers.
    /// If you pass a payload of bytes with a length indivisible by 4, the call
    /// will return an error.
    pub fn set_signal_payload(&mut self, payload: &[u8]) -> Result<(), VitaError> {
        let sig_data = self.payload.signal_data_mut()?;
        sig_data.set_payload(payload)?;
        self.update_packet_size();
        Ok(())
    }

    /// The 64-bit stream key used by the receive pipeline's per-stream
    /// packet counters: the stream ID in the low half and the folded
    /// class identifier in the high half.
    pub fn stream_code(&self) -> u64 {
        let class = self
            .class_id
            .map(|c| {
                let id = c.as_u64();
                (id ^ (id >> 32)) as u32
            })
            .unwrap_or(0);
        ((class as u64) << 32) | self.stream_id.unwrap_or(0) as u64
    }

    /// Checks the structural validity of the packet: the header length
    /// field against the content, and (in strict mode) standard-data
    /// class ID consistency.
    ///
    /// # Errors
    /// Returns the first structural problem found.
    pub fn validate(&self, strict: bool) -> Result<(), VitaError> {
        let declared = self.header.packet_size();
        let actual = self.size_words();
        if declared != actual {
            return Err(VitaError::PacketSizeMismatch { declared, actual });
        }
        if strict {
            if let Some(class_id) = &self.class_id {
                if standard_data::is_standard_data_class_id(class_id.as_u64()) {
                    standard_data::payload_format_for_class(class_id.as_u64())?;
                }
            }
        }
        Ok(())
    }

    /// [`validate`](Vrt::validate) plus the version gate: under
    /// [`VitaVersion::V49`], a set "not a V49.0 packet" indicator
    /// fails validation.
    pub fn validate_for(&self, version: VitaVersion, strict: bool) -> Result<(), VitaError> {
        self.validate(strict)?;
        if version == VitaVersion::V49 {
            let flagged = match self.header.indicators() {
                Indicators::SignalData(i) => i.not_a_vita490_packet,
                Indicators::Context(i) => i.not_a_vita490_packet,
                Indicators::Command(_) => true,
            };
            if flagged {
                return Err(VitaError::NotV490Compatible);
            }
        }
        Ok(())
    }

    /// The packet's current size in 32-bit words (independent of the
    /// header length field).
    pub fn size_words(&self) -> u16 {
        let mut packet_size_words = self.header.prologue_size_words();
        if self.header.trailer_included() {
            packet_size_words += 1;
        }
        packet_size_words += self.payload.size_words();
        packet_size_words
    }

    /// Update the VRT packet header size field to reflect the current contents of
    /// the data structure.
    ///
    /// This function should be executed after making any changes to a packet (i.e
    /// after any functions `set_*()`) to make sure the header size is set correctly
    /// prior to serialization.
    ///
    /// # Example
    /// ```
    /// use vrt49::prelude::*;
    /// let mut packet = Vrt::new_context_packet();
    /// let context = packet.payload_mut().context_mut().unwrap();
    /// context.set_bandwidth_hz(Some(8e6));
    /// context.set_sample_rate_sps(Some(8e6));
    /// packet.update_packet_size();
    /// // ... write the packet
    /// ```
    pub fn update_packet_size(&mut self) {
        let words = self.size_words();
        self.header.set_packet_size(words);
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn wire_round_trip() {
        let mut packet = Vrt::new_signal_data_packet();
        packet.set_stream_id(Some(0x1234_5678));
        packet.set_signal_payload(&[1, 2, 3, 4]).unwrap();
        packet.update_packet_size();
        let bytes = packet.to_bytes().unwrap();
        assert_eq!(bytes.len(), 4 * 3);
        let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
        assert_eq!(parsed, packet);
    }

    #[test]
    fn validate_checks_length_field() {
        let mut packet = Vrt::new_signal_data_packet();
        packet.set_signal_payload(&[0; 8]).unwrap();
        packet.update_packet_size();
        assert!(packet.validate(true).is_ok());
        packet.header_mut().set_packet_size(99);
        assert!(matches!(
            packet.validate(false),
            Err(VitaError::PacketSizeMismatch { declared: 99, .. })
        ));
    }

    #[test]
    fn version_gate() {
        use crate::VitaVersion;
        let mut packet = Vrt::new_signal_data_packet();
        packet.update_packet_size();
        assert!(packet.validate_for(VitaVersion::V49, true).is_ok());
        assert!(packet.validate_for(VitaVersion::V49b, true).is_ok());

        // Command packets only exist from 49.2 onward.
        let mut cmd = Vrt::new_control_packet();
        cmd.update_packet_size();
        assert!(cmd.validate_for(VitaVersion::V49, false).is_err());
        assert!(cmd.validate_for(VitaVersion::V49b, false).is_ok());
    }

    #[test]
    fn stream_code_distinguishes_classes() {
        let mut a = Vrt::new_signal_data_packet();
        a.set_stream_id(Some(7));
        let mut b = a.clone();
        assert_eq!(a.stream_code(), b.stream_code());
        b.set_class_id(Some(ClassIdentifier::new(0xFF_FFFA, 3, 0)));
        assert_ne!(a.stream_code(), b.stream_code());
        assert_eq!(a.stream_code() as u32, 7);
    }

    #[test]
    fn context_packet_wire_layout() {
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        context.set_rf_ref_freq_hz(Some(3e9));
        context.set_bandwidth_hz(Some(1e6));
        packet.update_packet_size();
        let bytes = packet.to_bytes().unwrap();
        // Header + stream ID + CIF0 + two 64-bit fixed-point fields.
        assert_eq!(bytes.len(), 4 * (1 + 1 + 1 + 2 + 2));
        // CIF0 has bits 29 and 27 set.
        assert_eq!(&bytes[8..12], &[0x28, 0x00, 0x00, 0x00]);
        // Bandwidth (bit 29) is laid out before RF frequency (bit 27):
        // 1 MHz then 3 GHz in radix-20 fixed point.
        assert_eq!(u64::from_be_bytes(bytes[12..20].try_into().unwrap()), 1_000_000 << 20);
        assert_eq!(
            u64::from_be_bytes(bytes[20..28].try_into().unwrap()),
            3_000_000_000 << 20
        );
    }
}
