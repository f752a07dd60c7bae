// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Standard data packets: signal data packets whose class identifier both
marks them as "standard" (reserved OUI `FF-FF-FA`) and encodes their
own payload format. The low class bits carry the real/complex mode, a
data type code, and the vector size, giving a bidirectional mapping
between class IDs and [`PayloadFormat`] values.
*/

use std::ops::{Deref, DerefMut};

use crate::payload_format::{DataItemFormat, DataType, PayloadFormat, RealComplexType};
use crate::prelude::*;

/// Bits of the 56-bit class identifier that must match
/// [`STANDARD_DATA_CLASS_CHECK`] for a standard data packet: the OUI
/// plus the upper byte of the information class code.
pub const STANDARD_DATA_CLASS_MASK: u64 = 0x00FF_FFFF_FF00_0000;
/// The matching value under [`STANDARD_DATA_CLASS_MASK`]: OUI
/// `FF-FF-FA` with a zero upper information-class byte.
pub const STANDARD_DATA_CLASS_CHECK: u64 = 0x00FF_FFFA_0000_0000;

/// Payload format bit patterns indexed by the class ID's 4-bit data
/// type code. `None` marks reserved codes.
#[rustfmt::skip]
const TYPE_TO_FORMAT: [Option<u64>; 16] = [
    None,                           // reserved
    Some(0x0000_00C3_0000_0000),    //  4-bit signed fixed point
    Some(0x0000_01C7_0000_0000),    //  8-bit signed fixed point
    Some(0x0000_03CF_0000_0000),    // 16-bit signed fixed point
    Some(0x0000_07DF_0000_0000),    // 32-bit signed fixed point
    Some(0x0000_0FFF_0000_0000),    // 64-bit signed fixed point
    Some(0x0E00_07DF_0000_0000),    // 32-bit IEEE-754 single precision
    Some(0x0F00_0FFF_0000_0000),    // 64-bit IEEE-754 double precision
    Some(0x1000_0000_0000_0000),    //  1-bit unsigned fixed point
    Some(0x1000_00C3_0000_0000),    //  4-bit unsigned fixed point
    Some(0x1000_01C7_0000_0000),    //  8-bit unsigned fixed point
    Some(0x1000_03CF_0000_0000),    // 16-bit unsigned fixed point
    Some(0x1000_07DF_0000_0000),    // 32-bit unsigned fixed point
    Some(0x1000_0FFF_0000_0000),    // 64-bit unsigned fixed point
    None,                           // reserved
    None,                           // reserved
];

/// Returns true when the 56-bit class identifier is in the standard
/// data packet range.
pub fn is_standard_data_class_id(id: u64) -> bool {
    (id & STANDARD_DATA_CLASS_MASK) == STANDARD_DATA_CLASS_CHECK
}

/// Decodes a standard data class identifier into a payload format.
///
/// # Errors
/// Returns an error when the identifier is outside the standard data
/// range or uses a reserved data type code.
pub fn payload_format_for_class(id: u64) -> Result<PayloadFormat, VitaError> {
    if !is_standard_data_class_id(id) {
        return Err(VitaError::UnsupportedPayloadFormat);
    }
    let base = TYPE_TO_FORMAT[((id >> 16) & 0xF) as usize]
        .ok_or(VitaError::UnsupportedPayloadFormat)?;
    let bits = base
        | ((id & 0x0030_0000) << 41) // real/complex
        | (id & 0xFFFF); // vector size
    Ok(PayloadFormat::from_u64(bits))
}

/// Encodes a payload format as a standard data class identifier.
///
/// # Errors
/// The standard data encoding only covers formats with no tags, no
/// fraction bits, a repeat count of one, processing-efficient packing,
/// and an item size equal to the packing size; anything else is an
/// error, as is a data type with no class code.
pub fn class_for_payload_format(pf: &PayloadFormat) -> Result<u64, VitaError> {
    if pf.link_efficient_packing()
        || pf.sample_component_repeating()
        || pf.event_tag_size_bits() != 0
        || pf.channel_tag_size_bits() != 0
        || pf.data_item_fraction_size_bits() != 0
        || pf.repeat_count() != 1
        || pf.item_packing_field_size_bits() != pf.data_item_size_bits()
    {
        return Err(VitaError::UnsupportedPayloadFormat);
    }
    let type_code: u64 = match (pf.data_item_format(), pf.data_item_size_bits()) {
        (DataItemFormat::SignedFixedPoint, 4) => 1,
        (DataItemFormat::SignedFixedPoint, 8) => 2,
        (DataItemFormat::SignedFixedPoint, 16) => 3,
        (DataItemFormat::SignedFixedPoint, 32) => 4,
        (DataItemFormat::SignedFixedPoint, 64) => 5,
        (DataItemFormat::IeeeSinglePrecision, 32) => 6,
        (DataItemFormat::IeeeDoublePrecision, 64) => 7,
        (DataItemFormat::UnsignedFixedPoint, 1) => 8,
        (DataItemFormat::UnsignedFixedPoint, 4) => 9,
        (DataItemFormat::UnsignedFixedPoint, 8) => 10,
        (DataItemFormat::UnsignedFixedPoint, 16) => 11,
        (DataItemFormat::UnsignedFixedPoint, 32) => 12,
        (DataItemFormat::UnsignedFixedPoint, 64) => 13,
        _ => return Err(VitaError::UnsupportedPayloadFormat),
    };
    let rc = (pf.as_u64() >> 41) & 0x0030_0000;
    let vector = pf.as_u64() & 0xFFFF;
    Ok(STANDARD_DATA_CLASS_CHECK | (type_code << 16) | rc | vector)
}

/// A signal data packet view with standard data class ID semantics.
/// Dereferences to the underlying [`Vrt`] packet.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StandardDataPacket {
    inner: Vrt,
}

impl StandardDataPacket {
    /// Creates a new standard data packet for the given sample type
    /// and structure. A `frame_size > 1` is carried in the vector-size
    /// field.
    ///
    /// # Errors
    /// Returns an error for formats outside the standard data range.
    pub fn new(
        data_type: DataType,
        real_complex: RealComplexType,
        frame_size: u32,
    ) -> Result<StandardDataPacket, VitaError> {
        let mut pf = PayloadFormat::new(data_type, real_complex);
        if frame_size > 1 {
            pf.set_vector_size(frame_size);
        }
        let mut inner = Vrt::new_signal_data_packet();
        inner.set_class_id(Some(ClassIdentifier::from_u64(class_for_payload_format(
            &pf,
        )?)?));
        inner.update_packet_size();
        Ok(StandardDataPacket { inner })
    }

    /// Wraps a packet the caller has already checked against
    /// [`is_standard_data_class_id`] and [`payload_format_for_class`].
    pub(crate) fn from_vrt_unchecked(packet: Vrt) -> StandardDataPacket {
        StandardDataPacket { inner: packet }
    }

    /// Wraps an existing packet, checking that it is a signal data
    /// packet with a standard data class identifier.
    ///
    /// # Errors
    /// Returns an error when the packet type or class ID doesn't
    /// qualify.
    pub fn from_vrt(packet: Vrt) -> Result<StandardDataPacket, VitaError> {
        if !packet.header().packet_type().is_data() {
            return Err(VitaError::SignalDataOnly);
        }
        match packet.class_id() {
            Some(id) if is_standard_data_class_id(id.as_u64()) => {
                // Reject reserved data type codes up front.
                payload_format_for_class(id.as_u64())?;
                Ok(StandardDataPacket { inner: packet })
            }
            _ => Err(VitaError::UnsupportedPayloadFormat),
        }
    }

    /// The payload format encoded by the class identifier.
    pub fn payload_format(&self) -> Result<PayloadFormat, VitaError> {
        let id = self
            .inner
            .class_id()
            .ok_or(VitaError::UnsupportedPayloadFormat)?;
        payload_format_for_class(id.as_u64())
    }

    /// Sets the payload format, re-deriving the class identifier.
    ///
    /// # Errors
    /// Returns an error for formats outside the standard data range.
    pub fn set_payload_format(&mut self, pf: &PayloadFormat) -> Result<(), VitaError> {
        let id = class_for_payload_format(pf)?;
        self.inner.set_class_id(Some(ClassIdentifier::from_u64(id)?));
        self.inner.update_packet_size();
        Ok(())
    }

    /// The real/complex structure of the samples.
    pub fn real_complex_type(&self) -> Result<RealComplexType, VitaError> {
        Ok(self.payload_format()?.real_complex_type())
    }

    /// The frame (vector) size; 1 when the data is unframed.
    pub fn frame_size(&self) -> Result<u32, VitaError> {
        Ok(self.payload_format()?.vector_size())
    }

    /// Consumes the view, returning the underlying packet.
    pub fn into_inner(self) -> Vrt {
        self.inner
    }
}

impl Deref for StandardDataPacket {
    type Target = Vrt;

    fn deref(&self) -> &Vrt {
        &self.inner
    }
}

impl DerefMut for StandardDataPacket {
    fn deref_mut(&mut self) -> &mut Vrt {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_id_mapping_round_trip() {
        for data_type in [
            DataType::Int4,
            DataType::Int16,
            DataType::Int64,
            DataType::Float,
            DataType::Double,
            DataType::UInt1,
            DataType::UInt32,
        ] {
            for rc in [RealComplexType::Real, RealComplexType::ComplexCartesian] {
                let pf = PayloadFormat::new(data_type, rc);
                let id = class_for_payload_format(&pf).unwrap();
                assert!(is_standard_data_class_id(id));
                let back = payload_format_for_class(id).unwrap();
                assert_eq!(back, pf, "mismatch for {data_type:?}/{rc:?}");
            }
        }
    }

    #[test]
    fn int16_real_class_id() {
        let pf = PayloadFormat::new(DataType::Int16, RealComplexType::Real);
        assert_eq!(class_for_payload_format(&pf).unwrap(), 0x00FF_FFFA_0003_0000);
    }

    #[test]
    fn complex_sets_structure_bits() {
        let pf = PayloadFormat::new(DataType::Int16, RealComplexType::ComplexCartesian);
        let id = class_for_payload_format(&pf).unwrap();
        assert_eq!(id & 0x0030_0000, 0x0010_0000);
        assert_eq!(
            payload_format_for_class(id).unwrap().real_complex_type(),
            RealComplexType::ComplexCartesian
        );
    }

    #[test]
    fn restricted_formats_are_rejected() {
        let mut pf = PayloadFormat::new(DataType::Int16, RealComplexType::Real);
        pf.set_event_tag_size_bits(2);
        assert!(class_for_payload_format(&pf).is_err());

        let mut pf = PayloadFormat::new(DataType::Int16, RealComplexType::Real);
        pf.set_repeat_count(4);
        assert!(class_for_payload_format(&pf).is_err());

        let mut pf = PayloadFormat::new(DataType::Int16, RealComplexType::Real);
        pf.set_item_packing_field_size_bits(32);
        assert!(class_for_payload_format(&pf).is_err());
    }

    #[test]
    fn non_standard_class_rejected() {
        assert!(payload_format_for_class(0x0012_3456_0003_0000).is_err());
        // Reserved data type code 0.
        assert!(payload_format_for_class(STANDARD_DATA_CLASS_CHECK).is_err());
    }
}
