// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the signal data payload format
field (ANSI/VITA-49.2-2017 section 9.13.3).

This 64-bit field describes how the samples in a paired signal data
stream are packed: real/complex structure, the per-item number format,
tag sizes, packing geometry, and the repeat/vector dimensions.
*/

use core::fmt;

use deku::prelude::*;

use crate::VitaError;

/// Real/complex sample structure.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RealComplexType {
    /// Real samples.
    Real = 0,
    /// Complex cartesian (I/Q) samples.
    ComplexCartesian = 1,
    /// Complex polar (magnitude/phase) samples.
    ComplexPolar = 2,
    /// Reserved for future expansion.
    Reserved = 3,
}

impl From<u8> for RealComplexType {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0 => RealComplexType::Real,
            1 => RealComplexType::ComplexCartesian,
            2 => RealComplexType::ComplexPolar,
            _ => RealComplexType::Reserved,
        }
    }
}

/// Per-item number format.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataItemFormat {
    /// Signed fixed point.
    SignedFixedPoint = 0x00,
    /// Signed VRT float with a 1-bit exponent.
    SignedVrtFloat1 = 0x01,
    /// Signed VRT float with a 2-bit exponent.
    SignedVrtFloat2 = 0x02,
    /// Signed VRT float with a 3-bit exponent.
    SignedVrtFloat3 = 0x03,
    /// Signed VRT float with a 4-bit exponent.
    SignedVrtFloat4 = 0x04,
    /// Signed VRT float with a 5-bit exponent.
    SignedVrtFloat5 = 0x05,
    /// Signed VRT float with a 6-bit exponent.
    SignedVrtFloat6 = 0x06,
    /// Signed fixed point, non-normalized.
    SignedFixedPointNonNormalized = 0x07,
    /// IEEE 754-2008 half precision (binary16).
    IeeeHalfPrecision = 0x0D,
    /// IEEE 754 single precision (binary32).
    IeeeSinglePrecision = 0x0E,
    /// IEEE 754 double precision (binary64).
    IeeeDoublePrecision = 0x0F,
    /// Unsigned fixed point.
    UnsignedFixedPoint = 0x10,
    /// Unsigned VRT float with a 1-bit exponent.
    UnsignedVrtFloat1 = 0x11,
    /// Unsigned VRT float with a 2-bit exponent.
    UnsignedVrtFloat2 = 0x12,
    /// Unsigned VRT float with a 3-bit exponent.
    UnsignedVrtFloat3 = 0x13,
    /// Unsigned VRT float with a 4-bit exponent.
    UnsignedVrtFloat4 = 0x14,
    /// Unsigned VRT float with a 5-bit exponent.
    UnsignedVrtFloat5 = 0x15,
    /// Unsigned VRT float with a 6-bit exponent.
    UnsignedVrtFloat6 = 0x16,
    /// Unsigned fixed point, non-normalized.
    UnsignedFixedPointNonNormalized = 0x17,
    /// Reserved format code.
    Reserved = 0x1F,
}

impl DataItemFormat {
    /// Returns true for signed formats.
    pub fn is_signed(&self) -> bool {
        (*self as u8) < 0x10
    }

    /// Returns the exponent size for VRT float formats, `None` for
    /// everything else.
    pub fn exponent_bits(&self) -> Option<u32> {
        let v = *self as u8 & 0x0F;
        match v {
            1..=6 if !matches!(self, DataItemFormat::IeeeHalfPrecision) => Some(v as u32),
            _ => None,
        }
    }
}

impl From<u8> for DataItemFormat {
    fn from(value: u8) -> Self {
        match value & 0x1F {
            0x00 => DataItemFormat::SignedFixedPoint,
            0x01 => DataItemFormat::SignedVrtFloat1,
            0x02 => DataItemFormat::SignedVrtFloat2,
            0x03 => DataItemFormat::SignedVrtFloat3,
            0x04 => DataItemFormat::SignedVrtFloat4,
            0x05 => DataItemFormat::SignedVrtFloat5,
            0x06 => DataItemFormat::SignedVrtFloat6,
            0x07 => DataItemFormat::SignedFixedPointNonNormalized,
            0x0D => DataItemFormat::IeeeHalfPrecision,
            0x0E => DataItemFormat::IeeeSinglePrecision,
            0x0F => DataItemFormat::IeeeDoublePrecision,
            0x10 => DataItemFormat::UnsignedFixedPoint,
            0x11 => DataItemFormat::UnsignedVrtFloat1,
            0x12 => DataItemFormat::UnsignedVrtFloat2,
            0x13 => DataItemFormat::UnsignedVrtFloat3,
            0x14 => DataItemFormat::UnsignedVrtFloat4,
            0x15 => DataItemFormat::UnsignedVrtFloat5,
            0x16 => DataItemFormat::UnsignedVrtFloat6,
            0x17 => DataItemFormat::UnsignedFixedPointNonNormalized,
            _ => DataItemFormat::Reserved,
        }
    }
}

/// Sample data type shorthand used by standard data packets.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// 4-bit signed fixed point.
    Int4,
    /// 8-bit signed fixed point.
    Int8,
    /// 16-bit signed fixed point.
    Int16,
    /// 32-bit signed fixed point.
    Int32,
    /// 64-bit signed fixed point.
    Int64,
    /// 32-bit IEEE single precision.
    Float,
    /// 64-bit IEEE double precision.
    Double,
    /// 1-bit unsigned fixed point.
    UInt1,
    /// 4-bit unsigned fixed point.
    UInt4,
    /// 8-bit unsigned fixed point.
    UInt8,
    /// 16-bit unsigned fixed point.
    UInt16,
    /// 32-bit unsigned fixed point.
    UInt32,
    /// 64-bit unsigned fixed point.
    UInt64,
}

impl DataType {
    /// Per-item wire format for this data type.
    pub fn item_format(&self) -> DataItemFormat {
        match self {
            DataType::Int4 | DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                DataItemFormat::SignedFixedPoint
            }
            DataType::Float => DataItemFormat::IeeeSinglePrecision,
            DataType::Double => DataItemFormat::IeeeDoublePrecision,
            _ => DataItemFormat::UnsignedFixedPoint,
        }
    }

    /// Per-item size in bits.
    pub fn item_size_bits(&self) -> u32 {
        match self {
            DataType::UInt1 => 1,
            DataType::Int4 | DataType::UInt4 => 4,
            DataType::Int8 | DataType::UInt8 => 8,
            DataType::Int16 | DataType::UInt16 => 16,
            DataType::Int32 | DataType::UInt32 | DataType::Float => 32,
            DataType::Int64 | DataType::UInt64 | DataType::Double => 64,
        }
    }
}

/// Base payload format data structure (a pair of 32-bit words on the
/// wire, handled here as one 64-bit value).
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayloadFormat(u64);

impl PayloadFormat {
    /// Build a payload format for the given type and structure with the
    /// packing size equal to the item size, no tags, and no repeats.
    pub fn new(data_type: DataType, real_complex: RealComplexType) -> PayloadFormat {
        let mut ret = PayloadFormat::default();
        ret.set_real_complex_type(real_complex);
        ret.set_data_item_format(data_type.item_format());
        ret.set_data_item_size_bits(data_type.item_size_bits());
        ret.set_item_packing_field_size_bits(data_type.item_size_bits());
        ret
    }

    /// Gets the size of the payload format field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        (std::mem::size_of_val(&self.0) / std::mem::size_of::<u32>()) as u16
    }

    /// Gets the raw 64-bit value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Builds a payload format from a raw 64-bit value.
    pub fn from_u64(bits: u64) -> PayloadFormat {
        PayloadFormat(bits)
    }

    /// Returns true when the link-efficient packing method is selected
    /// (items may straddle word boundaries).
    pub fn link_efficient_packing(&self) -> bool {
        self.0 & (1 << 63) != 0
    }
    /// Selects link-efficient (true) or processing-efficient (false)
    /// packing.
    pub fn set_link_efficient_packing(&mut self, link_efficient: bool) {
        self.0 = (self.0 & !(1 << 63)) | ((link_efficient as u64) << 63);
    }

    /// Gets the real/complex sample structure.
    pub fn real_complex_type(&self) -> RealComplexType {
        (((self.0 >> 61) & 0b11) as u8).into()
    }
    /// Sets the real/complex sample structure.
    pub fn set_real_complex_type(&mut self, t: RealComplexType) {
        self.0 = (self.0 & !(0b11 << 61)) | (((t as u64) & 0b11) << 61);
    }

    /// Gets the per-item number format.
    pub fn data_item_format(&self) -> DataItemFormat {
        (((self.0 >> 56) & 0x1F) as u8).into()
    }
    /// Sets the per-item number format.
    pub fn set_data_item_format(&mut self, f: DataItemFormat) {
        self.0 = (self.0 & !(0x1F << 56)) | (((f as u64) & 0x1F) << 56);
    }

    /// Returns true if the sample-component repeat indicator is set.
    pub fn sample_component_repeating(&self) -> bool {
        self.0 & (1 << 55) != 0
    }
    /// Sets the sample-component repeat indicator.
    pub fn set_sample_component_repeating(&mut self, repeating: bool) {
        self.0 = (self.0 & !(1 << 55)) | ((repeating as u64) << 55);
    }

    /// Gets the event tag size in bits.
    pub fn event_tag_size_bits(&self) -> u32 {
        ((self.0 >> 52) & 0b111) as u32
    }
    /// Sets the event tag size in bits.
    pub fn set_event_tag_size_bits(&mut self, bits: u32) {
        self.0 = (self.0 & !(0b111 << 52)) | (((bits as u64) & 0b111) << 52);
    }

    /// Gets the channel tag size in bits.
    pub fn channel_tag_size_bits(&self) -> u32 {
        ((self.0 >> 48) & 0b1111) as u32
    }
    /// Sets the channel tag size in bits.
    pub fn set_channel_tag_size_bits(&mut self, bits: u32) {
        self.0 = (self.0 & !(0b1111 << 48)) | (((bits as u64) & 0b1111) << 48);
    }

    /// Gets the data item fraction size in bits.
    pub fn data_item_fraction_size_bits(&self) -> u32 {
        ((self.0 >> 44) & 0b1111) as u32
    }
    /// Sets the data item fraction size in bits.
    pub fn set_data_item_fraction_size_bits(&mut self, bits: u32) {
        self.0 = (self.0 & !(0b1111 << 44)) | (((bits as u64) & 0b1111) << 44);
    }

    /// Gets the item packing field size in bits.
    pub fn item_packing_field_size_bits(&self) -> u32 {
        (((self.0 >> 38) & 0x3F) as u32) + 1
    }
    /// Sets the item packing field size in bits.
    pub fn set_item_packing_field_size_bits(&mut self, bits: u32) {
        let stored = bits.clamp(1, 64) as u64 - 1;
        self.0 = (self.0 & !(0x3F << 38)) | (stored << 38);
    }

    /// Gets the data item size in bits.
    pub fn data_item_size_bits(&self) -> u32 {
        (((self.0 >> 32) & 0x3F) as u32) + 1
    }
    /// Sets the data item size in bits.
    pub fn set_data_item_size_bits(&mut self, bits: u32) {
        let stored = bits.clamp(1, 64) as u64 - 1;
        self.0 = (self.0 & !(0x3F << 32)) | (stored << 32);
    }

    /// Gets the repeat count.
    pub fn repeat_count(&self) -> u32 {
        (((self.0 >> 16) & 0xFFFF) as u32) + 1
    }
    /// Sets the repeat count.
    pub fn set_repeat_count(&mut self, count: u32) {
        let stored = count.clamp(1, 0x1_0000) as u64 - 1;
        self.0 = (self.0 & !(0xFFFF << 16)) | (stored << 16);
    }

    /// Gets the vector size (samples per vector).
    pub fn vector_size(&self) -> u32 {
        ((self.0 & 0xFFFF) as u32) + 1
    }
    /// Sets the vector size (samples per vector).
    pub fn set_vector_size(&mut self, size: u32) {
        let stored = size.clamp(1, 0x1_0000) as u64 - 1;
        self.0 = (self.0 & !0xFFFF) | stored;
    }

    /// Number of bits one full sample occupies, accounting for the
    /// real/complex structure.
    pub fn sample_size_bits(&self) -> Result<u32, VitaError> {
        let item = self.item_packing_field_size_bits();
        match self.real_complex_type() {
            RealComplexType::Real => Ok(item),
            RealComplexType::ComplexCartesian | RealComplexType::ComplexPolar => Ok(item * 2),
            RealComplexType::Reserved => Err(VitaError::UnsupportedPayloadFormat),
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Payload format:")?;
        writeln!(f, "  Real/complex: {:?}", self.real_complex_type())?;
        writeln!(f, "  Item format: {:?}", self.data_item_format())?;
        writeln!(f, "  Item size: {} bits", self.data_item_size_bits())?;
        writeln!(f, "  Packing size: {} bits", self.item_packing_field_size_bits())?;
        writeln!(f, "  Repeat count: {}", self.repeat_count())?;
        writeln!(f, "  Vector size: {}", self.vector_size())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_construction() {
        let pf = PayloadFormat::new(DataType::Int16, RealComplexType::ComplexCartesian);
        assert_eq!(pf.real_complex_type(), RealComplexType::ComplexCartesian);
        assert_eq!(pf.data_item_format(), DataItemFormat::SignedFixedPoint);
        assert_eq!(pf.data_item_size_bits(), 16);
        assert_eq!(pf.item_packing_field_size_bits(), 16);
        assert_eq!(pf.vector_size(), 1);
        assert_eq!(pf.sample_size_bits().unwrap(), 32);
    }

    #[test]
    fn ieee_single_bits() {
        let pf = PayloadFormat::new(DataType::Float, RealComplexType::Real);
        // Item format 0x0E with 32-bit item and packing sizes.
        assert_eq!(pf.as_u64(), 0x0E00_07DF_0000_0000);
    }

    #[test]
    fn exponent_bit_helper() {
        assert_eq!(DataItemFormat::SignedVrtFloat3.exponent_bits(), Some(3));
        assert_eq!(DataItemFormat::UnsignedVrtFloat6.exponent_bits(), Some(6));
        assert_eq!(DataItemFormat::IeeeSinglePrecision.exponent_bits(), None);
        assert!(!DataItemFormat::UnsignedVrtFloat2.is_signed());
    }
}
