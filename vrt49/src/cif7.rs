// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Defines fields and methods related to CIF7 (ANSI/VITA-49.2-2017 section 9.1).
Fields here are compatible with VITA 49.2 and later.

Note: CIF7 behaves differently than other CIFs - it adds attribute
fields to all other CIF fields. For example, if you set the `current` and
`average` bits in CIF7, and you're using the `bandwidth` field in CIF0,
the current bandwidth value will be sent in the CIF0 fields followed immediately
by the *average* bandwidth.

The statistics between `average` and `third_derivative` are the same
size as the primary field and land in each field's `*_attributes`
vector, in decreasing CIF7 bit order. `probability` and `belief` are
different: they are fixed at one 32-bit word regardless of the primary
field's type, trail the same-size attributes on the wire, and surface
as each field's `*_probability` and `*_belief` members.

This crate does not handle the math for the descriptive statistics and
does not correlate the `*_attributes` vector entries with the CIF7 bits
for you - a user wishing to use CIF7 needs to line the vector up with
the enabled statistics.

See ANSI/VITA-49.2-2017 section 9.12 for additional details.
*/

use deku::prelude::*;
use vrt49_macros::cif_bit;

/// Base data structure for the CIF7 single-bit indicators.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cif7(u32);

impl Cif7 {
    cif_bit!(current, 31);
    cif_bit!(average, 30);
    cif_bit!(median, 29);
    cif_bit!(std_dev, 28);
    cif_bit!(max, 27);
    cif_bit!(min, 26);
    cif_bit!(precision, 25);
    cif_bit!(accuracy, 24);
    cif_bit!(first_derivative, 23);
    cif_bit!(second_derivative, 22);
    cif_bit!(third_derivative, 21);
    cif_bit!(probability, 20);
    cif_bit!(belief, 19);
    // Bits 0-18 are reserved

    /// Returns the number of set bits in CIF7.
    pub fn num_set(&self) -> usize {
        u32::count_ones(self.0) as usize
    }

    /// Returns the number of enabled attributes that share the primary
    /// field's size (the statistics from `average` through
    /// `third_derivative`). `current`, `probability`, and `belief` are
    /// excluded: the first gates the primary value itself and the
    /// other two are fixed 32-bit attributes. This count drives how
    /// many `*_attributes` entries are parsed per field.
    pub fn num_same_size_attrs(&self) -> usize {
        (self.0 & 0x7FE0_0000).count_ones() as usize
    }
}

/// Structure representing the state of CIF7.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Cif7Opts {
    /// If the "current" value bit is set, we should include the
    /// main field which would be included by default if CIF7 was
    /// not used. But, if it's not set in CIF7, it wouldn't be
    /// included.
    pub(crate) current_val: bool,
    /// The number of same-size attributes (average through third
    /// derivative) being used in CIF7. This is used to count how many
    /// `*_attributes` entries to parse per field.
    pub(crate) num_extra_attrs: usize,
    /// A 32-bit probability attribute follows each field's same-size
    /// attributes.
    pub(crate) probability: bool,
    /// A 32-bit belief attribute closes out each field's attributes.
    pub(crate) belief: bool,
}

impl Cif7Opts {
    /// Translate from a literal `Cif7` to a friendlier `Cif7Opts` structure.
    pub(crate) fn from(cif7: Option<&Cif7>) -> Cif7Opts {
        if let Some(c) = cif7 {
            Cif7Opts {
                current_val: c.current(),
                num_extra_attrs: c.num_same_size_attrs(),
                probability: c.probability(),
                belief: c.belief(),
            }
        } else {
            Cif7Opts {
                current_val: true,
                num_extra_attrs: 0,
                probability: false,
                belief: false,
            }
        }
    }
}

#[cfg(all(test, feature = "cif7"))]
mod tests {
    use crate::prelude::*;

    #[test]
    fn same_size_attr_count_excludes_fixed_width_bits() {
        let mut cif7 = Cif7::default();
        cif7.set_current();
        cif7.set_average();
        cif7.set_median();
        cif7.set_probability();
        cif7.set_belief();
        assert_eq!(cif7.num_set(), 5);
        assert_eq!(cif7.num_same_size_attrs(), 2);
    }

    #[test]
    fn probability_and_belief_are_32_bits() {
        // A 64-bit primary field (bandwidth) with an average attribute
        // plus probability and belief: the statistics ride at the
        // field's width, probability/belief at exactly one word each.
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        let mut cif7 = Cif7::default();
        cif7.set_current();
        cif7.set_average();
        cif7.set_probability();
        cif7.set_belief();
        context.cif7 = Some(cif7);
        context.set_bandwidth_hz(Some(8e6));
        context.set_bandwidth_hz_attributes(Some(vec![9e6]));
        context.cif0_fields_mut().bandwidth_probability = Some(0xAABB_CCDD);
        context.cif0_fields_mut().bandwidth_belief = Some(0x1122_3344);
        packet.update_packet_size();

        let bytes = packet.to_bytes().unwrap();
        // header + stream ID + CIF0 + CIF7 words, then the 8-byte
        // bandwidth, the 8-byte average, and 4 bytes each for
        // probability and belief.
        assert_eq!(bytes.len(), 16 + 8 + 8 + 4 + 4);
        let n = bytes.len();
        assert_eq!(&bytes[n - 8..n - 4], &0xAABB_CCDDu32.to_be_bytes());
        assert_eq!(&bytes[n - 4..], &0x1122_3344u32.to_be_bytes());

        let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
        let context = parsed.payload().context().unwrap();
        assert_eq!(context.bandwidth_hz(), Some(8e6));
        assert_eq!(context.bandwidth_hz_attributes(), vec![9e6]);
        assert_eq!(
            context.cif0_fields().bandwidth_probability,
            Some(0xAABB_CCDD)
        );
        assert_eq!(context.cif0_fields().bandwidth_belief, Some(0x1122_3344));
    }

    #[test]
    fn unsetting_a_field_drops_its_attributes() {
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        let mut cif7 = Cif7::default();
        cif7.set_current();
        cif7.set_probability();
        context.cif7 = Some(cif7);
        Cif0Manipulators::cif0_mut(context).set_field_attributes_enabled();
        context.set_sample_rate_sps(Some(16e6));
        context.cif0_fields_mut().sample_rate_probability = Some(7);
        assert_eq!(context.size_words(), 1 + 1 + 2 + 1);

        context.set_sample_rate_sps(None);
        assert_eq!(context.cif0_fields().sample_rate_probability, None);
        assert!(context.cif0_fields().empty());
    }
}
