// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use deku::prelude::*;

use crate::cif0::{Cif0, Cif0Fields, Cif0Manipulators};
use crate::cif1::{Cif1, Cif1Fields, Cif1Manipulators};
use crate::cif2::{Cif2, Cif2Fields, Cif2Manipulators};
use crate::cif3::{Cif3, Cif3Fields, Cif3Manipulators};
use crate::cif7::{Cif7, Cif7Opts};
use crate::packet_header::{PacketHeader, TsLayout};
use crate::payload::Payload;

/// Context packet payload. Includes all CIFs and optional fields.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(
    endian = "endian",
    ctx = "endian: deku::ctx::Endian, packet_header: &PacketHeader"
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Context {
    /// CIF0 indicator fields.
    cif0: Cif0,
    /// CIF1 indicator fields.
    #[deku(cond = "cif0.cif1_enabled()")]
    cif1: Option<Cif1>,
    /// CIF2 indicator fields.
    #[deku(cond = "cif0.cif2_enabled()")]
    cif2: Option<Cif2>,
    /// CIF3 indicator fields.
    #[deku(cond = "cif0.cif3_enabled()")]
    cif3: Option<Cif3>,
    /// CIF7 indicator fields.
    #[deku(cond = "cif0.field_attributes_enabled()")]
    pub cif7: Option<Cif7>,

    /// CIF0 data fields.
    #[deku(ctx = "cif0, Cif7Opts::from(cif7.as_ref())")]
    cif0_fields: Cif0Fields,
    /// CIF1 data fields.
    #[deku(
        cond = "cif0.cif1_enabled()",
        ctx = "cif1.as_ref(), Cif7Opts::from(cif7.as_ref())"
    )]
    cif1_fields: Option<Cif1Fields>,
    /// CIF2 data fields.
    #[deku(
        cond = "cif0.cif2_enabled()",
        ctx = "cif2.as_ref(), Cif7Opts::from(cif7.as_ref())"
    )]
    cif2_fields: Option<Cif2Fields>,
    /// CIF3 data fields.
    #[deku(
        cond = "cif0.cif3_enabled()",
        ctx = "cif3.as_ref(), Cif7Opts::from(cif7.as_ref()), TsLayout::from(packet_header)"
    )]
    cif3_fields: Option<Cif3Fields>,
}

impl Context {
    /// Create a new context payload with no CIF bits or fields set.
    pub fn new() -> Context {
        Context::default()
    }

    /// Returns true if the context field change indicator is set, false if not.
    pub fn context_changed(&self) -> bool {
        self.cif0.context_field_changed()
    }

    /// Set the context field change indicator bit.
    pub fn set_context_changed(&mut self, changed: bool) {
        if changed {
            self.cif0.set_context_field_changed()
        } else {
            self.cif0.unset_context_field_changed()
        }
    }

    /// The sample period in seconds (the reciprocal view of the
    /// sample rate field).
    pub fn sample_period_s(&self) -> Option<f64> {
        self.sample_rate_sps().map(|sps| 1.0 / sps)
    }

    /// Sets the sample rate field from a period in seconds.
    pub fn set_sample_period_s(&mut self, period: Option<f64>) {
        self.set_sample_rate_sps(period.map(|p| 1.0 / p));
    }

    /// Returns the size of the context payload in 32-bit words.
    pub fn size_words(&self) -> u16 {
        // Start with 1 32-bit word for the CIF0 field
        let mut ret = 1 + self.cif0_fields.size_words();
        if let Some(f) = &self.cif1_fields {
            ret += 1 + f.size_words();
        }
        if let Some(f) = &self.cif2_fields {
            ret += 1 + f.size_words();
        }
        if let Some(f) = &self.cif3_fields {
            ret += 1 + f.size_words();
        }
        if self.cif0.field_attributes_enabled() {
            ret += 1;
        }
        ret
    }
}

impl TryFrom<Payload> for Context {
    type Error = Payload;

    fn try_from(value: Payload) -> Result<Self, Self::Error> {
        match value {
            Payload::Context(c) => Ok(c),
            a => Err(a),
        }
    }
}

impl Cif0Manipulators for Context {
    fn cif0(&self) -> &Cif0 {
        &self.cif0
    }
    fn cif0_mut(&mut self) -> &mut Cif0 {
        &mut self.cif0
    }
    fn cif0_fields(&self) -> &Cif0Fields {
        &self.cif0_fields
    }
    fn cif0_fields_mut(&mut self) -> &mut Cif0Fields {
        &mut self.cif0_fields
    }
}

impl Cif1Manipulators for Context {
    fn cif0(&self) -> &Cif0 {
        &self.cif0
    }
    fn cif0_mut(&mut self) -> &mut Cif0 {
        &mut self.cif0
    }
    fn cif1(&self) -> Option<&Cif1> {
        self.cif1.as_ref()
    }
    fn cif1_mut(&mut self) -> &mut Option<Cif1> {
        &mut self.cif1
    }
    fn cif1_fields(&self) -> Option<&Cif1Fields> {
        self.cif1_fields.as_ref()
    }
    fn cif1_fields_mut(&mut self) -> &mut Option<Cif1Fields> {
        &mut self.cif1_fields
    }
}

impl Cif2Manipulators for Context {
    fn cif0(&self) -> &Cif0 {
        &self.cif0
    }
    fn cif0_mut(&mut self) -> &mut Cif0 {
        &mut self.cif0
    }
    fn cif2(&self) -> Option<&Cif2> {
        self.cif2.as_ref()
    }
    fn cif2_mut(&mut self) -> &mut Option<Cif2> {
        &mut self.cif2
    }
    fn cif2_fields(&self) -> Option<&Cif2Fields> {
        self.cif2_fields.as_ref()
    }
    fn cif2_fields_mut(&mut self) -> &mut Option<Cif2Fields> {
        &mut self.cif2_fields
    }
}

impl Cif3Manipulators for Context {
    fn cif0(&self) -> &Cif0 {
        &self.cif0
    }
    fn cif0_mut(&mut self) -> &mut Cif0 {
        &mut self.cif0
    }
    fn cif3(&self) -> Option<&Cif3> {
        self.cif3.as_ref()
    }
    fn cif3_mut(&mut self) -> &mut Option<Cif3> {
        &mut self.cif3
    }
    fn cif3_fields(&self) -> Option<&Cif3Fields> {
        self.cif3_fields.as_ref()
    }
    fn cif3_fields_mut(&mut self) -> &mut Option<Cif3Fields> {
        &mut self.cif3_fields
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cif0)?;
        if let Some(cif1) = self.cif1 {
            write!(f, "{}", cif1)?;
        }
        if let Some(bw) = &self.bandwidth_hz() {
            writeln!(f, "Bandwidth: {} Hz", bw)?;
        }
        if let Some(rf_freq) = &self.rf_ref_freq_hz() {
            writeln!(f, "RF reference frequency: {} Hz", rf_freq)?;
        }
        if let Some(samp_rate) = &self.sample_rate_sps() {
            writeln!(f, "Sample rate: {} sps", samp_rate)?;
        }
        if let Some(device_id) = &self.device_id() {
            writeln!(f, "Device ID: {}", device_id)?;
        }
        if let Some(spectrum) = self.spectrum() {
            write!(f, "{}", spectrum)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn cif_bits_track_field_setters() {
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        assert_eq!(context.cif0.as_u32(), 0);
        context.set_rf_ref_freq_hz(Some(3e9));
        context.set_bandwidth_hz(Some(1e6));
        // Bits 29 (bandwidth) and 27 (RF reference frequency).
        assert_eq!(context.cif0.as_u32(), 0x2800_0000);
        assert_eq!(context.rf_ref_freq_hz(), Some(3e9));
        assert_eq!(context.bandwidth_hz(), Some(1e6));

        context.set_bandwidth_hz(None);
        assert_eq!(context.cif0.as_u32(), 0x0800_0000);
        assert_eq!(context.bandwidth_hz(), None);
    }

    #[test]
    fn cif1_field_enables_cif1_word() {
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        assert!(!context.cif0.cif1_enabled());
        context.set_spectrum(Some(crate::Spectrum::default()));
        assert!(context.cif0.cif1_enabled());
        assert!(context.cif1().unwrap().spectrum());
        context.set_spectrum(None);
        assert!(!context.cif0.cif1_enabled());
        assert!(context.cif1().is_none());
    }

    #[test]
    fn payload_size_accounting() {
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        // CIF0 word only.
        assert_eq!(context.size_words(), 1);
        context.set_bandwidth_hz(Some(8e6));
        assert_eq!(context.size_words(), 3);
        context.set_reference_level_db(Some(-10.0));
        assert_eq!(context.size_words(), 4);
        context.set_spectrum(Some(crate::Spectrum::default()));
        // Adds the CIF1 word plus the 14-word spectrum record.
        assert_eq!(context.size_words(), 19);
    }
}
