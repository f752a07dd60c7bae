// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Validation/execution ACK payloads carrying the second occurrence of the
CIF words: a warning block (WIF0..WIF3, WIF7) and an error block
(EIF0..EIF3, EIF7), each holding 32-bit [`AckResponse`] fields in place
of the normal field encodings.
*/

use crate::{
    cif7::Cif7Opts, prelude::*, Cif0AckFields, Cif0AckManipulators, Cif1AckFields,
    Cif1AckManipulators, Cif2AckFields, Cif2AckManipulators, Cif3AckFields, Cif3AckManipulators,
    ControlAckMode,
};
use deku::prelude::*;
use std::fmt;

/// ACK level indicating if the ACK is a warning or error.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AckLevel {
    /// This ACK represents a warning.
    Warning,
    /// This ACK represents an error.
    Error,
}

/// ACK data structure shared by validation and execution ACK packets.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(
    endian = "endian",
    ctx = "endian: deku::ctx::Endian, _cam: &ControlAckMode"
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ack {
    /// WIF0 indicator fields.
    #[deku(cond = "_cam.warning()")]
    wif0: Option<Cif0>,
    /// WIF1 indicator fields.
    #[deku(cond = "_cam.warning() && wif0.is_some() && wif0.unwrap().cif1_enabled()")]
    wif1: Option<Cif1>,
    /// WIF2 indicator fields.
    #[deku(cond = "_cam.warning() && wif0.is_some() && wif0.unwrap().cif2_enabled()")]
    wif2: Option<Cif2>,
    /// WIF3 indicator fields.
    #[deku(cond = "_cam.warning() && wif0.is_some() && wif0.unwrap().cif3_enabled()")]
    wif3: Option<Cif3>,
    /// WIF7 indicator fields.
    #[deku(cond = "_cam.warning() && wif0.is_some() && wif0.unwrap().field_attributes_enabled()")]
    pub wif7: Option<Cif7>,

    /// EIF0 indicator fields.
    #[deku(cond = "_cam.error()")]
    eif0: Option<Cif0>,
    /// EIF1 indicator fields.
    #[deku(cond = "_cam.error() && eif0.is_some() && eif0.unwrap().cif1_enabled()")]
    eif1: Option<Cif1>,
    /// EIF2 indicator fields.
    #[deku(cond = "_cam.error() && eif0.is_some() && eif0.unwrap().cif2_enabled()")]
    eif2: Option<Cif2>,
    /// EIF3 indicator fields.
    #[deku(cond = "_cam.error() && eif0.is_some() && eif0.unwrap().cif3_enabled()")]
    eif3: Option<Cif3>,
    /// EIF7 indicator fields.
    #[deku(cond = "_cam.error() && eif0.is_some() && eif0.unwrap().field_attributes_enabled()")]
    pub eif7: Option<Cif7>,

    #[deku(
        cond = "wif0.is_some()",
        ctx = "wif0.as_ref(), Cif7Opts::from(wif7.as_ref())"
    )]
    wif0_fields: Option<Cif0AckFields>,
    #[deku(
        cond = "wif1.is_some()",
        ctx = "wif1.as_ref(), Cif7Opts::from(wif7.as_ref())"
    )]
    wif1_fields: Option<Cif1AckFields>,
    #[deku(
        cond = "wif2.is_some()",
        ctx = "wif2.as_ref(), Cif7Opts::from(wif7.as_ref())"
    )]
    wif2_fields: Option<Cif2AckFields>,
    #[deku(
        cond = "wif3.is_some()",
        ctx = "wif3.as_ref(), Cif7Opts::from(wif7.as_ref())"
    )]
    wif3_fields: Option<Cif3AckFields>,

    #[deku(
        cond = "eif0.is_some()",
        ctx = "eif0.as_ref(), Cif7Opts::from(eif7.as_ref())"
    )]
    eif0_fields: Option<Cif0AckFields>,
    #[deku(
        cond = "eif1.is_some()",
        ctx = "eif1.as_ref(), Cif7Opts::from(eif7.as_ref())"
    )]
    eif1_fields: Option<Cif1AckFields>,
    #[deku(
        cond = "eif2.is_some()",
        ctx = "eif2.as_ref(), Cif7Opts::from(eif7.as_ref())"
    )]
    eif2_fields: Option<Cif2AckFields>,
    #[deku(
        cond = "eif3.is_some()",
        ctx = "eif3.as_ref(), Cif7Opts::from(eif7.as_ref())"
    )]
    eif3_fields: Option<Cif3AckFields>,
}

impl Ack {
    /// Get the ACK size (in 32-bit words).
    pub fn size_words(&self) -> u16 {
        let mut ret = 0;
        if self.wif0.is_some() {
            ret += 1;
        }
        if self.wif1.is_some() {
            ret += 1;
        }
        if self.wif2.is_some() {
            ret += 1;
        }
        if self.wif3.is_some() {
            ret += 1;
        }
        if self.wif7.is_some() {
            ret += 1;
        }
        if self.eif0.is_some() {
            ret += 1;
        }
        if self.eif1.is_some() {
            ret += 1;
        }
        if self.eif2.is_some() {
            ret += 1;
        }
        if self.eif3.is_some() {
            ret += 1;
        }
        if self.eif7.is_some() {
            ret += 1;
        }
        if let Some(f) = &self.wif0_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.wif1_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.wif2_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.wif3_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.eif0_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.eif1_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.eif2_fields {
            ret += f.size_words();
        }
        if let Some(f) = &self.eif3_fields {
            ret += f.size_words();
        }
        ret
    }

    /// Update the CAM word's warning/error request bits to match the
    /// blocks actually present. Run before serializing a hand-built
    /// ACK.
    pub fn sync_cam(&self, cam: &mut ControlAckMode) {
        if self.wif0.is_some() {
            cam.set_warning();
        } else {
            cam.unset_warning();
        }
        if self.eif0.is_some() {
            cam.set_error();
        } else {
            cam.unset_error();
        }
    }
}

impl Cif0AckManipulators for Ack {
    fn wif0(&self) -> Option<&Cif0> {
        self.wif0.as_ref()
    }
    fn wif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.wif0
    }
    fn wif0_fields(&self) -> Option<&Cif0AckFields> {
        self.wif0_fields.as_ref()
    }
    fn wif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.wif0_fields
    }

    fn eif0(&self) -> Option<&Cif0> {
        self.eif0.as_ref()
    }
    fn eif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.eif0
    }
    fn eif0_fields(&self) -> Option<&Cif0AckFields> {
        self.eif0_fields.as_ref()
    }
    fn eif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.eif0_fields
    }
}

impl Cif1AckManipulators for Ack {
    fn wif0(&self) -> Option<&Cif0> {
        self.wif0.as_ref()
    }
    fn wif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.wif0
    }
    fn wif0_fields(&self) -> Option<&Cif0AckFields> {
        self.wif0_fields.as_ref()
    }
    fn wif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.wif0_fields
    }
    fn eif0(&self) -> Option<&Cif0> {
        self.eif0.as_ref()
    }
    fn eif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.eif0
    }
    fn eif0_fields(&self) -> Option<&Cif0AckFields> {
        self.eif0_fields.as_ref()
    }
    fn eif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.eif0_fields
    }

    fn wif1(&self) -> Option<&Cif1> {
        self.wif1.as_ref()
    }
    fn wif1_mut(&mut self) -> &mut Option<Cif1> {
        &mut self.wif1
    }
    fn wif1_fields(&self) -> Option<&Cif1AckFields> {
        self.wif1_fields.as_ref()
    }
    fn wif1_fields_mut(&mut self) -> &mut Option<Cif1AckFields> {
        &mut self.wif1_fields
    }

    fn eif1(&self) -> Option<&Cif1> {
        self.eif1.as_ref()
    }
    fn eif1_mut(&mut self) -> &mut Option<Cif1> {
        &mut self.eif1
    }
    fn eif1_fields(&self) -> Option<&Cif1AckFields> {
        self.eif1_fields.as_ref()
    }
    fn eif1_fields_mut(&mut self) -> &mut Option<Cif1AckFields> {
        &mut self.eif1_fields
    }
}

impl Cif2AckManipulators for Ack {
    fn wif0(&self) -> Option<&Cif0> {
        self.wif0.as_ref()
    }
    fn wif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.wif0
    }
    fn wif0_fields(&self) -> Option<&Cif0AckFields> {
        self.wif0_fields.as_ref()
    }
    fn wif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.wif0_fields
    }
    fn eif0(&self) -> Option<&Cif0> {
        self.eif0.as_ref()
    }
    fn eif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.eif0
    }
    fn eif0_fields(&self) -> Option<&Cif0AckFields> {
        self.eif0_fields.as_ref()
    }
    fn eif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.eif0_fields
    }

    fn wif2(&self) -> Option<&Cif2> {
        self.wif2.as_ref()
    }
    fn wif2_mut(&mut self) -> &mut Option<Cif2> {
        &mut self.wif2
    }
    fn wif2_fields(&self) -> Option<&Cif2AckFields> {
        self.wif2_fields.as_ref()
    }
    fn wif2_fields_mut(&mut self) -> &mut Option<Cif2AckFields> {
        &mut self.wif2_fields
    }

    fn eif2(&self) -> Option<&Cif2> {
        self.eif2.as_ref()
    }
    fn eif2_mut(&mut self) -> &mut Option<Cif2> {
        &mut self.eif2
    }
    fn eif2_fields(&self) -> Option<&Cif2AckFields> {
        self.eif2_fields.as_ref()
    }
    fn eif2_fields_mut(&mut self) -> &mut Option<Cif2AckFields> {
        &mut self.eif2_fields
    }
}

impl Cif3AckManipulators for Ack {
    fn wif0(&self) -> Option<&Cif0> {
        self.wif0.as_ref()
    }
    fn wif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.wif0
    }
    fn wif0_fields(&self) -> Option<&Cif0AckFields> {
        self.wif0_fields.as_ref()
    }
    fn wif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.wif0_fields
    }
    fn eif0(&self) -> Option<&Cif0> {
        self.eif0.as_ref()
    }
    fn eif0_mut(&mut self) -> &mut Option<Cif0> {
        &mut self.eif0
    }
    fn eif0_fields(&self) -> Option<&Cif0AckFields> {
        self.eif0_fields.as_ref()
    }
    fn eif0_fields_mut(&mut self) -> &mut Option<Cif0AckFields> {
        &mut self.eif0_fields
    }

    fn wif3(&self) -> Option<&Cif3> {
        self.wif3.as_ref()
    }
    fn wif3_mut(&mut self) -> &mut Option<Cif3> {
        &mut self.wif3
    }
    fn wif3_fields(&self) -> Option<&Cif3AckFields> {
        self.wif3_fields.as_ref()
    }
    fn wif3_fields_mut(&mut self) -> &mut Option<Cif3AckFields> {
        &mut self.wif3_fields
    }

    fn eif3(&self) -> Option<&Cif3> {
        self.eif3.as_ref()
    }
    fn eif3_mut(&mut self) -> &mut Option<Cif3> {
        &mut self.eif3
    }
    fn eif3_fields(&self) -> Option<&Cif3AckFields> {
        self.eif3_fields.as_ref()
    }
    fn eif3_fields_mut(&mut self) -> &mut Option<Cif3AckFields> {
        &mut self.eif3_fields
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ACK")?;
        if let Some(wif0) = &self.wif0 {
            writeln!(f, "Warnings:\n{}", wif0)?;
        }
        if let Some(eif0) = &self.eif0 {
            writeln!(f, "Errors:\n{}", eif0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::command_prelude::*;
    use crate::prelude::*;

    #[test]
    fn warning_and_error_blocks() {
        let mut packet = Vrt::new_validation_ack_packet();
        let command = packet.payload_mut().command_mut().unwrap();
        let ack = command.payload_mut().validation_ack_mut().unwrap();

        let mut response = AckResponse::default();
        response.set_param_out_of_range();
        ack.set_bandwidth(AckLevel::Error, Some(response));
        ack.set_sample_rate(AckLevel::Warning, Some(AckResponse::default()));

        let (level, r) = ack.bandwidth().unwrap();
        assert_eq!(level, AckLevel::Error);
        assert!(r.param_out_of_range());
        assert!(matches!(ack.sample_rate().unwrap().0, AckLevel::Warning));

        // Both blocks present: one WIF0 + one EIF0 word plus one
        // response word each.
        assert_eq!(ack.size_words(), 4);

        ack.set_bandwidth(AckLevel::Error, None);
        assert!(ack.bandwidth().is_none());
        assert_eq!(ack.size_words(), 2);
    }
}
