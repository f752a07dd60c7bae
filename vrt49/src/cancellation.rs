// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Cancellation command payloads (ANSI/VITA-49.2-2017 section 8.2.3).

A cancellation names fields to revoke, so it carries only indicator
words: CIF0 plus whichever of CIF1..CIF3 the set enable bits call for.
No data fields follow. The `set_cif*` methods keep the CIF0 enable
bits in step with the optional words so a hand-built payload parses
back the way it was written.
*/

use crate::prelude::*;
use deku::prelude::*;
use std::fmt;

/// Cancellation packet data structure: indicator words only, marking
/// the fields whose pending control actions should be revoked.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cancellation {
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
}

impl Cancellation {
    /// Get the cancellation size (in 32-bit words): one word per CIF
    /// present.
    pub fn size_words(&self) -> u16 {
        1 + self.cif1.is_some() as u16 + self.cif2.is_some() as u16 + self.cif3.is_some() as u16
    }

    /// Get a reference to the CIF0 indicator fields.
    pub fn cif0(&self) -> &Cif0 {
        &self.cif0
    }
    /// Get a mutable reference to the CIF0 indicator fields.
    pub fn cif0_mut(&mut self) -> &mut Cif0 {
        &mut self.cif0
    }

    /// Get a reference to the CIF1 indicator fields.
    pub fn cif1(&self) -> Option<&Cif1> {
        self.cif1.as_ref()
    }
    /// Install or remove the CIF1 indicator word, keeping the CIF0
    /// enable bit in step.
    pub fn set_cif1(&mut self, cif1: Option<Cif1>) {
        if cif1.is_some() {
            self.cif0.set_cif1_enabled();
        } else {
            self.cif0.unset_cif1_enabled();
        }
        self.cif1 = cif1;
    }

    /// Get a reference to the CIF2 indicator fields.
    pub fn cif2(&self) -> Option<&Cif2> {
        self.cif2.as_ref()
    }
    /// Install or remove the CIF2 indicator word, keeping the CIF0
    /// enable bit in step.
    pub fn set_cif2(&mut self, cif2: Option<Cif2>) {
        if cif2.is_some() {
            self.cif0.set_cif2_enabled();
        } else {
            self.cif0.unset_cif2_enabled();
        }
        self.cif2 = cif2;
    }

    /// Get a reference to the CIF3 indicator fields.
    pub fn cif3(&self) -> Option<&Cif3> {
        self.cif3.as_ref()
    }
    /// Install or remove the CIF3 indicator word, keeping the CIF0
    /// enable bit in step.
    pub fn set_cif3(&mut self, cif3: Option<Cif3>) {
        if cif3.is_some() {
            self.cif0.set_cif3_enabled();
        } else {
            self.cif0.unset_cif3_enabled();
        }
        self.cif3 = cif3;
    }
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cancellation:\n{}", self.cif0)?;
        if let Some(cif1) = &self.cif1 {
            write!(f, "{cif1}")?;
        }
        if let Some(cif2) = &self.cif2 {
            write!(f, "{cif2}")?;
        }
        if let Some(cif3) = &self.cif3 {
            write!(f, "{cif3}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn cif_words_follow_enable_bits() {
        let mut packet = Vrt::new_cancellation_packet();
        let command = packet.payload_mut().command_mut().unwrap();
        let cancel = command.payload_mut().cancellation_mut().unwrap();
        assert_eq!(cancel.size_words(), 1);

        cancel.cif0_mut().set_sample_rate();
        let mut cif2 = Cif2::default();
        cif2.set_mode_id();
        cancel.set_cif2(Some(cif2));
        assert!(cancel.cif0().cif2_enabled());
        assert_eq!(cancel.size_words(), 2);

        cancel.set_cif2(None);
        assert!(!cancel.cif0().cif2_enabled());
        assert_eq!(cancel.size_words(), 1);
    }

    #[test]
    fn display_covers_present_cifs() {
        let mut packet = Vrt::new_cancellation_packet();
        let command = packet.payload_mut().command_mut().unwrap();
        let cancel = command.payload_mut().cancellation_mut().unwrap();
        let mut cif1 = Cif1::default();
        cif1.set_spectrum();
        cancel.set_cif1(Some(cif1));

        let rendered = format!("{cancel}");
        assert!(rendered.contains("Cancellation:"));
        // The CIF1 word renders its own listing; no CIF2 lines appear.
        assert!(rendered.contains("Spectrum: true"));
        assert!(!rendered.contains("Mode ID:"));
    }
}
