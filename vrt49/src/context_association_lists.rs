// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to context association lists
(ANSI/VITA-49.2-2017 section 9.13.2).

The lists name the other streams a context stream describes: source,
system, vector-component, and asynchronous-channel stream identifiers,
with optional tags for the asynchronous channels. The receive
pipeline's initial-context assembly is driven by the source and system
lists.
*/

use deku::prelude::*;

/// Base context association lists structure.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextAssociationLists {
    w1: u32,
    w2: u32,
    #[deku(count = "((w1 >> 16) & 0x1FF)")]
    source_list: Vec<u32>,
    #[deku(count = "(w1 & 0x1FF)")]
    system_list: Vec<u32>,
    #[deku(count = "(w2 >> 16)")]
    vector_component_list: Vec<u32>,
    #[deku(count = "(w2 & 0x7FFF)")]
    async_channel_list: Vec<u32>,
    #[deku(cond = "(w2 & (1 << 15)) != 0", count = "(w2 & 0x7FFF)")]
    async_channel_tag_list: Vec<u32>,
}

impl ContextAssociationLists {
    /// Get the size of the lists in 32-bit words.
    pub fn size_words(&self) -> u16 {
        // Start with the 2 count words
        let mut ret = 2;
        ret += self.source_list.len();
        ret += self.system_list.len();
        ret += self.vector_component_list.len();
        ret += self.async_channel_list.len();
        ret += self.async_channel_tag_list.len();
        ret as u16
    }

    /// Gets the source-context stream identifiers.
    pub fn source_list(&self) -> &[u32] {
        &self.source_list
    }
    /// Sets the source-context stream identifiers (at most 511).
    pub fn set_source_list(&mut self, list: Vec<u32>) {
        self.source_list = list;
        self.w1 = (self.w1 & !(0x1FF << 16)) | (((self.source_list.len() as u32) & 0x1FF) << 16);
    }

    /// Gets the system-context stream identifiers.
    pub fn system_list(&self) -> &[u32] {
        &self.system_list
    }
    /// Sets the system-context stream identifiers (at most 511).
    pub fn set_system_list(&mut self, list: Vec<u32>) {
        self.system_list = list;
        self.w1 = (self.w1 & !0x1FF) | ((self.system_list.len() as u32) & 0x1FF);
    }

    /// Gets the vector-component stream identifiers.
    pub fn vector_component_list(&self) -> &[u32] {
        &self.vector_component_list
    }
    /// Sets the vector-component stream identifiers.
    pub fn set_vector_component_list(&mut self, list: Vec<u32>) {
        self.vector_component_list = list;
        self.w2 =
            (self.w2 & 0xFFFF) | (((self.vector_component_list.len() as u32) & 0xFFFF) << 16);
    }

    /// Gets the asynchronous-channel stream identifiers.
    pub fn async_channel_list(&self) -> &[u32] {
        &self.async_channel_list
    }
    /// Gets the asynchronous-channel tags, when present. When present,
    /// the list is the same length as the channel list.
    pub fn async_channel_tag_list(&self) -> Option<&[u32]> {
        if self.w2 & (1 << 15) != 0 {
            Some(&self.async_channel_tag_list)
        } else {
            None
        }
    }
    /// Sets the asynchronous-channel stream identifiers and optional
    /// tags. When tags are given they must pair up with the channels.
    pub fn set_async_channel_list(&mut self, list: Vec<u32>, tags: Option<Vec<u32>>) {
        self.w2 = (self.w2 & !0xFFFF) | ((list.len() as u32) & 0x7FFF);
        self.async_channel_list = list;
        match tags {
            Some(t) => {
                debug_assert_eq!(t.len(), self.async_channel_list.len());
                self.w2 |= 1 << 15;
                self.async_channel_tag_list = t;
            }
            None => self.async_channel_tag_list = Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deku::writer::Writer;
    use deku::{DekuReader, DekuWriter};
    use std::io::Cursor;

    #[test]
    fn list_counts_track_contents() {
        let mut lists = ContextAssociationLists::default();
        lists.set_source_list(vec![10, 11]);
        lists.set_system_list(vec![20]);
        lists.set_async_channel_list(vec![30, 31], Some(vec![7, 8]));
        assert_eq!(lists.source_list(), &[10, 11]);
        assert_eq!(lists.system_list(), &[20]);
        assert_eq!(lists.async_channel_tag_list().unwrap(), &[7, 8]);
        assert_eq!(lists.size_words(), 2 + 2 + 1 + 2 + 2);
    }

    #[test]
    fn wire_round_trip() {
        let mut lists = ContextAssociationLists::default();
        lists.set_source_list(vec![1, 2, 3]);
        lists.set_vector_component_list(vec![9]);

        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        let mut writer = Writer::new(&mut cursor);
        lists
            .to_writer(&mut writer, deku::ctx::Endian::Big)
            .unwrap();
        writer.finalize().unwrap();
        assert_eq!(bytes.len(), 4 * (2 + 3 + 1));

        let mut cursor = Cursor::new(&bytes);
        let mut reader = deku::reader::Reader::new(&mut cursor);
        let parsed =
            ContextAssociationLists::from_reader_with_ctx(&mut reader, deku::ctx::Endian::Big)
                .unwrap();
        assert_eq!(parsed, lists);
    }
}
