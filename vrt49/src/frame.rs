// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
VRL (VITA Radio Link) framing: an outer layer that groups VRT packets
behind a fixed alignment word and closes with either the `VEND` marker
or a CRC-32 over everything ahead of it.

Wire layout:

```text
word 0:        0x56524C50 ("VRLP")
word 1:        [12-bit frame count][20-bit frame length in words]
words 2..n-2:  concatenated VRT packets
word n-1:      0x56454E44 ("VEND") or CRC-32
```
*/

use deku::DekuContainerWrite;

use crate::vrt::Vrt;
use crate::VitaError;

/// The frame alignment word, ASCII "VRLP".
pub const VRL_FAW: u32 = 0x5652_4C50;
/// The no-CRC trailer word, ASCII "VEND".
pub const VRL_VEND: u32 = 0x5645_4E44;
/// Maximum frame length in 32-bit words (20-bit field).
pub const MAX_FRAME_WORDS: u32 = 0xF_FFFF;
/// Safe UDP/IPv4 frame budget: 65,471 octets rounded down to a 4096
/// multiple.
pub const MAX_UDP_FRAME_BYTES: usize = 61_440;

/// CRC-32 with the IEEE 802.3 polynomial, not reflected, initial value
/// and final XOR of all ones.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= (byte as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04C1_1DB7
            } else {
                crc << 1
            };
        }
    }
    crc ^ 0xFFFF_FFFF
}

/// A VRL frame: a 12-bit rolling counter, the enclosed packets, and
/// the trailer policy.
#[derive(Clone, Debug, Default)]
pub struct VrlFrame {
    frame_count: u16,
    packets: Vec<Vrt>,
    use_crc: bool,
    crc_valid: Option<bool>,
}

impl VrlFrame {
    /// Creates an empty frame. The trailer defaults to `VEND`; enable
    /// the CRC with [`set_use_crc`](VrlFrame::set_use_crc).
    pub fn new() -> VrlFrame {
        VrlFrame::default()
    }

    /// Returns true when the buffer starts with the VRL alignment word.
    pub fn is_frame(buf: &[u8]) -> bool {
        buf.len() >= 4 && buf[0..4] == VRL_FAW.to_be_bytes()
    }

    /// Parses a frame, enumerating the enclosed packets by walking the
    /// packet length fields. The CRC (when the trailer is not `VEND`)
    /// is checked against the preceding words and the result retained
    /// for [`is_crc_valid`](VrlFrame::is_crc_valid).
    ///
    /// # Errors
    /// Fails on a missing alignment word, a frame length that
    /// disagrees with the buffer or the packet lengths, or a packet
    /// that doesn't parse.
    pub fn from_bytes(buf: &[u8]) -> Result<VrlFrame, VitaError> {
        if !Self::is_frame(buf) {
            return Err(VitaError::NotAVrlFrame);
        }
        if buf.len() < 12 {
            return Err(VitaError::FrameLengthMismatch);
        }
        let header = u32::from_be_bytes(buf[4..8].try_into().unwrap());
        let frame_count = (header >> 20) as u16;
        let frame_words = (header & MAX_FRAME_WORDS) as usize;
        if frame_words < 3 || frame_words * 4 > buf.len() {
            return Err(VitaError::FrameLengthMismatch);
        }

        let body_end = (frame_words - 1) * 4;
        let mut packets = Vec::new();
        let mut off = 8;
        while off < body_end {
            if body_end - off < 4 {
                return Err(VitaError::FrameLengthMismatch);
            }
            let packet_words = u16::from_be_bytes(buf[off + 2..off + 4].try_into().unwrap());
            let packet_bytes = packet_words as usize * 4;
            if packet_bytes == 0 || off + packet_bytes > body_end {
                return Err(VitaError::FrameLengthMismatch);
            }
            packets.push(Vrt::try_from(&buf[off..off + packet_bytes])?);
            off += packet_bytes;
        }

        let trailer = u32::from_be_bytes(buf[body_end..body_end + 4].try_into().unwrap());
        let (use_crc, crc_valid) = if trailer == VRL_VEND {
            (false, None)
        } else {
            (true, Some(crc32(&buf[..body_end]) == trailer))
        };

        Ok(VrlFrame {
            frame_count,
            packets,
            use_crc,
            crc_valid,
        })
    }

    /// Serializes the frame, filling in the length field and trailer.
    ///
    /// # Errors
    /// Fails when the content exceeds the 20-bit word length.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VitaError> {
        let words = self.size_words();
        if words > MAX_FRAME_WORDS {
            return Err(VitaError::FrameLengthMismatch);
        }
        let mut out = Vec::with_capacity(words as usize * 4);
        out.extend_from_slice(&VRL_FAW.to_be_bytes());
        let header = ((self.frame_count as u32 & 0xFFF) << 20) | words;
        out.extend_from_slice(&header.to_be_bytes());
        for packet in &self.packets {
            out.extend_from_slice(&packet.to_bytes()?);
        }
        let trailer = if self.use_crc {
            crc32(&out)
        } else {
            VRL_VEND
        };
        out.extend_from_slice(&trailer.to_be_bytes());
        Ok(out)
    }

    /// Gets the 12-bit frame counter.
    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }
    /// Sets the 12-bit frame counter (wrapped modulo 4096).
    pub fn set_frame_count(&mut self, count: u16) {
        self.frame_count = count & 0xFFF;
    }

    /// Gets the frame length in 32-bit words, including the alignment
    /// word, header, and trailer.
    pub fn size_words(&self) -> u32 {
        3 + self
            .packets
            .iter()
            .map(|p| p.size_words() as u32)
            .sum::<u32>()
    }

    /// Whether the trailer carries a CRC (true) or `VEND` (false).
    pub fn use_crc(&self) -> bool {
        self.use_crc
    }
    /// Selects the trailer policy for serialization.
    pub fn set_use_crc(&mut self, use_crc: bool) {
        self.use_crc = use_crc;
    }

    /// For a parsed frame with a CRC trailer, whether the CRC matched.
    /// `true` for frames without a CRC and for locally built frames.
    pub fn is_crc_valid(&self) -> bool {
        self.crc_valid.unwrap_or(true)
    }

    /// The enclosed packets.
    pub fn packets(&self) -> &[Vrt] {
        &self.packets
    }
    /// The enclosed packets, mutably.
    pub fn packets_mut(&mut self) -> &mut Vec<Vrt> {
        &mut self.packets
    }
    /// Consumes the frame, returning the enclosed packets.
    pub fn into_packets(self) -> Vec<Vrt> {
        self.packets
    }

    /// Fills the frame with as many packets as fit in `max_bytes`
    /// (including the three framing words), replacing any current
    /// contents. Returns how many packets were taken.
    ///
    /// # Errors
    /// Fails when even the first packet won't fit.
    pub fn pack_packets(&mut self, max_bytes: usize, packets: &[Vrt]) -> Result<usize, VitaError> {
        let budget_words = (max_bytes / 4).min(MAX_FRAME_WORDS as usize);
        let mut used_words = 3usize;
        let mut taken = 0;
        for packet in packets {
            let packet_words = packet.size_words() as usize;
            if used_words + packet_words > budget_words {
                break;
            }
            used_words += packet_words;
            taken += 1;
        }
        if taken == 0 && !packets.is_empty() {
            return Err(VitaError::FrameTooSmall);
        }
        self.packets = packets[..taken].to_vec();
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn context_packet() -> Vrt {
        let mut packet = Vrt::new_context_packet();
        let context = packet.payload_mut().context_mut().unwrap();
        context.set_bandwidth_hz(Some(8e6));
        context.set_rf_ref_freq_hz(Some(100e6));
        packet.update_packet_size();
        packet
    }

    fn data_packet(payload_len: usize) -> Vrt {
        let mut packet = Vrt::new_signal_data_packet();
        packet.set_stream_id(Some(1));
        packet.set_signal_payload(&vec![0xA5; payload_len]).unwrap();
        packet.update_packet_size();
        packet
    }

    #[test]
    fn crc_reference_value() {
        // Non-reflected IEEE 802.3 check value for "123456789".
        assert_eq!(crc32(b"123456789"), 0xFC89_1918);
    }

    #[test]
    fn two_packet_frame_round_trip() {
        // A 7-word context packet and an 11-word data packet give a
        // 21-word frame: 1 + 1 + 7 + 11 + 1.
        let ctx = context_packet();
        assert_eq!(ctx.size_words(), 7);
        let data = data_packet(36);
        assert_eq!(data.size_words(), 11);

        let mut frame = VrlFrame::new();
        frame.set_use_crc(true);
        frame.set_frame_count(9);
        frame.packets_mut().push(ctx.clone());
        frame.packets_mut().push(data.clone());
        assert_eq!(frame.size_words(), 21);

        let bytes = frame.to_bytes().unwrap();
        assert_eq!(bytes.len(), 21 * 4);
        assert!(VrlFrame::is_frame(&bytes));

        let parsed = VrlFrame::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.frame_count(), 9);
        assert_eq!(parsed.packets().len(), 2);
        assert_eq!(parsed.packets()[0], ctx);
        assert_eq!(parsed.packets()[1], data);
        assert!(parsed.is_crc_valid());
    }

    #[test]
    fn bit_flip_breaks_crc() {
        let mut frame = VrlFrame::new();
        frame.set_use_crc(true);
        frame.packets_mut().push(data_packet(16));
        let mut bytes = frame.to_bytes().unwrap();
        // Flip one payload bit.
        bytes[14] ^= 0x10;
        let parsed = VrlFrame::from_bytes(&bytes).unwrap();
        assert!(!parsed.is_crc_valid());
    }

    #[test]
    fn vend_trailer_skips_crc() {
        let mut frame = VrlFrame::new();
        frame.packets_mut().push(data_packet(8));
        let bytes = frame.to_bytes().unwrap();
        assert_eq!(&bytes[bytes.len() - 4..], &VRL_VEND.to_be_bytes());
        let parsed = VrlFrame::from_bytes(&bytes).unwrap();
        assert!(!parsed.use_crc());
        assert!(parsed.is_crc_valid());
    }

    #[test]
    fn rejects_garbage() {
        assert!(VrlFrame::from_bytes(&[0u8; 16]).is_err());
        let mut frame = VrlFrame::new();
        frame.packets_mut().push(data_packet(8));
        let mut bytes = frame.to_bytes().unwrap();
        // Claim a longer frame than the buffer holds.
        bytes[7] = 0xFF;
        assert!(VrlFrame::from_bytes(&bytes).is_err());
    }

    #[test]
    fn pack_packets_respects_budget() {
        let packets: Vec<Vrt> = (0..10).map(|_| data_packet(400)).collect();
        let per_packet_bytes = packets[0].size_words() as usize * 4;

        let mut frame = VrlFrame::new();
        // Room for 3 packets plus framing.
        let n = frame
            .pack_packets(3 * per_packet_bytes + 12, &packets)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(frame.packets().len(), 3);

        let mut tiny = VrlFrame::new();
        assert!(tiny.pack_packets(16, &packets).is_err());
    }
}
