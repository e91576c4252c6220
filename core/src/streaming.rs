// Copyright 2025 HEM Sp. z o.o.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use log::{trace, warn};
use crate::definitions::ImageSize;
use crate::frame_source::{test_pattern, FrameSource};
use crate::usb::requests::PayloadHeader;

/// One frame at the active format and how much of it has been sent.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    data: Vec<u8>,
    cursor: usize,
    size: ImageSize,
}

impl FrameBuffer {
    /// Starts out holding the test pattern so a failed first refill never goes out blank.
    fn new(size: ImageSize) -> Self {
        Self { data: test_pattern(size), cursor: 0, size }
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.data.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pulls the next frame from `source` and rewinds. On failure the frame held so far is sent again.
    fn refill(&mut self, source: &FrameSource) {
        if let Err(e) = source.replenish(self.size, &mut self.data) {
            warn!("Replenishing {} frame failed, repeating the previous one: {}", self.size, e);
        }
        self.cursor = 0;
    }
}

/// Splits frames into isochronous payloads.
///
/// Each packet gets a two byte header followed by as much of the current frame as fits. The packet that
/// carries the last byte of a frame has end-of-frame set, and the frame id toggles after it so every packet
/// of the next frame carries the new parity.
#[derive(Debug, Clone)]
pub struct Packetizer {
    frame: FrameBuffer,
    frame_id: bool,
}

impl Packetizer {
    pub fn new(size: ImageSize, source: &FrameSource) -> Self {
        let mut frame = FrameBuffer::new(size);
        frame.refill(source);
        Self { frame, frame_id: false }
    }

    /// Switches to a newly committed format. The frame restarts from its first byte, parity is kept.
    pub fn reformat(&mut self, size: ImageSize, source: &FrameSource) {
        self.frame = FrameBuffer::new(size);
        self.frame.refill(source);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn size(&self) -> ImageSize {
        self.frame.size()
    }

    pub fn cursor(&self) -> usize {
        self.frame.cursor()
    }

    pub fn frame_len(&self) -> usize {
        self.frame.len()
    }

    pub fn frame_id(&self) -> bool {
        self.frame_id
    }

    /// Fills one isochronous transfer and returns the bytes written per packet.
    ///
    /// Packets are laid out back to back in `buffer`, each one starting where the previous one's written
    /// bytes end; a declared capacity is cut down to what is left of `buffer`. A packet with room for less
    /// than a header is reported as 0 bytes. A frame drained by this transfer is replaced from `source`
    /// once all packets are filled.
    pub fn fill_packets(&mut self, buffer: &mut [u8], capacities: &[u16], source: &FrameSource) -> Vec<u16> {
        let mut packet_lengths = Vec::with_capacity(capacities.len());
        let mut offset = 0;

        for (packet, &capacity) in capacities.iter().enumerate() {
            let capacity = (capacity as usize).min(buffer.len() - offset);
            if capacity < PayloadHeader::SIZE {
                trace!("Packet {} capacity {} too small for a payload header", packet, capacity);
                packet_lengths.push(0);
                continue;
            }

            let payload = (capacity - PayloadHeader::SIZE).min(self.frame.remaining());
            let end_of_frame = payload > 0 && payload == self.frame.remaining();
            let header = PayloadHeader::new(self.frame_id, end_of_frame);

            let packet_buffer = &mut buffer[offset..offset + PayloadHeader::SIZE + payload];
            packet_buffer[..PayloadHeader::SIZE].copy_from_slice(&header.to_bytes());
            let cursor = self.frame.cursor;
            packet_buffer[PayloadHeader::SIZE..].copy_from_slice(&self.frame.data[cursor..cursor + payload]);
            self.frame.cursor += payload;

            trace!(
                "Packet {}: frame_id={} eof={} payload={} cursor={}/{}",
                packet, self.frame_id as u8, end_of_frame, payload, self.frame.cursor, self.frame.len()
            );
            if end_of_frame {
                self.frame_id = !self.frame_id;
            }

            let written = PayloadHeader::SIZE + payload;
            packet_lengths.push(written as u16);
            offset += written;
        }

        if self.frame.is_exhausted() {
            self.frame.refill(source);
        }
        packet_lengths
    }
}
