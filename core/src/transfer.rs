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

use std::time::Duration;
use crate::usb::requests::ControlSetup;

/// Access to the memory the bus framework shares with the device. Addresses are guest physical addresses.
pub trait HostMemory {
    fn range(&self, address: u32, length: usize) -> Option<&[u8]>;

    fn range_mut(&mut self, address: u32, length: usize) -> Option<&mut [u8]>;
}

/// Flat memory region mapped at `base`.
#[derive(Debug, Clone)]
pub struct GuestMemory {
    base: u32,
    bytes: Vec<u8>,
}

impl GuestMemory {
    pub fn new(base: u32, size: usize) -> Self {
        Self { base, bytes: vec![0u8; size] }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn bounds(&self, address: u32, length: usize) -> Option<std::ops::Range<usize>> {
        let start = address.checked_sub(self.base)? as usize;
        let end = start.checked_add(length)?;
        (end <= self.bytes.len()).then_some(start..end)
    }

    /// Copies `data` in at `address`; used by the host side to stage setup data.
    pub fn write(&mut self, address: u32, data: &[u8]) -> bool {
        match self.range_mut(address, data.len()) {
            Some(range) => {
                range.copy_from_slice(data);
                true
            }
            None => false,
        }
    }
}

impl HostMemory for GuestMemory {
    fn range(&self, address: u32, length: usize) -> Option<&[u8]> {
        let bounds = self.bounds(address, length)?;
        Some(&self.bytes[bounds])
    }

    fn range_mut(&mut self, address: u32, length: usize) -> Option<&mut [u8]> {
        let bounds = self.bounds(address, length)?;
        Some(&mut self.bytes[bounds])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    pub endpoint: u8,
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    /// `wLength`, the size of the data stage at `data_address`.
    pub length: u16,
    pub data_address: u32,
}

impl ControlMessage {
    pub fn setup(&self) -> ControlSetup {
        ControlSetup::new(self.request_type, self.request, self.value, self.index, self.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkMessage {
    pub endpoint: u8,
    pub length: u32,
    pub data_address: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptMessage {
    pub endpoint: u8,
    pub length: u32,
    pub data_address: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoMessage {
    pub endpoint: u8,
    /// Size of the whole transfer buffer at `data_address`.
    pub length: u32,
    pub data_address: u32,
    /// Declared capacity of each packet.
    pub packet_sizes: Vec<u16>,
}

/// One transfer submitted to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Control(ControlMessage),
    Bulk(BulkMessage),
    Interrupt(InterruptMessage),
    Isochronous(IsoMessage),
}

impl Transfer {
    pub fn endpoint(&self) -> u8 {
        match self {
            Transfer::Control(message) => message.endpoint,
            Transfer::Bulk(message) => message.endpoint,
            Transfer::Interrupt(message) => message.endpoint,
            Transfer::Isochronous(message) => message.endpoint,
        }
    }
}

/// What the bus framework reports back, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCompletion {
    /// Bytes transferred; for isochronous transfers the sum of `packet_lengths`.
    pub length: usize,
    /// Bytes written per isochronous packet, empty for other transfer kinds.
    pub packet_lengths: Vec<u16>,
    /// Virtual delay after which the framework should complete the transfer.
    pub delay: Duration,
}

impl TransferCompletion {
    pub fn immediate(length: usize) -> Self {
        Self { length, packet_lengths: Vec::new(), delay: Duration::ZERO }
    }

    pub fn isochronous(packet_lengths: Vec<u16>, delay: Duration) -> Self {
        let length = packet_lengths.iter().map(|length| *length as usize).sum();
        Self { length, packet_lengths, delay }
    }
}
