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

use nusb::transfer::{ControlType, Direction, Recipient};
use crate::definitions::{
    CameraTerminalControl, PayloadHeaderInfo, ProbeCommitHint, ProcessingUnitControl, VideoStreamingControl,
    CAMERA_TERMINAL_ID, PROCESSING_UNIT_ID, VIDEO_STREAMING_UNIT_ID,
};
use crate::usb::errors::ControlError;

/// Standard `GET_DESCRIPTOR` request code.
pub const REQUEST_GET_DESCRIPTOR: u8 = 0x06;

/// Decoded setup stage of a control transfer.
///
/// The request type byte is split into its direction, type and recipient; reserved type or recipient
/// encodings decode to `None` and fall through to the catch-all acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSetup {
    pub direction: Direction,
    pub control_type: Option<ControlType>,
    pub recipient: Option<Recipient>,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl ControlSetup {
    pub fn new(request_type: u8, request: u8, value: u16, index: u16, length: u16) -> Self {
        let direction = if request_type & 0x80 != 0 { Direction::In } else { Direction::Out };
        let control_type = match (request_type >> 5) & 0x03 {
            0 => Some(ControlType::Standard),
            1 => Some(ControlType::Class),
            2 => Some(ControlType::Vendor),
            _ => None,
        };
        let recipient = match request_type & 0x1F {
            0 => Some(Recipient::Device),
            1 => Some(Recipient::Interface),
            2 => Some(Recipient::Endpoint),
            3 => Some(Recipient::Other),
            _ => None,
        };
        Self { direction, control_type, recipient, request, value, index, length }
    }

    /// Entity addressed by a class request, from the high byte of `wIndex`.
    pub fn unit(&self) -> u8 {
        (self.index >> 8) as u8
    }

    /// Control selector of a class request, from the high byte of `wValue`.
    pub fn selector(&self) -> u8 {
        (self.value >> 8) as u8
    }

    pub fn addressed_control(&self) -> AddressedControl {
        AddressedControl::decode(self.unit(), self.selector())
    }
}

/// A class request's target, decomposed into the addressed entity and its control selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressedControl {
    VideoStreaming(Option<VideoStreamingControl>),
    CameraTerminal(Option<CameraTerminalControl>),
    ProcessingUnit(Option<ProcessingUnitControl>),
    Other { unit: u8, selector: u8 },
}

impl AddressedControl {
    pub fn decode(unit: u8, selector: u8) -> Self {
        match unit {
            VIDEO_STREAMING_UNIT_ID => Self::VideoStreaming(VideoStreamingControl::from_u8(selector)),
            CAMERA_TERMINAL_ID => Self::CameraTerminal(CameraTerminalControl::from_u8(selector)),
            PROCESSING_UNIT_ID => Self::ProcessingUnit(ProcessingUnitControl::from_u8(selector)),
            _ => Self::Other { unit, selector },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VideoStreaming(Some(control)) => control.name(),
            Self::CameraTerminal(Some(control)) => control.name(),
            Self::ProcessingUnit(Some(control)) => control.name(),
            Self::VideoStreaming(None) | Self::CameraTerminal(None) | Self::ProcessingUnit(None) => "Unknown",
            Self::Other { .. } => "",
        }
    }
}

/// Video probe and commit control, UVC 1.0 layout (26 bytes, little endian).
///
/// Only the frame index selects anything on this camera; the remaining fields are decoded for
/// diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeCommitControl {
    pub hint: ProbeCommitHint,
    pub format_index: u8,
    pub frame_index: u8,
    /// Frame interval in 100 ns units.
    pub frame_interval: u32,
    pub key_frame_rate: u16,
    pub p_frame_rate: u16,
    pub comp_quality: u16,
    pub comp_window_size: u16,
    pub delay: u16,
    pub max_video_frame_size: u32,
    pub max_payload_transfer_size: u32,
}

impl ProbeCommitControl {
    pub const SIZE: usize = 26;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.hint.bits().to_le_bytes());
        bytes[2] = self.format_index;
        bytes[3] = self.frame_index;
        bytes[4..8].copy_from_slice(&self.frame_interval.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.key_frame_rate.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.p_frame_rate.to_le_bytes());
        bytes[12..14].copy_from_slice(&self.comp_quality.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.comp_window_size.to_le_bytes());
        bytes[16..18].copy_from_slice(&self.delay.to_le_bytes());
        bytes[18..22].copy_from_slice(&self.max_video_frame_size.to_le_bytes());
        bytes[22..26].copy_from_slice(&self.max_payload_transfer_size.to_le_bytes());
        bytes
    }
}

impl TryFrom<&[u8]> for ProbeCommitControl {
    type Error = ControlError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() < Self::SIZE {
            return Err(ControlError::ProbeCommitTooShort { expected: Self::SIZE, actual: data.len() });
        }
        let u16_at = |offset: usize| u16::from_le_bytes([data[offset], data[offset + 1]]);
        let u32_at = |offset: usize| {
            u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
        };
        Ok(Self {
            hint: ProbeCommitHint::from_bits_retain(u16_at(0)),
            format_index: data[2],
            frame_index: data[3],
            frame_interval: u32_at(4),
            key_frame_rate: u16_at(8),
            p_frame_rate: u16_at(10),
            comp_quality: u16_at(12),
            comp_window_size: u16_at(14),
            delay: u16_at(16),
            max_video_frame_size: u32_at(18),
            max_payload_transfer_size: u32_at(22),
        })
    }
}

/// Isochronous payload header. Optional presentation time and source clock fields are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    pub length: u8,
    pub info: PayloadHeaderInfo,
}

impl PayloadHeader {
    pub const SIZE: usize = 2;

    pub fn new(frame_id: bool, end_of_frame: bool) -> Self {
        let mut info = PayloadHeaderInfo::EndOfHeader;
        info.set(PayloadHeaderInfo::FrameId, frame_id);
        info.set(PayloadHeaderInfo::EndOfFrame, end_of_frame);
        Self { length: Self::SIZE as u8, info }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [self.length, self.info.bits()]
    }

    pub fn parse(data: &[u8]) -> Option<Self> {
        let length = *data.first()?;
        let info = PayloadHeaderInfo::from_bits_retain(*data.get(1)?);
        if (length as usize) < Self::SIZE || length as usize > data.len() {
            return None;
        }
        Some(Self { length, info })
    }

    pub fn frame_id(&self) -> bool {
        self.info.contains(PayloadHeaderInfo::FrameId)
    }

    pub fn end_of_frame(&self) -> bool {
        self.info.contains(PayloadHeaderInfo::EndOfFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_interface_set_cur_decodes() {
        let setup = ControlSetup::new(0x21, 0x01, 0x0200, 0x0001, 26);
        assert_eq!(setup.direction, Direction::Out);
        assert_eq!(setup.control_type, Some(ControlType::Class));
        assert_eq!(setup.recipient, Some(Recipient::Interface));
        assert_eq!(setup.unit(), 0);
        assert_eq!(setup.selector(), 2);
        assert_eq!(setup.addressed_control(), AddressedControl::VideoStreaming(Some(VideoStreamingControl::Commit)));
    }

    #[test]
    fn reserved_request_type_bits_decode_to_none() {
        let setup = ControlSetup::new(0xE5, 0x00, 0, 0, 0);
        assert_eq!(setup.direction, Direction::In);
        assert_eq!(setup.control_type, None);
        assert_eq!(setup.recipient, None);
    }

    #[test]
    fn addressed_control_names_each_unit_kind() {
        assert_eq!(AddressedControl::decode(1, 0x0B).name(), "ZOOM_ABSOLUTE");
        assert_eq!(AddressedControl::decode(3, 0x03).name(), "CONTRAST");
        assert_eq!(AddressedControl::decode(0, 0x20).name(), "Unknown");
        assert_eq!(AddressedControl::decode(2, 0x01), AddressedControl::Other { unit: 2, selector: 1 });
    }

    #[test]
    fn probe_commit_parses_fixed_offsets() {
        let commit = ProbeCommitControl {
            hint: ProbeCommitHint::FrameInterval,
            format_index: 2,
            frame_index: 3,
            frame_interval: 666_666,
            max_video_frame_size: 38_400,
            ..Default::default()
        };
        let bytes = commit.to_bytes();
        assert_eq!(&bytes[..8], &[0x01, 0x00, 0x02, 0x03, 0x2A, 0x2C, 0x0A, 0x00]);
        assert_eq!(ProbeCommitControl::try_from(&bytes[..]), Ok(commit));
    }

    #[test]
    fn probe_commit_rejects_short_data() {
        let result = ProbeCommitControl::try_from(&[0u8; 4][..]);
        assert_eq!(result, Err(ControlError::ProbeCommitTooShort { expected: 26, actual: 4 }));
    }

    #[test]
    fn payload_header_always_carries_end_of_header() {
        assert_eq!(PayloadHeader::new(false, false).to_bytes(), [0x02, 0x80]);
        assert_eq!(PayloadHeader::new(true, false).to_bytes(), [0x02, 0x81]);
        assert_eq!(PayloadHeader::new(true, true).to_bytes(), [0x02, 0x83]);
        let parsed = PayloadHeader::parse(&[0x02, 0x82, 0xAA]).unwrap();
        assert!(parsed.end_of_frame());
        assert!(!parsed.frame_id());
    }
}
