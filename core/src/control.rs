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

use log::{debug, warn};
use nusb::transfer::{ControlType, Direction, Recipient};
use crate::definitions::{size_for_frame_index, ImageSize, UvcRequestCode, VideoStreamingControl};
use crate::usb::descriptors::CONFIGURATION_BLOB;
use crate::usb::errors::ControlError;
use crate::usb::log_prefix;
use crate::usb::requests::{AddressedControl, ControlSetup, ProbeCommitControl, REQUEST_GET_DESCRIPTOR};

/// Outcome of a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Data stage answer, clamped to `wLength` by the caller.
    Respond(&'static [u8]),
    /// Empty acknowledgement. Unknown and unimplemented requests end here, never in a stall.
    Acknowledge,
    /// A valid video streaming commit selected a new active format; acknowledged with no data.
    Commit(ImageSize),
}

impl ControlAction {
    pub fn response(&self) -> &'static [u8] {
        match self {
            Self::Respond(data) => data,
            Self::Acknowledge | Self::Commit(_) => &[],
        }
    }
}

/// Classifies one control request. `data` is the host-to-device data stage, empty for IN requests.
pub fn dispatch(setup: &ControlSetup, data: &[u8]) -> ControlAction {
    let prefix = log_prefix(setup.index as u8);
    match (setup.direction, setup.control_type, setup.recipient) {
        (Direction::In, Some(ControlType::Standard), Some(Recipient::Device))
            if setup.request == REQUEST_GET_DESCRIPTOR => {
            debug!("{} GET_DESCRIPTOR value={:#06x} length={}", prefix, setup.value, setup.length);
            ControlAction::Respond(&CONFIGURATION_BLOB)
        }
        (Direction::Out, Some(ControlType::Class), Some(Recipient::Interface))
            if setup.request == UvcRequestCode::SetCur as u8 => {
            let control = setup.addressed_control();
            debug!("{} SET_CUR unit={} selector={:#04x} {}", prefix, setup.unit(), setup.selector(), control.name());
            if control != AddressedControl::VideoStreaming(Some(VideoStreamingControl::Commit)) {
                return ControlAction::Acknowledge;
            }
            match decode_commit(data) {
                Ok(size) => {
                    debug!("{} Committed format {}", prefix, size);
                    ControlAction::Commit(size)
                }
                Err(e) => {
                    warn!("{} Ignoring commit: {}", prefix, e);
                    ControlAction::Acknowledge
                }
            }
        }
        (Direction::In, Some(ControlType::Class), Some(Recipient::Interface)) => {
            match UvcRequestCode::from_u8(setup.request).filter(UvcRequestCode::is_get) {
                Some(code) => log_get_request(&prefix, code, setup),
                None => debug!("{} Unhandled class request {:#04x}", prefix, setup.request),
            }
            ControlAction::Acknowledge
        }
        _ => {
            debug!(
                "{} Acknowledging request type {:?}/{:?}/{:?} request={:#04x} value={:#06x} index={:#06x}",
                prefix, setup.direction, setup.control_type, setup.recipient, setup.request, setup.value, setup.index
            );
            ControlAction::Acknowledge
        }
    }
}

/// Resolution selected by a probe/commit data stage.
pub fn decode_commit(data: &[u8]) -> Result<ImageSize, ControlError> {
    let commit = ProbeCommitControl::try_from(data)?;
    size_for_frame_index(commit.frame_index).ok_or(ControlError::InvalidFrameIndex(commit.frame_index))
}

fn log_get_request(prefix: &str, code: UvcRequestCode, setup: &ControlSetup) {
    let entity = match setup.addressed_control() {
        AddressedControl::VideoStreaming(_) => "video streaming",
        AddressedControl::CameraTerminal(_) => "camera terminal",
        AddressedControl::ProcessingUnit(_) => "processing unit",
        AddressedControl::Other { .. } => "unit",
    };
    debug!(
        "{} {} {} {} selector={:#04x} {}",
        prefix, code.name(), entity, setup.unit(), setup.selector(), setup.addressed_control().name()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_data(frame_index: u8) -> [u8; ProbeCommitControl::SIZE] {
        ProbeCommitControl { format_index: 2, frame_index, ..Default::default() }.to_bytes()
    }

    fn set_cur(selector: u8, unit: u8) -> ControlSetup {
        ControlSetup::new(0x21, 0x01, (selector as u16) << 8, ((unit as u16) << 8) | 1, 26)
    }

    #[test]
    fn get_descriptor_returns_the_configuration_blob() {
        let setup = ControlSetup::new(0x80, REQUEST_GET_DESCRIPTOR, 0x0200, 0, 0x0009);
        let action = dispatch(&setup, &[]);
        assert_eq!(action.response(), &CONFIGURATION_BLOB[..]);
    }

    #[test]
    fn commit_selects_the_indexed_resolution() {
        let action = dispatch(&set_cur(0x02, 0), &commit_data(3));
        assert_eq!(action, ControlAction::Commit(ImageSize::new(160, 120)));
        assert!(action.response().is_empty());
    }

    #[test]
    fn probe_is_acknowledged_without_commit() {
        assert_eq!(dispatch(&set_cur(0x01, 0), &commit_data(1)), ControlAction::Acknowledge);
    }

    #[test]
    fn commit_to_another_unit_is_only_acknowledged() {
        assert_eq!(dispatch(&set_cur(0x02, 3), &commit_data(1)), ControlAction::Acknowledge);
    }

    #[test]
    fn invalid_commits_degrade_to_acknowledgement() {
        assert_eq!(dispatch(&set_cur(0x02, 0), &commit_data(0)), ControlAction::Acknowledge);
        assert_eq!(dispatch(&set_cur(0x02, 0), &commit_data(6)), ControlAction::Acknowledge);
        assert_eq!(dispatch(&set_cur(0x02, 0), &[0u8; 3]), ControlAction::Acknowledge);
        assert_eq!(decode_commit(&commit_data(9)), Err(ControlError::InvalidFrameIndex(9)));
    }

    #[test]
    fn get_requests_are_answered_empty() {
        for request in [0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87] {
            let setup = ControlSetup::new(0xA1, request, 0x0200, 0x0300, 2);
            assert_eq!(dispatch(&setup, &[]), ControlAction::Acknowledge);
        }
    }

    #[test]
    fn unrecognized_requests_are_acknowledged() {
        let vendor = ControlSetup::new(0xC0, 0x42, 0, 0, 4);
        let set_configuration = ControlSetup::new(0x00, 0x09, 1, 0, 0);
        assert_eq!(dispatch(&vendor, &[]), ControlAction::Acknowledge);
        assert_eq!(dispatch(&set_configuration, &[]), ControlAction::Acknowledge);
    }
}
