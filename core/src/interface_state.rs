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

use log::info;
use crate::capture::CaptureBackend;
use crate::definitions::ImageSize;
use crate::usb::errors::InterfaceError;
use crate::usb::log_prefix;

pub const CONTROL_INTERFACE: u8 = 0;
pub const STREAMING_INTERFACE: u8 = 1;

/// Idle setting plus one setting per isochronous bandwidth tier.
pub const STREAMING_ALT_SETTINGS: u8 = 7;

pub fn number_of_alt_settings(interface: u8) -> u8 {
    if interface == STREAMING_INTERFACE {
        STREAMING_ALT_SETTINGS
    } else {
        1
    }
}

/// Selected interface and the streaming interface's alternate setting.
///
/// Alternate setting 0 means idle; any other setting means the camera is streaming, whatever resolution was
/// committed last.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceState {
    active_interface: u8,
    alt_setting: u8,
}

impl InterfaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_interface(&self) -> u8 {
        self.active_interface
    }

    pub fn alt_setting(&self) -> u8 {
        self.alt_setting
    }

    pub fn is_streaming(&self) -> bool {
        self.alt_setting != 0
    }

    pub fn change_interface(&mut self, interface: u8) -> Result<(), InterfaceError> {
        if interface > STREAMING_INTERFACE {
            return Err(InterfaceError::InvalidInterface(interface));
        }
        info!("{} Changing interface to {}", log_prefix(self.active_interface), interface);
        self.active_interface = interface;
        Ok(())
    }

    /// Applies an alternate setting and notifies `backend`.
    ///
    /// Every non-zero setting on the streaming interface sends a start with `size`, switching between two
    /// tiers included; setting 0 sends a stop. Settings on the control interface are accepted without effect.
    pub fn set_alt_setting<B: CaptureBackend + ?Sized>(&mut self, interface: u8, alt_setting: u8,
                                                       size: ImageSize, backend: &B)
                                                       -> Result<(), InterfaceError> {
        match interface {
            CONTROL_INTERFACE => {
                info!("{} Alt setting {} on control interface ignored", log_prefix(interface), alt_setting);
                Ok(())
            }
            STREAMING_INTERFACE => {
                if alt_setting >= STREAMING_ALT_SETTINGS {
                    return Err(InterfaceError::InvalidAltSetting { interface, alt_setting });
                }
                info!("{} Setting alt setting {} (was {})", log_prefix(interface), alt_setting, self.alt_setting);
                self.alt_setting = alt_setting;
                if alt_setting != 0 {
                    backend.start(size);
                } else {
                    backend.stop();
                }
                Ok(())
            }
            _ => Err(InterfaceError::InvalidInterface(interface)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Notification {
        Start(ImageSize),
        Stop,
    }

    struct MockBackend {
        calls: Mutex<Vec<Notification>>,
    }

    impl MockBackend {
        fn new() -> Self { Self { calls: Mutex::new(Vec::new()) } }
        fn take(&self) -> Vec<Notification> { std::mem::take(&mut self.calls.lock().unwrap()) }
    }

    impl CaptureBackend for MockBackend {
        fn start(&self, size: ImageSize) {
            self.calls.lock().unwrap().push(Notification::Start(size));
        }

        fn stop(&self) {
            self.calls.lock().unwrap().push(Notification::Stop);
        }
    }

    const SIZE: ImageSize = ImageSize::new(160, 120);

    #[test]
    fn streaming_starts_on_every_non_zero_setting() {
        let backend = MockBackend::new();
        let mut state = InterfaceState::new();

        state.set_alt_setting(STREAMING_INTERFACE, 1, SIZE, &backend).unwrap();
        state.set_alt_setting(STREAMING_INTERFACE, 4, SIZE, &backend).unwrap();
        state.set_alt_setting(STREAMING_INTERFACE, 4, SIZE, &backend).unwrap();

        assert!(state.is_streaming());
        assert_eq!(state.alt_setting(), 4);
        assert_eq!(backend.take(), vec![Notification::Start(SIZE); 3]);
    }

    #[test]
    fn idle_setting_stops_once() {
        let backend = MockBackend::new();
        let mut state = InterfaceState::new();
        state.set_alt_setting(STREAMING_INTERFACE, 2, SIZE, &backend).unwrap();
        backend.take();

        state.set_alt_setting(STREAMING_INTERFACE, 0, SIZE, &backend).unwrap();
        assert!(!state.is_streaming());
        assert_eq!(backend.take(), vec![Notification::Stop]);
    }

    #[test]
    fn control_interface_settings_are_accepted_silently() {
        let backend = MockBackend::new();
        let mut state = InterfaceState::new();
        state.set_alt_setting(CONTROL_INTERFACE, 3, SIZE, &backend).unwrap();
        assert_eq!(state.alt_setting(), 0);
        assert!(backend.take().is_empty());
    }

    #[test]
    fn unknown_interface_or_setting_is_rejected_without_notification() {
        let backend = MockBackend::new();
        let mut state = InterfaceState::new();

        assert_eq!(
            state.set_alt_setting(STREAMING_INTERFACE, 7, SIZE, &backend),
            Err(InterfaceError::InvalidAltSetting { interface: 1, alt_setting: 7 })
        );
        assert_eq!(state.set_alt_setting(2, 1, SIZE, &backend), Err(InterfaceError::InvalidInterface(2)));
        assert_eq!(state.change_interface(5), Err(InterfaceError::InvalidInterface(5)));
        assert_eq!(state, InterfaceState::new());
        assert!(backend.take().is_empty());
    }

    #[test]
    fn alt_setting_counts() {
        assert_eq!(number_of_alt_settings(CONTROL_INTERFACE), 1);
        assert_eq!(number_of_alt_settings(STREAMING_INTERFACE), 7);
        assert_eq!(number_of_alt_settings(9), 1);
    }
}
