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

use std::sync::Arc;
use log::{debug, error, info, trace};
use nusb::transfer::Direction;
use crate::capture::CaptureBackend;
use crate::config::EmulatorConfig;
use crate::control::{self, ControlAction};
use crate::definitions::ImageSize;
use crate::frame_source::FrameSource;
use crate::interface_state::{self, InterfaceState, STREAMING_INTERFACE};
use crate::streaming::Packetizer;
use crate::transfer::{ControlMessage, HostMemory, IsoMessage, Transfer, TransferCompletion};
use crate::usb::descriptors::{
    self, ConfigDescriptor, DeviceDescriptor, EndpointDescriptor, InterfaceDescriptor, CAMERA_PRODUCT_ID,
    CAMERA_VENDOR_ID,
};
use crate::usb::errors::{DeviceError, InterfaceError, TransferError};
use crate::usb::log_prefix;

/// Emulated UVC motion camera.
///
/// Driven synchronously by the bus framework: every submission is handled to completion in one call and
/// the returned [`TransferCompletion`] tells the framework when to report it. Only the shared
/// [`FrameSource`] is touched from other threads.
pub struct MotionCamera<B: CaptureBackend> {
    backend: Arc<B>,
    frame_source: FrameSource,
    config: EmulatorConfig,
    interface_state: InterfaceState,
    active_size: ImageSize,
    packetizer: Packetizer,
}

impl<B: CaptureBackend> MotionCamera<B> {
    pub fn new(backend: Arc<B>, frame_source: FrameSource) -> Self {
        let config = EmulatorConfig::default();
        let packetizer = Packetizer::new(config.initial_size, &frame_source);
        Self {
            backend,
            frame_source,
            active_size: config.initial_size,
            config,
            interface_state: InterfaceState::new(),
            packetizer,
        }
    }

    pub fn with_config(backend: Arc<B>, frame_source: FrameSource, config: EmulatorConfig)
                       -> Result<Self, DeviceError> {
        config.validate()?;
        let mut camera = Self::new(backend, frame_source);
        camera.config = config;
        if config.initial_size != camera.active_size {
            camera.active_size = config.initial_size;
            camera.packetizer.reformat(config.initial_size, &camera.frame_source);
        }
        Ok(camera)
    }

    fn prefix(&self) -> String {
        log_prefix(self.interface_state.active_interface())
    }

    pub fn id(&self) -> u64 {
        (CAMERA_VENDOR_ID as u64) << 32 | (CAMERA_PRODUCT_ID as u64) << 16 | 9 << 8 | 1
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn frame_source(&self) -> &FrameSource {
        &self.frame_source
    }

    pub fn active_size(&self) -> ImageSize {
        self.active_size
    }

    pub fn packetizer(&self) -> &Packetizer {
        &self.packetizer
    }

    pub fn active_interface(&self) -> u8 {
        self.interface_state.active_interface()
    }

    pub fn alt_setting(&self) -> u8 {
        self.interface_state.alt_setting()
    }

    pub fn is_streaming(&self) -> bool {
        self.interface_state.is_streaming()
    }

    pub fn device_descriptor(&self) -> DeviceDescriptor {
        info!("{} Get device descriptor", self.prefix());
        descriptors::device_descriptor()
    }

    pub fn configurations(&self) -> Vec<ConfigDescriptor> {
        info!("{} Get configurations", self.prefix());
        descriptors::configurations()
    }

    pub fn interfaces(&self, config: u8) -> Vec<InterfaceDescriptor> {
        info!("{} Get interfaces for config {}", self.prefix(), config);
        descriptors::interfaces(config)
    }

    pub fn endpoints(&self, config: u8, interface: u8, alt_setting: u8) -> Vec<EndpointDescriptor> {
        info!("{} Get endpoints for config {} interface {} alt {}", self.prefix(), config, interface, alt_setting);
        descriptors::endpoints(config, interface, alt_setting)
    }

    pub fn attach(&mut self) -> Result<(), DeviceError> {
        info!("{} Opening device", self.prefix());
        Ok(())
    }

    pub fn attach_and_change_interface(&mut self, interface: u8) -> Result<(), DeviceError> {
        self.attach()?;
        if interface != self.interface_state.active_interface() {
            self.change_interface(interface)?;
        }
        Ok(())
    }

    pub fn change_interface(&mut self, interface: u8) -> Result<(), InterfaceError> {
        self.interface_state.change_interface(interface)
    }

    /// Nothing is ever in flight between calls, so there is nothing to unwind.
    pub fn cancel_transfer(&mut self, endpoint: u8) {
        info!("{} Cancelling transfers on endpoint {:#04x}", self.prefix(), endpoint);
    }

    pub fn number_of_alt_settings(&self, interface: u8) -> u8 {
        interface_state::number_of_alt_settings(interface)
    }

    /// Selects an alternate setting of the streaming interface.
    pub fn set_alt_setting(&mut self, alt_setting: u8) -> Result<(), InterfaceError> {
        self.set_interface_alt_setting(STREAMING_INTERFACE, alt_setting)
    }

    pub fn set_interface_alt_setting(&mut self, interface: u8, alt_setting: u8) -> Result<(), InterfaceError> {
        self.interface_state
            .set_alt_setting(interface, alt_setting, self.active_size, self.backend.as_ref())
    }

    pub fn submit_transfer<M: HostMemory + ?Sized>(&mut self, transfer: &Transfer, memory: &mut M)
                                                   -> Result<TransferCompletion, TransferError> {
        match transfer {
            Transfer::Control(message) => self.submit_control(message, memory),
            Transfer::Isochronous(message) => self.submit_isochronous(message, memory),
            Transfer::Bulk(_) | Transfer::Interrupt(_) => {
                debug!("{} Transfer on {:#04x} acknowledged", self.prefix(), transfer.endpoint());
                Ok(TransferCompletion::immediate(0))
            }
        }
    }

    fn submit_control<M: HostMemory + ?Sized>(&mut self, message: &ControlMessage, memory: &mut M)
                                              -> Result<TransferCompletion, TransferError> {
        let setup = message.setup();
        let length = message.length as usize;
        let buffer: &mut [u8] = if length == 0 {
            &mut []
        } else {
            match memory.range_mut(message.data_address, length) {
                Some(buffer) => buffer,
                None => {
                    error!("{} Control data at {:#010x} ({} bytes) is not mapped", self.prefix(), message.data_address, length);
                    return Err(TransferError::InvalidBuffer { address: message.data_address, length });
                }
            }
        };

        let is_in = matches!(setup.direction, Direction::In);
        let action = control::dispatch(&setup, if is_in { &[] } else { &*buffer });
        if let ControlAction::Commit(size) = action {
            self.commit(size);
        }

        let mut written = 0;
        if is_in {
            let response = action.response();
            written = response.len().min(buffer.len());
            buffer[..written].copy_from_slice(&response[..written]);
        }
        Ok(TransferCompletion {
            length: written,
            packet_lengths: Vec::new(),
            delay: self.config.control_completion_delay,
        })
    }

    fn commit(&mut self, size: ImageSize) {
        info!("{} Active format {} -> {}", self.prefix(), self.active_size, size);
        self.active_size = size;
        self.packetizer.reformat(size, &self.frame_source);
    }

    fn submit_isochronous<M: HostMemory + ?Sized>(&mut self, message: &IsoMessage, memory: &mut M)
                                                  -> Result<TransferCompletion, TransferError> {
        let length = message.length as usize;
        let Some(buffer) = memory.range_mut(message.data_address, length) else {
            error!("{} Isochronous buffer at {:#010x} ({} bytes) is not mapped", self.prefix(), message.data_address, length);
            return Err(TransferError::InvalidBuffer { address: message.data_address, length });
        };
        let delay = self.config.iso_completion_delay();

        if !self.interface_state.is_streaming() {
            trace!("{} Isochronous transfer while idle", self.prefix());
            return Ok(TransferCompletion::isochronous(vec![0; message.packet_sizes.len()], delay));
        }

        let packet_lengths = self.packetizer.fill_packets(buffer, &message.packet_sizes, &self.frame_source);
        trace!(
            "{} Isochronous transfer of {} packets, cursor {}/{}",
            self.prefix(), packet_lengths.len(), self.packetizer.cursor(), self.packetizer.frame_len()
        );
        Ok(TransferCompletion::isochronous(packet_lengths, delay))
    }
}

impl<B: CaptureBackend> Drop for MotionCamera<B> {
    fn drop(&mut self) {
        if self.interface_state.is_streaming() {
            info!("{} Stopping capture on release", self.prefix());
            self.backend.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use crate::capture::NoopCaptureBackend;
    use crate::transfer::{BulkMessage, GuestMemory};

    struct MockBackend {
        calls: Mutex<Vec<Option<ImageSize>>>,
    }

    impl MockBackend {
        fn new() -> Arc<Self> { Arc::new(Self { calls: Mutex::new(Vec::new()) }) }
        fn take(&self) -> Vec<Option<ImageSize>> { std::mem::take(&mut self.calls.lock().unwrap()) }
    }

    impl CaptureBackend for MockBackend {
        fn start(&self, size: ImageSize) {
            self.calls.lock().unwrap().push(Some(size));
        }

        fn stop(&self) {
            self.calls.lock().unwrap().push(None);
        }
    }

    fn camera() -> MotionCamera<NoopCaptureBackend> {
        MotionCamera::new(Arc::new(NoopCaptureBackend), FrameSource::new(ImageSize::new(320, 240)))
    }

    #[test]
    fn id_packs_vendor_and_product() {
        assert_eq!(camera().id(), 0x057E_030A_0901);
    }

    #[test]
    fn powers_up_idle_at_the_default_format() {
        let camera = camera();
        assert_eq!(camera.active_size(), ImageSize::new(320, 240));
        assert_eq!(camera.packetizer().frame_len(), 153_600);
        assert!(!camera.is_streaming());
    }

    #[test]
    fn attach_and_change_interface_switches_only_when_different() {
        let mut camera = camera();
        camera.attach_and_change_interface(0).unwrap();
        assert_eq!(camera.active_interface(), 0);
        camera.attach_and_change_interface(1).unwrap();
        assert_eq!(camera.active_interface(), 1);
        assert!(matches!(
            camera.attach_and_change_interface(4),
            Err(DeviceError::Interface(InterfaceError::InvalidInterface(4)))
        ));
    }

    #[test]
    fn bulk_transfers_are_acknowledged_without_data() {
        let mut camera = camera();
        let mut memory = GuestMemory::new(0, 0);
        let transfer = Transfer::Bulk(BulkMessage { endpoint: 0x02, length: 512, data_address: 0x4000 });
        assert_eq!(camera.submit_transfer(&transfer, &mut memory), Ok(TransferCompletion::immediate(0)));
    }

    #[test]
    fn dropping_while_streaming_stops_capture() {
        let backend = MockBackend::new();
        let mut camera = MotionCamera::new(backend.clone(), FrameSource::new(ImageSize::new(320, 240)));
        camera.set_alt_setting(2).unwrap();
        drop(camera);
        assert_eq!(backend.take(), vec![Some(ImageSize::new(320, 240)), None]);
    }

    #[test]
    fn dropping_while_idle_sends_nothing() {
        let backend = MockBackend::new();
        let camera = MotionCamera::new(backend.clone(), FrameSource::new(ImageSize::new(320, 240)));
        drop(camera);
        assert!(backend.take().is_empty());
    }

    #[test]
    fn configured_initial_size_sizes_the_frame() {
        let config = EmulatorConfig { initial_size: ImageSize::new(176, 144), ..Default::default() };
        let camera = MotionCamera::with_config(
            Arc::new(NoopCaptureBackend), FrameSource::new(config.initial_size), config,
        ).unwrap();
        assert_eq!(camera.packetizer().frame_len(), 176 * 144 * 2);
    }
}
