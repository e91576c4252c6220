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

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};

use motion_camera_core::definitions::ImageSize;
use motion_camera_core::transfer::{ControlMessage, IsoMessage};
use motion_camera_core::usb::descriptor_utils::uncompressed_frame_sizes;
use motion_camera_core::usb::descriptors::{CONFIGURATION_DESCRIPTOR_ID, STREAMING_ENDPOINT_ADDRESS};
use motion_camera_core::usb::requests::{PayloadHeader, ProbeCommitControl, REQUEST_GET_DESCRIPTOR};
use motion_camera_core::{CaptureBackend, GuestMemory, HostMemory, MotionCamera, Transfer};

const MEMORY_BASE: u32 = 0x0010_0000;
const MEMORY_SIZE: usize = 0x0010_0000;
const CONTROL_DATA: u32 = MEMORY_BASE;
const ISO_DATA: u32 = MEMORY_BASE + 0x1000;
const CONFIGURATION_READ_LENGTH: u16 = 0x0400;
const COMMIT_FORMAT_INDEX: u8 = 2;

/// Rebuilds frames from isochronous payloads using the end-of-frame bit and frame id parity.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    frame: Vec<u8>,
    frame_id: Option<bool>,
    dropped: usize,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames discarded because their parity changed before an end-of-frame was seen.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn push_packet(&mut self, packet: &[u8]) -> Option<Vec<u8>> {
        let header = PayloadHeader::parse(packet)?;
        if self.frame_id.is_some_and(|frame_id| frame_id != header.frame_id()) && !self.frame.is_empty() {
            warn!("Frame id changed after {} bytes without end of frame", self.frame.len());
            self.frame.clear();
            self.dropped += 1;
        }
        self.frame_id = Some(header.frame_id());
        self.frame.extend_from_slice(&packet[header.length as usize..]);
        if header.end_of_frame() {
            return Some(std::mem::take(&mut self.frame));
        }
        None
    }
}

/// Plays the USB host: enumerates the camera, negotiates a format and pulls isochronous transfers.
pub struct SimulatedHost<B: CaptureBackend> {
    camera: MotionCamera<B>,
    memory: GuestMemory,
    assembler: FrameAssembler,
}

impl<B: CaptureBackend> SimulatedHost<B> {
    pub fn new(camera: MotionCamera<B>) -> Self {
        Self { camera, memory: GuestMemory::new(MEMORY_BASE, MEMORY_SIZE), assembler: FrameAssembler::new() }
    }

    pub fn camera(&self) -> &MotionCamera<B> {
        &self.camera
    }

    /// Reads every descriptor and checks the raw configuration against the structured one.
    pub fn enumerate(&mut self) -> Result<Vec<(u8, ImageSize)>> {
        self.camera.attach()?;
        let device = self.camera.device_descriptor();
        let (vendor_id, product_id) = (device.idVendor, device.idProduct);
        info!("Found camera {:04x}:{:04x}, id {:#x}", vendor_id, product_id, self.camera.id());

        let configuration = self
            .camera
            .configurations()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("camera reports no configuration"))?;
        for interface in self.camera.interfaces(0) {
            let endpoints = self.camera.endpoints(0, interface.bInterfaceNumber, interface.bAlternateSetting);
            for endpoint in endpoints {
                let max_packet_size = endpoint.wMaxPacketSize;
                debug!(
                    "Interface {} alt {}: endpoint {:#04x} {:?} wMaxPacketSize={:#06x}",
                    interface.bInterfaceNumber, interface.bAlternateSetting, endpoint.bEndpointAddress,
                    endpoint.transfer_type(), max_packet_size
                );
            }
        }

        let message = ControlMessage {
            endpoint: 0,
            request_type: 0x80,
            request: REQUEST_GET_DESCRIPTOR,
            value: (CONFIGURATION_DESCRIPTOR_ID as u16) << 8,
            index: 0,
            length: CONFIGURATION_READ_LENGTH,
            data_address: CONTROL_DATA,
        };
        let completion = self.camera.submit_transfer(&Transfer::Control(message), &mut self.memory)?;
        let total_length = configuration.wTotalLength;
        if completion.length != total_length as usize {
            bail!("configuration read returned {} bytes, wTotalLength is {}", completion.length, total_length);
        }
        let raw = self
            .memory
            .range(CONTROL_DATA, completion.length)
            .context("configuration read buffer is not mapped")?;
        Ok(uncompressed_frame_sizes(raw))
    }

    pub fn commit(&mut self, frame_index: u8) -> Result<ImageSize> {
        let data = ProbeCommitControl {
            format_index: COMMIT_FORMAT_INDEX,
            frame_index,
            frame_interval: 666_666,
            ..Default::default()
        }
        .to_bytes();
        if !self.memory.write(CONTROL_DATA, &data) {
            bail!("unable to stage commit data");
        }
        let message = ControlMessage {
            endpoint: 0,
            request_type: 0x21,
            request: 0x01,
            value: 0x0200,
            index: 0x0001,
            length: data.len() as u16,
            data_address: CONTROL_DATA,
        };
        self.camera.submit_transfer(&Transfer::Control(message), &mut self.memory)?;
        Ok(self.camera.active_size())
    }

    /// Selects a streaming tier and returns the isochronous packet size it allows.
    pub fn start_streaming(&mut self, alt_setting: u8) -> Result<u16> {
        let endpoint = self
            .camera
            .endpoints(0, 1, alt_setting)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("alt setting {} has no streaming endpoint", alt_setting))?;
        self.camera.set_alt_setting(alt_setting)?;
        Ok(endpoint.max_payload() as u16)
    }

    pub fn stop_streaming(&mut self) -> Result<()> {
        self.camera.set_alt_setting(0)?;
        self.camera.cancel_transfer(STREAMING_ENDPOINT_ADDRESS);
        Ok(())
    }

    /// Submits isochronous transfers, honoring each completion delay, until `frames` frames are complete.
    pub async fn receive_frames(&mut self, frames: usize, packets: u16, packet_size: u16) -> Result<Vec<Vec<u8>>> {
        let packet_sizes = vec![packet_size; packets as usize];
        let length = packet_sizes.iter().map(|size| *size as u32).sum();
        let transfer = Transfer::Isochronous(IsoMessage {
            endpoint: STREAMING_ENDPOINT_ADDRESS,
            length,
            data_address: ISO_DATA,
            packet_sizes,
        });

        let mut received = Vec::with_capacity(frames);
        while received.len() < frames {
            let completion = self.camera.submit_transfer(&transfer, &mut self.memory)?;
            tokio::time::sleep(completion.delay).await;
            if completion.length == 0 {
                bail!("camera is not streaming");
            }

            let mut offset = 0u32;
            for packet_length in completion.packet_lengths {
                let packet = self
                    .memory
                    .range(ISO_DATA + offset, packet_length as usize)
                    .context("isochronous packet is not mapped")?;
                if let Some(frame) = self.assembler.push_packet(packet) {
                    debug!("Frame {} complete, {} bytes", received.len(), frame.len());
                    received.push(frame);
                }
                offset += packet_length as u32;
            }
        }
        if self.assembler.dropped() > 0 {
            warn!("{} incomplete frames dropped", self.assembler.dropped());
        }
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use motion_camera_core::frame_source::test_pattern;
    use motion_camera_core::{EmulatorConfig, FrameSource, NoopCaptureBackend};

    fn host() -> SimulatedHost<NoopCaptureBackend> {
        // pacing is irrelevant here, the delay rounds down to zero
        let config = EmulatorConfig { frame_rate: 1000, ..Default::default() };
        let camera = MotionCamera::with_config(Arc::new(NoopCaptureBackend), FrameSource::new(config.initial_size), config)
            .unwrap();
        SimulatedHost::new(camera)
    }

    #[test]
    fn enumeration_finds_the_resolution_table() {
        let mut host = host();
        let frame_sizes = host.enumerate().unwrap();
        assert_eq!(frame_sizes.len(), 5);
        assert_eq!(frame_sizes[2], (3, ImageSize::new(160, 120)));
    }

    #[tokio::test]
    async fn streamed_frames_match_the_test_pattern() {
        let mut host = host();
        host.enumerate().unwrap();
        let size = host.commit(3).unwrap();
        assert_eq!(size, ImageSize::new(160, 120));

        let packet_size = host.start_streaming(6).unwrap();
        assert_eq!(packet_size, 3060);
        let frames = host.receive_frames(2, 8, packet_size).await.unwrap();
        host.stop_streaming().unwrap();

        assert_eq!(frames.len(), 2);
        for frame in frames {
            assert_eq!(frame, test_pattern(size));
        }
    }

    #[tokio::test]
    async fn receiving_while_idle_fails() {
        let mut host = host();
        assert!(host.receive_frames(1, 4, 1024).await.is_err());
    }

    #[test]
    fn assembler_drops_frames_without_end_of_frame() {
        let mut assembler = FrameAssembler::new();
        assert_eq!(assembler.push_packet(&[0x02, 0x80, 1, 2]), None);
        assert_eq!(assembler.push_packet(&[0x02, 0x83, 3, 4]), Some(vec![3, 4]));
        assert_eq!(assembler.dropped(), 1);
        assert_eq!(assembler.push_packet(&[0x02, 0x80, 5]), None);
        assert_eq!(assembler.push_packet(&[0x02, 0x82, 6]), Some(vec![5, 6]));
    }
}
