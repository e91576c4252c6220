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

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use log::{debug, warn};
use crate::definitions::{max_frame_len, ImageSize, BYTES_PER_PIXEL};
use crate::usb::errors::FrameError;

struct FrameSlot {
    data: Vec<u8>,
    length: usize,
    /// Still holding the generated test pattern, no producer frame deposited yet.
    synthetic: bool,
}

/// Most recent raw YUY2 frame, shared between the capture producer and the camera.
///
/// Cloning yields another handle to the same frame. `deposit` and `replenish` are serialized by one lock,
/// the frame bytes are never observed half written.
#[derive(Clone)]
pub struct FrameSource {
    slot: Arc<Mutex<FrameSlot>>,
}

impl FrameSource {
    /// Frame source sized for the largest supported format, holding a test pattern at `initial_size`.
    pub fn new(initial_size: ImageSize) -> Self {
        Self::with_capacity(max_frame_len().max(initial_size.frame_len()), initial_size)
    }

    pub fn with_capacity(capacity: usize, initial_size: ImageSize) -> Self {
        let mut data = vec![0u8; capacity];
        let length = initial_size.frame_len().min(capacity);
        write_test_pattern(initial_size, &mut data[..length]);
        Self {
            slot: Arc::new(Mutex::new(FrameSlot { data, length, synthetic: true })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrameSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Length of the frame currently held.
    pub fn frame_len(&self) -> usize {
        self.lock().length
    }

    pub fn has_producer_frame(&self) -> bool {
        !self.lock().synthetic
    }

    /// Replaces the held frame with one from the capture producer.
    pub fn deposit(&self, data: &[u8]) -> Result<(), FrameError> {
        if data.is_empty() {
            return Err(FrameError::Empty);
        }
        let mut slot = self.lock();
        let capacity = slot.data.len();
        if data.len() > capacity {
            warn!("Rejecting frame of {} bytes, capacity is {} bytes", data.len(), capacity);
            return Err(FrameError::Oversized { capacity, actual: data.len() });
        }
        slot.data[..data.len()].copy_from_slice(data);
        slot.length = data.len();
        slot.synthetic = false;
        debug!("Frame deposited, length={}", data.len());
        Ok(())
    }

    /// Copies the held frame into `destination`, which must hold exactly one frame of `size`.
    ///
    /// A held test pattern of another resolution is regenerated at `size`. A producer frame of another
    /// resolution is a mismatch and leaves `destination` untouched.
    pub fn replenish(&self, size: ImageSize, destination: &mut [u8]) -> Result<(), FrameError> {
        let expected = size.frame_len();
        if destination.len() != expected {
            return Err(FrameError::SizeMismatch { expected, actual: destination.len() });
        }
        let mut slot = self.lock();
        if slot.length != expected {
            if !slot.synthetic {
                return Err(FrameError::SizeMismatch { expected, actual: slot.length });
            }
            let capacity = slot.data.len();
            if expected > capacity {
                return Err(FrameError::Oversized { capacity, actual: expected });
            }
            debug!("Regenerating test pattern at {}", size);
            write_test_pattern(size, &mut slot.data[..expected]);
            slot.length = expected;
        }
        destination.copy_from_slice(&slot.data[..expected]);
        Ok(())
    }
}

/// Deterministic gradient: luma and blue-difference follow the column, red-difference the line.
pub fn test_pattern(size: ImageSize) -> Vec<u8> {
    let mut frame = vec![0u8; size.frame_len()];
    write_test_pattern(size, &mut frame);
    frame
}

fn write_test_pattern(size: ImageSize, frame: &mut [u8]) {
    let width = size.width as i32;
    let height = size.height as i32;
    if width == 0 || height == 0 {
        return;
    }
    for (pixel_index, pixel) in frame.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let line = pixel_index as i32 / width;
        let col = pixel_index as i32 % width;
        let r = col * 255 / width;
        let g = col * 255 / width;
        let b = line * 255 / height;

        let y = ((66 * r + 129 * g + 25 * b + 128) / 256) + 16;
        let u = ((-38 * r - 74 * g + 112 * b + 128) / 256) + 128;
        let v = ((112 * r - 94 * g - 18 * b + 128) / 256) + 128;

        pixel[0] = y as u8;
        pixel[1] = if col % 2 == 0 { u as u8 } else { v as u8 };
    }
}
