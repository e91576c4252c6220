use std::time::Duration;
use crate::definitions::{frame_index_for_size, ImageSize, DEFAULT_SIZE};
use crate::usb::errors::DeviceError;

/// Fastest frame rate the isochronous pacing can express in whole milliseconds.
pub const MAX_FRAME_RATE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Active format before the host commits one.
    pub initial_size: ImageSize,
    pub frame_rate: u32,
    /// Isochronous transfers the host needs to move one frame.
    pub transfers_per_frame: u32,
    pub control_completion_delay: Duration,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_SIZE,
            frame_rate: 15,
            transfers_per_frame: 2,
            control_completion_delay: Duration::ZERO,
        }
    }
}

impl EmulatorConfig {
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.frame_rate == 0 {
            return Err(DeviceError::InvalidConfig("frame rate must be greater than 0".to_string()));
        }
        if self.frame_rate > MAX_FRAME_RATE {
            return Err(format!("frame rate {} exceeds {} fps", self.frame_rate, MAX_FRAME_RATE).into());
        }
        if self.transfers_per_frame == 0 {
            return Err(DeviceError::InvalidConfig("transfers per frame must be greater than 0".to_string()));
        }
        if frame_index_for_size(self.initial_size).is_none() {
            return Err(format!("initial size {} is not a supported resolution", self.initial_size).into());
        }
        Ok(())
    }

    /// Completion delay of one isochronous transfer, whole milliseconds.
    pub fn iso_completion_delay(&self) -> Duration {
        let transfers_per_second = self.frame_rate.saturating_mul(self.transfers_per_frame).max(1);
        Duration::from_millis(1000 / transfers_per_second as u64)
    }
}
