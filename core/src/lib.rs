pub mod usb;
pub mod definitions;
pub mod capture;
pub mod config;
pub mod control;
pub mod device;
pub mod frame_source;
pub mod interface_state;
pub mod pixel_format;
pub mod streaming;
pub mod transfer;

pub use capture::{BroadcastCaptureBackend, CaptureBackend, CaptureEvent, NoopCaptureBackend};
pub use config::EmulatorConfig;
pub use definitions::ImageSize;
pub use device::MotionCamera;
pub use frame_source::FrameSource;
pub use transfer::{GuestMemory, HostMemory, Transfer, TransferCompletion};
pub use usb::errors::DeviceError;
