pub mod cli;
pub mod logger;
pub mod capture;
pub mod host;

pub use capture::{SyntheticCapture, SyntheticCaptureHandle};
pub use host::{FrameAssembler, SimulatedHost};
