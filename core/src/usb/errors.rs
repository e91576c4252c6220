use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Unable to resolve {length} bytes of host memory at {address:#010x}")]
    InvalidBuffer {
        address: u32,
        length: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Frame index {0} is not in the resolution table")]
    InvalidFrameIndex(u8),

    #[error("Probe/commit data is too short: expected {expected}, got {actual} bytes")]
    ProbeCommitTooShort {
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame of {actual} bytes exceeds frame buffer capacity of {capacity} bytes")]
    Oversized {
        capacity: usize,
        actual: usize,
    },

    #[error("Frame size mismatch: expected {expected}, got {actual} bytes")]
    SizeMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("Frame is empty")]
    Empty,

    #[error("{plane} plane is too short: expected {expected}, got {actual} bytes")]
    PlaneTooShort {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("Interface {0} does not exist")]
    InvalidInterface(u8),

    #[error("Interface {interface} has no alternate setting {alt_setting}")]
    InvalidAltSetting {
        interface: u8,
        alt_setting: u8,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Data is too short to parse {name}: expected {expected}, got {actual} bytes")]
    TooShort {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Wrong type of {name}: expected {expected:#04x}, got {actual:#04x}")]
    WrongType {
        name: &'static str,
        expected: u8,
        actual: u8,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Interface error: {0}")]
    Interface(#[from] InterfaceError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<String> for DeviceError {
    fn from(other: String) -> Self {
        DeviceError::InvalidConfig(other)
    }
}
