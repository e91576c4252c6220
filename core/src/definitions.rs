use std::fmt;
use bitflags::bitflags;

/// Every supported format is packed YUY2 (4:2:2), two bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u16,
    pub height: u16,
}

impl ImageSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Size in bytes of one raw frame at this resolution.
    pub const fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Resolution table, in the order of the uncompressed frame descriptors of the configuration blob.
/// A frame index from a probe/commit request is 1-based into this table.
pub const SUPPORTED_SIZES: [ImageSize; 5] = [
    ImageSize::new(640, 480),
    ImageSize::new(320, 240),
    ImageSize::new(160, 120),
    ImageSize::new(176, 144),
    ImageSize::new(352, 288),
];

/// Resolution the camera reports before the host commits a format.
pub const DEFAULT_SIZE: ImageSize = ImageSize::new(320, 240);

pub fn size_for_frame_index(frame_index: u8) -> Option<ImageSize> {
    let position = frame_index.checked_sub(1)?;
    SUPPORTED_SIZES.get(position as usize).copied()
}

pub fn frame_index_for_size(size: ImageSize) -> Option<u8> {
    SUPPORTED_SIZES
        .iter()
        .position(|supported| *supported == size)
        .map(|position| position as u8 + 1)
}

/// Largest frame any committed format can produce.
pub fn max_frame_len() -> usize {
    SUPPORTED_SIZES.iter().map(ImageSize::frame_len).max().unwrap_or(0)
}

bitflags! {
    /// `bmHeaderInfo` of a UVC payload header.
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub struct PayloadHeaderInfo: u8 {
        const FrameId = 0x01;
        const EndOfFrame = 0x02;
        const PresentationTime = 0x04;
        const SourceClockReference = 0x08;
        const StillImage = 0x20;
        const Error = 0x40;
        const EndOfHeader = 0x80;
    }
}

bitflags! {
    /// `bmHint` of the probe/commit control.
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub struct ProbeCommitHint: u16 {
        const FrameInterval = 0x0001;
        const KeyFrameRate = 0x0002;
        const FrameRate = 0x0004;
        const CompQuality = 0x0008;
        const CompWindowSize = 0x0010;
    }
}

/// Class-specific request codes of the video class.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvcRequestCode {
    SetCur = 0x01,
    GetCur = 0x81,
    GetMin = 0x82,
    GetMax = 0x83,
    GetRes = 0x84,
    GetLen = 0x85,
    GetInf = 0x86,
    GetDef = 0x87,
}

impl UvcRequestCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::SetCur),
            0x81 => Some(Self::GetCur),
            0x82 => Some(Self::GetMin),
            0x83 => Some(Self::GetMax),
            0x84 => Some(Self::GetRes),
            0x85 => Some(Self::GetLen),
            0x86 => Some(Self::GetInf),
            0x87 => Some(Self::GetDef),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetCur => "SET_CUR",
            Self::GetCur => "GET_CUR",
            Self::GetMin => "GET_MIN",
            Self::GetMax => "GET_MAX",
            Self::GetRes => "GET_RES",
            Self::GetLen => "GET_LEN",
            Self::GetInf => "GET_INF",
            Self::GetDef => "GET_DEF",
        }
    }

    pub fn is_get(&self) -> bool {
        !matches!(self, Self::SetCur)
    }
}

/// Video streaming interface control selectors.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStreamingControl {
    Undefined = 0x00,
    Probe = 0x01,
    Commit = 0x02,
    StillProbe = 0x03,
    StillCommit = 0x04,
    StillImageTrigger = 0x05,
    StreamErrorCode = 0x06,
    GenerateKeyFrame = 0x07,
    UpdateFrameSegment = 0x08,
    SynchDelay = 0x09,
}

const VIDEO_STREAMING_CONTROLS: [(VideoStreamingControl, &str); 10] = [
    (VideoStreamingControl::Undefined, "VS_CONTROL_UNDEFINED"),
    (VideoStreamingControl::Probe, "VS_PROBE"),
    (VideoStreamingControl::Commit, "VS_COMMIT"),
    (VideoStreamingControl::StillProbe, "VS_STILL_PROBE"),
    (VideoStreamingControl::StillCommit, "VS_STILL_COMMIT"),
    (VideoStreamingControl::StillImageTrigger, "VS_STILL_IMAGE_TRIGGER"),
    (VideoStreamingControl::StreamErrorCode, "VS_STREAM_ERROR_CODE"),
    (VideoStreamingControl::GenerateKeyFrame, "VS_GENERATE_KEY_FRAME"),
    (VideoStreamingControl::UpdateFrameSegment, "VS_UPDATE_FRAME_SEGMENT"),
    (VideoStreamingControl::SynchDelay, "VS_SYNCH_DELAY"),
];

impl VideoStreamingControl {
    pub fn from_u8(value: u8) -> Option<Self> {
        VIDEO_STREAMING_CONTROLS.get(value as usize).map(|(control, _)| *control)
    }

    pub fn name(&self) -> &'static str {
        VIDEO_STREAMING_CONTROLS[*self as usize].1
    }
}

/// Camera terminal control selectors.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraTerminalControl {
    Undefined = 0x00,
    ScanningMode = 0x01,
    AeMode = 0x02,
    AePriority = 0x03,
    ExposureTimeAbsolute = 0x04,
    ExposureTimeRelative = 0x05,
    FocusAbsolute = 0x06,
    FocusRelative = 0x07,
    FocusAuto = 0x08,
    IrisAbsolute = 0x09,
    IrisRelative = 0x0A,
    ZoomAbsolute = 0x0B,
    ZoomRelative = 0x0C,
    PanTiltAbsolute = 0x0D,
    PanTiltRelative = 0x0E,
    RollAbsolute = 0x0F,
    RollRelative = 0x10,
    Privacy = 0x11,
}

const CAMERA_TERMINAL_CONTROLS: [(CameraTerminalControl, &str); 18] = [
    (CameraTerminalControl::Undefined, "CONTROL_UNDEFINED"),
    (CameraTerminalControl::ScanningMode, "SCANNING_MODE"),
    (CameraTerminalControl::AeMode, "AE_MODE"),
    (CameraTerminalControl::AePriority, "AE_PRIORITY"),
    (CameraTerminalControl::ExposureTimeAbsolute, "EXPOSURE_TIME_ABSOLUTE"),
    (CameraTerminalControl::ExposureTimeRelative, "EXPOSURE_TIME_RELATIVE"),
    (CameraTerminalControl::FocusAbsolute, "FOCUS_ABSOLUTE"),
    (CameraTerminalControl::FocusRelative, "FOCUS_RELATIVE"),
    (CameraTerminalControl::FocusAuto, "FOCUS_AUTO"),
    (CameraTerminalControl::IrisAbsolute, "IRIS_ABSOLUTE"),
    (CameraTerminalControl::IrisRelative, "IRIS_RELATIVE"),
    (CameraTerminalControl::ZoomAbsolute, "ZOOM_ABSOLUTE"),
    (CameraTerminalControl::ZoomRelative, "ZOOM_RELATIVE"),
    (CameraTerminalControl::PanTiltAbsolute, "PANTILT_ABSOLUTE"),
    (CameraTerminalControl::PanTiltRelative, "PANTILT_RELATIVE"),
    (CameraTerminalControl::RollAbsolute, "ROLL_ABSOLUTE"),
    (CameraTerminalControl::RollRelative, "ROLL_RELATIVE"),
    (CameraTerminalControl::Privacy, "PRIVACY"),
];

impl CameraTerminalControl {
    pub fn from_u8(value: u8) -> Option<Self> {
        CAMERA_TERMINAL_CONTROLS.get(value as usize).map(|(control, _)| *control)
    }

    pub fn name(&self) -> &'static str {
        CAMERA_TERMINAL_CONTROLS[*self as usize].1
    }
}

/// Processing unit control selectors.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingUnitControl {
    Undefined = 0x00,
    BacklightCompensation = 0x01,
    Brightness = 0x02,
    Contrast = 0x03,
    Gain = 0x04,
    PowerLineFrequency = 0x05,
    Hue = 0x06,
    Saturation = 0x07,
    Sharpness = 0x08,
    Gamma = 0x09,
    WhiteBalanceTemperature = 0x0A,
    WhiteBalanceTemperatureAuto = 0x0B,
    WhiteBalanceComponent = 0x0C,
    WhiteBalanceComponentAuto = 0x0D,
    DigitalMultiplier = 0x0E,
    DigitalMultiplierLimit = 0x0F,
    HueAuto = 0x10,
    AnalogVideoStandard = 0x11,
    AnalogLockStatus = 0x12,
}

const PROCESSING_UNIT_CONTROLS: [(ProcessingUnitControl, &str); 19] = [
    (ProcessingUnitControl::Undefined, "CONTROL_UNDEFINED"),
    (ProcessingUnitControl::BacklightCompensation, "BACKLIGHT_COMPENSATION"),
    (ProcessingUnitControl::Brightness, "BRIGHTNESS"),
    (ProcessingUnitControl::Contrast, "CONTRAST"),
    (ProcessingUnitControl::Gain, "GAIN"),
    (ProcessingUnitControl::PowerLineFrequency, "POWER_LINE_FREQUENCY"),
    (ProcessingUnitControl::Hue, "HUE"),
    (ProcessingUnitControl::Saturation, "SATURATION"),
    (ProcessingUnitControl::Sharpness, "SHARPNESS"),
    (ProcessingUnitControl::Gamma, "GAMMA"),
    (ProcessingUnitControl::WhiteBalanceTemperature, "WHITE_BALANCE_TEMPERATURE"),
    (ProcessingUnitControl::WhiteBalanceTemperatureAuto, "WHITE_BALANCE_TEMPERATURE_AUTO"),
    (ProcessingUnitControl::WhiteBalanceComponent, "WHITE_BALANCE_COMPONENT"),
    (ProcessingUnitControl::WhiteBalanceComponentAuto, "WHITE_BALANCE_COMPONENT_AUTO"),
    (ProcessingUnitControl::DigitalMultiplier, "DIGITAL_MULTIPLIER"),
    (ProcessingUnitControl::DigitalMultiplierLimit, "DIGITAL_MULTIPLIER_LIMIT"),
    (ProcessingUnitControl::HueAuto, "HUE_AUTO"),
    (ProcessingUnitControl::AnalogVideoStandard, "ANALOG_VIDEO_STANDARD"),
    (ProcessingUnitControl::AnalogLockStatus, "ANALOG_LOCK_STATUS"),
];

impl ProcessingUnitControl {
    pub fn from_u8(value: u8) -> Option<Self> {
        PROCESSING_UNIT_CONTROLS.get(value as usize).map(|(control, _)| *control)
    }

    pub fn name(&self) -> &'static str {
        PROCESSING_UNIT_CONTROLS[*self as usize].1
    }
}

/// Entity ids addressed in the high byte of `wIndex`.
pub const VIDEO_STREAMING_UNIT_ID: u8 = 0x00;
pub const CAMERA_TERMINAL_ID: u8 = 0x01;
pub const PROCESSING_UNIT_ID: u8 = 0x03;
