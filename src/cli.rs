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

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use motion_camera_core::config::MAX_FRAME_RATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Where streamed frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameSourceKind {
    /// Animated frames produced while the camera streams
    Synthetic,
    /// The camera's built-in gradient test pattern
    Pattern,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Drives the emulated motion camera from a simulated USB host", long_about = None)]
pub struct Cli {
    /// Set the log level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Frame index committed during negotiation (1: 640x480, 2: 320x240, 3: 160x120, 4: 176x144, 5: 352x288)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub frame_index: u8,

    /// Number of complete frames to receive before stopping
    #[arg(long, default_value_t = 30)]
    pub frames: usize,

    /// Isochronous packets per transfer
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    pub packets: u16,

    /// Streaming alternate setting (bandwidth tier)
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub alt_setting: u8,

    /// Target frame rate
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..=MAX_FRAME_RATE as i64))]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = FrameSourceKind::Synthetic)]
    pub source: FrameSourceKind,
}
