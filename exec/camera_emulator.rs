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

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use motion_camera_core::definitions::size_for_frame_index;
use motion_camera_core::{BroadcastCaptureBackend, EmulatorConfig, FrameSource, MotionCamera};
use motion_camera_emulator::cli::{Cli, FrameSourceKind};
use motion_camera_emulator::logger::init_logger;
use motion_camera_emulator::{SimulatedHost, SyntheticCapture};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.into());

    let config = EmulatorConfig { frame_rate: cli.fps, ..Default::default() };
    let frame_source = FrameSource::new(config.initial_size);
    let backend = Arc::new(BroadcastCaptureBackend::new());

    let capture = match cli.source {
        FrameSourceKind::Synthetic => {
            Some(SyntheticCapture::new(backend.subscribe(), frame_source.clone(), cli.fps).run())
        }
        FrameSourceKind::Pattern => None,
    };

    let camera = MotionCamera::with_config(backend.clone(), frame_source, config)?;
    let mut host = SimulatedHost::new(camera);

    let frame_sizes = host.enumerate()?;
    info!("Camera offers {} uncompressed frame sizes", frame_sizes.len());
    let requested = size_for_frame_index(cli.frame_index).context("frame index out of range")?;
    let size = host.commit(cli.frame_index)?;
    if size != requested {
        warn!("Requested {} but camera is at {}", requested, size);
    }

    let packet_size = host.start_streaming(cli.alt_setting)?;
    info!("Streaming {} at alt setting {} ({} byte packets)", size, cli.alt_setting, packet_size);

    let started = tokio::time::Instant::now();
    let frames = tokio::select! {
        frames = host.receive_frames(cli.frames, cli.packets, packet_size) => frames?,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, stopping stream");
            Vec::new()
        }
    };
    let elapsed = started.elapsed();
    host.stop_streaming()?;

    if !frames.is_empty() {
        info!(
            "Received {} frames of {} bytes in {:.2?} ({:.1} fps)",
            frames.len(),
            size.frame_len(),
            elapsed,
            frames.len() as f64 / elapsed.as_secs_f64()
        );
    }

    drop(host);
    if let Some(capture) = capture {
        capture.shutdown().await?;
    }
    info!("Exiting.");
    Ok(())
}
