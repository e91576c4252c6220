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

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::select;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use motion_camera_core::pixel_format::nv12_to_yuy2;
use motion_camera_core::{CaptureEvent, FrameSource, ImageSize};

/// Handle to control the capture task
pub struct SyntheticCaptureHandle {
    join: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl SyntheticCaptureHandle {
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.shutdown_tx.send(());
        self.join.await
    }

    pub fn abort(self) {
        self.join.abort();
    }
}

/// Stand-in for a host camera: follows the emulated camera's start/stop notifications and deposits
/// animated frames into the shared frame source while it streams.
pub struct SyntheticCapture {
    events_rx: broadcast::Receiver<CaptureEvent>,
    frame_source: FrameSource,
    frame_rate: u32,
}

impl SyntheticCapture {
    pub fn new(events_rx: broadcast::Receiver<CaptureEvent>, frame_source: FrameSource, frame_rate: u32) -> Self {
        Self { events_rx, frame_source, frame_rate: frame_rate.max(1) }
    }

    pub fn run(mut self) -> SyntheticCaptureHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let join = tokio::spawn(async move {
            let mut producer: Option<JoinHandle<()>> = None;
            loop {
                select! {
                    _ = &mut shutdown_rx => {
                        debug!("Synthetic capture shutting down");
                        break;
                    }
                    event = self.events_rx.recv() => {
                        match event {
                            Ok(CaptureEvent::Started(size)) => {
                                if let Some(previous) = producer.take() {
                                    previous.abort();
                                }
                                info!("Synthetic capture started at {}", size);
                                producer = Some(tokio::spawn(produce_frames(
                                    size, self.frame_source.clone(), self.frame_rate,
                                )));
                            }
                            Ok(CaptureEvent::Stopped) => {
                                if let Some(previous) = producer.take() {
                                    info!("Synthetic capture stopped");
                                    previous.abort();
                                }
                            }
                            Err(RecvError::Lagged(skipped)) => {
                                warn!("Synthetic capture lagged, {} notifications skipped", skipped);
                            }
                            Err(RecvError::Closed) => break,
                        }
                    }
                }
            }
            if let Some(producer) = producer {
                producer.abort();
            }
        });
        SyntheticCaptureHandle { join, shutdown_tx }
    }
}

async fn produce_frames(size: ImageSize, frame_source: FrameSource, frame_rate: u32) {
    let mut interval = tokio::time::interval(Duration::from_millis(1000 / frame_rate as u64).max(Duration::from_millis(1)));
    let mut frame_number: u32 = 0;
    loop {
        interval.tick().await;
        let (y_plane, uv_plane) = nv12_frame(size, frame_number);
        let frame = match nv12_to_yuy2(size, &y_plane, &uv_plane) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Unable to convert synthetic frame: {}", e);
                return;
            }
        };
        if let Err(e) = frame_source.deposit(&frame) {
            warn!("Synthetic frame {} rejected: {}", frame_number, e);
        }
        frame_number = frame_number.wrapping_add(1);
    }
}

/// Diagonal luma bars moving one step per frame over a slowly rotating chroma.
pub fn nv12_frame(size: ImageSize, frame_number: u32) -> (Vec<u8>, Vec<u8>) {
    let width = size.width as usize;
    let height = size.height as usize;
    let shift = frame_number as usize * 4;

    let mut y_plane = vec![0u8; width * height];
    for (line, row) in y_plane.chunks_exact_mut(width.max(1)).enumerate() {
        for (col, luma) in row.iter_mut().enumerate() {
            *luma = if (col + line + shift) / 16 % 2 == 0 { 235 } else { 16 };
        }
    }

    let chroma_lines = height.div_ceil(2);
    let u = (128 + (frame_number % 64) as i32 - 32) as u8;
    let v = (128 - (frame_number % 64) as i32 + 32) as u8;
    let mut uv_plane = vec![0u8; width * chroma_lines];
    for pair in uv_plane.chunks_exact_mut(2) {
        pair[0] = u;
        pair[1] = v;
    }
    (y_plane, uv_plane)
}
