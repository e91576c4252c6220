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

use log::debug;
use tokio::sync::broadcast;
use crate::definitions::ImageSize;

/// Lifecycle notifications from the camera to whatever produces its frames.
///
/// Implementations must tolerate redundant calls: a start is sent on every change to a non-zero alternate
/// setting, even when the resolution did not change.
pub trait CaptureBackend: Send + Sync {
    fn start(&self, size: ImageSize);

    fn stop(&self);
}

/// Backend for pattern-only operation, the frame source keeps serving its test pattern.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCaptureBackend;

impl CaptureBackend for NoopCaptureBackend {
    fn start(&self, size: ImageSize) {
        debug!("Capture start ignored ({})", size);
    }

    fn stop(&self) {
        debug!("Capture stop ignored");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    Started(ImageSize),
    Stopped,
}

/// Publishes capture notifications to any number of asynchronous producers.
pub struct BroadcastCaptureBackend {
    events_tx: broadcast::Sender<CaptureEvent>,
}

impl BroadcastCaptureBackend {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(16);
        Self { events_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.events_tx.subscribe()
    }

    fn publish(&self, event: CaptureEvent) {
        // no subscribers is fine, nobody is producing frames
        if self.events_tx.send(event).is_err() {
            debug!("No capture producer subscribed for {:?}", event);
        }
    }
}

impl Default for BroadcastCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for BroadcastCaptureBackend {
    fn start(&self, size: ImageSize) {
        self.publish(CaptureEvent::Started(size));
    }

    fn stop(&self) {
        self.publish(CaptureEvent::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notifications_in_order() {
        let backend = BroadcastCaptureBackend::new();
        let mut events_rx = backend.subscribe();

        backend.start(ImageSize::new(160, 120));
        backend.stop();

        assert_eq!(events_rx.recv().await.unwrap(), CaptureEvent::Started(ImageSize::new(160, 120)));
        assert_eq!(events_rx.recv().await.unwrap(), CaptureEvent::Stopped);
    }

    #[tokio::test]
    async fn notifications_without_subscribers_are_dropped() {
        let backend = BroadcastCaptureBackend::new();
        backend.start(ImageSize::new(640, 480));

        let mut events_rx = backend.subscribe();
        backend.stop();
        assert_eq!(events_rx.recv().await.unwrap(), CaptureEvent::Stopped);
    }
}
