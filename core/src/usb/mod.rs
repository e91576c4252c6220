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

pub mod descriptors;
pub mod descriptor_utils;
pub mod requests;

pub mod errors;

/// `[vid:pid iface]` prefix used by every device-facing log line.
pub(crate) fn log_prefix(interface: u8) -> String {
    format!(
        "[{:04x}:{:04x} {}]",
        descriptors::CAMERA_VENDOR_ID,
        descriptors::CAMERA_PRODUCT_ID,
        interface
    )
}
