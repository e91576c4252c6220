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

use std::mem::size_of;
use nusb::transfer::EndpointType;

pub const DEVICE_DESCRIPTOR_ID: u8 = 0x01;
pub const CONFIGURATION_DESCRIPTOR_ID: u8 = 0x02;
pub const INTERFACE_DESCRIPTOR_ID: u8 = 0x04;
pub const ENDPOINT_DESCRIPTOR_ID: u8 = 0x05;
pub const CS_INTERFACE_DESCRIPTOR_ID: u8 = 0x24;

pub const VS_FORMAT_UNCOMPRESSED: u8 = 0x04;
pub const VS_FRAME_UNCOMPRESSED: u8 = 0x05;

pub const VIDEO_CLASS: u8 = 0x0E;
pub const VIDEO_CONTROL_SUBCLASS: u8 = 0x01;
pub const VIDEO_STREAMING_SUBCLASS: u8 = 0x02;

pub const CAMERA_VENDOR_ID: u16 = 0x057E;
pub const CAMERA_PRODUCT_ID: u16 = 0x030A;

#[repr(C, packed)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct DeviceDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bcdUSB: u16,
    pub bDeviceClass: u8,
    pub bDeviceSubClass: u8,
    pub bDeviceProtocol: u8,
    pub bMaxPacketSize0: u8,
    pub idVendor: u16,
    pub idProduct: u16,
    pub bcdDevice: u16,
    pub iManufacturer: u8,
    pub iProduct: u8,
    pub iSerialNumber: u8,
    pub bNumConfigurations: u8,
}

#[repr(C, packed)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct ConfigDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub wTotalLength: u16,
    pub bNumInterfaces: u8,
    pub bConfigurationValue: u8,
    pub iConfiguration: u8,
    pub bmAttributes: u8,
    pub MaxPower: u8,
}

#[repr(C, packed)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct InterfaceDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bInterfaceNumber: u8,
    pub bAlternateSetting: u8,
    pub bNumEndpoints: u8,
    pub bInterfaceClass: u8,
    pub bInterfaceSubClass: u8,
    pub bInterfaceProtocol: u8,
    pub iInterface: u8,
}

#[repr(C, packed)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct EndpointDescriptor {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bEndpointAddress: u8,
    pub bmAttributes: u8,
    pub wMaxPacketSize: u16,
    pub bInterval: u8,
}

pub const DEVICE_DESCRIPTOR_SIZE: usize = size_of::<DeviceDescriptor>();
pub const CONFIG_DESCRIPTOR_SIZE: usize = size_of::<ConfigDescriptor>();
pub const INTERFACE_DESCRIPTOR_SIZE: usize = size_of::<InterfaceDescriptor>();
pub const ENDPOINT_DESCRIPTOR_SIZE: usize = size_of::<EndpointDescriptor>();

impl DeviceDescriptor {
    pub fn to_bytes(&self) -> [u8; DEVICE_DESCRIPTOR_SIZE] {
        let bcd_usb = self.bcdUSB.to_le_bytes();
        let vendor = self.idVendor.to_le_bytes();
        let product = self.idProduct.to_le_bytes();
        let bcd_device = self.bcdDevice.to_le_bytes();
        [
            self.bLength, self.bDescriptorType, bcd_usb[0], bcd_usb[1],
            self.bDeviceClass, self.bDeviceSubClass, self.bDeviceProtocol, self.bMaxPacketSize0,
            vendor[0], vendor[1], product[0], product[1], bcd_device[0], bcd_device[1],
            self.iManufacturer, self.iProduct, self.iSerialNumber, self.bNumConfigurations,
        ]
    }
}

impl ConfigDescriptor {
    pub fn to_bytes(&self) -> [u8; CONFIG_DESCRIPTOR_SIZE] {
        let total_length = self.wTotalLength.to_le_bytes();
        [
            self.bLength, self.bDescriptorType, total_length[0], total_length[1], self.bNumInterfaces,
            self.bConfigurationValue, self.iConfiguration, self.bmAttributes, self.MaxPower,
        ]
    }
}

impl InterfaceDescriptor {
    pub fn to_bytes(&self) -> [u8; INTERFACE_DESCRIPTOR_SIZE] {
        [
            self.bLength, self.bDescriptorType, self.bInterfaceNumber, self.bAlternateSetting,
            self.bNumEndpoints, self.bInterfaceClass, self.bInterfaceSubClass, self.bInterfaceProtocol,
            self.iInterface,
        ]
    }
}

impl EndpointDescriptor {
    pub fn to_bytes(&self) -> [u8; ENDPOINT_DESCRIPTOR_SIZE] {
        let max_packet_size = self.wMaxPacketSize.to_le_bytes();
        [
            self.bLength, self.bDescriptorType, self.bEndpointAddress, self.bmAttributes,
            max_packet_size[0], max_packet_size[1], self.bInterval,
        ]
    }

    pub fn transfer_type(&self) -> EndpointType {
        match self.bmAttributes & 0x03 {
            0 => EndpointType::Control,
            1 => EndpointType::Isochronous,
            2 => EndpointType::Bulk,
            _ => EndpointType::Interrupt,
        }
    }

    /// Bytes per (micro)frame, including high-bandwidth additional transactions.
    pub fn max_payload(&self) -> usize {
        let max_packet_size = self.wMaxPacketSize;
        let base = (max_packet_size & 0x07FF) as usize;
        let transactions = 1 + ((max_packet_size >> 11) & 0x03) as usize;
        base * transactions
    }
}

pub const DEVICE_DESCRIPTOR: DeviceDescriptor = DeviceDescriptor {
    bLength: DEVICE_DESCRIPTOR_SIZE as u8,
    bDescriptorType: DEVICE_DESCRIPTOR_ID,
    bcdUSB: 0x0200,
    bDeviceClass: 0xEF,
    bDeviceSubClass: 0x02,
    bDeviceProtocol: 0x01,
    bMaxPacketSize0: 0x40,
    idVendor: CAMERA_VENDOR_ID,
    idProduct: CAMERA_PRODUCT_ID,
    bcdDevice: 0x0924,
    iManufacturer: 0x30,
    iProduct: 0x60,
    iSerialNumber: 0x00,
    bNumConfigurations: 0x01,
};

pub const CONFIG_DESCRIPTOR: ConfigDescriptor = ConfigDescriptor {
    bLength: CONFIG_DESCRIPTOR_SIZE as u8,
    bDescriptorType: CONFIGURATION_DESCRIPTOR_ID,
    wTotalLength: CONFIGURATION_BLOB.len() as u16,
    bNumInterfaces: 0x02,
    bConfigurationValue: 0x01,
    iConfiguration: 0x30,
    bmAttributes: 0x80,
    MaxPower: 0xFA,
};

const fn interface(number: u8, alt_setting: u8) -> InterfaceDescriptor {
    let control = number == 0;
    InterfaceDescriptor {
        bLength: INTERFACE_DESCRIPTOR_SIZE as u8,
        bDescriptorType: INTERFACE_DESCRIPTOR_ID,
        bInterfaceNumber: number,
        bAlternateSetting: alt_setting,
        bNumEndpoints: if control || alt_setting > 0 { 1 } else { 0 },
        bInterfaceClass: VIDEO_CLASS,
        bInterfaceSubClass: if control { VIDEO_CONTROL_SUBCLASS } else { VIDEO_STREAMING_SUBCLASS },
        bInterfaceProtocol: 0x00,
        iInterface: if control { 0x60 } else { 0x00 },
    }
}

/// Video control interface followed by the seven streaming alternate settings.
pub const INTERFACE_DESCRIPTORS: [InterfaceDescriptor; 8] = [
    interface(0, 0),
    interface(1, 0),
    interface(1, 1),
    interface(1, 2),
    interface(1, 3),
    interface(1, 4),
    interface(1, 5),
    interface(1, 6),
];

const fn streaming_endpoint(max_packet_size: u16) -> EndpointDescriptor {
    EndpointDescriptor {
        bLength: ENDPOINT_DESCRIPTOR_SIZE as u8,
        bDescriptorType: ENDPOINT_DESCRIPTOR_ID,
        bEndpointAddress: STREAMING_ENDPOINT_ADDRESS,
        bmAttributes: 0x05,
        wMaxPacketSize: max_packet_size,
        bInterval: 0x01,
    }
}

pub const INTERRUPT_ENDPOINT_ADDRESS: u8 = 0x82;
pub const STREAMING_ENDPOINT_ADDRESS: u8 = 0x81;

/// Interrupt endpoint of the control interface, then one isochronous endpoint per bandwidth tier;
/// entry `k` belongs to streaming alternate setting `k`.
pub const ENDPOINT_DESCRIPTORS: [EndpointDescriptor; 7] = [
    EndpointDescriptor {
        bLength: ENDPOINT_DESCRIPTOR_SIZE as u8,
        bDescriptorType: ENDPOINT_DESCRIPTOR_ID,
        bEndpointAddress: INTERRUPT_ENDPOINT_ADDRESS,
        bmAttributes: 0x03,
        wMaxPacketSize: 0x0010,
        bInterval: 0x06,
    },
    streaming_endpoint(0x0A60),
    streaming_endpoint(0x0B00),
    streaming_endpoint(0x0B20),
    streaming_endpoint(0x1300),
    streaming_endpoint(0x1320),
    streaming_endpoint(0x13FC),
];

/// Full configuration descriptor set, returned verbatim for configuration reads. The bmControls of the
/// camera terminal and processing unit are zeroed so hosts do not probe controls the camera ignores.
#[rustfmt::skip]
pub const CONFIGURATION_BLOB: [u8; 777] = [
    0x09, 0x02, 0x09, 0x03, 0x02, 0x01, 0x30, 0x80, 0xFA,
    0x08, 0x0B, 0x00, 0x02, 0x0E, 0x03, 0x00, 0x60,
    0x09, 0x04, 0x00, 0x00, 0x01, 0x0E, 0x01, 0x00, 0x60,
    0x0D, 0x24, 0x01, 0x00, 0x01, 0x4D, 0x00, 0xC0, 0xE1, 0xE4, 0x00, 0x01, 0x01,
    0x09, 0x24, 0x03, 0x02, 0x01, 0x01, 0x00, 0x04, 0x00,
    0x1A, 0x24, 0x06, 0x04, 0xF0, 0x77, 0x35, 0xD1, 0x89, 0x8D, 0x00, 0x47, 0x81, 0x2E, 0x7D, 0xD5,
    0xE2, 0xFD, 0xB8, 0x98, 0x08, 0x01, 0x03, 0x01, 0xFF, 0x00,
    0x12, 0x24, 0x02, 0x01, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x00,
    0x00, 0x00,
    0x0B, 0x24, 0x05, 0x03, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
    0x07, 0x05, 0x82, 0x03, 0x10, 0x00, 0x06,
    0x05, 0x25, 0x03, 0x10, 0x00,
    0x09, 0x04, 0x01, 0x00, 0x00, 0x0E, 0x02, 0x00, 0x00,
    0x0F, 0x24, 0x01, 0x02, 0x2D, 0x02, 0x81, 0x00, 0x02, 0x02, 0x01, 0x00, 0x01, 0x00, 0x00,
    0x0B, 0x24, 0x06, 0x01, 0x05, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x26, 0x24, 0x07, 0x01, 0x00, 0x80, 0x02, 0xE0, 0x01, 0x00, 0xF4, 0x01, 0x00, 0x00, 0xC0, 0xA8,
    0x00, 0x00, 0x08, 0x07, 0x00, 0x15, 0x16, 0x05, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x76, 0x96,
    0x98, 0x00, 0x15, 0x16, 0x05, 0x00,
    0x26, 0x24, 0x07, 0x02, 0x00, 0x40, 0x01, 0xF0, 0x00, 0x00, 0xF4, 0x01, 0x00, 0x00, 0x30, 0x2A,
    0x00, 0x00, 0xC2, 0x01, 0x00, 0x15, 0x16, 0x05, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x76, 0x96,
    0x98, 0x00, 0x15, 0x16, 0x05, 0x00,
    0x26, 0x24, 0x07, 0x03, 0x00, 0xA0, 0x00, 0x78, 0x00, 0x00, 0xF4, 0x01, 0x00, 0x00, 0x8C, 0x0A,
    0x00, 0x80, 0x70, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x76, 0x96,
    0x98, 0x00, 0x15, 0x16, 0x05, 0x00,
    0x26, 0x24, 0x07, 0x04, 0x00, 0xB0, 0x00, 0x90, 0x00, 0x00, 0xF4, 0x01, 0x00, 0x00, 0xEC, 0x0D,
    0x00, 0x80, 0x94, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x76, 0x96,
    0x98, 0x00, 0x15, 0x16, 0x05, 0x00,
    0x26, 0x24, 0x07, 0x05, 0x00, 0x60, 0x01, 0x20, 0x01, 0x00, 0xF4, 0x01, 0x00, 0x00, 0xB0, 0x37,
    0x00, 0x00, 0x52, 0x02, 0x00, 0x15, 0x16, 0x05, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x76, 0x96,
    0x98, 0x00, 0x15, 0x16, 0x05, 0x00,
    0x1A, 0x24, 0x03, 0x00, 0x05, 0x80, 0x02, 0xE0, 0x01, 0x40, 0x01, 0xF0, 0x00, 0xA0, 0x00, 0x78,
    0x00, 0xB0, 0x00, 0x90, 0x00, 0x60, 0x01, 0x20, 0x01, 0x00,
    0x06, 0x24, 0x0D, 0x01, 0x01, 0x04,
    0x1B, 0x24, 0x04, 0x02, 0x05, 0x59, 0x55, 0x59, 0x32, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00,
    0xAA, 0x00, 0x38, 0x9B, 0x71, 0x10, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x32, 0x24, 0x05, 0x01, 0x00, 0x80, 0x02, 0xE0, 0x01, 0x00, 0x60, 0x09, 0x00, 0x00, 0x40, 0x19,
    0x01, 0x00, 0x60, 0x09, 0x00, 0x15, 0x16, 0x05, 0x00, 0x06, 0x15, 0x16, 0x05, 0x00, 0x20, 0xA1,
    0x07, 0x00, 0x2A, 0x2C, 0x0A, 0x00, 0x40, 0x42, 0x0F, 0x00, 0x80, 0x84, 0x1E, 0x00, 0x80, 0x96,
    0x98, 0x00,
    0x32, 0x24, 0x05, 0x02, 0x00, 0x40, 0x01, 0xF0, 0x00, 0x00, 0x58, 0x02, 0x00, 0x00, 0x50, 0x46,
    0x00, 0x00, 0x58, 0x02, 0x00, 0x15, 0x16, 0x05, 0x00, 0x06, 0x15, 0x16, 0x05, 0x00, 0x20, 0xA1,
    0x07, 0x00, 0x2A, 0x2C, 0x0A, 0x00, 0x40, 0x42, 0x0F, 0x00, 0x80, 0x84, 0x0F, 0x00, 0x80, 0x96,
    0x98, 0x00,
    0x32, 0x24, 0x05, 0x03, 0x00, 0xA0, 0x00, 0x78, 0x00, 0x00, 0x96, 0x00, 0x00, 0x00, 0x94, 0x11,
    0x00, 0x00, 0x96, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x06, 0x15, 0x16, 0x05, 0x00, 0x20, 0xA1,
    0x07, 0x00, 0x2A, 0x2C, 0x0A, 0x00, 0x40, 0x42, 0x0F, 0x00, 0x80, 0x84, 0x0F, 0x00, 0x80, 0x96,
    0x98, 0x00,
    0x32, 0x24, 0x05, 0x04, 0x00, 0xB0, 0x00, 0x90, 0x00, 0x00, 0xC6, 0x00, 0x00, 0x00, 0x34, 0x17,
    0x00, 0x00, 0xC6, 0x00, 0x00, 0x15, 0x16, 0x05, 0x00, 0x06, 0x15, 0x16, 0x05, 0x00, 0x20, 0xA1,
    0x07, 0x00, 0x2A, 0x2C, 0x0A, 0x00, 0x40, 0x42, 0x0F, 0x00, 0x80, 0x84, 0x0F, 0x00, 0x80, 0x96,
    0x98, 0x00,
    0x32, 0x24, 0x05, 0x05, 0x00, 0x60, 0x01, 0x20, 0x01, 0x00, 0x18, 0x03, 0x00, 0x00, 0xD0, 0x5C,
    0x00, 0x00, 0x18, 0x03, 0x00, 0x15, 0x16, 0x05, 0x00, 0x06, 0x15, 0x16, 0x05, 0x00, 0x20, 0xA1,
    0x07, 0x00, 0x2A, 0x2C, 0x0A, 0x00, 0x40, 0x42, 0x0F, 0x00, 0x80, 0x84, 0x0F, 0x00, 0x80, 0x96,
    0x98, 0x00,
    0x1A, 0x24, 0x03, 0x00, 0x05, 0x80, 0x02, 0xE0, 0x01, 0x40, 0x01, 0xF0, 0x00, 0xA0, 0x00, 0x78,
    0x00, 0xB0, 0x00, 0x90, 0x00, 0x60, 0x01, 0x20, 0x01, 0x00,
    0x06, 0x24, 0x0D, 0x01, 0x01, 0x04,
    0x09, 0x04, 0x01, 0x01, 0x01, 0x0E, 0x02, 0x00, 0x00,
    0x07, 0x05, 0x81, 0x05, 0x60, 0x0A, 0x01,
    0x09, 0x04, 0x01, 0x02, 0x01, 0x0E, 0x02, 0x00, 0x00,
    0x07, 0x05, 0x81, 0x05, 0x00, 0x0B, 0x01,
    0x09, 0x04, 0x01, 0x03, 0x01, 0x0E, 0x02, 0x00, 0x00,
    0x07, 0x05, 0x81, 0x05, 0x20, 0x0B, 0x01,
    0x09, 0x04, 0x01, 0x04, 0x01, 0x0E, 0x02, 0x00, 0x00,
    0x07, 0x05, 0x81, 0x05, 0x00, 0x13, 0x01,
    0x09, 0x04, 0x01, 0x05, 0x01, 0x0E, 0x02, 0x00, 0x00,
    0x07, 0x05, 0x81, 0x05, 0x20, 0x13, 0x01,
    0x09, 0x04, 0x01, 0x06, 0x01, 0x0E, 0x02, 0x00, 0x00,
    0x07, 0x05, 0x81, 0x05, 0xFC, 0x13, 0x01,
];

pub fn device_descriptor() -> DeviceDescriptor {
    DEVICE_DESCRIPTOR
}

pub fn configurations() -> Vec<ConfigDescriptor> {
    vec![CONFIG_DESCRIPTOR]
}

/// Interfaces of the configuration at `config` (0-based index, the camera has exactly one).
pub fn interfaces(config: u8) -> Vec<InterfaceDescriptor> {
    if config != 0 {
        return Vec::new();
    }
    INTERFACE_DESCRIPTORS.to_vec()
}

/// Endpoints of one alternate setting. The streaming interface has none at alternate setting 0.
pub fn endpoints(config: u8, interface: u8, alt_setting: u8) -> Vec<EndpointDescriptor> {
    if config != 0 {
        return Vec::new();
    }
    match (interface, alt_setting) {
        (0, _) => vec![ENDPOINT_DESCRIPTORS[0]],
        (1, 0) => Vec::new(),
        (1, alt_setting) => ENDPOINT_DESCRIPTORS
            .get(alt_setting as usize)
            .copied()
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn structured_descriptors_match_wire_sizes() {
        assert_eq!(DEVICE_DESCRIPTOR_SIZE, 18);
        assert_eq!(CONFIG_DESCRIPTOR_SIZE, 9);
        assert_eq!(INTERFACE_DESCRIPTOR_SIZE, 9);
        assert_eq!(ENDPOINT_DESCRIPTOR_SIZE, 7);
    }

    #[test]
    fn device_descriptor_serializes_little_endian() {
        let bytes = device_descriptor().to_bytes();
        assert_eq!(
            bytes,
            [0x12, 0x01, 0x00, 0x02, 0xEF, 0x02, 0x01, 0x40, 0x7E, 0x05, 0x0A, 0x03, 0x24, 0x09, 0x30, 0x60,
                0x00, 0x01]
        );
    }

    #[test]
    fn configuration_blob_starts_with_the_structured_config_descriptor() {
        assert_eq!({ CONFIG_DESCRIPTOR.wTotalLength }, 0x0309);
        assert_eq!(&CONFIGURATION_BLOB[..CONFIG_DESCRIPTOR_SIZE], &CONFIG_DESCRIPTOR.to_bytes());
    }

    #[test]
    fn every_interface_and_endpoint_is_present_in_the_configuration_blob() {
        for interface in INTERFACE_DESCRIPTORS {
            assert!(contains(&CONFIGURATION_BLOB, &interface.to_bytes()), "{:?}", interface);
        }
        for endpoint in ENDPOINT_DESCRIPTORS {
            assert!(contains(&CONFIGURATION_BLOB, &endpoint.to_bytes()), "{:?}", endpoint);
        }
    }

    #[test]
    fn control_interface_always_has_its_interrupt_endpoint() {
        for alt_setting in 0..=u8::MAX {
            let endpoints = endpoints(0, 0, alt_setting);
            assert_eq!(endpoints.len(), 1);
            assert_eq!(endpoints[0].bEndpointAddress, INTERRUPT_ENDPOINT_ADDRESS);
            assert_eq!(endpoints[0].transfer_type(), EndpointType::Interrupt);
        }
    }

    #[test]
    fn streaming_alt_setting_zero_has_no_endpoints() {
        assert!(endpoints(0, 1, 0).is_empty());
    }

    #[test]
    fn streaming_alt_settings_select_their_bandwidth_tier() {
        let expected = [0x0A60u16, 0x0B00, 0x0B20, 0x1300, 0x1320, 0x13FC];
        for (position, max_packet_size) in expected.iter().enumerate() {
            let endpoints = endpoints(0, 1, position as u8 + 1);
            assert_eq!(endpoints.len(), 1);
            assert_eq!({ endpoints[0].wMaxPacketSize }, *max_packet_size);
            assert_eq!(endpoints[0].bEndpointAddress, STREAMING_ENDPOINT_ADDRESS);
            assert_eq!(endpoints[0].transfer_type(), EndpointType::Isochronous);
        }
        assert!(endpoints(0, 1, 7).is_empty());
    }

    #[test]
    fn unknown_configuration_or_interface_yields_nothing() {
        assert!(interfaces(1).is_empty());
        assert!(endpoints(1, 0, 0).is_empty());
        assert!(endpoints(0, 2, 1).is_empty());
        assert_eq!(interfaces(0).len(), 8);
    }

    #[test]
    fn max_payload_accounts_for_additional_transactions() {
        assert_eq!(ENDPOINT_DESCRIPTORS[1].max_payload(), 0x260 * 2);
        assert_eq!(ENDPOINT_DESCRIPTORS[6].max_payload(), 0x3FC * 3);
        assert_eq!(ENDPOINT_DESCRIPTORS[0].max_payload(), 0x10);
    }
}
