use log::warn;
use crate::definitions::ImageSize;
use crate::usb::descriptors::{
    ConfigDescriptor, EndpointDescriptor, InterfaceDescriptor, CONFIGURATION_DESCRIPTOR_ID,
    CONFIG_DESCRIPTOR_SIZE, CS_INTERFACE_DESCRIPTOR_ID, ENDPOINT_DESCRIPTOR_ID, ENDPOINT_DESCRIPTOR_SIZE,
    INTERFACE_DESCRIPTOR_ID, INTERFACE_DESCRIPTOR_SIZE, VS_FORMAT_UNCOMPRESSED, VS_FRAME_UNCOMPRESSED,
};
use crate::usb::errors::DescriptorError;

/// One `bLength`-delimited record of a descriptor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDescriptor<'a>(&'a [u8]);

impl<'a> RawDescriptor<'a> {
    pub fn descriptor_type(&self) -> u8 {
        self.0[1]
    }

    /// `bDescriptorSubtype` of class-specific descriptors.
    pub fn subtype(&self) -> Option<u8> {
        self.0.get(2).copied()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An iterator over a sequence of USB descriptors.
#[derive(Clone)]
pub struct Descriptors<'a>(&'a [u8]);

impl<'a> Descriptors<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self(data)
    }

    fn split_first(&self) -> Option<(&'a [u8], &'a [u8])> {
        if self.0.len() < 2 {
            return None;
        }

        if self.0[0] < 2 {
            warn!(
                "descriptor with bLength {} can't point to next descriptor",
                self.0[0]
            );
            return None;
        }

        if self.0[0] as usize > self.0.len() {
            warn!(
                "descriptor with bLength {} exceeds remaining buffer length {}",
                self.0[0],
                self.0.len()
            );
            return None;
        }

        Some(self.0.split_at(self.0[0] as usize))
    }
}

impl<'a> Iterator for Descriptors<'a> {
    type Item = RawDescriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (current, next) = self.split_first()?;
        self.0 = next;
        Some(RawDescriptor(current))
    }
}

fn check_header(value: &RawDescriptor<'_>, name: &'static str, expected_type: u8, expected_len: usize)
                -> Result<(), DescriptorError> {
    if value.len() < expected_len {
        return Err(DescriptorError::TooShort { name, expected: expected_len, actual: value.len() });
    }
    if value.descriptor_type() != expected_type {
        return Err(DescriptorError::WrongType { name, expected: expected_type, actual: value.descriptor_type() });
    }
    Ok(())
}

impl TryFrom<RawDescriptor<'_>> for ConfigDescriptor {
    type Error = DescriptorError;
    fn try_from(value: RawDescriptor<'_>) -> Result<Self, Self::Error> {
        check_header(&value, "configuration descriptor", CONFIGURATION_DESCRIPTOR_ID, CONFIG_DESCRIPTOR_SIZE)?;
        let b = value.bytes();
        Ok(ConfigDescriptor {
            bLength: b[0],
            bDescriptorType: b[1],
            wTotalLength: u16::from_le_bytes([b[2], b[3]]),
            bNumInterfaces: b[4],
            bConfigurationValue: b[5],
            iConfiguration: b[6],
            bmAttributes: b[7],
            MaxPower: b[8],
        })
    }
}

impl TryFrom<RawDescriptor<'_>> for InterfaceDescriptor {
    type Error = DescriptorError;
    fn try_from(value: RawDescriptor<'_>) -> Result<Self, Self::Error> {
        check_header(&value, "interface descriptor", INTERFACE_DESCRIPTOR_ID, INTERFACE_DESCRIPTOR_SIZE)?;
        let b = value.bytes();
        Ok(InterfaceDescriptor {
            bLength: b[0],
            bDescriptorType: b[1],
            bInterfaceNumber: b[2],
            bAlternateSetting: b[3],
            bNumEndpoints: b[4],
            bInterfaceClass: b[5],
            bInterfaceSubClass: b[6],
            bInterfaceProtocol: b[7],
            iInterface: b[8],
        })
    }
}

impl TryFrom<RawDescriptor<'_>> for EndpointDescriptor {
    type Error = DescriptorError;
    fn try_from(value: RawDescriptor<'_>) -> Result<Self, Self::Error> {
        check_header(&value, "endpoint descriptor", ENDPOINT_DESCRIPTOR_ID, ENDPOINT_DESCRIPTOR_SIZE)?;
        let b = value.bytes();
        Ok(EndpointDescriptor {
            bLength: b[0],
            bDescriptorType: b[1],
            bEndpointAddress: b[2],
            bmAttributes: b[3],
            wMaxPacketSize: u16::from_le_bytes([b[4], b[5]]),
            bInterval: b[6],
        })
    }
}

/// Standard interface and endpoint descriptors of a descriptor set, in order of appearance.
#[derive(Debug)]
pub enum StandardDescriptor {
    Config(ConfigDescriptor),
    Interface(InterfaceDescriptor),
    Endpoint(EndpointDescriptor),
}

pub fn parse_standard_descriptors(data: &[u8]) -> Result<Vec<StandardDescriptor>, DescriptorError> {
    let mut standard_descriptors = Vec::new();
    for descriptor in Descriptors::new(data) {
        match descriptor.descriptor_type() {
            CONFIGURATION_DESCRIPTOR_ID => standard_descriptors.push(StandardDescriptor::Config(descriptor.try_into()?)),
            INTERFACE_DESCRIPTOR_ID => standard_descriptors.push(StandardDescriptor::Interface(descriptor.try_into()?)),
            ENDPOINT_DESCRIPTOR_ID => standard_descriptors.push(StandardDescriptor::Endpoint(descriptor.try_into()?)),
            _ => {}
        }
    }
    Ok(standard_descriptors)
}

/// Frame sizes declared by the uncompressed (YUY2) format of a descriptor set, keyed by `bFrameIndex`.
pub fn uncompressed_frame_sizes(data: &[u8]) -> Vec<(u8, ImageSize)> {
    let mut in_uncompressed_format = false;
    let mut frame_sizes = Vec::new();
    for descriptor in Descriptors::new(data) {
        if descriptor.descriptor_type() != CS_INTERFACE_DESCRIPTOR_ID {
            continue;
        }
        match descriptor.subtype() {
            Some(VS_FORMAT_UNCOMPRESSED) => in_uncompressed_format = true,
            Some(VS_FRAME_UNCOMPRESSED) if in_uncompressed_format && descriptor.len() >= 9 => {
                let b = descriptor.bytes();
                let size = ImageSize::new(u16::from_le_bytes([b[5], b[6]]), u16::from_le_bytes([b[7], b[8]]));
                frame_sizes.push((b[3], size));
            }
            // any other format descriptor ends the frame list of the previous one
            Some(0x06) | Some(0x0C) | Some(0x10) => in_uncompressed_format = false,
            _ => {}
        }
    }
    frame_sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::SUPPORTED_SIZES;
    use crate::usb::descriptors::{CONFIGURATION_BLOB, CONFIG_DESCRIPTOR, ENDPOINT_DESCRIPTORS, INTERFACE_DESCRIPTORS};

    #[test]
    fn walking_the_configuration_blob_consumes_every_byte() {
        let total: usize = Descriptors::new(&CONFIGURATION_BLOB).map(|d| d.len()).sum();
        assert_eq!(total, CONFIGURATION_BLOB.len());
    }

    #[test]
    fn standard_descriptors_in_the_blob_match_the_catalog() {
        let parsed = parse_standard_descriptors(&CONFIGURATION_BLOB).unwrap();
        let mut interfaces = Vec::new();
        let mut endpoints = Vec::new();
        for descriptor in parsed {
            match descriptor {
                StandardDescriptor::Config(config) => assert_eq!(config, CONFIG_DESCRIPTOR),
                StandardDescriptor::Interface(interface) => interfaces.push(interface),
                StandardDescriptor::Endpoint(endpoint) => endpoints.push(endpoint),
            }
        }
        assert_eq!(interfaces, INTERFACE_DESCRIPTORS.to_vec());
        assert_eq!(endpoints, ENDPOINT_DESCRIPTORS.to_vec());
        assert_eq!(
            interfaces.iter().filter(|i| i.bAlternateSetting == 0).count(),
            CONFIG_DESCRIPTOR.bNumInterfaces as usize
        );
    }

    #[test]
    fn uncompressed_frames_match_the_resolution_table() {
        let frame_sizes = uncompressed_frame_sizes(&CONFIGURATION_BLOB);
        let expected: Vec<(u8, ImageSize)> = SUPPORTED_SIZES
            .iter()
            .enumerate()
            .map(|(position, size)| (position as u8 + 1, *size))
            .collect();
        assert_eq!(frame_sizes, expected);
    }

    #[test]
    fn truncated_descriptor_stops_the_walk() {
        let data = [0x09, 0x04, 0x00, 0x00, 0x07, 0x05];
        let descriptors: Vec<_> = Descriptors::new(&data).collect();
        assert!(descriptors.is_empty());
    }

    #[test]
    fn endpoint_parse_rejects_short_records() {
        let data = [0x05, 0x05, 0x81, 0x05, 0x00];
        let descriptor = Descriptors::new(&data).next().unwrap();
        let result: Result<EndpointDescriptor, _> = descriptor.try_into();
        assert_eq!(
            result,
            Err(DescriptorError::TooShort { name: "endpoint descriptor", expected: 7, actual: 5 })
        );
    }
}
