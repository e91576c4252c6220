use motion_camera_core::usb::descriptor_utils::{uncompressed_frame_sizes, Descriptors};
use motion_camera_core::usb::descriptors::*;

fn main() -> anyhow::Result<()> {
    println!("{:#?}", device_descriptor());

    for descriptor in Descriptors::new(&CONFIGURATION_BLOB) {
        match descriptor.descriptor_type() {
            CONFIGURATION_DESCRIPTOR_ID => {
                let config: ConfigDescriptor = descriptor.try_into()?;
                println!("{:#?}", config);
            }
            INTERFACE_DESCRIPTOR_ID => {
                let interface: InterfaceDescriptor = descriptor.try_into()?;
                println!("{:#?}", interface);
            }
            ENDPOINT_DESCRIPTOR_ID => {
                let endpoint: EndpointDescriptor = descriptor.try_into()?;
                println!("{:#?}", endpoint);
                println!("  {:?}, max payload {} bytes", endpoint.transfer_type(), endpoint.max_payload());
            }
            descriptor_type => {
                let hex: Vec<String> = descriptor.bytes().iter().map(|b| format!("{:02X}", b)).collect();
                println!(
                    "Descriptor type {:#04x} subtype {:#04x}: {}",
                    descriptor_type,
                    descriptor.subtype().unwrap_or(0),
                    hex.join(" ")
                );
            }
        }
    }

    println!("Uncompressed frames:");
    for (frame_index, size) in uncompressed_frame_sizes(&CONFIGURATION_BLOB) {
        println!("  {}: {}", frame_index, size);
    }
    Ok(())
}
