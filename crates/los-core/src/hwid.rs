//! Hardware identifier used to key per-device settings in `los.json`.
//!
//! The identifier is the MAC address of the first non-loopback interface
//! (interfaces sorted by name) rendered as upper-case hex with no separators
//! and no leading zeros, e.g. `B827EB123456`.

use std::path::Path;

use crate::error::Result;

pub fn hardware_id(sys_class_net: &Path) -> Result<Option<String>> {
    let mut names: Vec<String> = std::fs::read_dir(sys_class_net)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "lo")
        .collect();
    names.sort();

    for name in names {
        let Ok(text) = std::fs::read_to_string(sys_class_net.join(&name).join("address")) else {
            continue;
        };
        if let Some(node) = parse_mac(text.trim()) {
            if node != 0 {
                return Ok(Some(format!("{node:X}")));
            }
        }
    }
    Ok(None)
}

fn parse_mac(text: &str) -> Option<u64> {
    let octets: Vec<&str> = text.split(':').collect();
    if octets.len() != 6 {
        return None;
    }
    octets.iter().try_fold(0u64, |acc, octet| {
        u8::from_str_radix(octet, 16)
            .ok()
            .map(|b| (acc << 8) | u64::from(b))
    })
}
