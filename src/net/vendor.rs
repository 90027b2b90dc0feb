//! MAC-prefix manufacturer classification.
//!
//! Built-in OUI (first three octets) table with config-supplied overrides.
//! Locally-administered addresses are reported as randomized instead of
//! being looked up.

use std::collections::HashMap;

/// Built-in OUI prefix table. Small on purpose: home networks are dominated
/// by a handful of manufacturers, and `extra_vendors` in the config covers
/// the rest.
const BUILTIN_OUI: &[(&str, &str)] = &[
    ("00:00:5E", "IANA"),
    ("00:17:F2", "Apple, Inc."),
    ("00:1C:B3", "Apple, Inc."),
    ("00:26:BB", "Apple, Inc."),
    ("A4:83:E7", "Apple, Inc."),
    ("F0:18:98", "Apple, Inc."),
    ("AC:BC:32", "Apple, Inc."),
    ("00:1A:11", "Google, Inc."),
    ("F4:F5:D8", "Google, Inc."),
    ("D8:27:27", "Samsung Electronics Co.,Ltd"),
    ("8C:77:12", "Samsung Electronics Co.,Ltd"),
    ("B8:27:EB", "Raspberry Pi Foundation"),
    ("DC:A6:32", "Raspberry Pi Trading Ltd"),
    ("00:0C:29", "VMware, Inc."),
    ("00:50:56", "VMware, Inc."),
    ("00:0F:FE", "Intel Corporate"),
    ("00:15:5D", "Microsoft Corporation"),
    ("00:18:8B", "Microsoft Corporation"),
    ("00:00:0C", "Cisco Systems, Inc"),
    ("00:01:42", "Cisco Systems, Inc"),
    ("FC:EC:DA", "Ubiquiti Networks Inc."),
    ("74:AC:B9", "Ubiquiti Networks Inc."),
    ("A0:21:B7", "NETGEAR"),
    ("50:C7:BF", "TP-LINK TECHNOLOGIES CO.,LTD."),
    ("B0:BE:76", "TP-LINK TECHNOLOGIES CO.,LTD."),
    ("5C:AA:FD", "Sonos, Inc."),
    ("44:65:0D", "Amazon Technologies Inc."),
    ("FC:65:DE", "Amazon Technologies Inc."),
    ("EC:71:DB", "Reolink Innovation Limited"),
    ("00:04:4B", "NVIDIA"),
];

/// Vendor lookup result with randomization detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInfo {
    pub manufacturer: Option<String>,
    pub is_randomized: bool,
}

/// Check if a MAC address is locally administered (randomized/virtual).
///
/// Bit 2 of the first octet:
/// - 0 = universally administered (real hardware)
/// - 1 = locally administered (virtual/randomized)
pub fn is_locally_administered(mac: &str) -> bool {
    first_octet(mac).is_some_and(|octet| octet & 0x02 != 0)
}

/// Check if a MAC address is multicast (low bit of the first octet).
pub fn is_multicast(mac: &str) -> bool {
    first_octet(mac).is_some_and(|octet| octet & 0x01 != 0)
}

/// Check if a MAC address is the broadcast address.
pub fn is_broadcast(mac: &str) -> bool {
    mac.eq_ignore_ascii_case("FF:FF:FF:FF:FF:FF")
}

fn first_octet(mac: &str) -> Option<u8> {
    let hex: String = mac
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(2)
        .collect();
    if hex.len() < 2 {
        return None;
    }
    u8::from_str_radix(&hex, 16).ok()
}

/// Look up the manufacturer for a normalized (uppercase, zero-padded) MAC.
/// `extra_vendors` entries override the built-in table for the same prefix.
pub fn lookup_vendor_info(mac: &str, extra_vendors: &HashMap<String, String>) -> VendorInfo {
    if is_locally_administered(mac) {
        return VendorInfo {
            manufacturer: Some("Private Device (Randomized MAC)".to_string()),
            is_randomized: true,
        };
    }

    let prefix = oui_prefix(mac);
    let manufacturer = extra_vendors
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(&prefix))
        .map(|(_, name)| name.clone())
        .or_else(|| {
            BUILTIN_OUI
                .iter()
                .find(|(known, _)| *known == prefix)
                .map(|(_, name)| (*name).to_string())
        });

    VendorInfo {
        manufacturer,
        is_randomized: false,
    }
}

/// First three octets of a normalized MAC (`A4:83:E7:xx:xx:xx` -> `A4:83:E7`).
fn oui_prefix(mac: &str) -> String {
    mac.split(':').take(3).collect::<Vec<_>>().join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locally_administered() {
        // Locally administered MACs (bit 2 set)
        assert!(is_locally_administered("5A:05:D7:51:07:81"));
        assert!(is_locally_administered("D2:81:C8:45:6B:71"));
        assert!(is_locally_administered("DE:B2:52:65:8C:55"));

        // Universally administered MACs (bit 2 not set)
        assert!(!is_locally_administered("34:4A:C3:22:6F:90"));
        assert!(!is_locally_administered("00:1C:B3:00:00:00"));
    }

    #[test]
    fn test_multicast_and_broadcast() {
        assert!(is_broadcast("FF:FF:FF:FF:FF:FF"));
        assert!(is_broadcast("ff:ff:ff:ff:ff:ff"));
        assert!(is_multicast("01:00:5E:00:00:FB"));
        assert!(!is_multicast("A4:83:E7:01:02:03"));
    }

    #[test]
    fn builtin_lookup_matches_oui_prefix() {
        let info = lookup_vendor_info("00:1C:B3:12:34:56", &HashMap::new());
        assert_eq!(info.manufacturer.as_deref(), Some("Apple, Inc."));
        assert!(!info.is_randomized);
    }

    #[test]
    fn unknown_prefix_has_no_manufacturer() {
        let info = lookup_vendor_info("10:20:30:40:50:60", &HashMap::new());
        assert_eq!(info.manufacturer, None);
    }

    #[test]
    fn randomized_mac_short_circuits_lookup() {
        let info = lookup_vendor_info("D2:81:C8:45:6B:71", &HashMap::new());
        assert!(info.is_randomized);
        assert_eq!(
            info.manufacturer.as_deref(),
            Some("Private Device (Randomized MAC)")
        );
    }

    #[test]
    fn extra_vendors_override_builtin() {
        let mut extra = HashMap::new();
        extra.insert("00:1c:b3".to_string(), "Fruit Stand".to_string());
        let info = lookup_vendor_info("00:1C:B3:12:34:56", &extra);
        assert_eq!(info.manufacturer.as_deref(), Some("Fruit Stand"));
    }
}
