//! Local-network device census from the ARP table.
//!
//! Single pass over `arp -a` output: parse the BSD/macOS line format,
//! normalize the MAC (macOS prints single-digit octets), drop broadcast and
//! multicast entries, then classify each device by OUI prefix. Unparsable
//! lines are skipped and counted, never fatal.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::CensusConfig;
use crate::net::vendor::{is_broadcast, is_multicast, lookup_vendor_info};
use crate::runner::ToolRunner;

/// `hostname (192.168.1.7) at a4:83:e7:1:2:c3 on en0 ...`
/// `(incomplete)` entries fail the MAC group and are skipped.
static ARP_LINE: OnceLock<Regex> = OnceLock::new();

fn arp_line_regex() -> &'static Regex {
    ARP_LINE.get_or_init(|| {
        Regex::new(
            r"^(\S+) \((\d{1,3}(?:\.\d{1,3}){3})\) at ([0-9A-Fa-f]{1,2}(?::[0-9A-Fa-f]{1,2}){5}) on (\S+)",
        )
        .expect("ARP line regex is valid")
    })
}

/// One classified device from the ARP table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub ip: String,
    pub mac: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// True if the MAC is locally administered (randomized/virtual)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_randomized: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_gateway: bool,
    pub interface: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusReport {
    pub timestamp: String,
    pub total: usize,
    /// Devices with a manufacturer match (randomized MACs count).
    pub identified: usize,
    pub skipped_lines: usize,
    /// Devices per interface.
    pub interfaces: BTreeMap<String, usize>,
    pub devices: Vec<DeviceRecord>,
}

impl CensusReport {
    /// One-sentence summary for speech and the boot notification.
    pub fn summary_line(&self) -> String {
        format!(
            "Device census complete. {} devices detected on the local network, {} identified by manufacturer.",
            self.total, self.identified
        )
    }
}

/// Run `arp -a` and classify the result.
pub async fn run_census(
    runner: &Arc<dyn ToolRunner>,
    census: &CensusConfig,
) -> Result<CensusReport> {
    let output = runner.run("arp", &["-a".to_string()]).await?;
    if !output.success {
        anyhow::bail!("arp -a exited with an error: {}", output.stderr.trim());
    }
    Ok(build_census_report(&output.stdout, census))
}

/// Pure classification pass over captured `arp -a` stdout.
pub fn build_census_report(stdout: &str, census: &CensusConfig) -> CensusReport {
    let mut devices = Vec::new();
    let mut skipped_lines = 0;

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(captures) = arp_line_regex().captures(line) else {
            skipped_lines += 1;
            crate::log_debug!("Skipping unparsable ARP line: {}", line);
            continue;
        };

        let hostname = match &captures[1] {
            "?" => None,
            name => Some(name.to_string()),
        };
        let ip = captures[2].to_string();
        let mac = normalize_mac(&captures[3]);
        let interface = captures[4].to_string();

        if is_broadcast(&mac) || is_multicast(&mac) {
            continue;
        }

        let vendor = lookup_vendor_info(&mac, &census.extra_vendors);
        let is_gateway = ip
            .parse::<Ipv4Addr>()
            .is_ok_and(|addr| addr.octets()[3] == 1);

        devices.push(DeviceRecord {
            ip,
            mac,
            hostname,
            manufacturer: vendor.manufacturer,
            is_randomized: vendor.is_randomized,
            is_gateway,
            interface,
        });
    }

    devices.sort_by(|a, b| {
        let ip_a: Ipv4Addr = a.ip.parse().unwrap_or(Ipv4Addr::UNSPECIFIED);
        let ip_b: Ipv4Addr = b.ip.parse().unwrap_or(Ipv4Addr::UNSPECIFIED);
        ip_a.cmp(&ip_b)
    });

    let mut interfaces: BTreeMap<String, usize> = BTreeMap::new();
    for device in &devices {
        *interfaces.entry(device.interface.clone()).or_insert(0) += 1;
    }

    let identified = devices
        .iter()
        .filter(|d| d.manufacturer.is_some())
        .count();

    CensusReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        total: devices.len(),
        identified,
        skipped_lines,
        interfaces,
        devices,
    }
}

/// Zero-pad and uppercase each octet: `a4:83:e7:1:2:c3` -> `A4:83:E7:01:02:C3`.
fn normalize_mac(raw: &str) -> String {
    raw.split(':')
        .map(|octet| format!("{:0>2}", octet.to_ascii_uppercase()))
        .collect::<Vec<_>>()
        .join(":")
}
