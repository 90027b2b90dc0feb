//! Internet connectivity probe.
//!
//! A single TCP connect to the configured probe target (DNS at 8.8.8.8:53
//! by default). Failure is a report, not an error: boot continues either
//! way.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub online: bool,
    pub target: String,
    pub elapsed_ms: u64,
    pub timestamp: String,
}

pub async fn check_connectivity(network: &NetworkConfig) -> ConnectivityReport {
    let target = format!("{}:{}", network.probe_host, network.probe_port);
    let timeout = Duration::from_secs(network.probe_timeout_secs);
    crate::log_debug!("Checking internet connection to {} ({:?})", target, timeout);

    let started = Instant::now();
    let online = matches!(
        tokio::time::timeout(timeout, tokio::net::TcpStream::connect(&target)).await,
        Ok(Ok(_))
    );
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if online {
        crate::log_stderr!("Internet connection check succeeded ({} ms)", elapsed_ms);
    } else {
        crate::log_warn!("Internet connection check failed for {}", target);
    }

    ConnectivityReport {
        online,
        target,
        elapsed_ms,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}
