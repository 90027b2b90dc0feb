//! Public IP echo lookup.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::NetworkConfig;

/// Fetch the public address from the configured echo service and
/// sanity-check that the body actually parses as an IP.
pub async fn fetch_public_ip(network: &NetworkConfig) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(network.ip_echo_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let body = client
        .get(&network.ip_echo_url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", network.ip_echo_url))?
        .text()
        .await
        .context("Failed to read IP echo response body")?;

    let candidate = body.trim().to_string();
    candidate
        .parse::<IpAddr>()
        .with_context(|| format!("IP echo returned a non-address body: '{}'", candidate))?;

    crate::log_debug!("Fetched public IP: {}", candidate);
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    #[test]
    fn echo_bodies_validate_as_addresses() {
        assert!("203.0.113.7".trim().parse::<IpAddr>().is_ok());
        assert!("  2001:db8::1\n".trim().parse::<IpAddr>().is_ok());
        assert!("not an ip".trim().parse::<IpAddr>().is_err());
        assert!("<html>slow down</html>".trim().parse::<IpAddr>().is_err());
    }
}
