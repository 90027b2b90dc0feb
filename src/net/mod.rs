//! Network checks: connectivity probe, public IP echo, local device census.

pub mod census;
pub mod connectivity;
pub mod public_ip;
pub mod vendor;

pub use census::{run_census, CensusReport, DeviceRecord};
pub use connectivity::{check_connectivity, ConnectivityReport};
pub use public_ip::fetch_public_ip;
pub use vendor::{is_locally_administered, lookup_vendor_info, VendorInfo};
