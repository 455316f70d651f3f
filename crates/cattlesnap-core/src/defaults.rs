//! Shared constants: well-known names, poll intervals and timeouts

use std::time::Duration;

/// Namespace holding provisioning clusters
pub const FLEET_NAMESPACE: &str = "fleet-default";

/// Name of the management (upstream) cluster
pub const LOCAL_CLUSTER_NAME: &str = "local";

/// State name reported by ready clusters and snapshots
pub const ACTIVE_STATE: &str = "active";

pub const ONE_MINUTE_TIMEOUT: Duration = Duration::from_secs(60);
pub const FIVE_MINUTE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const FIFTEEN_MINUTE_TIMEOUT: Duration = Duration::from_secs(15 * 60);
pub const THIRTY_MINUTE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub const HALF_SECOND_INTERVAL: Duration = Duration::from_millis(500);
pub const ONE_SECOND_INTERVAL: Duration = Duration::from_secs(1);
pub const FIVE_SECOND_INTERVAL: Duration = Duration::from_secs(5);
