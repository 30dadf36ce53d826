// # Local Interface Address Source
//
// AddressSource implementation that derives the host's public addresses
// from the locally configured network interfaces.
//
// ## Algorithm
//
// Enumerate every address bound to every interface, discard anything in a
// bogon range (loopback, link-local, private/reserved/documentation
// prefixes), and record each survivor into the slot for its family. When
// several public addresses of the same family are bound, the last one
// enumerated wins — there is no interface preference order.
//
// ## Platform Support
//
// `if-addrs` backs the enumeration, so this works on Linux, macOS and
// Windows alike. No netlink subscription and no polling task is involved;
// the engine simply calls `detect()` once per tick.

use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;

use zonedrift_core::Result;
use zonedrift_core::traits::{AddressSource, DetectedAddress};

mod bogon;

pub use bogon::is_bogon;

/// Local-interface address source
#[derive(Debug, Clone, Default)]
pub struct LocalAddressSource {
    /// Restrict detection to one interface by name (e.g. "eth0")
    interface: Option<String>,
}

impl LocalAddressSource {
    /// Detect across all interfaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect on a single named interface only
    pub fn with_interface(name: impl Into<String>) -> Self {
        Self {
            interface: Some(name.into()),
        }
    }
}

#[async_trait]
impl AddressSource for LocalAddressSource {
    async fn detect(&self) -> Result<DetectedAddress> {
        let interfaces = if_addrs::get_if_addrs()?;
        let addrs = interfaces
            .into_iter()
            .filter(|iface| {
                self.interface
                    .as_deref()
                    .is_none_or(|name| iface.name == name)
            })
            .map(|iface| iface.ip());
        Ok(classify(addrs))
    }

    fn source_name(&self) -> &'static str {
        "local-interfaces"
    }
}

/// Fold raw interface addresses into a `DetectedAddress`
///
/// Bogons are discarded. For multiple survivors of one family, the last
/// enumerated address wins.
fn classify(addrs: impl IntoIterator<Item = IpAddr>) -> DetectedAddress {
    let mut detected = DetectedAddress::default();
    for ip in addrs {
        if is_bogon(ip) {
            debug!(%ip, "discarding non-routable address");
            continue;
        }
        match ip {
            IpAddr::V4(v4) => detected.ipv4 = Some(v4),
            IpAddr::V6(v6) => detected.ipv6 = Some(v6),
        }
    }
    detected
}
