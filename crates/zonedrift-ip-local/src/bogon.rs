//! Bogon classification
//!
//! A bogon is an address from a reserved, private, or otherwise
//! non-globally-routable range. The prefix tables mirror the standard
//! bogon lists: RFC 1918 private space, RFC 6598 shared space,
//! loopback, link-local, documentation, benchmarking, multicast and
//! reserved ranges for IPv4; the equivalent special-purpose ranges plus
//! unique-local and site-local space for IPv6.

use ipnet::IpNet;
use std::net::IpAddr;
use std::sync::OnceLock;

const BOGON_PREFIXES: &[&str] = &[
    // IPv4
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.168.0.0/16",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/4",
    "240.0.0.0/4",
    // IPv6
    "::/96",
    "::ffff:0:0/96",
    "100::/64",
    "2001:10::/28",
    "2001:db8::/32",
    "fc00::/7",
    "fe80::/10",
    "fec0::/10",
    "ff00::/8",
];

fn bogon_nets() -> &'static [IpNet] {
    static NETS: OnceLock<Vec<IpNet>> = OnceLock::new();
    NETS.get_or_init(|| {
        BOGON_PREFIXES
            .iter()
            .map(|prefix| {
                prefix
                    .parse()
                    .expect("hard-coded bogon prefix must be a valid CIDR literal")
            })
            .collect()
    })
}

/// True when `ip` falls into a non-globally-routable range
pub fn is_bogon(ip: IpAddr) -> bool {
    bogon_nets().iter().any(|net| net.contains(&ip))
}
