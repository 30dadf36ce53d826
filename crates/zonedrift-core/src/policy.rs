//! Stack policy: is the detected address set sufficient for the
//! configured addressing mode?
//!
//! The check runs once per tick, before any host is processed. A missing
//! required address aborts the entire tick — there is no partial
//! reconciliation of the hosts whose family happened to be detected.

use crate::config::StackMode;
use crate::error::{Error, Result};
use crate::traits::DetectedAddress;

/// Validate `addr` against `mode`
///
/// `Ipv4` requires an IPv4 address, `Ipv6` an IPv6 address, `Dual` both.
pub fn validate(addr: &DetectedAddress, mode: StackMode) -> Result<()> {
    match mode {
        StackMode::Ipv4 if addr.ipv4.is_none() => {
            Err(Error::address_missing("ipv4 required but not detected"))
        }
        StackMode::Ipv6 if addr.ipv6.is_none() => {
            Err(Error::address_missing("ipv6 required but not detected"))
        }
        StackMode::Dual if addr.ipv4.is_none() || addr.ipv6.is_none() => {
            let missing = match (addr.ipv4.is_none(), addr.ipv6.is_none()) {
                (true, true) => "ipv4 and ipv6",
                (true, false) => "ipv4",
                _ => "ipv6",
            };
            Err(Error::address_missing(format!(
                "dual stack requires both families, missing {missing}"
            )))
        }
        _ => Ok(()),
    }
}
