//! Tool corpus for toolbench
//!
//! Representative business domains, each exporting one or more named
//! interfaces (ordered tool lists) the harness can expose for an episode.
//! The dispatch/validation kernel lives in `bench-tools`; this crate is the
//! catalog built on top of it.

pub mod fund_finance;
pub mod incidents;
pub mod smart_home;
pub mod wiki;

use bench_core::{Result, ToolError};
use bench_tools::Interface;

/// The domains and their interface counts
pub const DOMAINS: &[(&str, u32)] = &[
    ("fund_finance", 2),
    ("incidents", 1),
    ("wiki", 1),
    ("smart_home", 1),
];

/// Look up an interface by domain name and number
pub fn interface(domain: &str, number: u32) -> Result<Interface> {
    match (domain, number) {
        ("fund_finance", 1) => fund_finance::interface_1(),
        ("fund_finance", 2) => fund_finance::interface_2(),
        ("incidents", 1) => incidents::interface_1(),
        ("wiki", 1) => wiki::interface_1(),
        ("smart_home", 1) => smart_home::interface_1(),
        _ => Err(ToolError::validation(format!(
            "unknown interface {domain}/interface_{number}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_interface_builds() {
        for (domain, count) in DOMAINS {
            for number in 1..=*count {
                let iface = interface(domain, number).unwrap();
                assert!(!iface.tools().is_empty(), "{domain}/interface_{number}");
            }
        }
    }

    #[test]
    fn test_unknown_interface() {
        assert!(interface("fund_finance", 3).is_err());
        assert!(interface("warehouse", 1).is_err());
    }
}
