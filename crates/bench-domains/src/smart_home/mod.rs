//! Smart-home tools
//!
//! Tables: `rooms`, `devices`, `smart_bulbs`. Adding a bulb-type device also
//! creates its linked `smart_bulbs` row in the same call.

pub mod devices;

use std::sync::Arc;

use bench_core::Result;
use bench_tools::{Interface, TransferToHuman};

pub use devices::{ListDevices, ManageDevice};

/// Device inventory administration
pub fn interface_1() -> Result<Interface> {
    Interface::new(
        "smart_home/interface_1",
        vec![
            Arc::new(ManageDevice),
            Arc::new(ListDevices),
            Arc::new(TransferToHuman),
        ],
    )
}
