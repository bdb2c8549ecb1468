//! Wiki / knowledge-base tools
//!
//! Tables: `spaces`, `pages`, `space_permissions`, `users`. Pages support
//! soft delete (`is_trashed`) and a publish state with a boolean mirror.

pub mod pages;
pub mod queries;
pub mod spaces;

use std::sync::Arc;

use bench_core::Result;
use bench_tools::{Interface, TransferToHuman};

pub use pages::ManagePage;
pub use queries::ListPages;
pub use spaces::ManageSpacePermission;

/// Page lifecycle and space permission administration
pub fn interface_1() -> Result<Interface> {
    Interface::new(
        "wiki/interface_1",
        vec![
            Arc::new(ManagePage),
            Arc::new(ManageSpacePermission),
            Arc::new(ListPages),
            Arc::new(TransferToHuman),
        ],
    )
}
