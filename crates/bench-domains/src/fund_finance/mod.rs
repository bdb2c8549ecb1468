//! Fund administration and finance tools
//!
//! Tables: `users`, `investors`, `funds`, `instruments`, `portfolios`,
//! `portfolio_holdings`, `subscriptions`, `commitments`, `invoices`,
//! `payments`, `trades`, `redemptions`, `audit_trails`, `notifications`.
//! All keys are plain numeric strings.

pub mod audit;
pub mod commitments;
pub mod invoices;
pub mod notify;
pub mod portfolios;
pub mod queries;
pub mod redemptions;
pub mod trades;

use std::sync::Arc;

use bench_core::Result;
use bench_tools::{Interface, TransferToHuman};

pub use audit::RecordAuditTrail;
pub use commitments::{FulfillCommitment, GenerateCommitment};
pub use invoices::ProcessInvoice;
pub use notify::CreateNotification;
pub use portfolios::ProcessPortfolio;
pub use queries::{GetInvestorPortfolio, GetInvestorSubscriptions, ListBillingEntities, ListFunds};
pub use redemptions::{ProcessInvestorRedemption, SwitchFunds};
pub use trades::ProcessTrade;

/// Commitments, invoicing, and portfolio administration
pub fn interface_1() -> Result<Interface> {
    Interface::new(
        "fund_finance/interface_1",
        vec![
            Arc::new(GenerateCommitment),
            Arc::new(FulfillCommitment),
            Arc::new(ProcessInvoice),
            Arc::new(ProcessPortfolio),
            Arc::new(GetInvestorPortfolio),
            Arc::new(ListFunds),
            Arc::new(ListBillingEntities),
            Arc::new(RecordAuditTrail),
            Arc::new(CreateNotification),
            Arc::new(TransferToHuman),
        ],
    )
}

/// Trading, redemptions, and fund switching
pub fn interface_2() -> Result<Interface> {
    Interface::new(
        "fund_finance/interface_2",
        vec![
            Arc::new(ProcessTrade),
            Arc::new(ProcessInvestorRedemption),
            Arc::new(SwitchFunds),
            Arc::new(GetInvestorSubscriptions),
            Arc::new(RecordAuditTrail),
            Arc::new(CreateNotification),
            Arc::new(TransferToHuman),
        ],
    )
}
