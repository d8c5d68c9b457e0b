//! Quotation System - Premium quotation engine for corporate group life policies
//!
//! This library provides:
//! - Age-banded premium rate expansion per insured roster (memoria de cálculo)
//! - Payment-frequency surcharge and commission-discount resolution
//! - Per-policyholder quotation assembly with a renewal loss-ratio gate
//! - Batch orchestration over a full parameter table with ticket numbering
//! - Historical quotation ledger maintenance

pub mod batch;
pub mod ledger;
pub mod policy;
pub mod quote;
pub mod rates;

// Re-export commonly used types
pub use batch::{BatchOutcome, BatchRunner};
pub use ledger::{HistoricalLedger, LedgerRow};
pub use policy::{Coverage, InsuredRecord, InsuredRoster, PolicyParameters};
pub use quote::{assemble, AssemblyError, Event, Premium, Quotation, RateBreakdown};
pub use rates::{IssuanceTable, RateTable};
