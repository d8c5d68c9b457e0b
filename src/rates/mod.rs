//! Reference tables and fixed lookups: premium rates, payment-frequency
//! surcharges, commission discounts, and issuance loss ratios

mod commission;
mod issuance;
mod payment;
mod table;
pub mod loader;

pub use commission::{commission_to_percent, resolve_commission_discount};
pub use issuance::IssuanceTable;
pub use payment::{resolve_payment_terms, PaymentTerms, DEFAULT_PAYMENT_TERMS};
pub use table::{RateRow, RateTable};
pub use loader::{load_issuances, load_issuances_from_reader, load_rate_table, load_rate_table_from_reader};
