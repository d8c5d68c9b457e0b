//! Premium quotation engine: age derivation, rate expansion, and assembly

pub mod age;
mod assembler;
mod expander;
mod quotation;

pub use assembler::{assemble, AssemblyError, LOSS_RATIO_REFERRAL_THRESHOLD};
pub use expander::{expand, BreakdownRow, RateBreakdown};
pub use quotation::{spanish_month, Event, Premium, Quotation, QuoteKind, REFERRAL_SENTINEL};
