//! Policyholder data structures and table loading

mod data;
pub mod loader;

pub use data::{parse_renewal_flag, Coverage, InsuredRecord, InsuredRoster, PolicyParameters};
pub use loader::{load_parameters, load_parameters_from_reader, load_roster, load_roster_from_reader};
