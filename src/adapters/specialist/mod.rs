//! Specialist lookup adapters.

mod mock_lookup;
mod oracle_lookup;

pub use mock_lookup::MockSpecialistLookup;
pub use oracle_lookup::OracleSpecialistLookup;
