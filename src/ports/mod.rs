//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DiagnosticOracle` - Structured-output model for assessments and guides
//! - `RecordStore` - Per-profile health record persistence
//! - `SpecialistLookup` - Nearby provider search
//! - `MediaNormalizer` - Image downsizing and encoding

mod diagnostic_oracle;
mod media_normalizer;
mod record_store;
mod specialist_lookup;

pub use diagnostic_oracle::{AssessmentRequest, DiagnosticOracle, GuideRequest, OracleError};
pub use media_normalizer::{MediaError, MediaNormalizer};
pub use record_store::{RecordStore, RecordStoreError};
pub use specialist_lookup::{LookupError, LookupRequest, SpecialistLookup};
