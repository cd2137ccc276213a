//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `oracle` - Diagnostic oracle over Gemini, plus a mock
//! - `specialist` - Nearby provider search
//! - `records` - Health record storage
//! - `media` - Image normalization

pub mod media;
pub mod oracle;
pub mod records;
pub mod specialist;

pub use media::ImageMediaNormalizer;
pub use oracle::{GeminiClient, GeminiConfig, GeminiOracle, MockOracle};
pub use records::InMemoryRecordStore;
pub use specialist::{MockSpecialistLookup, OracleSpecialistLookup};
