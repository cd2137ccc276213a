//! Diagnostic oracle adapters.
//!
//! - `GeminiOracle` - Live adapter over the Gemini `generateContent` API
//! - `MockOracle` - Queued responses for tests

mod decode;
mod gemini_client;
mod gemini_oracle;
mod mock_oracle;
pub mod prompts;

pub use decode::{decode_assessment, decode_guide};
pub use gemini_client::{
    Content, GeminiClient, GeminiConfig, GenerateContentRequest, GenerationConfig, InlineData,
    Part, ThinkingConfig, DEFAULT_BASE_URL, DEFAULT_COMPLEX_MODEL, DEFAULT_FAST_MODEL,
    DEFAULT_THINKING_BUDGET,
};
pub use gemini_oracle::GeminiOracle;
pub use mock_oracle::{MockOracle, MockReply};
