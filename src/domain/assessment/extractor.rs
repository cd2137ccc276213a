//! JSON extraction from raw oracle output.
//!
//! Structured-output models usually return bare JSON, but some responses
//! arrive wrapped in Markdown code fences or with a short preamble. The
//! extractor strips that framing and parses the first JSON value.

use thiserror::Error;

/// Maximum accepted raw response length (256KB).
pub const MAX_RESPONSE_LENGTH: usize = 256_000;

/// Errors that can occur while extracting JSON from a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Response is empty")]
    Empty,

    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("JSON parse error: {0}")]
    ParseError(String),
}

/// Pulls a JSON value out of free-form model text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts and parses the JSON body of a response.
    pub fn extract(&self, response: &str) -> Result<serde_json::Value, ExtractionError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(ExtractionError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let cleaned = remove_control_chars(response);
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::Empty);
        }

        let body = self.locate_json(trimmed);
        serde_json::from_str(&body).or_else(|e| {
            // A bracketed preamble ("Result [v2]: {...}") wins the span
            // search; retry from the first object.
            first_object(trimmed).ok_or_else(|| ExtractionError::ParseError(e.to_string()))
        })
    }

    fn locate_json(&self, s: &str) -> String {
        if let Some(json) = extract_from_code_block(s) {
            return json;
        }

        let (start, open, close) = match (s.find('{'), s.find('[')) {
            (Some(o), Some(a)) if a < o => (a, '[', ']'),
            (Some(o), _) => (o, '{', '}'),
            (None, Some(a)) => (a, '[', ']'),
            (None, None) => return s.to_string(),
        };

        extract_balanced(s, start, open, close).unwrap_or_else(|| s.to_string())
    }
}

fn first_object(s: &str) -> Option<serde_json::Value> {
    let start = s.find('{')?;
    let body = extract_balanced(s, start, '{', '}')?;
    serde_json::from_str(&body).ok()
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```JSON\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let body_start = start + pattern.len();
            if let Some(end) = s[body_start..].find("```") {
                return Some(s[body_start..body_start + end].trim().to_string());
            }
        }
    }
    None
}

fn extract_balanced(s: &str, start: usize, open: char, close: char) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(s[start..end].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
