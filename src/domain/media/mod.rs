//! Media payloads attached to conversation turns and records.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content-addressed reference to a media payload (hex SHA-256 of the
/// encoded data).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    /// Computes the reference for an encoded payload.
    pub fn for_data(data: &str) -> Self {
        let digest = Sha256::digest(data.as_bytes());
        Self(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for logs.
        f.write_str(&self.0[..self.0.len().min(12)])
    }
}

/// A size-bounded, encoded image ready for submission to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    reference: MediaRef,
    mime_type: String,
    /// Base64 (standard alphabet, no data-URL prefix).
    data: String,
}

impl MediaPayload {
    /// Wraps already-encoded base64 data.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let data = data.into();
        Self {
            reference: MediaRef::for_data(&data),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Wraps base64-encoded JPEG data.
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self::new("image/jpeg", data)
    }

    pub fn reference(&self) -> &MediaRef {
        &self.reference
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Size of the encoded payload in bytes.
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_data_shares_a_reference() {
        let a = MediaPayload::jpeg("aGVsbG8=");
        let b = MediaPayload::jpeg("aGVsbG8=");
        assert_eq!(a.reference(), b.reference());
    }

    #[test]
    fn reference_is_hex_sha256() {
        let r = MediaRef::for_data("abc");
        assert_eq!(r.as_str().len(), 64);
        assert_eq!(
            r.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn jpeg_sets_mime_type() {
        let payload = MediaPayload::jpeg("AAAA");
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(payload.encoded_len(), 4);
    }
}
