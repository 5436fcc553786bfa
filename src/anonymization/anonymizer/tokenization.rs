//! Opaque placeholder tokens

use crate::anonymization::models::PiiType;
use uuid::Uuid;

/// Number of hex characters in the nonce
pub const NONCE_LEN: usize = 8;

/// Generates `<TYPE_xxxxxxxx>` tokens with a random hex nonce
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueTokenStrategy;

impl OpaqueTokenStrategy {
    /// Create a new opaque token strategy
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh token for a type
    pub fn generate(&self, pii_type: &PiiType) -> String {
        let nonce = Uuid::new_v4().simple().to_string();
        format!("<{}_{}>", pii_type.as_str(), &nonce[..NONCE_LEN])
    }

    /// Extract the type label from an opaque token
    pub fn type_of(token: &str) -> Option<&str> {
        let inner = token.strip_prefix('<')?.strip_suffix('>')?;
        let (label, nonce) = inner.rsplit_once('_')?;
        let is_nonce = nonce.len() == NONCE_LEN
            && nonce.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        (is_nonce && !label.is_empty()).then_some(label)
    }
}
