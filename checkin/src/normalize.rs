//! Turns raw scan payloads into ticket identifiers.

use crate::types::TicketId;

/// Prefix printed in front of the ticket id on issued QR codes.
pub const DEFAULT_SCAN_PREFIX: &str = "0477GROUP:";

/// Strips the known prefix from a scanned payload.
///
/// Payloads without the prefix pass through unchanged; the result is not
/// validated, the server decides whether the id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNormalizer {
    prefix: String,
}

impl CodeNormalizer {
    /// Create a normalizer for the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix this normalizer strips.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Normalize one raw payload.
    #[must_use]
    pub fn normalize(&self, payload: &str) -> TicketId {
        let id = if self.prefix.is_empty() {
            payload
        } else {
            payload.strip_prefix(self.prefix.as_str()).unwrap_or(payload)
        };
        TicketId::new(id)
    }
}

impl Default for CodeNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_prefix() {
        let normalizer = CodeNormalizer::default();
        assert_eq!(normalizer.normalize("0477GROUP:abc123").as_str(), "abc123");
    }

    #[test]
    fn passes_through_without_prefix() {
        let normalizer = CodeNormalizer::default();
        assert_eq!(normalizer.normalize("xyz999").as_str(), "xyz999");
    }

    #[test]
    fn strips_only_a_leading_prefix_once() {
        let normalizer = CodeNormalizer::default();
        assert_eq!(
            normalizer.normalize("0477GROUP:0477GROUP:a").as_str(),
            "0477GROUP:a"
        );
        assert_eq!(normalizer.normalize("x0477GROUP:a").as_str(), "x0477GROUP:a");
    }

    #[test]
    fn bare_prefix_yields_empty_id() {
        assert!(CodeNormalizer::default().normalize("0477GROUP:").is_empty());
    }

    #[test]
    fn custom_prefix() {
        let normalizer = CodeNormalizer::new("EVT-");
        assert_eq!(normalizer.prefix(), "EVT-");
        assert_eq!(normalizer.normalize("EVT-42").as_str(), "42");
    }
}
