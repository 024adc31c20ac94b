//! Static table of which request fields each model can cache

use super::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A section of a request that may carry cache boundary markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheableField {
    Messages,
    System,
    Tools,
}

impl CacheableField {
    pub const ALL: [CacheableField; 3] = [
        CacheableField::Messages,
        CacheableField::System,
        CacheableField::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheableField::Messages => "messages",
            CacheableField::System => "system",
            CacheableField::Tools => "tools",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            CacheableField::Messages => 1,
            CacheableField::System => 1 << 1,
            CacheableField::Tools => 1 << 2,
        }
    }
}

impl fmt::Display for CacheableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of cacheable fields supported by one model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub const fn of(fields: &[CacheableField]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < fields.len() {
            bits |= fields[i].bit();
            i += 1;
        }
        CapabilitySet(bits)
    }

    pub fn contains(&self, field: CacheableField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = CacheableField> + '_ {
        CacheableField::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(|field| field.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

const FULL: CapabilitySet = CapabilitySet::of(&[
    CacheableField::Messages,
    CacheableField::System,
    CacheableField::Tools,
]);

const NO_TOOLS: CapabilitySet =
    CapabilitySet::of(&[CacheableField::Messages, CacheableField::System]);

/// Canonical model id -> cacheable fields, in listing order
const MODEL_CAPABILITIES: &[(&str, CapabilitySet)] = &[
    ("anthropic.claude-3-7-sonnet-20250219-v1:0", FULL),
    ("anthropic.claude-3-5-haiku-20241022-v1:0", FULL),
    ("anthropic.claude-sonnet-4-20250514-v1:0", FULL),
    ("anthropic.claude-opus-4-20250514-v1:0", FULL),
    ("anthropic.claude-opus-4-1-20250805-v1:0", FULL),
    ("amazon.nova-premier-v1:0", NO_TOOLS),
    ("amazon.nova-pro-v1:0", NO_TOOLS),
    ("amazon.nova-lite-v1:0", NO_TOOLS),
    ("amazon.nova-micro-v1:0", NO_TOOLS),
];

static REGISTRY: LazyLock<HashMap<&'static str, CapabilitySet>> =
    LazyLock::new(|| MODEL_CAPABILITIES.iter().copied().collect());

/// Cacheable fields for a model, after stripping any routing prefix.
///
/// Unknown models support nothing.
pub fn capabilities_of(model_id: &str) -> CapabilitySet {
    REGISTRY
        .get(normalize(model_id))
        .copied()
        .unwrap_or(CapabilitySet::EMPTY)
}

pub fn supports_caching(model_id: &str) -> bool {
    !capabilities_of(model_id).is_empty()
}

/// Every registered model with its capabilities, in table order
pub fn registered_models() -> impl Iterator<Item = (&'static str, CapabilitySet)> {
    MODEL_CAPABILITIES.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_supports_all_fields() {
        let caps = capabilities_of("anthropic.claude-3-7-sonnet-20250219-v1:0");
        assert!(caps.contains(CacheableField::Messages));
        assert!(caps.contains(CacheableField::System));
        assert!(caps.contains(CacheableField::Tools));
        assert_eq!(caps.to_string(), "messages, system, tools");
    }

    #[test]
    fn test_nova_lacks_tools() {
        let caps = capabilities_of("amazon.nova-micro-v1:0");
        assert!(caps.contains(CacheableField::Messages));
        assert!(caps.contains(CacheableField::System));
        assert!(!caps.contains(CacheableField::Tools));
    }

    #[test]
    fn test_routing_prefix_is_transparent() {
        for (model, caps) in registered_models() {
            for prefix in ["us", "eu", "apac"] {
                assert_eq!(capabilities_of(&format!("{prefix}.{model}")), caps);
            }
        }
    }

    #[test]
    fn test_unknown_model_supports_nothing() {
        let caps = capabilities_of("meta.llama3-70b-instruct-v1:0");
        assert!(caps.is_empty());
        assert_eq!(caps.iter().count(), 0);
        assert_eq!(caps.to_string(), "none");
        assert!(!supports_caching("meta.llama3-70b-instruct-v1:0"));
        assert!(!supports_caching(""));
        assert!(supports_caching("us.amazon.nova-pro-v1:0"));
    }
}
