//! Per-family pricing and call cost

use crate::api::UsageCounters;
use serde::Serialize;

/// Dollar rates per 1000 tokens for one model family
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingEntry {
    pub input: f64,
    pub output: f64,
    pub cache_read: f64,
    pub cache_write: f64,
}

impl PricingEntry {
    const fn new(input: f64, output: f64, cache_read: f64, cache_write: f64) -> Self {
        Self {
            input,
            output,
            cache_read,
            cache_write,
        }
    }

    /// Dollar cost of `usage` at these rates
    pub fn cost_of(&self, usage: &UsageCounters) -> f64 {
        (usage.input_tokens as f64 * self.input
            + usage.output_tokens as f64 * self.output
            + usage.cache_read_input_tokens as f64 * self.cache_read
            + usage.cache_write_input_tokens as f64 * self.cache_write)
            / 1000.0
    }
}

/// Family key -> rates. Lookup is a substring match in this order, so no
/// key may be a substring of another.
const PRICING_TABLE: &[(&str, PricingEntry)] = &[
    ("3-5-haiku", PricingEntry::new(0.0008, 0.004, 0.00008, 0.001)),
    ("3-5-sonnet", PricingEntry::new(0.003, 0.015, 0.0003, 0.00375)),
    ("3-7-sonnet", PricingEntry::new(0.003, 0.015, 0.0003, 0.00375)),
    ("sonnet-4", PricingEntry::new(0.003, 0.015, 0.0003, 0.00375)),
    ("opus-4", PricingEntry::new(0.015, 0.075, 0.0015, 0.01875)),
    ("nova-premier", PricingEntry::new(0.0025, 0.0125, 0.000625, 0.0)),
    ("nova-pro", PricingEntry::new(0.0008, 0.0032, 0.0002, 0.0)),
    ("nova-lite", PricingEntry::new(0.00006, 0.00024, 0.000015, 0.0)),
    ("nova-micro", PricingEntry::new(0.000035, 0.00014, 0.00000875, 0.0)),
];

/// All pricing families, in lookup order
pub fn pricing_table() -> &'static [(&'static str, PricingEntry)] {
    PRICING_TABLE
}

/// First pricing family whose key occurs in the raw model id
pub fn pricing_for(model_id: &str) -> Option<(&'static str, &'static PricingEntry)> {
    PRICING_TABLE
        .iter()
        .find(|(family, _)| model_id.contains(family))
        .map(|(family, entry)| (*family, entry))
}

/// Dollar cost of one call; models without pricing cost nothing.
pub fn compute_call_cost(model_id: &str, usage: &UsageCounters) -> f64 {
    pricing_for(model_id)
        .map(|(_, entry)| entry.cost_of(usage))
        .unwrap_or(0.0)
}

/// What the cache-read tokens saved against paying the plain input rate
pub fn estimated_savings(model_id: &str, usage: &UsageCounters) -> f64 {
    pricing_for(model_id)
        .map(|(_, entry)| {
            usage.cache_read_input_tokens as f64 * (entry.input - entry.cache_read) / 1000.0
        })
        .unwrap_or(0.0)
}

/// Format a dollar amount, keeping sub-cent costs readable
pub fn format_cost(cost: f64) -> String {
    if cost > 0.0 && cost < 0.01 {
        format!("${:.6}", cost)
    } else {
        format!("${:.4}", cost)
    }
}
