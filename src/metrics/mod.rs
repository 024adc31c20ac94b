//! Cost and cache-usage accounting for completed model calls
//!
//! Everything here except [`SessionCost`] is a pure function of the reported
//! usage counters and the model id. The session ledger belongs to the caller,
//! which records the per-call deltas returned by [`account_call`].

mod ledger;
mod pricing;
mod usage;

pub use ledger::{SessionCost, SessionCostTracker};
pub use pricing::{
    compute_call_cost, estimated_savings, format_cost, pricing_for, pricing_table, PricingEntry,
};
pub use usage::{
    account_call, classify_usage, log_cache_usage, CacheVerdict, CallAccounting,
    UsageClassification,
};
