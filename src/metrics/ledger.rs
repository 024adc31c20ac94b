//! Running session cost, owned by the caller

use super::pricing::format_cost;
use super::usage::{CacheVerdict, CallAccounting};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Accumulated cost and cache behaviour for one chat session.
///
/// Only ever grows; the accountant computes per-call deltas and the caller
/// records them here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCost {
    /// Total dollars spent
    pub total_cost: f64,
    /// Dollars saved by cache reads
    pub estimated_savings: f64,
    /// Completed calls
    pub calls: u64,
    /// Calls that read from the cache
    pub cache_hits: u64,
    /// Calls that only wrote to the cache
    pub cache_writes: u64,
    /// Calls that did not use the cache
    pub uncached: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
}

impl SessionCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one completed call
    pub fn record(&mut self, call: &CallAccounting) {
        self.total_cost += call.cost;
        self.estimated_savings += call.savings;
        self.calls += 1;

        match call.classification.verdict {
            CacheVerdict::CacheHit => self.cache_hits += 1,
            CacheVerdict::CacheWrite => self.cache_writes += 1,
            CacheVerdict::Uncached => self.uncached += 1,
        }

        self.input_tokens += call.usage.input_tokens;
        self.output_tokens += call.usage.output_tokens;
        self.cache_read_tokens += call.usage.cache_read_input_tokens;
        self.cache_write_tokens += call.usage.cache_write_input_tokens;
    }

    pub fn total(&self) -> f64 {
        self.total_cost
    }

    /// Share of calls that hit the cache (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.calls as f64
        }
    }

    /// Share of all input tokens that were served from the cache
    pub fn aggregate_cache_ratio(&self) -> f64 {
        let denominator = self.cache_read_tokens + self.cache_write_tokens + self.input_tokens;
        if denominator == 0 {
            0.0
        } else {
            self.cache_read_tokens as f64 / denominator as f64
        }
    }

    /// Merge another ledger into this one
    pub fn merge(&mut self, other: &SessionCost) {
        self.total_cost += other.total_cost;
        self.estimated_savings += other.estimated_savings;
        self.calls += other.calls;
        self.cache_hits += other.cache_hits;
        self.cache_writes += other.cache_writes;
        self.uncached += other.uncached;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.cache_read_tokens += other.cache_read_tokens;
        self.cache_write_tokens += other.cache_write_tokens;
    }
}

impl std::fmt::Display for SessionCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Session Cost ===")?;
        writeln!(f, "Calls: {}", self.calls)?;
        writeln!(
            f,
            "Cache hits/writes/uncached: {}/{}/{}",
            self.cache_hits, self.cache_writes, self.uncached
        )?;
        writeln!(f, "Hit rate: {:.1}%", self.hit_rate() * 100.0)?;
        writeln!(f, "Cached input share: {:.1}%", self.aggregate_cache_ratio() * 100.0)?;
        writeln!(f, "Input/output tokens: {}/{}", self.input_tokens, self.output_tokens)?;
        writeln!(
            f,
            "Cache read/write tokens: {}/{}",
            self.cache_read_tokens, self.cache_write_tokens
        )?;
        writeln!(f, "Total cost: {}", format_cost(self.total_cost))?;
        writeln!(f, "Est. savings: {}", format_cost(self.estimated_savings))?;
        Ok(())
    }
}

/// Shared ledger for callers that account concurrent calls of one session
#[derive(Debug, Clone, Default)]
pub struct SessionCostTracker {
    inner: Arc<Mutex<SessionCost>>,
}

impl SessionCostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: &CallAccounting) {
        if let Ok(mut cost) = self.inner.lock() {
            cost.record(call);
        }
    }

    pub fn snapshot(&self) -> SessionCost {
        self.inner
            .lock()
            .map(|cost| cost.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UsageCounters;
    use crate::metrics::account_call;
    use std::thread;

    const SONNET: &str = "anthropic.claude-3-7-sonnet-20250219-v1:0";

    #[test]
    fn test_record_accumulates() {
        let mut ledger = SessionCost::new();

        let write = account_call(SONNET, &UsageCounters::new(50, 100).with_cache(0, 4000));
        let hit = account_call(SONNET, &UsageCounters::new(60, 120).with_cache(4000, 0));
        let plain = account_call(SONNET, &UsageCounters::new(1000, 500));

        ledger.record(&write);
        ledger.record(&hit);
        ledger.record(&plain);

        assert_eq!(ledger.calls, 3);
        assert_eq!(ledger.cache_hits, 1);
        assert_eq!(ledger.cache_writes, 1);
        assert_eq!(ledger.uncached, 1);
        assert_eq!(ledger.cache_read_tokens, 4000);
        assert!((ledger.total() - (write.cost + hit.cost + plain.cost)).abs() < 1e-12);
        assert!((ledger.hit_rate() - 1.0 / 3.0).abs() < 1e-12);
        assert!(ledger.estimated_savings > 0.0);
    }

    #[test]
    fn test_total_never_decreases() {
        let mut ledger = SessionCost::new();
        let mut last = 0.0;
        for usage in [
            UsageCounters::default(),
            UsageCounters::new(10, 10),
            UsageCounters::new(0, 0).with_cache(500, 0),
        ] {
            ledger.record(&account_call(SONNET, &usage));
            assert!(ledger.total() >= last);
            last = ledger.total();
        }
    }

    #[test]
    fn test_empty_ledger_ratios() {
        let ledger = SessionCost::new();
        assert_eq!(ledger.hit_rate(), 0.0);
        assert_eq!(ledger.aggregate_cache_ratio(), 0.0);
        assert!(ledger.to_string().contains("Calls: 0"));
    }

    #[test]
    fn test_merge() {
        let call = account_call(SONNET, &UsageCounters::new(100, 100).with_cache(300, 0));
        let mut a = SessionCost::new();
        let mut b = SessionCost::new();
        a.record(&call);
        b.record(&call);
        b.record(&call);

        a.merge(&b);
        assert_eq!(a.calls, 3);
        assert_eq!(a.cache_hits, 3);
        assert!((a.total() - 3.0 * call.cost).abs() < 1e-12);
    }

    #[test]
    fn test_tracker_across_threads() {
        let tracker = SessionCostTracker::new();
        let call = account_call(SONNET, &UsageCounters::new(100, 10));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tracker = tracker.clone();
                thread::spawn(move || tracker.record(&call))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.calls, 4);
        assert_eq!(snapshot.input_tokens, 400);
    }
}
