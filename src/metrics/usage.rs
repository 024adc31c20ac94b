//! Per-call cache classification and accounting

use super::pricing::{compute_call_cost, estimated_savings, format_cost};
use crate::api::UsageCounters;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// What the provider did with the cache on one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheVerdict {
    /// Some input was read from the cache
    CacheHit,
    /// Nothing was read, but new content was cached
    CacheWrite,
    /// The cache was not involved
    Uncached,
}

impl CacheVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheVerdict::CacheHit => "cache-hit",
            CacheVerdict::CacheWrite => "cache-write",
            CacheVerdict::Uncached => "uncached",
        }
    }
}

impl fmt::Display for CacheVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageClassification {
    /// Share of input tokens served from the cache (0.0 - 1.0)
    pub ratio: f64,
    pub verdict: CacheVerdict,
}

/// Classify one call's usage. Purely observational.
pub fn classify_usage(usage: &UsageCounters) -> UsageClassification {
    let read = usage.cache_read_input_tokens;
    let denominator = read + usage.cache_write_input_tokens + usage.input_tokens;
    let ratio = if denominator == 0 {
        0.0
    } else {
        read as f64 / denominator as f64
    };

    let verdict = if read > 0 {
        CacheVerdict::CacheHit
    } else if usage.cache_write_input_tokens > 0 {
        CacheVerdict::CacheWrite
    } else {
        CacheVerdict::Uncached
    };

    UsageClassification { ratio, verdict }
}

/// Everything the caller merges after a completed call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CallAccounting {
    pub usage: UsageCounters,
    /// Cost delta in dollars
    pub cost: f64,
    /// Dollars saved by cache reads
    pub savings: f64,
    pub classification: UsageClassification,
}

/// Cost and classify one call. Does not touch any session state.
pub fn account_call(model_id: &str, usage: &UsageCounters) -> CallAccounting {
    CallAccounting {
        usage: *usage,
        cost: compute_call_cost(model_id, usage),
        savings: estimated_savings(model_id, usage),
        classification: classify_usage(usage),
    }
}

/// Emit one structured event describing a call's cache behaviour
pub fn log_cache_usage(model_id: &str, accounting: &CallAccounting) {
    let usage = &accounting.usage;
    let hit_ratio = format!("{:.1}%", accounting.classification.ratio * 100.0);
    let cost = format_cost(accounting.cost);
    info!(
        model = model_id,
        verdict = %accounting.classification.verdict,
        hit_ratio = %hit_ratio,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        cache_read_tokens = usage.cache_read_input_tokens,
        cache_write_tokens = usage.cache_write_input_tokens,
        cost = %cost,
        "model call usage"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncached_call() {
        let result = classify_usage(&UsageCounters::new(1000, 500));
        assert_eq!(result.verdict, CacheVerdict::Uncached);
        assert_eq!(result.ratio, 0.0);
    }

    #[test]
    fn test_cache_hit_ratio() {
        let usage = UsageCounters::new(100, 50).with_cache(800, 100);
        let result = classify_usage(&usage);
        assert_eq!(result.verdict, CacheVerdict::CacheHit);
        assert!((result.ratio - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_cache_write() {
        let usage = UsageCounters::new(20, 50).with_cache(0, 3000);
        let result = classify_usage(&usage);
        assert_eq!(result.verdict, CacheVerdict::CacheWrite);
        assert_eq!(result.ratio, 0.0);
    }

    #[test]
    fn test_zero_usage() {
        let result = classify_usage(&UsageCounters::default());
        assert_eq!(result.verdict, CacheVerdict::Uncached);
        assert_eq!(result.ratio, 0.0);
    }

    #[test]
    fn test_verdicts_exclusive_and_exhaustive() {
        for input in [0, 7] {
            for read in [0, 5] {
                for write in [0, 9] {
                    let usage = UsageCounters::new(input, 1).with_cache(read, write);
                    let verdict = classify_usage(&usage).verdict;
                    let matches = [
                        read > 0,
                        read == 0 && write > 0,
                        read == 0 && write == 0,
                    ];
                    assert_eq!(matches.iter().filter(|m| **m).count(), 1);
                    let expected = match matches {
                        [true, _, _] => CacheVerdict::CacheHit,
                        [_, true, _] => CacheVerdict::CacheWrite,
                        _ => CacheVerdict::Uncached,
                    };
                    assert_eq!(verdict, expected);
                }
            }
        }
    }

    #[test]
    fn test_account_call() {
        let usage = UsageCounters::new(1000, 500);
        let accounting = account_call("anthropic.claude-3-5-sonnet-20241022-v2:0", &usage);
        assert!((accounting.cost - 0.0105).abs() < 1e-12);
        assert_eq!(accounting.savings, 0.0);
        assert_eq!(accounting.classification.verdict, CacheVerdict::Uncached);
        assert_eq!(accounting.usage, usage);
    }

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(
            serde_json::to_string(&CacheVerdict::CacheHit).unwrap(),
            "\"cache-hit\""
        );
        assert_eq!(CacheVerdict::CacheWrite.to_string(), "cache-write");
    }
}
