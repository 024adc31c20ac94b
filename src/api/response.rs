//! Response structures reported by the model provider

use super::ConversationMessage;
use serde::{Deserialize, Serialize};

/// Outcome of one completed model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationOutcome {
    /// The generated assistant message
    pub output: ConversationMessage,

    /// Token usage counters
    pub usage: UsageCounters,

    /// Stop reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

/// Token counters reported once per completed call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageCounters {
    /// Uncached input tokens
    pub input_tokens: u64,
    /// Tokens in the response
    pub output_tokens: u64,
    /// Input tokens served from the cache
    pub cache_read_input_tokens: u64,
    /// Input tokens written to the cache
    pub cache_write_input_tokens: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
}

impl UsageCounters {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            ..Self::default()
        }
    }

    /// Attach cache counters
    pub fn with_cache(mut self, cache_read: u64, cache_write: u64) -> Self {
        self.cache_read_input_tokens = cache_read;
        self.cache_write_input_tokens = cache_write;
        self
    }

    /// Every input token the provider processed, cached or not
    pub fn total_input(&self) -> u64 {
        self.input_tokens + self.cache_read_input_tokens + self.cache_write_input_tokens
    }

    /// Check if any caching occurred
    pub fn has_cache_activity(&self) -> bool {
        self.cache_read_input_tokens > 0 || self.cache_write_input_tokens > 0
    }
}
