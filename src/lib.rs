//! cache_planner - Prompt-cache boundary planning and cost accounting
//!
//! This library decides where cache boundary markers go in an outbound model
//! request and accounts for what the provider reports back.
//!
//! ## Key Features
//!
//! - **Capability Registry**: Which request fields each model can cache, independent of routing prefix
//! - **Boundary Planning**: Marks the last message and carries the previous turn's boundary forward
//! - **System/Tool Annotation**: One trailing marker each, gated by model capability
//! - **Cost Accounting**: Per-call dollar cost, cache-hit ratio and verdict
//! - **Session Driver**: Keeps the caller-side state between turns over any model invoker

pub mod api;
pub mod cache;
pub mod config;
pub mod metrics;
pub mod models;
pub mod orchestrator;

pub use api::{
    ContentBlock, ConversationMessage, InvocationOutcome, InvokeError, ModelInvoker,
    RequestParts, SystemBlock, ToolConfig, ToolListEntry, UsageCounters,
};
pub use cache::{
    annotate_system, annotate_tools, plan_message_boundaries, CacheConfig, CachePlanner,
    CachePoint, PlannedRequest,
};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use metrics::{
    account_call, classify_usage, compute_call_cost, CacheVerdict, CallAccounting, SessionCost,
};
pub use models::{capabilities_of, normalize, supports_caching, CacheableField, CapabilitySet};
pub use orchestrator::{CacheSession, TurnOutcome};
