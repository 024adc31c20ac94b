//! Prompt-cache boundary planning
//!
//! This module decides where cache boundary markers (`cachePoint` blocks) go
//! in an outbound request so the provider can reuse a cached prefix.
//!
//! ## Placement Rules
//!
//! 1. **Capability gated**: a field only receives a marker when the target model
//!    supports caching for that field
//! 2. **Trailing only**: markers are appended to the end of a content list, never
//!    inserted or reordered
//! 3. **Two message boundaries**: the last message, plus the boundary carried over
//!    from the previous turn so the earlier cached prefix stays reusable
//! 4. **Tool results**: a message holding a tool result only takes a marker when
//!    the model also supports tool caching

mod annotator;
mod planner;
mod strategy;

pub use annotator::{annotate_system, annotate_tools};
pub use planner::{final_boundary_index, plan_message_boundaries};
pub use strategy::{BoundaryPosition, CachePlanner, PlannedRequest};

use crate::models::CacheableField;
use serde::{Deserialize, Serialize};

/// Maximum markers a single request may carry (system + tools + two message boundaries)
pub const MAX_CACHE_POINTS: usize = 4;

/// Cache boundary marker.
///
/// Carries no payload: everything before it in the same field may be cached
/// as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePoint {
    /// Type of cache point
    #[serde(rename = "type")]
    pub point_type: CachePointType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePointType {
    /// Provider default cache lifetime
    Default,
}

impl Default for CachePoint {
    fn default() -> Self {
        Self {
            point_type: CachePointType::Default,
        }
    }
}

/// Configuration for cache planning (the `[cache]` config section)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; when off every request passes through untouched.
    /// CACHE_PLANNER_DISABLE_CACHE turns it off.
    pub enabled: bool,
    /// Place boundaries in the message list
    pub messages: bool,
    /// Place a boundary after the system prompt
    pub system: bool,
    /// Place a boundary after the tool definitions
    pub tools: bool,
}

impl CacheConfig {
    /// Configuration with every field switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether the configuration lets the planner touch `field`
    pub fn allows(&self, field: CacheableField) -> bool {
        self.enabled
            && match field {
                CacheableField::Messages => self.messages,
                CacheableField::System => self.system,
                CacheableField::Tools => self.tools,
            }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            messages: true,
            system: true,
            tools: true,
        }
    }
}
