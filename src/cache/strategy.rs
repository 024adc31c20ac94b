//! Whole-request cache planning

use super::{
    annotate_system, annotate_tools, final_boundary_index, plan_message_boundaries, CacheConfig,
};
use crate::api::{ConversationMessage, RequestParts, SystemBlock, ToolConfig};
use crate::models::{capabilities_of, CacheableField};
use serde::Serialize;
use tracing::debug;

/// Plans all three cacheable fields of a request under one configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CachePlanner {
    config: CacheConfig,
}

impl CachePlanner {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Produce annotated copies of the request parts for `model_id`.
    ///
    /// Fields switched off in the configuration pass through unchanged.
    pub fn plan(
        &self,
        parts: &RequestParts,
        model_id: &str,
        prior_boundary_index: Option<usize>,
    ) -> PlannedRequest {
        let capabilities = capabilities_of(model_id);

        // A carried boundary only exists when this turn placed message markers
        let (messages, next_boundary_index) = if self.config.allows(CacheableField::Messages)
            && capabilities.contains(CacheableField::Messages)
        {
            let messages = plan_message_boundaries(&parts.messages, model_id, prior_boundary_index);
            let next = final_boundary_index(&messages);
            (messages, next)
        } else {
            (parts.messages.clone(), None)
        };

        let system = if self.config.allows(CacheableField::System) {
            annotate_system(&parts.system, model_id)
        } else {
            parts.system.clone()
        };

        let tool_config = if self.config.allows(CacheableField::Tools) {
            annotate_tools(parts.tool_config.as_ref(), model_id)
        } else {
            parts.tool_config.clone()
        };

        let planned = PlannedRequest {
            messages,
            system,
            tool_config,
            next_boundary_index,
        };

        debug!(
            model = model_id,
            capabilities = %capabilities,
            boundaries = planned.boundary_count(),
            ?next_boundary_index,
            "planned request"
        );

        planned
    }
}

/// Where a cache boundary ended up in a planned request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPosition {
    /// After the last system block
    AfterSystem,
    /// After the last tool definition
    AfterTools,
    /// After the content of the message at this index
    AfterMessage(usize),
}

/// Annotated request parts, ready for the provider payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRequest {
    pub messages: Vec<ConversationMessage>,
    pub system: Vec<SystemBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
    /// Boundary to carry into the next turn as the prior boundary
    #[serde(skip)]
    pub next_boundary_index: Option<usize>,
}

impl PlannedRequest {
    /// Every cache boundary in the request, system first
    pub fn boundaries(&self) -> Vec<BoundaryPosition> {
        let mut positions = Vec::new();

        if self.system.iter().any(SystemBlock::is_cache_point) {
            positions.push(BoundaryPosition::AfterSystem);
        }

        if let Some(config) = &self.tool_config {
            if config.tools.iter().any(|entry| entry.is_cache_point()) {
                positions.push(BoundaryPosition::AfterTools);
            }
        }

        positions.extend(
            self.messages
                .iter()
                .enumerate()
                .filter(|(_, message)| message.cache_point_count() > 0)
                .map(|(idx, _)| BoundaryPosition::AfterMessage(idx)),
        );

        positions
    }

    /// Total number of cache markers across all fields
    pub fn boundary_count(&self) -> usize {
        let system = self.system.iter().filter(|b| b.is_cache_point()).count();
        let tools = self
            .tool_config
            .as_ref()
            .map(|config| config.tools.iter().filter(|e| e.is_cache_point()).count())
            .unwrap_or(0);
        let messages: usize = self.messages.iter().map(|m| m.cache_point_count()).sum();
        system + tools + messages
    }
}
