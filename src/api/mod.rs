//! Request/response data model and the model-invocation seam

mod request;
mod response;

pub use request::{
    ContentBlock, ConversationMessage, ImageBlock, ImageSource, RequestParts, Role, SystemBlock,
    ToolConfig, ToolInputSchema, ToolListEntry, ToolResultBlock, ToolResultContent,
    ToolResultStatus, ToolSpec, ToolUseBlock,
};
pub use response::{InvocationOutcome, StopReason, UsageCounters};

use crate::cache::PlannedRequest;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Throttled: retry after {retry_after_secs} seconds")]
    Throttled { retry_after_secs: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The collaborator that actually sends a planned request to the provider.
///
/// Transport, retries and streaming live behind this trait; the planner only
/// sees the finished usage counters.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(
        &self,
        request: &PlannedRequest,
        model_id: &str,
    ) -> Result<InvocationOutcome, InvokeError>;
}
