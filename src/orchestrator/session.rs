//! One conversation's cache state across turns
//!
//! Holds the only two pieces of state the planner needs between calls: the
//! boundary placed last turn and the running session cost.

use crate::api::{InvocationOutcome, InvokeError, ModelInvoker, RequestParts};
use crate::cache::{CachePlanner, PlannedRequest};
use crate::metrics::{account_call, log_cache_usage, CallAccounting, SessionCost};
use serde::Serialize;
use tracing::{debug, warn};

/// Result of one successful turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// What the provider returned
    pub response: InvocationOutcome,
    /// Cost and cache classification of the call
    pub accounting: CallAccounting,
    /// The request as it was sent
    pub request: PlannedRequest,
}

/// Drives planned requests through a [`ModelInvoker`] for one conversation
pub struct CacheSession<I: ModelInvoker> {
    id: String,
    model_id: String,
    planner: CachePlanner,
    invoker: I,
    prior_boundary_index: Option<usize>,
    cost: SessionCost,
}

impl<I: ModelInvoker> CacheSession<I> {
    pub fn new(
        id: impl Into<String>,
        model_id: impl Into<String>,
        planner: CachePlanner,
        invoker: I,
    ) -> Self {
        Self {
            id: id.into(),
            model_id: model_id.into(),
            planner,
            invoker,
            prior_boundary_index: None,
            cost: SessionCost::new(),
        }
    }

    /// Plan, send and account one turn.
    ///
    /// State only changes after the invoker succeeds, so a failed call can be
    /// retried with the same parts and gets the same plan.
    pub async fn run_turn(&mut self, parts: &RequestParts) -> Result<TurnOutcome, InvokeError> {
        let request = self
            .planner
            .plan(parts, &self.model_id, self.prior_boundary_index);

        let response = match self.invoker.invoke(&request, &self.model_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session = %self.id, model = %self.model_id, "model call failed: {}", e);
                return Err(e);
            }
        };

        let accounting = account_call(&self.model_id, &response.usage);
        log_cache_usage(&self.model_id, &accounting);
        self.cost.record(&accounting);

        if let Some(idx) = request.next_boundary_index {
            debug!(session = %self.id, boundary = idx, "carrying cache boundary to next turn");
            self.prior_boundary_index = Some(idx);
        }

        Ok(TurnOutcome {
            response,
            accounting,
            request,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Boundary that the next turn will preserve
    pub fn prior_boundary_index(&self) -> Option<usize> {
        self.prior_boundary_index
    }

    pub fn cost(&self) -> &SessionCost {
        &self.cost
    }

    /// Switch models mid-conversation.
    ///
    /// The old boundary belongs to another model's cache, so it is dropped.
    pub fn set_model(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
        self.prior_boundary_index = None;
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            id: self.id.clone(),
            model_id: self.model_id.clone(),
            prior_boundary_index: self.prior_boundary_index,
            cost: self.cost.clone(),
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub id: String,
    pub model_id: String,
    pub prior_boundary_index: Option<usize>,
    pub cost: SessionCost,
}

impl std::fmt::Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Session: {} ===", self.id)?;
        writeln!(f, "Model: {}", self.model_id)?;
        match self.prior_boundary_index {
            Some(idx) => writeln!(f, "Cache boundary: message {}", idx)?,
            None => writeln!(f, "Cache boundary: none")?,
        }
        write!(f, "{}", self.cost)
    }
}
