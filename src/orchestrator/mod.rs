//! Turn orchestration over an external model invoker
//!
//! The planner and accountant are stateless. This module is the caller side
//! of that contract: it keeps the boundary from the previous turn and the
//! running session cost, and hands planned requests to a
//! [`ModelInvoker`](crate::api::ModelInvoker).

mod session;

pub use session::{CacheSession, SessionStats, TurnOutcome};
