//! Model identifiers and their prompt-caching capabilities
//!
//! A raw model id may carry a cross-region routing prefix (`us.`, `eu.`,
//! `apac.`). The prefix says which endpoint serves the request, not what the
//! model can do, so lookups always go through [`normalize`] first.

mod registry;
mod routing;

pub use registry::{
    capabilities_of, registered_models, supports_caching, CacheableField, CapabilitySet,
};
pub use routing::{normalize, routing_prefix};
