//! Routing-prefix normalization for model identifiers

/// Cross-region inference prefixes the provider puts in front of a model id
const ROUTING_PREFIXES: &[&str] = &["us", "eu", "apac", "jp", "au"];

/// Strip a known routing prefix (`us.`, `eu.`, `apac.`, ...) from a model id.
///
/// Ids without a recognised prefix come back unchanged, so the function is
/// total and idempotent on canonical ids.
pub fn normalize(model_id: &str) -> &str {
    match split_routing_prefix(model_id) {
        Some((_, canonical)) => canonical,
        None => model_id,
    }
}

/// The routing prefix of a model id, if it carries one
pub fn routing_prefix(model_id: &str) -> Option<&str> {
    split_routing_prefix(model_id).map(|(prefix, _)| prefix)
}

fn split_routing_prefix(model_id: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = model_id.split_once('.')?;
    ROUTING_PREFIXES.contains(&prefix).then_some((prefix, rest))
}
