//! Cache boundary placement in the message list

use crate::api::{ContentBlock, ConversationMessage};
use crate::models::{capabilities_of, CacheableField, CapabilitySet};
use tracing::debug;

/// Return a copy of `messages` with cache markers appended to the chosen boundaries.
///
/// The boundaries are the last message plus `prior_boundary_index`, the
/// boundary the caller placed on the previous turn. Keeping the old boundary
/// lets the provider reuse the prefix it cached last time while a new one is
/// written for the grown conversation.
///
/// A message holding a tool result only takes a marker when the model can
/// also cache tools. Each boundary ends in exactly one marker, and markers left
/// on any other message by an earlier turn are stripped, so feeding the
/// planned messages back as history never grows the marker count.
///
/// Messages are never reordered or removed, and no block other than a
/// marker is touched. The planner keeps no state;
/// the caller stores [`final_boundary_index`] of the result for the next call.
pub fn plan_message_boundaries(
    messages: &[ConversationMessage],
    model_id: &str,
    prior_boundary_index: Option<usize>,
) -> Vec<ConversationMessage> {
    let capabilities = capabilities_of(model_id);
    if messages.is_empty() || !capabilities.contains(CacheableField::Messages) {
        return messages.to_vec();
    }

    let boundaries = boundary_candidates(messages, capabilities, prior_boundary_index);
    debug!(model = model_id, ?boundaries, "placing message cache boundaries");

    messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            if boundaries.contains(&idx) {
                with_trailing_cache_point(message)
            } else {
                without_cache_points(message)
            }
        })
        .collect()
}

/// Index of the last message that ends in a cache marker.
///
/// This is the value to pass as `prior_boundary_index` on the next turn.
pub fn final_boundary_index(messages: &[ConversationMessage]) -> Option<usize> {
    messages.iter().rposition(ConversationMessage::ends_with_cache_point)
}

fn boundary_candidates(
    messages: &[ConversationMessage],
    capabilities: CapabilitySet,
    prior_boundary_index: Option<usize>,
) -> Vec<usize> {
    let last = messages.len() - 1;
    let mut candidates = vec![last];

    match prior_boundary_index {
        Some(prior) if prior > last => {
            debug!(prior, len = messages.len(), "prior cache boundary out of range, dropped");
        }
        Some(prior) if prior != last => candidates.insert(0, prior),
        _ => {}
    }

    let tools_cacheable = capabilities.contains(CacheableField::Tools);
    candidates.retain(|&idx| {
        let legal = tools_cacheable || !messages[idx].has_tool_result();
        if !legal {
            debug!(index = idx, "skipping cache boundary after tool result");
        }
        legal
    });

    candidates
}

fn with_trailing_cache_point(message: &ConversationMessage) -> ConversationMessage {
    let mut marked = without_cache_points(message);
    marked.content.push(ContentBlock::cache_point());
    marked
}

fn without_cache_points(message: &ConversationMessage) -> ConversationMessage {
    let mut stripped = message.clone();
    stripped.content.retain(|block| !block.is_cache_point());
    stripped
}
