//! Trailing cache markers for the system prompt and the tool list

use super::CachePoint;
use crate::api::{SystemBlock, ToolConfig, ToolListEntry};
use crate::models::{capabilities_of, CacheableField};

/// Append one cache marker to the end of the system prompt.
///
/// No-op when the prompt is empty or the model cannot cache `system`.
pub fn annotate_system(system: &[SystemBlock], model_id: &str) -> Vec<SystemBlock> {
    let mut annotated = system.to_vec();
    if system.is_empty() || !capabilities_of(model_id).contains(CacheableField::System) {
        return annotated;
    }
    if !system.last().is_some_and(SystemBlock::is_cache_point) {
        annotated.push(SystemBlock::CachePoint(CachePoint::default()));
    }
    annotated
}

/// Append one cache marker entry to the end of the tool list.
///
/// No-op when there is no tool config, the list is empty, or the model
/// cannot cache `tools`.
pub fn annotate_tools(tool_config: Option<&ToolConfig>, model_id: &str) -> Option<ToolConfig> {
    let mut annotated = tool_config.cloned()?;
    if annotated.is_empty() || !capabilities_of(model_id).contains(CacheableField::Tools) {
        return Some(annotated);
    }
    if !annotated.tools.last().is_some_and(ToolListEntry::is_cache_point) {
        annotated
            .tools
            .push(ToolListEntry::CachePoint(CachePoint::default()));
    }
    Some(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ToolSpec;
    use serde_json::json;

    const SONNET: &str = "anthropic.claude-3-7-sonnet-20250219-v1:0";
    const NOVA: &str = "amazon.nova-micro-v1:0";
    const UNKNOWN: &str = "mistral.mistral-large-2402-v1:0";

    fn two_tools() -> ToolConfig {
        ToolConfig::new(vec![
            ToolSpec::new("read_file", "Read a file", json!({ "type": "object" })),
            ToolSpec::new("list_dir", "List a directory", json!({ "type": "object" })),
        ])
    }

    #[test]
    fn test_system_gets_one_marker() {
        let system = vec![SystemBlock::text("You are a helpful assistant.")];
        let annotated = annotate_system(&system, SONNET);

        assert_eq!(annotated.len(), 2);
        assert!(annotated[1].is_cache_point());

        // Annotating again does not stack markers
        assert_eq!(annotate_system(&annotated, SONNET), annotated);
    }

    #[test]
    fn test_nova_caches_system() {
        let system = vec![SystemBlock::text("a"), SystemBlock::text("b")];
        let annotated = annotate_system(&system, &format!("eu.{NOVA}"));
        assert_eq!(annotated.len(), 3);
        assert!(annotated[2].is_cache_point());
    }

    #[test]
    fn test_empty_inputs_are_noop_for_every_model() {
        for model in [SONNET, NOVA, UNKNOWN] {
            assert!(annotate_system(&[], model).is_empty());
            let empty_tools = ToolConfig::new(vec![]);
            assert_eq!(annotate_tools(Some(&empty_tools), model), Some(empty_tools));
            assert_eq!(annotate_tools(None, model), None);
        }
    }

    #[test]
    fn test_tools_get_marker_entry() {
        let tools = two_tools();
        let annotated = annotate_tools(Some(&tools), SONNET).unwrap();

        assert_eq!(annotated.tools.len(), 3);
        assert!(annotated.tools[2].is_cache_point());
        assert_eq!(annotated.tool_specs().count(), 2);
    }

    #[test]
    fn test_tools_unchanged_without_tool_caching() {
        let tools = two_tools();
        assert_eq!(annotate_tools(Some(&tools), NOVA), Some(tools));
    }

    #[test]
    fn test_unknown_model_is_identity() {
        let system = vec![SystemBlock::text("prompt")];
        assert_eq!(annotate_system(&system, UNKNOWN), system);

        let tools = two_tools();
        assert_eq!(annotate_tools(Some(&tools), UNKNOWN), Some(tools));
    }
}
