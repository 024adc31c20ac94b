//! Request structures in the provider's Converse shape

use crate::cache::CachePoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A block in a message's content list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentBlock {
    Text(String),
    Image(ImageBlock),
    ToolUse(ToolUseBlock),
    ToolResult(ToolResultBlock),
    CachePoint(CachePoint),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text(text.into())
    }

    pub fn cache_point() -> Self {
        ContentBlock::CachePoint(CachePoint::default())
    }

    pub fn is_cache_point(&self) -> bool {
        matches!(self, ContentBlock::CachePoint(_))
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, ContentBlock::ToolResult(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// png, jpeg, gif or webp
    pub format: String,
    pub source: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Base64-encoded image data
    pub bytes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUseBlock {
    pub tool_use_id: String,
    pub name: String,
    pub input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultBlock {
    pub tool_use_id: String,
    pub content: Vec<ToolResultContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolResultStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolResultContent {
    Text(String),
    Json(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultStatus {
    Success,
    Error,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl ConversationMessage {
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::text(text)])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::text(text)])
    }

    /// User message carrying the result of a tool call
    pub fn tool_result(tool_use_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(
            Role::User,
            vec![ContentBlock::ToolResult(ToolResultBlock {
                tool_use_id: tool_use_id.into(),
                content: vec![ToolResultContent::Text(output.into())],
                status: Some(ToolResultStatus::Success),
            })],
        )
    }

    pub fn has_tool_result(&self) -> bool {
        self.content.iter().any(ContentBlock::is_tool_result)
    }

    pub fn ends_with_cache_point(&self) -> bool {
        self.content.last().is_some_and(ContentBlock::is_cache_point)
    }

    pub fn cache_point_count(&self) -> usize {
        self.content.iter().filter(|b| b.is_cache_point()).count()
    }
}

/// A block of the system prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemBlock {
    Text(String),
    CachePoint(CachePoint),
}

impl SystemBlock {
    pub fn text(text: impl Into<String>) -> Self {
        SystemBlock::Text(text.into())
    }

    pub fn is_cache_point(&self) -> bool {
        matches!(self, SystemBlock::CachePoint(_))
    }
}

/// Tool definition offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    pub json: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: ToolInputSchema { json: schema },
        }
    }
}

/// Entry in the tool list.
///
/// The cache marker is its own variant so a dispatcher walking the list can
/// never treat it as an invocable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolListEntry {
    ToolSpec(ToolSpec),
    CachePoint(CachePoint),
}

impl ToolListEntry {
    pub fn is_cache_point(&self) -> bool {
        matches!(self, ToolListEntry::CachePoint(_))
    }
}

/// Tool configuration sent alongside the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub tools: Vec<ToolListEntry>,
    /// Passed through to the provider untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

impl ToolConfig {
    pub fn new(tools: Vec<ToolSpec>) -> Self {
        Self {
            tools: tools.into_iter().map(ToolListEntry::ToolSpec).collect(),
            tool_choice: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Real tools only; cache markers are skipped
    pub fn tool_specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().filter_map(|entry| match entry {
            ToolListEntry::ToolSpec(spec) => Some(spec),
            ToolListEntry::CachePoint(_) => None,
        })
    }

    /// Look up a tool by name for dispatch
    pub fn find_tool(&self, name: &str) -> Option<&ToolSpec> {
        self.tool_specs().find(|spec| spec.name == name)
    }
}

/// The three cacheable components of a request, before planning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParts {
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub system: Vec<SystemBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

impl RequestParts {
    pub fn new(messages: Vec<ConversationMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn with_system(mut self, system: Vec<SystemBlock>) -> Self {
        self.system = system;
        self
    }

    pub fn with_tools(mut self, tool_config: ToolConfig) -> Self {
        self.tool_config = Some(tool_config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_block_wire_shape() {
        let message = ConversationMessage::new(
            Role::User,
            vec![ContentBlock::text("hello"), ContentBlock::cache_point()],
        );
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    { "text": "hello" },
                    { "cachePoint": { "type": "default" } }
                ]
            })
        );
    }

    #[test]
    fn test_parse_tool_result_message() {
        let raw = json!({
            "role": "user",
            "content": [{
                "toolResult": {
                    "toolUseId": "t-1",
                    "content": [{ "json": { "ok": true } }],
                    "status": "success"
                }
            }]
        });
        let message: ConversationMessage = serde_json::from_value(raw).unwrap();
        assert!(message.has_tool_result());
        assert!(!message.ends_with_cache_point());
    }

    #[test]
    fn test_tool_lookup_skips_cache_point() {
        let mut config = ToolConfig::new(vec![
            ToolSpec::new("read_file", "Read a file", json!({ "type": "object" })),
        ]);
        config.tools.push(ToolListEntry::CachePoint(CachePoint::default()));

        assert_eq!(config.tool_specs().count(), 1);
        assert!(config.find_tool("read_file").is_some());
        assert!(config.find_tool("").is_none());
        assert!(config.find_tool("cachePoint").is_none());
    }

    #[test]
    fn test_request_parts_defaults() {
        let raw = json!({ "messages": [{ "role": "user", "content": [{ "text": "hi" }] }] });
        let parts: RequestParts = serde_json::from_value(raw).unwrap();
        assert_eq!(parts.messages.len(), 1);
        assert!(parts.system.is_empty());
        assert!(parts.tool_config.is_none());
    }
}
