//! The request an agent process hands off to an `LlmOperations`
//! collaborator: messages, images, tool callbacks, prompt contributors, and
//! the output-class property filter that controls what a structured
//! completion is asked to fill in.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tools::ToolCallback;

/// Stable identifier for one LLM call, derived from `operation.name +
/// "-" + output-class.name`. Used as a cache/log key -- two calls with the
/// same id are the "same interaction" for logging/caching purposes, even if
/// their message history differs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InteractionId(String);

impl InteractionId {
    pub fn new(operation_name: &str, output_class_name: &str) -> Self {
        Self(format!("{operation_name}-{output_class_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who wrote a message in the accumulated conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One accumulated message. Images are appended to the most recent `User`
/// message, or start a new one if the history is empty or ends in an
/// `Assistant` message -- mirroring the source's "append to last user
/// message, or open a new one" image-attachment rule.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub image_urls: Vec<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image_urls: Vec::new(),
        }
    }
}

/// A static or context-derived snippet folded into the system/user prompt
/// before a call. Static contributors return the same text every time;
/// context-derived ones close over whatever state (current goal, recent
/// history) the caller wants reflected.
#[derive(Clone)]
pub struct PromptContributor {
    name: String,
    contribute: Arc<dyn Fn() -> String + Send + Sync>,
}

impl PromptContributor {
    pub fn new(name: impl Into<String>, contribute: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            contribute: Arc::new(contribute),
        }
    }

    pub fn r#static(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(name, move || text.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contribute(&self) -> String {
        (self.contribute)()
    }
}

impl std::fmt::Debug for PromptContributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptContributor").field("name", &self.name).finish()
    }
}

/// Which fields of the declared output class should be requested from the
/// model. An empty filter (the default) means "request every field";
/// non-empty means "only request these", used to keep a structured
/// completion cheap when a caller only needs part of a type filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    included: Vec<String>,
}

impl PropertyFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            included: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn wants(&self, field: &str) -> bool {
        self.included.is_empty() || self.included.iter().any(|f| f == field)
    }
}

/// A fully assembled request to an `LlmOperations` collaborator: the message
/// history (with images already folded in), every tool callback the call is
/// allowed to invoke (declared tool-objects, ad-hoc tool groups, and
/// sub-agent handoff callbacks, all flattened into one map keyed by tool
/// name), the prompt contributors that ran to build the system content, an
/// interaction id, and a property filter.
#[derive(Clone)]
pub struct LlmInteraction {
    pub id: InteractionId,
    pub messages: Vec<Message>,
    pub tools: HashMap<String, ToolCallback>,
    pub prompt_contributors: Vec<PromptContributor>,
    pub property_filter: PropertyFilter,
}

impl LlmInteraction {
    pub fn new(id: InteractionId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            tools: HashMap::new(),
            prompt_contributors: Vec::new(),
            property_filter: PropertyFilter::all(),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_tool(mut self, tool: ToolCallback) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolCallback>) -> Self {
        for tool in tools {
            self.tools.insert(tool.name().to_string(), tool);
        }
        self
    }

    pub fn with_prompt_contributor(mut self, contributor: PromptContributor) -> Self {
        self.prompt_contributors.push(contributor);
        self
    }

    pub fn with_property_filter(mut self, filter: PropertyFilter) -> Self {
        self.property_filter = filter;
        self
    }

    /// Append an image URL to the last `User` message, opening a fresh one
    /// if the history is empty or currently ends with an `Assistant` turn.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        match self.messages.last_mut() {
            Some(last) if last.role == Role::User => last.image_urls.push(url),
            _ => self.messages.push(Message {
                role: Role::User,
                content: String::new(),
                image_urls: vec![url],
            }),
        }
        self
    }

    /// Rendered system content: one line per prompt contributor, in
    /// registration order.
    pub fn system_prompt(&self) -> String {
        self.prompt_contributors
            .iter()
            .map(|c| c.contribute())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_id_is_derived_from_operation_and_output_class() {
        let id = InteractionId::new("makeZoo", "Zoo");
        assert_eq!(id.as_str(), "makeZoo-Zoo");
    }

    #[test]
    fn image_attaches_to_last_user_message() {
        let interaction = LlmInteraction::new(InteractionId::new("op", "Out"))
            .with_message(Message::new(Role::User, "describe this"))
            .with_image("https://example.com/a.png");
        assert_eq!(interaction.messages.len(), 1);
        assert_eq!(interaction.messages[0].image_urls, vec!["https://example.com/a.png".to_string()]);
    }

    #[test]
    fn image_opens_a_new_message_after_an_assistant_turn() {
        let interaction = LlmInteraction::new(InteractionId::new("op", "Out"))
            .with_message(Message::new(Role::User, "hi"))
            .with_message(Message::new(Role::Assistant, "hello"))
            .with_image("https://example.com/a.png");
        assert_eq!(interaction.messages.len(), 3);
        assert_eq!(interaction.messages[2].role, Role::User);
    }

    #[test]
    fn property_filter_defaults_to_requesting_everything() {
        let filter = PropertyFilter::all();
        assert!(filter.wants("anything"));

        let narrowed = PropertyFilter::only(["name"]);
        assert!(narrowed.wants("name"));
        assert!(!narrowed.wants("age"));
    }

    #[test]
    fn system_prompt_joins_contributors_in_order() {
        let interaction = LlmInteraction::new(InteractionId::new("op", "Out"))
            .with_prompt_contributor(PromptContributor::r#static("a", "first"))
            .with_prompt_contributor(PromptContributor::r#static("b", "second"));
        assert_eq!(interaction.system_prompt(), "first\nsecond");
    }
}
