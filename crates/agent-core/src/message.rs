//! Chat Messages
//!
//! Standard message format handed to every chat-completion provider.

use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a chat request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    pub content: String,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Split a message list into the concatenated system prompt and the rest.
///
/// Some providers take the system prompt as a separate request field.
pub fn split_system(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let rest = messages.iter().filter(|m| m.role != Role::System).collect();

    if system.is_empty() {
        (None, rest)
    } else {
        (Some(system.join("\n\n")), rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(Message::system("Be brief.")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "system", "content": "Be brief." }));
    }

    #[test]
    fn test_split_system() {
        let messages = vec![
            Message::system("Be brief."),
            Message::user("Explain PT tokens"),
            Message::system("Use markdown."),
        ];

        let (system, rest) = split_system(&messages);
        assert_eq!(system.as_deref(), Some("Be brief.\n\nUse markdown."));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].role, Role::User);
    }

    #[test]
    fn test_split_without_system() {
        let messages = vec![Message::user("Hi")];
        let (system, rest) = split_system(&messages);
        assert!(system.is_none());
        assert_eq!(rest.len(), 1);
    }
}
