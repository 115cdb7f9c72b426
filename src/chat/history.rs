//! Conversation → Gemini `contents` translation.

use crate::chat::types::{Message, Role};
use crate::env::persona::SYSTEM_ACKNOWLEDGMENT;
use crate::llm::types::Content;

/// Converts a conversation into the provider's wire format.
///
/// Gemini has no system role: a system message becomes a user turn with the
/// instructions followed by a fixed model acknowledgment. Assistant turns
/// map to `model`, user turns pass through. Order is preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryTranslator;

impl HistoryTranslator {
    pub fn translate(messages: &[Message]) -> Vec<Content> {
        let system_count = messages.iter().filter(|m| m.role == Role::System).count();
        let mut contents = Vec::with_capacity(messages.len() + system_count);

        for message in messages {
            match message.role {
                Role::System => {
                    contents.push(Content::user(message.content.clone()));
                    contents.push(Content::model(SYSTEM_ACKNOWLEDGMENT));
                }
                Role::Assistant => contents.push(Content::model(message.content.clone())),
                Role::User => contents.push(Content::user(message.content.clone())),
            }
        }

        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ProviderRole;

    #[test]
    fn test_system_message_expands_to_pair() {
        let messages = vec![Message::system("X"), Message::user("hi")];
        let contents = HistoryTranslator::translate(&messages);

        assert_eq!(
            contents,
            vec![
                Content::user("X"),
                Content::model("Understood. I will follow these instructions."),
                Content::user("hi"),
            ]
        );
    }

    #[test]
    fn test_assistant_becomes_model() {
        let contents = HistoryTranslator::translate(&[Message::assistant("hello there")]);
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, ProviderRole::Model);
        assert_eq!(contents[0].text(), "hello there");
    }

    #[test]
    fn test_non_system_order_preserved() {
        let messages = vec![
            Message::assistant("a"),
            Message::user("b"),
            Message::system("s"),
            Message::assistant("c"),
            Message::user("d"),
        ];
        let contents = HistoryTranslator::translate(&messages);
        assert_eq!(contents.len(), 6);

        let texts: Vec<String> = contents
            .iter()
            .map(Content::text)
            .filter(|t| t != "s" && t != SYSTEM_ACKNOWLEDGMENT)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_translate_is_idempotent() {
        let messages = vec![
            Message::system("persona"),
            Message::assistant("greeting"),
            Message::user("question"),
        ];
        assert_eq!(
            HistoryTranslator::translate(&messages),
            HistoryTranslator::translate(&messages)
        );
    }

    #[test]
    fn test_empty_conversation() {
        assert!(HistoryTranslator::translate(&[]).is_empty());
    }
}
