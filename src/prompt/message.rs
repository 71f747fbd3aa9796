//! A [`prompt::Message`] and its [`Role`]. The API returns the same type
//! inside each response [`Choice`].
//!
//! [`prompt::Message`]: crate::prompt::Message
//! [`Choice`]: crate::response::Choice

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role of the [`Message`] author.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// From the user.
    User,
    /// From the AI.
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
pub struct Message<'a> {
    /// Who is the message from.
    pub role: Role,
    /// Text of the message. The API may send `null` for assistant messages
    /// that carry no text.
    #[serde(default)]
    pub content: Option<Cow<'a, str>>,
}

impl<'a> Message<'a> {
    /// A [`Role::User`] message.
    pub fn user<T>(content: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        (Role::User, content).into()
    }

    /// A [`Role::System`] message.
    pub fn system<T>(content: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        (Role::System, content).into()
    }
}

impl<'a, T> From<(Role, T)> for Message<'a>
where
    T: Into<Cow<'a, str>>,
{
    fn from((role, content): (Role, T)) -> Self {
        Self {
            role,
            content: Some(content.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"assistant\"").unwrap(),
            Role::Assistant
        );
    }

    #[test]
    fn test_message_serialize() {
        let message = Message::user("こんにちは");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            serde_json::json!({ "role": "user", "content": "こんにちは" })
        );
    }

    #[test]
    fn test_message_null_content() {
        let message: Message =
            serde_json::from_str(r#"{"role":"assistant","content":null}"#)
                .unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, None);
    }
}
