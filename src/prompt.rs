//! [Chat Completions API] request type. We call it [`Prompt`] since in actual
//! usage this makes the code more readable.
//!
//! [Chat Completions API]: <https://platform.openai.com/docs/api-reference/chat/create>

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Model;

pub mod message;
pub use message::{Message, Role};

/// Request for the [Chat Completions API].
///
/// [Chat Completions API]: <https://platform.openai.com/docs/api-reference/chat/create>
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
#[serde(default)]
pub struct Prompt<'a> {
    /// [`Model`] to use for inference.
    pub model: Model,
    /// Input [`Message`]s. A new [`Role::Assistant`] message will be
    /// generated.
    pub messages: Vec<Message<'a>>,
    /// Upper bound on generated tokens. The server default applies if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Number of choices to generate. Only the first is used by
    /// [`Generate::generate`].
    ///
    /// [`Generate::generate`]: crate::Generate::generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u8>,
    /// Optional stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<Cow<'a, str>>>,
    /// Temperature for sampling. Must be between 0 and 2. Higher values mean
    /// more randomness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Top P nucleus sampling. The probabilities of each token are added in
    /// order from most to least likely until the probability mass exceeds
    /// `top_p`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Stable end-user identifier to help the provider detect abuse. Do not
    /// use PII here (email, phone).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Cow<'a, str>>,
}

impl<'a> Prompt<'a> {
    /// Set the [`model`] to a [`Model`].
    ///
    /// [`model`]: Prompt::model
    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set the [`messages`] from an iterable of [`Message`]s.
    ///
    /// [`messages`]: Prompt::messages
    pub fn messages<M, Ms>(mut self, messages: Ms) -> Self
    where
        M: Into<Message<'a>>,
        Ms: IntoIterator<Item = M>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Add a [`Message`] to [`messages`].
    ///
    /// [`messages`]: Prompt::messages
    pub fn add_message<M>(mut self, message: M) -> Self
    where
        M: Into<Message<'a>>,
    {
        self.messages.push(message.into());
        self
    }

    /// Set [`max_tokens`].
    ///
    /// [`max_tokens`]: Prompt::max_tokens
    pub fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Add a stop sequence to [`stop`].
    ///
    /// [`stop`]: Prompt::stop
    pub fn stop_sequence<S>(mut self, stop: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.stop
            .get_or_insert_with(Default::default)
            .push(stop.into());
        self
    }

    /// Set the [`temperature`] to `Some(value)` or [`None`] to use the default.
    ///
    /// [`temperature`]: Prompt::temperature
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the top P for nucleus sampling. Set to [`None`] to use the default
    /// value.
    pub fn top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set the end-user identifier.
    pub fn user<S>(mut self, user: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.user = Some(user.into());
        self
    }
}

impl<'a> From<&'a str> for Prompt<'a> {
    /// A prompt for the default [`Model`] with a single [`Role::User`]
    /// message.
    fn from(text: &'a str) -> Self {
        Self::default().add_message(Message::user(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_serialize_minimal() {
        let prompt = Prompt::from("秋の行楽スポット");
        assert_eq!(
            serde_json::to_value(&prompt).unwrap(),
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "user", "content": "秋の行楽スポット" }
                ]
            })
        );
    }

    #[test]
    fn test_prompt_builder() {
        let prompt = Prompt::default()
            .model(Model::Gpt4o)
            .messages([Message::system("Be brief.")])
            .add_message(Message::user("Hi"))
            .max_tokens(Some(256))
            .stop_sequence("END")
            .temperature(Some(0.7))
            .top_p(Some(0.9))
            .user("session-1");

        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hi");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["stop"][0], "END");
        assert_eq!(json["user"], "session-1");
        assert!(json.get("n").is_none());
    }

    #[test]
    fn test_prompt_deserialize_defaults() {
        let prompt: Prompt = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(prompt.model, Model::Gpt4oMini);
        assert_eq!(prompt, Prompt::from("x"));
    }
}
