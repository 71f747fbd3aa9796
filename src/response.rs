//! [`ChatCompletion`] response types for the [Chat Completions API].
//!
//! [Chat Completions API]: <https://platform.openai.com/docs/api-reference/chat/object>

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::prompt;

/// Successful response from the [Chat Completions API].
///
/// [Chat Completions API]: <https://platform.openai.com/docs/api-reference/chat/object>
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
pub struct ChatCompletion<'a> {
    /// Unique `id` for the completion.
    #[serde(default)]
    pub id: Cow<'a, str>,
    /// Model that generated the completion. This is usually a dated snapshot
    /// of the requested [`Model`], so it is kept as a string.
    ///
    /// [`Model`]: crate::Model
    #[serde(default)]
    pub model: Cow<'a, str>,
    /// Unix timestamp (seconds) of creation.
    #[serde(default)]
    pub created: u64,
    /// Generated [`Choice`]s. Usually exactly one.
    #[serde(default)]
    pub choices: Vec<Choice<'a>>,
    /// Usage statistics. Some compatible servers omit this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl<'a> ChatCompletion<'a> {
    /// The first [`Choice`], if any.
    pub fn first_choice(&self) -> Option<&Choice<'a>> {
        self.choices.first()
    }

    /// Trimmed text of the first [`Choice`]. [`None`] if there are no choices
    /// or the first choice carries no text.
    pub fn text(&self) -> Option<&str> {
        self.first_choice()?.message.content.as_deref().map(str::trim)
    }
}

/// One generated alternative.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
pub struct Choice<'a> {
    /// Position of this choice in [`ChatCompletion::choices`].
    #[serde(default)]
    pub index: u32,
    /// The generated [`prompt::Message`].
    pub message: prompt::Message<'a>,
    /// The reason the model stopped generating tokens.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Reason the model stopped generating tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model reached a natural stopping point or a stop sequence.
    Stop,
    /// Maximum tokens reached.
    Length,
    /// Content was omitted by a content filter.
    ContentFilter,
    /// The model called a tool.
    ToolCalls,
    /// Anything newer than this crate.
    #[serde(other)]
    Other,
}

/// Usage statistics from the API.
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
pub struct Usage {
    /// Number of prompt tokens used.
    pub prompt_tokens: u64,
    /// Number of tokens generated.
    pub completion_tokens: u64,
    /// Sum of the above.
    pub total_tokens: u64,
}
