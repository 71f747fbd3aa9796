#![deny(warnings)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! `ghostwriter` writes short articles using an [OpenAI compatible] chat
//! completion API.
//!
//! A front-end collects a topic, a [`Style`] and a [`MaxLength`] and hands
//! them to a [`Session`]. The session validates them into a
//! [`GenerationRequest`], builds the prompt, asks a [`Generate`]
//! implementation (usually a [`Client`]) for the text and keeps the resulting
//! [`GeneratedArticle`] until the next successful generation.
//!
//! [OpenAI compatible]: <https://platform.openai.com/docs/api-reference/chat>
//!
//! See the `demos` directory for a terminal front-end.

pub mod key;
pub use key::Key;

pub mod client;
pub use client::{Client, Generate};

pub mod config;
pub use config::Config;

pub mod model;
pub use model::Model;

pub mod prompt;
pub use prompt::Prompt;

pub mod response;
pub use response::ChatCompletion;

pub mod article;
pub use article::{
    GeneratedArticle, GenerationRequest, InputError, MaxLength, Style,
};

pub mod rating;
pub use rating::{Rating, RatingSink, Score};

pub mod session;
pub use session::{Session, Status, SubmitError};

/// Re-exports of commonly used crates to avoid version conflicts.
pub mod exports {
    #[cfg(feature = "log")]
    pub use log;
    pub use reqwest;
    pub use serde;
    pub use serde_json;
}
