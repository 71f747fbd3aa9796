//! [`Model`] to use for inference.
use serde::{Deserialize, Serialize};

/// Model to use for inference.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
)]
pub enum Model {
    /// GPT-4o mini. This is the default model.
    #[default]
    #[serde(rename = "gpt-4o-mini")]
    #[display("gpt-4o-mini")]
    Gpt4oMini,
    /// GPT-4o
    #[serde(rename = "gpt-4o")]
    #[display("gpt-4o")]
    Gpt4o,
    /// GPT-4.1 mini
    #[serde(rename = "gpt-4.1-mini")]
    #[display("gpt-4.1-mini")]
    Gpt41Mini,
    /// GPT-4.1
    #[serde(rename = "gpt-4.1")]
    #[display("gpt-4.1")]
    Gpt41,
    /// GPT-3.5 Turbo
    #[serde(rename = "gpt-3.5-turbo")]
    #[display("gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl Model {
    /// Every known model.
    pub const ALL: [Self; 5] = [
        Self::Gpt4oMini,
        Self::Gpt4o,
        Self::Gpt41Mini,
        Self::Gpt41,
        Self::Gpt35Turbo,
    ];
}

/// Error for a model identifier this crate does not know.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown model: {0}")]
pub struct UnknownModel(pub String);

impl std::str::FromStr for Model {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.to_string() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_serde_matches_display() {
        for model in Model::ALL {
            let json = serde_json::to_string(&model).unwrap();
            assert_eq!(json, format!("\"{}\"", model));
            assert_eq!(model.to_string().parse::<Model>().unwrap(), model);
        }
    }

    #[test]
    fn test_default_model() {
        assert_eq!(Model::default().to_string(), "gpt-4o-mini");
    }

    #[test]
    fn test_unknown_model() {
        let err = "davinci".parse::<Model>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown model: davinci");
    }
}
