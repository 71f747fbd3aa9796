//! Reader [`Rating`]s for a generated article.
//!
//! Ratings are not stored anywhere by this crate. They are handed to a
//! [`RatingSink`] and what happens next is up to the sink.

use serde::{Deserialize, Serialize};

use crate::GeneratedArticle;

/// A score from 1 to 5 inclusive. Defaults to 3.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Lowest score.
    pub const MIN: Self = Self(1);
    /// Highest score.
    pub const MAX: Self = Self(5);

    /// The score as an integer.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Self(3)
    }
}

/// Error for a score outside `1..=5`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Score out of range: {0} (expected 1 to 5)")]
pub struct ScoreOutOfRange(pub u8);

impl TryFrom<u8> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// A reader's rating of one article.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Rating {
    /// 読みやすさ
    pub readability: Score,
    /// 内容の質
    pub quality: Score,
    /// 創造性
    pub creativity: Score,
}

impl Rating {
    /// Build a rating from raw integers.
    pub fn new(
        readability: u8,
        quality: u8,
        creativity: u8,
    ) -> Result<Self, ScoreOutOfRange> {
        Ok(Self {
            readability: readability.try_into()?,
            quality: quality.try_into()?,
            creativity: creativity.try_into()?,
        })
    }
}

/// Receives submitted ratings.
pub trait RatingSink {
    /// Called once per submitted rating with the article it rates.
    fn record(&self, article: &GeneratedArticle, rating: Rating);
}

/// A [`RatingSink`] that logs ratings and does nothing else. Without the
/// `log` feature it is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl RatingSink for LogSink {
    #[allow(unused_variables)]
    fn record(&self, article: &GeneratedArticle, rating: Rating) {
        #[cfg(feature = "log")]
        log::info!(
            "Rating for {}-character article: readability {}, quality {}, creativity {}",
            article.text.chars().count(),
            rating.readability,
            rating.quality,
            rating.creativity
        );
    }
}
