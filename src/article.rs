//! Article prompts and results: the [`Style`] and [`MaxLength`] tables, the
//! validated [`GenerationRequest`], [`build_prompt`] itself and the
//! [`GeneratedArticle`] with its [`Download`].

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Build the instruction sent to the model. Arguments are used verbatim;
/// validation happens in [`GenerationRequest`].
///
/// The instruction restates the topic, asks for a title, a table of contents
/// and the content in that order, caps the content at `max_length` characters
/// and asks for the given style.
pub fn build_prompt(topic: &str, style: &str, max_length: &str) -> String {
    format!(
        "{topic} また、これを記事として読めるように、記事のタイトル、目次、内容の順番で出力してください。\
         内容は{max_length}文字以内で出力してください。\
         また、文章は{style}にしてください。"
    )
}

/// Tone of the generated prose.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Style {
    /// ユーモアを交えた文章
    #[default]
    Humorous,
    /// 中立的で客観的な文章
    Neutral,
    /// 分かりやすい、簡潔な文章
    Concise,
    /// 親しみやすいトーンの文章
    Friendly,
    /// 専門用語をできるだけ使わない、一般読者向けの文章
    Layperson,
    /// 言葉の使い方にこだわり、正確な表現を心がけた文章
    Precise,
    /// シンプルかつわかりやすい文法を使った文章
    SimpleGrammar,
    /// 面白く、興味深い内容を伝える文章
    Engaging,
    /// 具体的でイメージしやすい表現を使った文章
    Concrete,
    /// 人間味のある、感情や思いを表現する文章
    Emotional,
    /// 引用や参考文献を適切に挿入した、信頼性の高い文章
    WellSourced,
    /// 読み手の興味を引きつけるタイトルやサブタイトルを使った文章
    CatchyHeadings,
    /// 統計データや図表を用いたわかりやすい文章
    DataDriven,
    /// 独自の見解や考え方を示した、論理的な文章
    Opinion,
    /// 問題提起から解決策までを網羅した、解説的な文章
    ProblemSolution,
    /// ニュース性の高い、旬なトピックを取り上げた文章
    Topical,
    /// エンターテイメント性のある、軽快な文章
    Entertaining,
    /// 読者の関心に合わせた、専門的な内容を深く掘り下げた文章
    DeepDive,
    /// 人物紹介やインタビューを取り入れた、読み物的な文章
    Feature,
}

impl Style {
    /// Every style, in display order.
    pub const ALL: [Self; 19] = [
        Self::Humorous,
        Self::Neutral,
        Self::Concise,
        Self::Friendly,
        Self::Layperson,
        Self::Precise,
        Self::SimpleGrammar,
        Self::Engaging,
        Self::Concrete,
        Self::Emotional,
        Self::WellSourced,
        Self::CatchyHeadings,
        Self::DataDriven,
        Self::Opinion,
        Self::ProblemSolution,
        Self::Topical,
        Self::Entertaining,
        Self::DeepDive,
        Self::Feature,
    ];

    /// The descriptor placed in the prompt.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Humorous => "ユーモアを交えた文章",
            Self::Neutral => "中立的で客観的な文章",
            Self::Concise => "分かりやすい、簡潔な文章",
            Self::Friendly => "親しみやすいトーンの文章",
            Self::Layperson => {
                "専門用語をできるだけ使わない、一般読者向けの文章"
            }
            Self::Precise => {
                "言葉の使い方にこだわり、正確な表現を心がけた文章"
            }
            Self::SimpleGrammar => "シンプルかつわかりやすい文法を使った文章",
            Self::Engaging => "面白く、興味深い内容を伝える文章",
            Self::Concrete => "具体的でイメージしやすい表現を使った文章",
            Self::Emotional => "人間味のある、感情や思いを表現する文章",
            Self::WellSourced => {
                "引用や参考文献を適切に挿入した、信頼性の高い文章"
            }
            Self::CatchyHeadings => {
                "読み手の興味を引きつけるタイトルやサブタイトルを使った文章"
            }
            Self::DataDriven => "統計データや図表を用いたわかりやすい文章",
            Self::Opinion => "独自の見解や考え方を示した、論理的な文章",
            Self::ProblemSolution => {
                "問題提起から解決策までを網羅した、解説的な文章"
            }
            Self::Topical => "ニュース性の高い、旬なトピックを取り上げた文章",
            Self::Entertaining => "エンターテイメント性のある、軽快な文章",
            Self::DeepDive => {
                "読者の関心に合わせた、専門的な内容を深く掘り下げた文章"
            }
            Self::Feature => {
                "人物紹介やインタビューを取り入れた、読み物的な文章"
            }
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| InputError::UnknownStyle(s.to_string()))
    }
}

impl TryFrom<String> for Style {
    type Error = InputError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Style> for &'static str {
    fn from(style: Style) -> Self {
        style.as_str()
    }
}

/// Upper bound on the article body in characters. One of `100, 200, ...,
/// 1000`.
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
#[serde(try_from = "u16", into = "u16")]
pub struct MaxLength(u16);

impl MaxLength {
    /// Smallest allowed value.
    pub const MIN: u16 = 100;
    /// Largest allowed value.
    pub const MAX: u16 = 1000;
    /// Distance between allowed values.
    pub const STEP: u16 = 100;

    /// Every allowed value, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX)
            .step_by(Self::STEP as usize)
            .map(Self)
    }

    /// The number of characters.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self(300)
    }
}

impl TryFrom<u16> for MaxLength {
    type Error = InputError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) && value % Self::STEP == 0
        {
            Ok(Self(value))
        } else {
            Err(InputError::InvalidMaxLength(value.to_string()))
        }
    }
}

impl From<MaxLength> for u16 {
    fn from(max_length: MaxLength) -> Self {
        max_length.0
    }
}

impl FromStr for MaxLength {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map_err(|_| InputError::InvalidMaxLength(s.to_string()))?
            .try_into()
    }
}

/// Input rejected before anything is sent to the service.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// No topic was given.
    #[error("The topic is empty.")]
    EmptyTopic,
    /// The style is not one of [`Style::ALL`].
    #[error("Unknown style: {0}")]
    UnknownStyle(String),
    /// The length is not one of [`MaxLength::all`].
    #[error(
        "Invalid max length: {0} (expected {min} to {max} in steps of {step})",
        min = MaxLength::MIN,
        max = MaxLength::MAX,
        step = MaxLength::STEP
    )]
    InvalidMaxLength(String),
}

/// A validated article request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    topic: String,
    /// Tone of the article.
    pub style: Style,
    /// Cap on the body length.
    pub max_length: MaxLength,
}

impl GenerationRequest {
    /// Create a request. Fails with [`InputError::EmptyTopic`] if `topic` is
    /// empty or only whitespace. The topic is otherwise kept verbatim.
    pub fn new<S>(
        topic: S,
        style: Style,
        max_length: MaxLength,
    ) -> Result<Self, InputError>
    where
        S: Into<String>,
    {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(InputError::EmptyTopic);
        }

        Ok(Self {
            topic,
            style,
            max_length,
        })
    }

    /// Create a request from the raw strings a front-end collects. The
    /// maximum length is a string-encoded integer.
    pub fn parse(
        topic: &str,
        style: &str,
        max_length: &str,
    ) -> Result<Self, InputError> {
        if topic.trim().is_empty() {
            return Err(InputError::EmptyTopic);
        }

        Self::new(topic, style.parse()?, max_length.parse()?)
    }

    /// The topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The instruction for the model. See [`build_prompt`].
    pub fn prompt(&self) -> String {
        build_prompt(
            &self.topic,
            self.style.as_str(),
            &self.max_length.to_string(),
        )
    }
}

/// Text produced by one successful generation.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[display("{text}")]
pub struct GeneratedArticle {
    /// The article, exactly as returned by the service (trimmed).
    pub text: String,
}

impl GeneratedArticle {
    /// Name of the exported file.
    pub const FILE_NAME: &'static str = "generated_article.txt";
    /// MIME type of the exported file.
    pub const MIME: &'static str = "text/plain";

    /// Wrap generated text.
    pub fn new<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        Self { text: text.into() }
    }

    /// The article as a downloadable plain text file. The bytes are the UTF-8
    /// text with no transformation.
    pub fn download(&self) -> Download {
        Download {
            file_name: Self::FILE_NAME,
            mime: Self::MIME,
            bytes: self.text.clone().into_bytes(),
        }
    }
}

/// A file a front-end can offer for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name.
    pub file_name: &'static str,
    /// MIME type.
    pub mime: &'static str,
    /// File content.
    pub bytes: Vec<u8>,
}

impl Download {
    /// Write the file into `dir` under [`Self::file_name`], replacing any
    /// existing file. Returns the path written.
    pub fn save_to<P>(&self, dir: P) -> std::io::Result<PathBuf>
    where
        P: AsRef<Path>,
    {
        let path = dir.as_ref().join(self.file_name);
        std::fs::write(&path, &self.bytes)?;

        #[cfg(feature = "log")]
        log::info!("Saved {} bytes to {}", self.bytes.len(), path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_exact() {
        assert_eq!(
            build_prompt("秋の行楽スポット", "ユーモアを交えた文章", "300"),
            "秋の行楽スポット また、これを記事として読めるように、記事のタイトル、目次、内容の順番で出力してください。内容は300文字以内で出力してください。また、文章はユーモアを交えた文章にしてください。"
        );
    }

    #[test]
    fn test_prompt_contains_inputs_for_every_combination() {
        for topic in ["秋の行楽スポット", "Rust", "a b c"] {
            for style in Style::ALL {
                for max_length in MaxLength::all() {
                    let request =
                        GenerationRequest::new(topic, style, max_length)
                            .unwrap();
                    let prompt = request.prompt();

                    assert!(prompt.starts_with(topic));
                    assert!(prompt.contains(style.as_str()));
                    assert!(prompt
                        .contains(&format!("{}文字以内", max_length.get())));

                    let title = prompt.find("タイトル").unwrap();
                    let toc = prompt.find("目次").unwrap();
                    let body = prompt.find("内容の順番").unwrap();
                    assert!(title < toc && toc < body);
                }
            }
        }
    }

    #[test]
    fn test_build_prompt_is_verbatim() {
        // The raw builder performs no validation.
        let prompt = build_prompt("", "odd style", "12345");
        assert!(prompt.contains("12345文字以内"));
        assert!(prompt.contains("文章はodd styleにしてください"));
    }

    #[test]
    fn test_style_table() {
        assert_eq!(Style::ALL.len(), 19);
        assert_eq!(Style::default().as_str(), "ユーモアを交えた文章");

        let unique: std::collections::HashSet<_> =
            Style::ALL.iter().map(Style::as_str).collect();
        assert_eq!(unique.len(), 19);

        for style in Style::ALL {
            assert_eq!(style.as_str().parse::<Style>().unwrap(), style);
            assert_eq!(style.to_string(), style.as_str());
        }
    }

    #[test]
    fn test_style_serde() {
        let json = serde_json::to_string(&Style::Neutral).unwrap();
        assert_eq!(json, "\"中立的で客観的な文章\"");
        assert!(serde_json::from_str::<Style>("\"Neutral\"").is_err());
    }

    #[test]
    fn test_max_length_table() {
        let all: Vec<u16> = MaxLength::all().map(MaxLength::get).collect();
        assert_eq!(all, [100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]);
        assert_eq!(MaxLength::default().get(), 300);

        assert_eq!(" 500 ".parse::<MaxLength>().unwrap().get(), 500);
        for bad in ["0", "50", "250", "1100", "-100", "abc", ""] {
            assert!(
                matches!(
                    bad.parse::<MaxLength>(),
                    Err(InputError::InvalidMaxLength(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert!(serde_json::from_str::<MaxLength>("150").is_err());
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            GenerationRequest::parse("", "ユーモアを交えた文章", "300"),
            Err(InputError::EmptyTopic)
        );
        assert_eq!(
            GenerationRequest::parse("  \n", "nonsense", "abc"),
            Err(InputError::EmptyTopic)
        );
        assert_eq!(
            GenerationRequest::parse("topic", "nonsense", "300"),
            Err(InputError::UnknownStyle("nonsense".to_string()))
        );
        assert!(matches!(
            GenerationRequest::parse("topic", "ユーモアを交えた文章", "301"),
            Err(InputError::InvalidMaxLength(_))
        ));

        let request =
            GenerationRequest::parse(" topic ", "中立的で客観的な文章", "700")
                .unwrap();
        assert_eq!(request.topic(), " topic ");
        assert_eq!(request.style, Style::Neutral);
        assert_eq!(request.max_length.get(), 700);
    }

    #[test]
    fn test_invalid_max_length_message() {
        assert_eq!(
            InputError::InvalidMaxLength("42".into()).to_string(),
            "Invalid max length: 42 (expected 100 to 1000 in steps of 100)"
        );
    }

    #[test]
    fn test_download() {
        let text = "Title\n\nToC\n\nBody 本文";
        let article = GeneratedArticle::new(text);
        let download = article.download();

        assert_eq!(download.file_name, "generated_article.txt");
        assert_eq!(download.mime, "text/plain");
        assert_eq!(download.bytes, text.as_bytes());

        let dir = tempfile::tempdir().unwrap();
        let path = download.save_to(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "generated_article.txt");
        assert_eq!(std::fs::read(path).unwrap(), text.as_bytes());
    }
}
