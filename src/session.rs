//! Session scoped state for one front-end user.
//!
//! A [`Session`] holds at most one [`GeneratedArticle`]. A successful
//! [`submit`] replaces it; a failed one leaves it alone. Nothing is persisted
//! and the article is gone when the session is dropped.
//!
//! [`submit`]: Session::submit

use derive_more::derive::IsVariant;

use crate::{
    article::Download, client, GeneratedArticle, Generate, GenerationRequest,
    InputError, Rating, RatingSink,
};

/// Where a [`Session`] is in the submit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, IsVariant)]
pub enum Status {
    /// Nothing has been submitted, or a warning or failure was dismissed.
    #[default]
    Idle,
    /// Waiting on the generation service.
    Generating,
    /// The stored article is up to date with the last submit.
    Displayed,
    /// The last submit was rejected before reaching the service.
    Warning(InputError),
    /// The generation service failed on the last submit.
    Failed {
        /// Error text for the user.
        message: String,
    },
}

/// Why a [`Session::submit`] did not produce an article.
#[derive(Debug, thiserror::Error, IsVariant)]
pub enum SubmitError {
    /// The input was rejected. The service was not called.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The service call failed.
    #[error(transparent)]
    Service(#[from] client::Error),
}

/// State for one front-end session.
#[derive(Debug, Default)]
pub struct Session {
    article: Option<GeneratedArticle>,
    status: Status,
}

impl Session {
    /// An empty, [`Idle`] session.
    ///
    /// [`Idle`]: Status::Idle
    pub fn new() -> Self {
        Self::default()
    }

    /// Current [`Status`].
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The last successfully generated article, if any. This is what a
    /// front-end renders.
    pub fn article(&self) -> Option<&GeneratedArticle> {
        self.article.as_ref()
    }

    /// Validate raw front-end input and generate an article. `max_length` is
    /// a string-encoded integer.
    ///
    /// On invalid input the status becomes [`Status::Warning`] and
    /// `generator` is not called. See [`Self::submit_request`] for the rest.
    pub async fn submit<G>(
        &mut self,
        generator: &G,
        topic: &str,
        style: &str,
        max_length: &str,
    ) -> Result<&GeneratedArticle, SubmitError>
    where
        G: Generate,
    {
        let request = match GenerationRequest::parse(topic, style, max_length)
        {
            Ok(request) => request,
            Err(e) => {
                #[cfg(feature = "log")]
                log::warn!("Rejected input: {}", e);

                self.status = Status::Warning(e.clone());
                return Err(e.into());
            }
        };

        self.submit_request(generator, &request).await
    }

    /// Generate an article for an already validated request. Exactly one call
    /// is made to `generator`.
    ///
    /// On success the article replaces any stored one and the status becomes
    /// [`Status::Displayed`]. On failure the stored article is untouched and
    /// the status becomes [`Status::Failed`]. Blank text counts as a failure.
    pub async fn submit_request<G>(
        &mut self,
        generator: &G,
        request: &GenerationRequest,
    ) -> Result<&GeneratedArticle, SubmitError>
    where
        G: Generate,
    {
        #[cfg(feature = "log")]
        log::debug!(
            "Generating: style {:?}, max length {}",
            request.style,
            request.max_length
        );

        self.status = Status::Generating;

        let result = generator.generate(&request.prompt()).await.and_then(
            |text| {
                if text.trim().is_empty() {
                    Err(client::Error::UnexpectedResponse {
                        message: "The generated article is empty.",
                    })
                } else {
                    Ok(text)
                }
            },
        );

        match result {
            Ok(text) => {
                self.status = Status::Displayed;
                Ok(&*self.article.insert(GeneratedArticle::new(text)))
            }
            Err(e) => {
                #[cfg(feature = "log")]
                log::error!("Generation failed: {}", e);

                self.status = Status::Failed {
                    message: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// Acknowledge a [`Warning`] or [`Failed`] status. The session returns to
    /// [`Displayed`] if an article is stored and [`Idle`] otherwise.
    ///
    /// A [`Generating`] status is reset the same way. It can only be observed
    /// here if a submit future was dropped before completing, for example by a
    /// timeout in the front-end.
    ///
    /// [`Warning`]: Status::Warning
    /// [`Failed`]: Status::Failed
    /// [`Generating`]: Status::Generating
    /// [`Displayed`]: Status::Displayed
    /// [`Idle`]: Status::Idle
    pub fn dismiss(&mut self) {
        if !self.status.is_idle() && !self.status.is_displayed() {
            self.status = if self.article.is_some() {
                Status::Displayed
            } else {
                Status::Idle
            };
        }
    }

    /// The stored article as a [`Download`].
    pub fn download(&self) -> Option<Download> {
        self.article.as_ref().map(GeneratedArticle::download)
    }

    /// Hand a [`Rating`] for the stored article to `sink`. Returns `false`
    /// without calling `sink` if there is no article to rate.
    pub fn rate<S>(&self, sink: &S, rating: Rating) -> bool
    where
        S: RatingSink + ?Sized,
    {
        match &self.article {
            Some(article) => {
                sink.record(article, rating);
                true
            }
            None => false,
        }
    }
}
