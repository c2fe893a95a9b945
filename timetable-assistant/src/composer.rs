use std::sync::Arc;

use crate::clock::{Clock, DateContext, SystemClock};
use crate::completion::{CompletionError, CompletionService};
use crate::prompt::{answer_prompt, summary_prompt, TimetableSource};

/// Returned in place of an answer or summary when the completion call fails.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error while processing your question.";

/// Natural-language restatement of a whole timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative(String);

impl Narrative {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Builds prompts and relays them to a completion service.
///
/// Holds no session state: the narrative is passed in on every question.
#[derive(Clone)]
pub struct Composer {
    completion: Arc<dyn CompletionService>,
    clock: Arc<dyn Clock>,
}

impl Composer {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self::with_clock(completion, Arc::new(SystemClock))
    }

    pub fn with_clock(completion: Arc<dyn CompletionService>, clock: Arc<dyn Clock>) -> Self {
        Self { completion, clock }
    }

    pub fn date_context(&self) -> DateContext {
        DateContext::from_clock(self.clock.as_ref())
    }

    pub async fn try_summarize(
        &self,
        source: TimetableSource<'_>,
    ) -> Result<Narrative, CompletionError> {
        let prompt = summary_prompt(source, &self.date_context());
        tracing::debug!(prompt_len = prompt.len(), "requesting timetable summary");

        self.completion.complete(&prompt).await.map(Narrative)
    }

    /// Like [`Composer::try_summarize`], but a failure becomes [`FALLBACK_MESSAGE`].
    pub async fn summarize(&self, source: TimetableSource<'_>) -> String {
        match self.try_summarize(source).await {
            Ok(narrative) => narrative.into_inner(),
            Err(err) => self.fallback("summary", &err),
        }
    }

    pub async fn try_answer(
        &self,
        question: &str,
        narrative: Option<&Narrative>,
    ) -> Result<String, CompletionError> {
        let ctx = self.date_context();
        let prompt = answer_prompt(question, narrative.map(Narrative::as_str), &ctx);
        tracing::debug!(
            prompt_len = prompt.len(),
            today = %ctx.today_name(),
            "requesting answer"
        );

        self.completion.complete(&prompt).await
    }

    /// Like [`Composer::try_answer`], but a failure becomes [`FALLBACK_MESSAGE`].
    pub async fn answer_question(&self, question: &str, narrative: Option<&Narrative>) -> String {
        match self.try_answer(question, narrative).await {
            Ok(answer) => answer,
            Err(err) => self.fallback("answer", &err),
        }
    }

    fn fallback(&self, request: &str, err: &CompletionError) -> String {
        tracing::warn!(
            provider = self.completion.name(),
            request,
            "completion failed: {err}"
        );
        FALLBACK_MESSAGE.to_string()
    }
}
