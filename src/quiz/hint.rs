//! Hint requests for the phone and audience lifelines
//!
//! The session never talks to a language model itself. It emits a
//! [`HintRequest`] to its host, which resolves it against some
//! [`HintService`] whenever it likes and hands the [`HintResponse`] back.
//! Any failure of the service is absorbed here into a fixed fallback text.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::Question;
use crate::constants::hint::{FAILURE, NO_RESPONSE};

/// Which kind of hint to ask for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum HintMode {
    /// A friend picks an answer and briefly justifies it
    #[display("phone")]
    Phone,
    /// A simulated audience poll in percentages
    #[display("audience")]
    Audience,
}

/// Identifies which session state a hint request was issued from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintTag {
    /// Game generation at issue time
    pub generation: u64,
    /// Question index at issue time
    pub question_index: usize,
    /// Monotonic request counter within the session
    pub counter: u64,
}

/// A single request to the hint collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest {
    /// Where the request came from
    pub tag: HintTag,
    /// What kind of hint is wanted
    pub mode: HintMode,
    /// The question prompt
    pub question: String,
    /// The four options in display order
    pub options: Vec<String>,
    /// Text of the correct option
    pub correct: String,
}

/// Errors a [`HintService`] may report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    /// The service could not be reached or refused the request
    #[error("hint service unavailable: {0}")]
    Unavailable(String),
    /// The service answered with something that is not text
    #[error("malformed hint response: {0}")]
    Malformed(String),
}

/// An opaque generator of hint text
pub trait HintService {
    /// Produces hint text for `request`
    ///
    /// # Errors
    ///
    /// Any failure; callers substitute a fallback message.
    fn hint(&self, request: &HintRequest) -> Result<String, HintError>;
}

impl<F> HintService for F
where
    F: Fn(&HintRequest) -> Result<String, HintError>,
{
    fn hint(&self, request: &HintRequest) -> Result<String, HintError> {
        self(request)
    }
}

/// The completed result of a [`HintRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResponse {
    /// Tag of the request this answers
    pub tag: HintTag,
    /// Text to show the player
    pub text: String,
}

fn option_label(index: usize) -> char {
    char::from(b'A' + index as u8)
}

impl HintRequest {
    /// Builds a request about `question`
    pub fn new(tag: HintTag, mode: HintMode, question: &Question) -> Self {
        Self {
            tag,
            mode,
            question: question.text().to_owned(),
            options: question.options().to_vec(),
            correct: question.correct_option().to_owned(),
        }
    }

    /// The natural-language prompt sent to the collaborator
    pub fn prompt(&self) -> String {
        match self.mode {
            HintMode::Phone => {
                let options = self
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, option)| format!("{}) {option}", option_label(i)))
                    .join(", ");
                format!(
                    "Answer as a friend on a phone call. Game: 'Who Wants to Be a Millionaire?'. \
                     Question: '{}'. Options: {options}. Pick the correct answer and explain \
                     briefly (at most 2 sentences). Answer in English.",
                    self.question
                )
            }
            HintMode::Audience => {
                let labels = (0..self.options.len()).map(option_label).join(", ");
                let layout = (0..self.options.len())
                    .map(|i| format!("{}: n%", option_label(i)))
                    .join(", ");
                format!(
                    "Show the result of a studio audience vote in percentages. Question: '{}'. \
                     Options: {labels}. Correct answer: {}. Give the correct answer the largest \
                     share, formatted as '{layout}', summing to about 100. Show only the \
                     percentages. Answer in English.",
                    self.question, self.correct
                )
            }
        }
    }

    /// Asks `service` for the hint, substituting fallbacks on failure
    ///
    /// Never fails: an error becomes [`FAILURE`] and blank output becomes
    /// [`NO_RESPONSE`].
    pub fn resolve_with<S: HintService + ?Sized>(&self, service: &S) -> HintResponse {
        let text = match service.hint(self) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(mode = %self.mode, "hint service returned an empty response");
                NO_RESPONSE.to_owned()
            }
            Err(error) => {
                tracing::warn!(mode = %self.mode, %error, "hint service failed");
                FAILURE.to_owned()
            }
        };

        HintResponse {
            tag: self.tag,
            text,
        }
    }
}
