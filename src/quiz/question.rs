//! Questions and the question bank
//!
//! A game is played over a fixed bank of fifteen four-option questions, one
//! per rung of the prize ladder. Banks are loaded from JSON and validated
//! before a session may use them.

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::constants::bank::{
    MAX_EXPLANATION_LENGTH, MAX_OPTION_LENGTH, MAX_TEXT_LENGTH, OPTION_COUNT, QUESTION_COUNT,
};

const BUILTIN_BANK: &str = include_str!("../../data/questions.json");

/// Errors produced while loading a question bank
#[derive(Error, Debug)]
pub enum Error {
    /// The input was not valid question JSON
    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),
    /// A question or the bank violates a field constraint
    #[error("invalid question bank: {0}")]
    Invalid(#[from] garde::Report),
    /// A question's level does not match its position in the bank
    #[error("question at position {position} has level {level}")]
    LevelMismatch {
        /// 1-based position of the offending question
        position: usize,
        /// The level it declares
        level: u32,
    },
}

fn valid_answer_index(options: &[String]) -> impl FnOnce(&usize, &()) -> garde::Result + '_ {
    move |answer_index, ()| {
        if *answer_index < options.len() {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "answer index {answer_index} is outside of the {} options",
                options.len()
            )))
        }
    }
}

/// A single multiple choice question
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Identifier, unique within the bank
    #[garde(skip)]
    id: u32,
    /// The prompt shown to the player
    #[garde(length(min = 1, max = MAX_TEXT_LENGTH))]
    text: String,
    /// The answer options, in display order
    #[garde(
        length(min = OPTION_COUNT, max = OPTION_COUNT),
        inner(length(min = 1, max = MAX_OPTION_LENGTH))
    )]
    options: Vec<String>,
    /// Index into `options` of the correct answer
    #[garde(custom(valid_answer_index(&self.options)))]
    answer_index: usize,
    /// Optional explanation revealed after the game ends
    #[garde(length(max = MAX_EXPLANATION_LENGTH))]
    explanation: Option<String>,
    /// Difficulty, equal to the question's 1-based position in the bank
    #[garde(skip)]
    level: u32,
}

impl Question {
    /// Returns the identifier of this question
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the prompt text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the answer options in display order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the index of the correct option
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    /// Returns the text of the correct option
    pub fn correct_option(&self) -> &str {
        self.options
            .get(self.answer_index)
            .map_or("", String::as_str)
    }

    /// Returns the explanation, if the bank provides one
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns the difficulty level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Whether `index` is the correct option
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.answer_index
    }

    /// Indices of every option except the correct one
    pub fn incorrect_indices(&self) -> Vec<usize> {
        (0..self.options.len())
            .filter(|i| *i != self.answer_index)
            .collect_vec()
    }
}

/// The ordered set of questions a game walks through
///
/// Only banks that passed validation can be constructed, so a session can
/// index any question in `0..QUESTION_COUNT` without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionBank {
    #[garde(length(min = QUESTION_COUNT, max = QUESTION_COUNT), dive)]
    questions: Vec<Question>,
}

impl TryFrom<Vec<Question>> for QuestionBank {
    type Error = Error;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::from_questions(questions)
    }
}

impl From<QuestionBank> for Vec<Question> {
    fn from(bank: QuestionBank) -> Self {
        bank.questions
    }
}

impl QuestionBank {
    /// Parses and validates a bank from a JSON array of questions
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, if any field constraint is
    /// violated, or if a question's level does not match its position.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::from_questions(questions)
    }

    /// Validates an already constructed list of questions
    ///
    /// # Errors
    ///
    /// Same conditions as [`QuestionBank::from_json`].
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, Error> {
        let bank = Self { questions };
        bank.check()?;
        Ok(bank)
    }

    /// Returns the bank shipped with the crate
    ///
    /// # Errors
    ///
    /// Only fails if the embedded data has been edited into an invalid state.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_json(BUILTIN_BANK)
    }

    fn check(&self) -> Result<(), Error> {
        self.validate()?;

        if let Some((position, question)) = self
            .questions
            .iter()
            .enumerate()
            .find(|(i, q)| q.level as usize != i + 1)
        {
            return Err(Error::LevelMismatch {
                position: position + 1,
                level: question.level,
            });
        }

        Ok(())
    }

    /// Returns the question at a 0-based index
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions in the bank
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a validated bank
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the final question
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }
}
