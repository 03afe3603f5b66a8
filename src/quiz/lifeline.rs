//! Lifelines
//!
//! Three one-time aids per game. Elimination is resolved locally; the other
//! two produce a textual hint through [`super::hint`].

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{hint::HintMode, question::Question};
use crate::constants::lifeline::ELIMINATED_COUNT;

/// The kinds of lifeline available to the player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize, derive_more::Display,
)]
pub enum Lifeline {
    /// Hide two wrong options
    #[display("50:50")]
    Elimination,
    /// Ask a friend on the phone
    #[display("Phone a friend")]
    PhoneFriend,
    /// Poll the studio audience
    #[display("Ask the audience")]
    AskAudience,
}

impl Lifeline {
    /// The hint mode this lifeline requests, if it is a hint lifeline
    pub fn hint_mode(self) -> Option<HintMode> {
        match self {
            Self::Elimination => None,
            Self::PhoneFriend => Some(HintMode::Phone),
            Self::AskAudience => Some(HintMode::Audience),
        }
    }
}

/// Update messages sent when a lifeline is used or a hint changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// The lifeline has just been spent
    Used(Lifeline),
    /// Options hidden by elimination, ascending
    OptionsRemoved(Vec<usize>),
    /// Whether any hint request for the current question is outstanding
    HintPending(bool),
    /// The latest hint text for the current question
    Hint(String),
}

/// Which lifelines have been spent this game
///
/// Flags only ever go from unused to used; a fresh value is created on
/// restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifelines(EnumMap<Lifeline, bool>);

impl Lifelines {
    /// Whether `lifeline` has been used
    pub fn is_used(&self, lifeline: Lifeline) -> bool {
        self.0[lifeline]
    }

    /// Marks `lifeline` as used
    ///
    /// # Returns
    ///
    /// `true` if it was unused before this call
    pub fn mark_used(&mut self, lifeline: Lifeline) -> bool {
        !std::mem::replace(&mut self.0[lifeline], true)
    }

    /// Lifelines still available
    pub fn remaining(&self) -> Vec<Lifeline> {
        self.0
            .iter()
            .filter(|(_, used)| !**used)
            .map(|(lifeline, _)| lifeline)
            .collect_vec()
    }
}

/// Picks the options hidden by the elimination lifeline
///
/// Returns [`ELIMINATED_COUNT`] distinct incorrect indices in ascending
/// order, chosen uniformly without replacement. The correct index is never
/// included.
pub fn eliminate(question: &Question) -> Vec<usize> {
    let mut wrong = question.incorrect_indices();
    fastrand::shuffle(&mut wrong);
    wrong.truncate(ELIMINATED_COUNT);
    wrong.sort_unstable();
    wrong
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::QuestionBank;

    #[test]
    fn test_mark_used_once() {
        let mut lifelines = Lifelines::default();
        assert!(!lifelines.is_used(Lifeline::PhoneFriend));
        assert!(lifelines.mark_used(Lifeline::PhoneFriend));
        assert!(!lifelines.mark_used(Lifeline::PhoneFriend));
        assert!(lifelines.is_used(Lifeline::PhoneFriend));
        assert!(!lifelines.is_used(Lifeline::AskAudience));
    }

    #[test]
    fn test_remaining() {
        let mut lifelines = Lifelines::default();
        lifelines.mark_used(Lifeline::Elimination);
        assert_eq!(
            lifelines.remaining(),
            vec![Lifeline::PhoneFriend, Lifeline::AskAudience]
        );
    }

    #[test]
    fn test_eliminate_never_removes_correct_answer() {
        let bank = QuestionBank::builtin().unwrap();
        for index in 0..bank.len() {
            let question = bank.get(index).unwrap();
            for _ in 0..50 {
                let removed = eliminate(question);
                assert_eq!(removed.len(), ELIMINATED_COUNT);
                assert!(!removed.contains(&question.answer_index()));
                assert_ne!(removed[0], removed[1]);
            }
        }
    }

    #[test]
    fn test_hint_modes() {
        assert_eq!(Lifeline::Elimination.hint_mode(), None);
        assert_eq!(Lifeline::PhoneFriend.hint_mode(), Some(HintMode::Phone));
        assert_eq!(Lifeline::AskAudience.hint_mode(), Some(HintMode::Audience));
    }

    #[test]
    fn test_display() {
        assert_eq!(Lifeline::Elimination.to_string(), "50:50");
    }
}
