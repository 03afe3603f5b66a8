//! Prize ladder
//!
//! Fifteen display amounts, one per question. Every fifth rung is a safe
//! point: once passed, a wrong answer still pays out that rung's amount.

use itertools::Itertools;
use serde::Serialize;

use crate::constants::{
    bank::QUESTION_COUNT,
    ladder::{SAFE_POINT_INTERVAL, ZERO_PRIZE},
};

/// Amount at stake for each question, index-aligned with the bank
pub const PRIZES: [&str; QUESTION_COUNT] = [
    "500 ₸",
    "1 000 ₸",
    "2 000 ₸",
    "3 000 ₸",
    "5 000 ₸",
    "10 000 ₸",
    "15 000 ₸",
    "25 000 ₸",
    "50 000 ₸",
    "100 000 ₸",
    "200 000 ₸",
    "400 000 ₸",
    "800 000 ₸",
    "1 500 000 ₸",
    "5 000 000 ₸",
];

/// Amount at stake for the question at `index`
///
/// Indices past the top rung clamp to it.
pub fn prize_at(index: usize) -> &'static str {
    PRIZES[index.min(QUESTION_COUNT - 1)]
}

/// The top prize, paid out on winning
pub fn top_prize() -> &'static str {
    PRIZES[QUESTION_COUNT - 1]
}

/// Whether the rung at `index` locks in a guaranteed prize
pub fn is_safe_point(index: usize) -> bool {
    (index + 1) % SAFE_POINT_INTERVAL == 0
}

/// Prize kept when the player answers the question at `index` wrongly
///
/// The amount of the highest safe point strictly below `index`, or
/// [`ZERO_PRIZE`] before the first one.
pub fn safe_prize(index: usize) -> &'static str {
    (0..index.min(QUESTION_COUNT - 1))
        .rev()
        .find(|i| is_safe_point(*i))
        .map_or(ZERO_PRIZE, prize_at)
}

/// Where a rung sits relative to the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RungState {
    /// Already answered
    Passed,
    /// The question being played
    Current,
    /// Not reached yet
    Ahead,
}

/// A single rung as shown beside the question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rung {
    /// 1-based question number
    pub number: usize,
    /// Display amount
    pub prize: &'static str,
    /// Whether this rung is a safe point
    pub safe: bool,
    /// Position relative to the current question
    pub state: RungState,
}

/// The whole ladder, top rung last, for the question at `current`
pub fn rungs(current: usize) -> Vec<Rung> {
    PRIZES
        .iter()
        .enumerate()
        .map(|(i, prize)| Rung {
            number: i + 1,
            prize: *prize,
            safe: is_safe_point(i),
            state: match i.cmp(&current) {
                std::cmp::Ordering::Less => RungState::Passed,
                std::cmp::Ordering::Equal => RungState::Current,
                std::cmp::Ordering::Greater => RungState::Ahead,
            },
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_prize_thresholds() {
        assert_eq!(safe_prize(0), ZERO_PRIZE);
        assert_eq!(safe_prize(3), ZERO_PRIZE);
        assert_eq!(safe_prize(4), ZERO_PRIZE);
        assert_eq!(safe_prize(5), PRIZES[4]);
        assert_eq!(safe_prize(9), PRIZES[4]);
        assert_eq!(safe_prize(10), PRIZES[9]);
        assert_eq!(safe_prize(14), PRIZES[9]);
    }

    #[test]
    fn test_safe_prize_past_the_top() {
        assert_eq!(safe_prize(100), PRIZES[9]);
    }

    #[test]
    fn test_prize_at() {
        assert_eq!(prize_at(0), "500 ₸");
        assert_eq!(prize_at(14), top_prize());
        assert_eq!(prize_at(40), top_prize());
    }

    #[test]
    fn test_safe_points() {
        let safe = (0..QUESTION_COUNT).filter(|i| is_safe_point(*i)).collect_vec();
        assert_eq!(safe, vec![4, 9, 14]);
    }

    #[test]
    fn test_rungs() {
        let rungs = rungs(5);
        assert_eq!(rungs.len(), QUESTION_COUNT);
        assert_eq!(rungs[4].state, RungState::Passed);
        assert!(rungs[4].safe);
        assert_eq!(rungs[5].state, RungState::Current);
        assert_eq!(rungs[5].number, 6);
        assert_eq!(rungs[14].state, RungState::Ahead);
    }
}
