//! Configuration constants for the quiz engine
//!
//! This module contains the fixed sizes, timing bounds and user-facing
//! fallback strings used throughout the game so that every component
//! agrees on the same limits.

/// Question bank constants
pub mod bank {
    /// Number of questions in a game, one per rung of the prize ladder
    pub const QUESTION_COUNT: usize = 15;
    /// Number of answer options on every question
    pub const OPTION_COUNT: usize = 4;
    /// Maximum length of a question prompt in characters
    pub const MAX_TEXT_LENGTH: usize = 300;
    /// Maximum length of a single answer option in characters
    pub const MAX_OPTION_LENGTH: usize = 120;
    /// Maximum length of an explanation in characters
    pub const MAX_EXPLANATION_LENGTH: usize = 500;
}

/// Prize ladder constants
pub mod ladder {
    /// Every n-th rung locks in a guaranteed prize
    pub const SAFE_POINT_INTERVAL: usize = 5;
    /// Prize reported when the player falls before the first safe point
    pub const ZERO_PRIZE: &str = "0 ₸";
}

/// Lifeline constants
pub mod lifeline {
    /// Number of wrong options hidden by the elimination lifeline
    pub const ELIMINATED_COUNT: usize = 2;
}

/// Timing constants, in milliseconds
pub mod timing {
    /// Default pause between selecting an option and revealing the outcome
    pub const DEFAULT_REVEAL_DELAY: u64 = 1500;
    /// Default pause between a correct reveal and the next question
    pub const DEFAULT_ADVANCE_DELAY: u64 = 1500;
    /// Shortest accepted delay
    pub const MIN_DELAY: u64 = 0;
    /// Longest accepted delay
    pub const MAX_DELAY: u64 = 30_000;
}

/// Hint collaborator constants
pub mod hint {
    /// Shown when the collaborator answers with nothing usable
    pub const NO_RESPONSE: &str = "Sorry, the line went dead...";
    /// Shown when the collaborator cannot be reached at all
    pub const FAILURE: &str = "A technical fault occurred.";
}
