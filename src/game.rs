//! Core game logic and state management
//!
//! This module contains the game session state machine: the question flow
//! with its two timed pauses, lifeline rules, hint bookkeeping, and the
//! outcome of the game on the prize ladder.
//!
//! The session is driven entirely from outside. Player actions arrive as
//! [`IncomingMessage`]s, timers are requested through a `schedule_message`
//! callback and come back as [`AlarmMessage`]s, and hint requests are handed
//! to a `request_hint` callback and come back as [`HintResponse`]s.

use std::{collections::BTreeSet, fmt::Debug, time::Duration};

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use uuid::Uuid;

use crate::{
    constants::timing::{DEFAULT_ADVANCE_DELAY, DEFAULT_REVEAL_DELAY, MAX_DELAY, MIN_DELAY},
    quiz::{
        hint::{HintRequest, HintResponse, HintTag},
        ladder::{self, Rung},
        lifeline::{self, Lifeline, Lifelines},
        question::{Question, QuestionBank},
    },
    session::Tunnel,
};

/// The phase the game is in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Before the first game, waiting for a start
    #[default]
    Idle,
    /// Waiting for the player to pick an option
    Playing,
    /// An option was picked; the outcome is being revealed
    AnswerChecking,
    /// All fifteen questions answered
    Won,
    /// A wrong answer ended the game
    Lost,
}

impl Status {
    /// Whether a new game may be started from this status
    pub fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Won | Self::Lost)
    }
}

type ValidationResult = garde::Result;

/// Validates that a delay falls within the accepted bounds
fn validate_delay(field: &'static str, val: &Duration) -> ValidationResult {
    if (u128::from(MIN_DELAY)..=u128::from(MAX_DELAY)).contains(&val.as_millis()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "{field} is outside of the bounds [{MIN_DELAY},{MAX_DELAY}] milliseconds",
        )))
    }
}

/// Timing options for a session
///
/// Every constructor, deserialization included, checks both delays against
/// the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "OptionsConfig", into = "OptionsConfig")]
pub struct Options {
    /// Pause between selecting an option and revealing the outcome
    #[garde(custom(|v, _| validate_delay("reveal_delay", v)))]
    reveal_delay: Duration,
    /// Pause between a correct reveal and the next question
    #[garde(custom(|v, _| validate_delay("advance_delay", v)))]
    advance_delay: Duration,
}

/// Serialized form of [`Options`], delays in milliseconds
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Pause between selecting an option and revealing the outcome
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub reveal_delay: Duration,
    /// Pause between a correct reveal and the next question
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub advance_delay: Duration,
}

impl TryFrom<OptionsConfig> for Options {
    type Error = garde::Report;

    fn try_from(config: OptionsConfig) -> Result<Self, Self::Error> {
        Self::new(config.reveal_delay, config.advance_delay)
    }
}

impl From<Options> for OptionsConfig {
    fn from(options: Options) -> Self {
        Self {
            reveal_delay: options.reveal_delay,
            advance_delay: options.advance_delay,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY),
            advance_delay: Duration::from_millis(DEFAULT_ADVANCE_DELAY),
        }
    }
}

impl Options {
    /// Creates validated timing options
    ///
    /// # Errors
    ///
    /// Returns a report if either delay is out of bounds.
    pub fn new(reveal_delay: Duration, advance_delay: Duration) -> Result<Self, garde::Report> {
        let options = Self {
            reveal_delay,
            advance_delay,
        };
        options.validate()?;
        Ok(options)
    }

    /// Pause before the outcome of an answer is revealed
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Pause before moving on after a correct answer
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }
}

/// Player actions accepted by the session
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum IncomingMessage {
    /// Begin a game
    Start,
    /// Pick the option at this index
    SelectOption(usize),
    /// Spend a lifeline
    UseLifeline(Lifeline),
    /// Begin a new game after the previous one ended
    Restart,
}

/// Timed follow-ups scheduled by the session
///
/// Each alarm records the game generation and question it belongs to; an
/// alarm that no longer matches the session is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Reveal whether the selected option was correct
    RevealAnswer {
        /// Game generation at scheduling time
        generation: u64,
        /// Question index at scheduling time
        index: usize,
    },
    /// Move on to the next question after a correct answer
    AdvanceQuestion {
        /// Game generation at scheduling time
        generation: u64,
        /// Question index at scheduling time
        index: usize,
    },
}

/// Content that is either shown or blanked out
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum PossiblyHidden<T> {
    /// Content is visible
    Visible(T),
    /// Content was removed by the elimination lifeline
    Hidden,
}

/// Update messages about the question flow
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    /// A new question is up
    QuestionAnnouncement {
        /// Index of the question (0-based)
        index: usize,
        /// Total number of questions
        count: usize,
        /// The question text
        question: String,
        /// The four options
        options: Vec<String>,
        /// Amount at stake
        prize: String,
        /// Amount kept if this question is answered wrongly
        safe_prize: String,
    },
    /// The player locked in an option
    AnswerSelected(usize),
    /// The outcome of the locked-in option
    AnswerRevealed {
        /// The option the player picked
        selected: usize,
        /// The correct option
        answer: usize,
        /// Whether they match
        correct: bool,
    },
    /// The last question was answered correctly
    Won {
        /// The top prize
        prize: String,
    },
    /// A wrong answer ended the game
    Lost {
        /// The safe prize kept
        prize: String,
        /// Text of the correct option
        correct_option: String,
        /// Explanation of the correct option, if any
        explanation: Option<String>,
    },
}

/// Full snapshots of the session for a renderer
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// No game has been started yet
    Idle {
        /// Number of questions in a game
        count: usize,
        /// Amount for answering every question
        top_prize: String,
    },
    /// A question is being played or checked
    Question {
        /// Index of the question (0-based)
        index: usize,
        /// Total number of questions
        count: usize,
        /// Playing or AnswerChecking
        status: Status,
        /// The question text
        question: String,
        /// Options, with eliminated ones hidden
        options: Vec<PossiblyHidden<String>>,
        /// The locked-in option
        selected: Option<usize>,
        /// Outcome once revealed
        revealed: Option<bool>,
        /// Lifeline usage
        lifelines: Lifelines,
        /// Latest hint for this question
        hint: Option<String>,
        /// Whether a hint request is outstanding
        hint_pending: bool,
        /// Amount at stake
        prize: String,
        /// Amount kept on a wrong answer
        safe_prize: String,
        /// The prize ladder relative to this question
        ladder: Vec<Rung>,
    },
    /// The game was won
    Won {
        /// The top prize
        prize: String,
    },
    /// The game was lost
    Lost {
        /// Index of the question answered wrongly
        index: usize,
        /// The safe prize kept
        prize: String,
        /// Text of the correct option
        correct_option: String,
        /// Explanation of the correct option, if any
        explanation: Option<String>,
    },
}

/// A single player's game
///
/// One value holds one game at a time. Starting again reuses the value and
/// invalidates every alarm and hint issued for the previous game.
pub struct GameSession {
    /// Identifier used in log records
    id: Uuid,
    /// The questions, one per rung
    bank: QuestionBank,
    /// Timing configuration
    options: Options,

    status: Status,
    question_index: usize,
    selected_option: Option<usize>,
    /// Outcome of the current reveal while waiting to advance
    revealed: Option<bool>,
    lifelines: Lifelines,
    removed_options: BTreeSet<usize>,
    hint_message: Option<String>,
    /// Counters of hint requests outstanding for the current question
    pending_hints: BTreeSet<u64>,
    /// Counter of the hint currently shown
    latest_hint: Option<u64>,

    /// Bumped on every start
    generation: u64,
    /// Bumped on every hint request, never reset
    hint_counter: u64,
}

impl Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("question_index", &self.question_index)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

// Accessors and derived values
impl GameSession {
    /// Creates an idle session over `bank`
    pub fn new(bank: QuestionBank, options: Options) -> Self {
        Self {
            id: Uuid::new_v4(),
            bank,
            options,
            status: Status::Idle,
            question_index: 0,
            selected_option: None,
            revealed: None,
            lifelines: Lifelines::default(),
            removed_options: BTreeSet::new(),
            hint_message: None,
            pending_hints: BTreeSet::new(),
            latest_hint: None,
            generation: 0,
            hint_counter: 0,
        }
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Index of the current question (0-based)
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// The question currently being played
    ///
    /// # Panics
    ///
    /// Never: a validated bank covers every reachable index.
    pub fn current_question(&self) -> &Question {
        self.bank
            .get(self.question_index)
            .expect("question index stays within the bank")
    }

    /// The locked-in option, if any
    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    /// Lifeline usage for this game
    pub fn lifelines(&self) -> &Lifelines {
        &self.lifelines
    }

    /// Options hidden on the current question
    pub fn removed_options(&self) -> &BTreeSet<usize> {
        &self.removed_options
    }

    /// Latest hint for the current question
    pub fn hint_message(&self) -> Option<&str> {
        self.hint_message.as_deref()
    }

    /// Whether a hint request for the current question is outstanding
    pub fn hint_pending(&self) -> bool {
        !self.pending_hints.is_empty()
    }

    /// Number of games started on this session
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timing options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Amount at stake on the current question
    pub fn current_prize(&self) -> &'static str {
        ladder::prize_at(self.question_index)
    }

    /// Amount kept if the game were lost on the current question
    pub fn prize_if_lost(&self) -> &'static str {
        ladder::safe_prize(self.question_index)
    }

    /// Amount taken home, once the game is over
    pub fn final_prize(&self) -> Option<&'static str> {
        match self.status {
            Status::Won => Some(ladder::top_prize()),
            Status::Lost => Some(self.prize_if_lost()),
            Status::Idle | Status::Playing | Status::AnswerChecking => None,
        }
    }

    fn is_last_question(&self) -> bool {
        self.question_index == self.bank.last_index()
    }

    fn question_announcement(&self) -> UpdateMessage {
        let question = self.current_question();
        UpdateMessage::QuestionAnnouncement {
            index: self.question_index,
            count: self.bank.len(),
            question: question.text().to_owned(),
            options: question.options().to_vec(),
            prize: self.current_prize().to_owned(),
            safe_prize: self.prize_if_lost().to_owned(),
        }
    }

    fn lost_message(&self) -> UpdateMessage {
        let question = self.current_question();
        UpdateMessage::Lost {
            prize: self.prize_if_lost().to_owned(),
            correct_option: question.correct_option().to_owned(),
            explanation: question.explanation().map(ToOwned::to_owned),
        }
    }

    fn clear_question(&mut self) {
        self.selected_option = None;
        self.revealed = None;
        self.removed_options.clear();
        self.hint_message = None;
        self.pending_hints.clear();
        self.latest_hint = None;
    }
}

// Transitions
impl GameSession {
    /// Starts a new game
    ///
    /// Accepted from Idle, Won and Lost; ignored while a game is in
    /// progress. Every field except the session identity is reset, and
    /// alarms or hints issued for earlier games become stale.
    ///
    /// # Returns
    ///
    /// `true` if a game was started
    pub fn start<T: Tunnel>(&mut self, tunnel: &T) -> bool {
        if !self.status.can_start() {
            return false;
        }

        self.generation += 1;
        self.question_index = 0;
        self.lifelines = Lifelines::default();
        self.clear_question();
        self.status = Status::Playing;

        tracing::info!(session = %self.id, generation = self.generation, "game started");

        tunnel.send_message(&self.question_announcement().into());
        true
    }

    /// Locks in the option at `index` and schedules its reveal
    ///
    /// Ignored unless the game is Playing, the index names an option, and
    /// that option has not been eliminated.
    ///
    /// # Arguments
    ///
    /// * `index` - The option picked by the player
    /// * `schedule_message` - Function to schedule the reveal alarm
    /// * `tunnel` - Channel to the presentation layer
    pub fn select_option<T: Tunnel, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        index: usize,
        mut schedule_message: S,
        tunnel: &T,
    ) -> bool {
        if self.status != Status::Playing
            || index >= self.current_question().options().len()
            || self.removed_options.contains(&index)
        {
            return false;
        }

        self.selected_option = Some(index);
        self.status = Status::AnswerChecking;

        tracing::debug!(session = %self.id, question = self.question_index, index, "option selected");

        tunnel.send_message(&UpdateMessage::AnswerSelected(index).into());
        schedule_message(
            AlarmMessage::RevealAnswer {
                generation: self.generation,
                index: self.question_index,
            },
            self.options.reveal_delay,
        );
        true
    }

    /// Handles a previously scheduled alarm
    ///
    /// Alarms from an earlier game, for another question, or arriving in
    /// the wrong phase are ignored.
    pub fn receive_alarm<T: Tunnel, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        schedule_message: S,
        tunnel: &T,
    ) {
        match message {
            AlarmMessage::RevealAnswer { generation, index }
                if self.is_current(generation, index)
                    && self.status == Status::AnswerChecking
                    && self.revealed.is_none() =>
            {
                self.resolve_answer(schedule_message, tunnel);
            }
            AlarmMessage::AdvanceQuestion { generation, index }
                if self.is_current(generation, index)
                    && self.status == Status::AnswerChecking
                    && self.revealed == Some(true) =>
            {
                self.advance_question(tunnel);
            }
            _ => {
                tracing::debug!(session = %self.id, ?message, "ignoring stale alarm");
            }
        }
    }

    fn is_current(&self, generation: u64, index: usize) -> bool {
        generation == self.generation && index == self.question_index
    }

    fn resolve_answer<T: Tunnel, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        mut schedule_message: S,
        tunnel: &T,
    ) {
        let answer = self.current_question().answer_index();
        let Some(selected) = self.selected_option else {
            return;
        };
        let correct = selected == answer;
        self.revealed = Some(correct);

        tunnel.send_message(
            &UpdateMessage::AnswerRevealed {
                selected,
                answer,
                correct,
            }
            .into(),
        );

        if !correct {
            self.status = Status::Lost;
            tracing::info!(
                session = %self.id,
                question = self.question_index,
                prize = self.prize_if_lost(),
                "game lost"
            );
            tunnel.send_message(&self.lost_message().into());
        } else if self.is_last_question() {
            self.status = Status::Won;
            tracing::info!(session = %self.id, prize = ladder::top_prize(), "game won");
            tunnel.send_message(
                &UpdateMessage::Won {
                    prize: ladder::top_prize().to_owned(),
                }
                .into(),
            );
        } else {
            schedule_message(
                AlarmMessage::AdvanceQuestion {
                    generation: self.generation,
                    index: self.question_index,
                },
                self.options.advance_delay,
            );
        }
    }

    fn advance_question<T: Tunnel>(&mut self, tunnel: &T) {
        self.question_index += 1;
        self.clear_question();
        self.status = Status::Playing;

        tracing::debug!(session = %self.id, question = self.question_index, "next question");

        tunnel.send_message(&self.question_announcement().into());
    }

    /// Spends a lifeline on the current question
    ///
    /// Ignored unless the game is Playing and the lifeline is unused. The
    /// lifeline is marked used before its effect runs, so a hint that later
    /// fails still counts.
    ///
    /// # Arguments
    ///
    /// * `lifeline` - The lifeline to use
    /// * `request_hint` - Function that forwards hint requests to a collaborator
    /// * `tunnel` - Channel to the presentation layer
    pub fn use_lifeline<T: Tunnel, H: FnMut(HintRequest)>(
        &mut self,
        lifeline: Lifeline,
        mut request_hint: H,
        tunnel: &T,
    ) -> bool {
        if self.status != Status::Playing || !self.lifelines.mark_used(lifeline) {
            return false;
        }

        tracing::debug!(session = %self.id, %lifeline, question = self.question_index, "lifeline used");
        tunnel.send_message(&lifeline::UpdateMessage::Used(lifeline).into());

        match lifeline.hint_mode() {
            None => {
                let removed = lifeline::eliminate(self.current_question());
                self.removed_options = removed.iter().copied().collect();
                tunnel.send_message(&lifeline::UpdateMessage::OptionsRemoved(removed).into());
            }
            Some(mode) => {
                self.hint_counter += 1;
                let tag = HintTag {
                    generation: self.generation,
                    question_index: self.question_index,
                    counter: self.hint_counter,
                };
                self.pending_hints.insert(tag.counter);
                tunnel.send_message(&lifeline::UpdateMessage::HintPending(true).into());
                request_hint(HintRequest::new(tag, mode, self.current_question()));
            }
        }
        true
    }

    /// Applies the result of a hint request
    ///
    /// A response is shown only if it was issued during this game, for the
    /// current question, and no later request has already been shown.
    ///
    /// # Returns
    ///
    /// `true` if the hint text was applied
    pub fn receive_hint<T: Tunnel>(&mut self, response: HintResponse, tunnel: &T) -> bool {
        let HintResponse { tag, text } = response;

        if !self.is_current(tag.generation, tag.question_index) {
            tracing::debug!(session = %self.id, ?tag, "discarding hint for another question");
            return false;
        }

        let was_pending = self.hint_pending();
        self.pending_hints.remove(&tag.counter);

        let applied = self.latest_hint.is_none_or(|latest| tag.counter > latest);
        if applied {
            self.latest_hint = Some(tag.counter);
            self.hint_message = Some(text.clone());
            tunnel.send_message(&lifeline::UpdateMessage::Hint(text).into());
        } else {
            tracing::debug!(session = %self.id, ?tag, "discarding superseded hint");
        }

        if was_pending && !self.hint_pending() {
            tunnel.send_message(&lifeline::UpdateMessage::HintPending(false).into());
        }

        applied
    }

    /// Dispatches a player action
    ///
    /// # Arguments
    ///
    /// * `message` - The player action
    /// * `schedule_message` - Function to schedule alarms
    /// * `request_hint` - Function that forwards hint requests to a collaborator
    /// * `tunnel` - Channel to the presentation layer
    ///
    /// # Returns
    ///
    /// `true` if the action changed the session
    pub fn receive_message<
        T: Tunnel,
        S: FnMut(AlarmMessage, Duration),
        H: FnMut(HintRequest),
    >(
        &mut self,
        message: IncomingMessage,
        schedule_message: S,
        request_hint: H,
        tunnel: &T,
    ) -> bool {
        match message {
            IncomingMessage::Start | IncomingMessage::Restart => self.start(tunnel),
            IncomingMessage::SelectOption(index) => {
                self.select_option(index, schedule_message, tunnel)
            }
            IncomingMessage::UseLifeline(lifeline) => {
                self.use_lifeline(lifeline, request_hint, tunnel)
            }
        }
    }

    /// Returns a full snapshot of the session for a renderer
    pub fn state_message(&self) -> SyncMessage {
        match self.status {
            Status::Idle => SyncMessage::Idle {
                count: self.bank.len(),
                top_prize: ladder::top_prize().to_owned(),
            },
            Status::Playing | Status::AnswerChecking => {
                let question = self.current_question();
                SyncMessage::Question {
                    index: self.question_index,
                    count: self.bank.len(),
                    status: self.status,
                    question: question.text().to_owned(),
                    options: question
                        .options()
                        .iter()
                        .enumerate()
                        .map(|(i, option)| {
                            if self.removed_options.contains(&i) {
                                PossiblyHidden::Hidden
                            } else {
                                PossiblyHidden::Visible(option.clone())
                            }
                        })
                        .collect_vec(),
                    selected: self.selected_option,
                    revealed: self.revealed,
                    lifelines: self.lifelines.clone(),
                    hint: self.hint_message.clone(),
                    hint_pending: self.hint_pending(),
                    prize: self.current_prize().to_owned(),
                    safe_prize: self.prize_if_lost().to_owned(),
                    ladder: ladder::rungs(self.question_index),
                }
            }
            Status::Won => SyncMessage::Won {
                prize: ladder::top_prize().to_owned(),
            },
            Status::Lost => {
                let question = self.current_question();
                SyncMessage::Lost {
                    index: self.question_index,
                    prize: self.prize_if_lost().to_owned(),
                    correct_option: question.correct_option().to_owned(),
                    explanation: question.explanation().map(ToOwned::to_owned),
                }
            }
        }
    }

    /// Sends a full snapshot down `tunnel`
    pub fn sync<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_state(&self.state_message());
    }

    /// Ends the session, leaving the renderer on its final snapshot
    ///
    /// Sends the current snapshot and closes `tunnel`. Alarms and hint
    /// responses still in flight have nowhere to land afterwards.
    pub fn finish<T: Tunnel>(self, tunnel: T) {
        tracing::info!(
            session = %self.id,
            status = ?self.status,
            games = self.generation,
            "session finished"
        );
        self.sync(&tunnel);
        tunnel.close();
    }
}
