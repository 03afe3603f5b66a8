//! # Millionaire Quiz Library
//!
//! This library provides the core game logic for a single-player
//! "Who Wants to Be a Millionaire?" style quiz: fifteen questions on an
//! escalating prize ladder, safe points, and three one-time lifelines. It
//! owns the game state machine and leaves rendering, timers and the hint
//! collaborator to its host.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
use serde::Serialize;

pub mod constants;

pub mod game;
pub mod quiz;
pub mod session;

pub use game::{AlarmMessage, GameSession, IncomingMessage, Options, Status, SyncMessage};

/// Messages sent to update specific aspects of the presentation
///
/// Each variant wraps the update enum of the component that produced it.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, derive_more::From)]
pub enum UpdateMessage {
    /// Question flow and outcome updates
    Game(game::UpdateMessage),
    /// Lifeline usage and hint updates
    Lifeline(quiz::lifeline::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
