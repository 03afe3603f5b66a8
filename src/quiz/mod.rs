//! Quiz content and the pure rules around it
//!
//! This module holds the question bank, the prize ladder and the lifeline
//! logic. Nothing in here is stateful; the game session in
//! [`crate::game`] drives it.

pub mod hint;
pub mod ladder;
pub mod lifeline;
pub mod question;
