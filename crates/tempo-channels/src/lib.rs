//! # tempo-channels
//!
//! Messaging platform integration for Tempo.

pub mod telegram;
pub mod utils;
