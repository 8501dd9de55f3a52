//! # tempo-providers
//!
//! AI provider implementation and timer intent parsing for Tempo.

pub mod intent;
pub mod openai;
