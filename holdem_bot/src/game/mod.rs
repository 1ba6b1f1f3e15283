//! Card model and ranked-hand evaluation shared by the bot engine.
//!
//! - [`entities`]: cards, suits, hand categories, streets and the deck
//! - [`functional`]: best-hand evaluation producing comparable subhands

pub mod entities;
pub mod functional;
