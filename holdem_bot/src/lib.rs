//! # Hold'em Bot
//!
//! A heuristic decision engine for autonomous Texas Hold'em opponents.
//!
//! Given a seat's hole cards, the community cards and the betting context,
//! the engine picks one legal action (fold, check, call or raise) and the
//! scheduler paces the resulting effects so the table sees them at a human
//! speed.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, hand categories, streets and the ranked-hand evaluator
//! - [`bot`]: Strength, board, opponent and sizing signals, the decision
//!   engine and the action scheduler
//!
//! ## Example
//!
//! ```
//! use holdem_bot::game::{entities::parse_cards, functional::eval};
//! use holdem_bot::game::entities::Rank;
//!
//! let cards = parse_cards(&["AC", "AD", "AS", "7C", "7D"]).unwrap();
//! assert_eq!(eval(&cards)[0].rank, Rank::FullHouse);
//! ```

/// Core card model and hand evaluation.
pub mod game;
pub use game::{entities, functional};

/// Bot decision engine and action scheduler.
pub mod bot;
pub use bot::{
    BotActionScheduler, BotDecisionConfig, BotDecisionMaker, BotError, BotResult, Decision,
    DecisionContext, SchedulerHandle,
};
