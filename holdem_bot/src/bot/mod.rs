//! Bot module providing the decision engine and action pacing.
//!
//! This module implements:
//! - Hand strength: Chen-style preflop scoring, rescaled postflop categories
//! - Board context: top pair / overpair flags, draws and texture risk
//! - Opponent model: sample-weighted fold, VPIP and aggression signals
//! - Bet sizing: value, bluff, protection and overbet sizes
//! - BotDecisionMaker: threshold and tie-break policy with a legality pass
//! - BotActionScheduler: FIFO actor running actions on a fixed delay
//!
//! ## Difficulty Presets
//!
//! ### Easy (Loose-Passive)
//! - Higher raise thresholds, calls lighter
//! - Never bluffs
//!
//! ### Standard (Balanced)
//! - Default thresholds and bluff scale
//!
//! ### TAG (Tight-Aggressive)
//! - Lower raise thresholds, calls tighter
//! - Bluffs more against folding tables
//!
//! ## Example
//!
//! ```
//! use holdem_bot::bot::{BotDecisionConfig, BotDecisionMaker, BotDifficulty};
//! use holdem_bot::bot::models::{DecisionContext, Player};
//! use holdem_bot::game::entities::Street;
//!
//! let me = Player::new(0, "bot", 2000).with_hole_cards("AC".parse().unwrap(), "AD".parse().unwrap());
//! let ctx = DecisionContext {
//!     current_bet: 0,
//!     pot: 30,
//!     small_blind: 10,
//!     big_blind: 20,
//!     raises_this_round: 0,
//!     phase: Street::Preflop,
//!     players: vec![me.clone(), Player::new(1, "villain", 2000).as_dealer()],
//!     last_raise: 0,
//!     board: Vec::new(),
//! };
//!
//! let mut bot = BotDecisionMaker::with_config(BotDecisionConfig::for_difficulty(BotDifficulty::Tag));
//! assert!(bot.decide_action(&me, &ctx).is_raise());
//! ```

pub mod board;
pub mod decision;
pub mod errors;
pub mod models;
pub mod opponents;
pub mod scheduler;
pub mod sizing;
pub mod strength;

#[cfg(test)]
mod testing;

pub use board::BoardContext;
pub use decision::{BotDecisionConfig, BotDecisionMaker, DecisionTrace};
pub use errors::{BotError, BotResult};
pub use models::{BotDifficulty, Decision, DecisionContext, Player, PlayerStats};
pub use opponents::OpponentModel;
pub use scheduler::{BotActionScheduler, SchedulerConfig, SchedulerHandle};
pub use strength::{HandEvaluator, StandardEvaluator};
