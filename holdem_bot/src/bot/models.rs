//! Bot-facing models: seats, betting context and decisions.

use super::errors::BotError;
use crate::game::entities::{Card, Chips, Street};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Seat identifier as assigned by the table engine
pub type PlayerId = usize;

/// Bot difficulty presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    /// Loose-passive, calls wide, never bluffs
    Easy,
    /// Balanced
    #[default]
    Standard,
    /// Tight-aggressive, raises more, bluffs more
    Tag,
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotDifficulty::Easy => write!(f, "easy"),
            BotDifficulty::Standard => write!(f, "standard"),
            BotDifficulty::Tag => write!(f, "tag"),
        }
    }
}

impl FromStr for BotDifficulty {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "standard" => Ok(Self::Standard),
            "tag" => Ok(Self::Tag),
            other => Err(BotError::InvalidConfig(format!(
                "unknown difficulty '{other}' (expected easy, standard or tag)"
            ))),
        }
    }
}

/// Session statistics for one seat.
///
/// Maintained by the table engine as hands complete; the decision engine
/// only reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Hands observed
    pub hands: u32,

    /// Hands folded
    pub folds: u32,

    /// Times voluntarily put money in pot
    pub vpip: u32,

    /// Calls made
    pub calls: u32,

    /// Bets and raises made
    pub aggressive_acts: u32,
}

impl PlayerStats {
    /// Fraction of observed hands folded (0 with no hands)
    pub fn fold_rate(&self) -> f32 {
        if self.hands == 0 {
            0.0
        } else {
            self.folds as f32 / self.hands as f32
        }
    }

    /// Laplace-smoothed VPIP rate, 0.5 with no hands
    pub fn vpip_rate(&self) -> f32 {
        (self.vpip as f32 + 1.0) / (self.hands as f32 + 2.0)
    }

    /// Smoothed ratio of bets/raises to calls
    pub fn aggression(&self) -> f32 {
        (self.aggressive_acts as f32 + 1.0) / (self.calls as f32 + 1.0)
    }

    /// Record a completed hand
    pub fn record_hand(&mut self, folded: bool) {
        self.hands += 1;
        if folded {
            self.folds += 1;
        }
    }

    /// Record VPIP (voluntarily put money in pot)
    pub fn record_vpip(&mut self) {
        self.vpip += 1;
    }

    /// Record passive action (call)
    pub fn record_call(&mut self) {
        self.calls += 1;
    }

    /// Record aggressive action (bet/raise)
    pub fn record_aggressive_action(&mut self) {
        self.aggressive_acts += 1;
    }
}

/// A seat as seen by the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    /// Remaining stack
    pub chips: Chips,

    /// Chips committed in the current betting round
    pub round_bet: Chips,

    pub folded: bool,

    pub all_in: bool,

    pub hole_cards: Option<[Card; 2]>,

    /// Holds the dealer button
    pub dealer: bool,

    /// Posted the big blind this hand
    pub big_blind: bool,

    pub stats: PlayerStats,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, chips: Chips) -> Self {
        Self {
            id,
            name: name.to_string(),
            chips,
            round_bet: 0,
            folded: false,
            all_in: false,
            hole_cards: None,
            dealer: false,
            big_blind: false,
            stats: PlayerStats::default(),
        }
    }

    pub fn with_hole_cards(mut self, first: Card, second: Card) -> Self {
        self.hole_cards = Some([first, second]);
        self
    }

    pub fn with_stats(mut self, stats: PlayerStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn as_dealer(mut self) -> Self {
        self.dealer = true;
        self
    }

    pub fn as_big_blind(mut self) -> Self {
        self.big_blind = true;
        self
    }

    /// Reset per-hand state, keeping stack and session stats
    pub fn reset(&mut self) {
        self.round_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.hole_cards = None;
        self.dealer = false;
        self.big_blind = false;
    }
}

/// Coarse table position of a seat relative to the button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Early,
    Middle,
    Late,
    Blinds,
}

/// Snapshot of the betting state handed to the bot for one decision.
///
/// Built fresh by the table engine each time a bot must act; the engine
/// keeps nothing from one decision to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    /// Highest total bet this round
    pub current_bet: Chips,

    pub pot: Chips,

    pub small_blind: Chips,

    pub big_blind: Chips,

    pub raises_this_round: u8,

    pub phase: Street,

    /// All seats in table order, including the acting player
    pub players: Vec<Player>,

    /// Size of the last raise increment
    pub last_raise: Chips,

    /// Community cards currently on the board
    pub board: Vec<Card>,
}

impl DecisionContext {
    /// Chips the player still owes to match the current bet
    pub fn need_to_call(&self, player: &Player) -> Chips {
        self.current_bet.saturating_sub(player.round_bet)
    }

    /// Smallest legal raise increment on top of a call
    pub fn min_raise_increment(&self) -> Chips {
        self.last_raise.max(self.big_blind).max(1)
    }

    pub fn is_preflop(&self) -> bool {
        self.phase == Street::Preflop
    }

    /// Every other seat, folded or not
    pub fn opponents<'a>(&'a self, player: &'a Player) -> impl Iterator<Item = &'a Player> + 'a {
        self.players.iter().filter(move |p| p.id != player.id)
    }

    /// Other seats still contesting the pot
    pub fn active_opponents(&self, player: &Player) -> usize {
        self.opponents(player).filter(|p| !p.folded).count()
    }

    /// Whether any live opponent is all-in
    pub fn anyone_all_in(&self, player: &Player) -> bool {
        self.opponents(player).any(|p| !p.folded && p.all_in)
    }

    /// Position of `player` derived from the button and blind flags
    pub fn position_of(&self, player: &Player) -> Position {
        let n = self.players.len();
        let Some(seat) = self.players.iter().position(|p| p.id == player.id) else {
            return Position::Middle;
        };
        if self.players[seat].dealer {
            return Position::Late;
        }
        if self.players[seat].big_blind {
            return Position::Blinds;
        }
        let Some(button) = self.players.iter().position(|p| p.dealer) else {
            return Position::Middle;
        };

        match (seat + n - button) % n {
            0 => Position::Late,
            1 | 2 => Position::Blinds,
            offset if n >= 6 && offset == n - 1 => Position::Late,
            offset => {
                let relative = (offset - 3) as f32 / (n - 3) as f32;
                if relative < 0.5 {
                    Position::Early
                } else {
                    Position::Middle
                }
            }
        }
    }
}

/// The bot's chosen action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Fold,
    Check,
    /// Chips owed, capped at the stack
    Call(Chips),
    /// Total chips committed by this action
    Raise(Chips),
}

impl Decision {
    pub fn amount(&self) -> Option<Chips> {
        match self {
            Decision::Call(amount) | Decision::Raise(amount) => Some(*amount),
            Decision::Fold | Decision::Check => None,
        }
    }

    pub fn is_raise(&self) -> bool {
        matches!(self, Decision::Raise(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Fold => write!(f, "fold"),
            Decision::Check => write!(f, "check"),
            Decision::Call(amount) => write!(f, "call {amount}"),
            Decision::Raise(amount) => write!(f, "raise {amount}"),
        }
    }
}
