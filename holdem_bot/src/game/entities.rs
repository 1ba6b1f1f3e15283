use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];

    /// Single-letter code used in card codes (`"AC"`, `"TD"`).
    pub fn code(self) -> char {
        match self {
            Self::Club => 'C',
            Self::Spade => 'S',
            Self::Diamond => 'D',
            Self::Heart => 'H',
        }
    }

    /// Dense index for per-suit counting.
    pub fn index(self) -> usize {
        match self {
            Self::Club => 0,
            Self::Spade => 1,
            Self::Diamond => 2,
            Self::Heart => 3,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const ACE: Value = 14;
pub const KING: Value = 13;
pub const QUEEN: Value = 12;
pub const JACK: Value = 11;

/// A card is a tuple of a uInt8 value (two=2u8 ... ace=14u8) and a suit.
///
/// Cards travel between the table and the bot as two-character codes:
/// the value (`2`-`9`, `T`, `J`, `Q`, `K`, `A`) followed by the suit
/// letter (`C`, `D`, `H`, `S`).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    pub fn value(&self) -> Value {
        self.0
    }

    pub fn suit(&self) -> Suit {
        self.1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => 'A',
            13 => 'K',
            12 => 'Q',
            11 => 'J',
            10 => 'T',
            v => char::from(b'0' + v),
        };
        write!(f, "{value}{}", self.1.code())
    }
}

/// Errors raised while reading card codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Card code must be two characters (or '10' plus suit), got '{0}'")]
    BadLength(String),

    #[error("Unknown card value in '{0}'")]
    BadValue(String),

    #[error("Unknown card suit in '{0}'")]
    BadSuit(String),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if !code.is_ascii() {
            return Err(CardParseError::BadLength(s.to_string()));
        }
        let (value_part, suit_part) = match code.len() {
            2 => code.split_at(1),
            3 if code.starts_with("10") => code.split_at(2),
            _ => return Err(CardParseError::BadLength(s.to_string())),
        };

        let value = match value_part {
            "A" => ACE,
            "K" => KING,
            "Q" => QUEEN,
            "J" => JACK,
            "T" | "10" => 10,
            v => match v.parse::<Value>() {
                Ok(n) if (2..=9).contains(&n) => n,
                _ => return Err(CardParseError::BadValue(s.to_string())),
            },
        };

        let suit = match suit_part {
            "C" => Suit::Club,
            "D" => Suit::Diamond,
            "H" => Suit::Heart,
            "S" => Suit::Spade,
            _ => return Err(CardParseError::BadSuit(s.to_string())),
        };

        Ok(Card(value, suit))
    }
}

/// Parse a list of card codes, failing on the first bad one.
pub fn parse_cards<S: AsRef<str>>(codes: &[S]) -> Result<Vec<Card>, CardParseError> {
    codes.iter().map(|code| code.as_ref().parse()).collect()
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl Rank {
    /// Highest ordinal a category can take.
    pub const MAX_ORDINAL: u8 = 9;

    /// 1-based ordinal, high card = 1 through straight flush = 9.
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    /// Category name as reported by hand evaluators.
    pub fn name(self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::OnePair => "Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "hi",
            Self::OnePair => "1p",
            Self::TwoPair => "2p",
            Self::ThreeOfAKind => "3k",
            Self::Straight => "s8",
            Self::Flush => "fs",
            Self::FullHouse => "fh",
            Self::FourOfAKind => "4k",
            Self::StraightFlush => "sf",
        };
        write!(f, "{repr}")
    }
}

/// One component of an evaluated hand. The first subhand carries the
/// category; any trailing `HighCard` subhand carries kickers.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubHand {
    pub rank: Rank,
    pub values: Vec<Value>,
}

/// Betting round. The table engine reports it as a phase index where
/// 0 is preflop.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Preflop,
            1 => Self::Flop,
            2 => Self::Turn,
            _ => Self::River,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Community cards visible once this street is dealt.
    pub fn board_size(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => None,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    pub deck_idx: usize,
}

impl Deck {
    /// Deal the next card, or `None` once all 52 are out.
    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.deck_idx).copied();
        if card.is_some() {
            self.deck_idx += 1;
        }
        card
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = Vec::with_capacity(52);
        for value in 2..=ACE {
            for suit in Suit::ALL {
                cards.push(Card(value, suit));
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for whole chips. Stacks, bets and pots are whole chips.
pub type Chips = u32;
