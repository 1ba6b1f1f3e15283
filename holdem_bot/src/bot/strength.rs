//! Hand strength on a 0-10 scale.
//!
//! Preflop hands are scored with a Chen-style formula over the two hole
//! cards. Postflop hands go through a [`HandEvaluator`] and the category
//! ordinal is rescaled onto the same 0-10 range, so downstream code can
//! compare `strength / 10` regardless of street.

use crate::game::{
    entities::{ACE, Card, JACK, KING, QUEEN, Rank, Street, SubHand},
    functional::eval,
};

/// Upper bound of the strength scale
pub const MAX_STRENGTH: f32 = 10.0;

/// Resolves a set of cards into a comparable ranked hand.
///
/// The first subhand of the result carries the hand category; an empty
/// result means nothing could be evaluated.
pub trait HandEvaluator: Send + Sync {
    fn evaluate(&self, cards: &[Card]) -> Vec<SubHand>;
}

/// Evaluator backed by [`crate::game::functional::eval`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn evaluate(&self, cards: &[Card]) -> Vec<SubHand> {
        eval(cards)
    }
}

/// Chen-style preflop score, clamped to [0, 10].
///
/// Symmetric in its arguments.
pub fn preflop_score(first: Card, second: Card) -> f32 {
    let high = first.0.max(second.0);
    let low = first.0.min(second.0);

    let mut score = match high {
        ACE => 10.0,
        KING => 8.0,
        QUEEN => 7.0,
        JACK => 6.0,
        v => v as f32 / 2.0,
    };

    if high == low {
        score = (score * 2.0).max(5.0);
    }

    if first.1 == second.1 {
        score += 2.0;
    }

    if high != low {
        let gap = high - low - 1;
        score -= match gap {
            0 => 0.0,
            1 => 1.0,
            2 => 2.0,
            3 => 4.0,
            _ => 5.0,
        };

        // Connected low and middle cards make straights that matter
        if gap <= 1 && high < QUEEN {
            score += 1.0;
        }
    }

    score.clamp(0.0, MAX_STRENGTH)
}

/// Postflop score: the evaluator's category ordinal mapped onto [0, 10].
pub fn postflop_score(hole: &[Card; 2], board: &[Card], evaluator: &dyn HandEvaluator) -> f32 {
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(board);

    match evaluator.evaluate(&cards).first() {
        Some(best) => category_score(best.rank),
        None => 0.0,
    }
}

fn category_score(rank: Rank) -> f32 {
    rank.ordinal() as f32 * MAX_STRENGTH / Rank::MAX_ORDINAL as f32
}

/// Raw strength for the street being played.
///
/// Falls back to the preflop formula when the board view is too short to
/// evaluate, so a lagging board never reads as a zero-strength hand.
pub fn hand_strength(
    hole: &[Card; 2],
    board: &[Card],
    street: Street,
    evaluator: &dyn HandEvaluator,
) -> f32 {
    if street != Street::Preflop && board.len() < 3 {
        log::warn!(
            "{} decision with only {} board cards, scoring preflop",
            street,
            board.len()
        );
    }
    if street == Street::Preflop || board.len() < 3 {
        preflop_score(hole[0], hole[1])
    } else {
        postflop_score(hole, board, evaluator)
    }
}

/// Strength normalized to [0, 1]
pub fn strength_ratio(strength: f32) -> f32 {
    (strength / MAX_STRENGTH).clamp(0.0, 1.0)
}
