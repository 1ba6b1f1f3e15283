//! Board context: made-pair flags, draws and texture risk.

use super::strength::HandEvaluator;
use crate::game::entities::{ACE, Card, Rank, Value};
use serde::Serialize;

/// Texture below this reads as a dry board
pub const DRY_TEXTURE: f32 = 0.33;

/// Texture at or above this reads as a wet board
pub const WET_TEXTURE: f32 = 0.66;

/// What the board means for the acting player's hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoardContext {
    pub pocket_pair: bool,
    pub top_pair: bool,
    pub overpair: bool,
    pub flush_draw: bool,
    pub straight_draw: bool,
    /// How coordinated the board is, 0 (dry) to 1 (wet)
    pub texture_risk: f32,
}

/// Drawing hands among hole + board cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Draws {
    pub flush_draw: bool,
    pub straight_draw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    Dry,
    Medium,
    Wet,
}

impl Texture {
    pub fn classify(risk: f32) -> Self {
        if risk < DRY_TEXTURE {
            Texture::Dry
        } else if risk < WET_TEXTURE {
            Texture::Medium
        } else {
            Texture::Wet
        }
    }
}

impl BoardContext {
    /// Analyze `hole` against `board`. Boards with fewer than three cards
    /// produce a neutral context.
    pub fn analyze(hole: &[Card; 2], board: &[Card], evaluator: &dyn HandEvaluator) -> Self {
        let pocket_pair = hole[0].0 == hole[1].0;
        if board.len() < 3 {
            return Self {
                pocket_pair,
                ..Self::default()
            };
        }

        let highest_board = board.iter().map(|c| c.0).max().unwrap_or(0);

        let mut cards = Vec::with_capacity(2 + board.len());
        cards.extend_from_slice(hole);
        cards.extend_from_slice(board);
        let best = evaluator.evaluate(&cards);

        let (mut top_pair, mut overpair) = (false, false);
        if let Some(head) = best.first()
            && head.rank == Rank::OnePair
            && let Some(&paired) = head.values.first()
        {
            top_pair = paired == highest_board;
            overpair = pocket_pair && hole[0].0 > highest_board;
        }

        let draws = detect_draws(hole, board);

        Self {
            pocket_pair,
            top_pair,
            overpair,
            flush_draw: draws.flush_draw,
            straight_draw: draws.straight_draw,
            texture_risk: evaluate_board_texture(board),
        }
    }

    pub fn has_draw(&self) -> bool {
        self.flush_draw || self.straight_draw
    }

    pub fn texture(&self) -> Texture {
        Texture::classify(self.texture_risk)
    }
}

/// Flush and open/gutshot straight draws that are not yet made hands.
pub fn detect_draws(hole: &[Card; 2], board: &[Card]) -> Draws {
    if board.len() < 3 {
        return Draws::default();
    }

    let mut suit_counts = [0usize; 4];
    let mut present = [false; 15];
    for card in hole.iter().chain(board) {
        suit_counts[card.1.index()] += 1;
        mark_value(&mut present, card.0);
    }

    let flush_made = suit_counts.iter().any(|&n| n >= 5);
    let flush_draw = !flush_made && suit_counts.contains(&4);

    let mut straight_made = false;
    let mut four_of_five = false;
    for low in 1..=(ACE - 4) {
        let hits = (low..=low + 4).filter(|&v| present[v as usize]).count();
        match hits {
            5 => straight_made = true,
            4 => four_of_five = true,
            _ => {}
        }
    }

    Draws {
        flush_draw,
        straight_draw: four_of_five && !straight_made,
    }
}

/// Texture risk of the board alone, in [0, 1].
///
/// Mean of pairing, suitedness and connectedness risk. Aces count both
/// high and low when looking for runs.
pub fn evaluate_board_texture(board: &[Card]) -> f32 {
    if board.len() < 2 {
        return 0.0;
    }
    let len = board.len() as f32;
    let spare = len - 1.0;

    let mut value_counts = [0usize; 15];
    let mut suit_counts = [0usize; 4];
    let mut present = [false; 15];
    for card in board {
        value_counts[card.0 as usize] += 1;
        suit_counts[card.1.index()] += 1;
        mark_value(&mut present, card.0);
    }

    let distinct = value_counts.iter().filter(|&&n| n > 0).count() as f32;
    let pairing = (len - distinct) / spare;

    let max_suit = suit_counts.iter().copied().max().unwrap_or(0) as f32;
    let suitedness = (max_suit - 1.0).max(0.0) / spare;

    let run = longest_run(&present) as f32;
    let connectedness = if run >= 3.0 { (run / len).min(1.0) } else { 0.0 };

    ((pairing + suitedness + connectedness) / 3.0).clamp(0.0, 1.0)
}

fn mark_value(present: &mut [bool; 15], value: Value) {
    present[value as usize] = true;
    if value == ACE {
        present[1] = true;
    }
}

fn longest_run(present: &[bool; 15]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &hit in &present[1..] {
        if hit {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}
