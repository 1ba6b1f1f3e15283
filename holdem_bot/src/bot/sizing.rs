//! Pot-relative bet sizing.
//!
//! Every function returns the size of the bet on top of any call, as a
//! factor of `pot + to_call`, rounded to the nearest 10 chips and capped at
//! the stack. Factors carry a small random jitter drawn from the caller's
//! source so sizes are not fully readable.

use super::board::Texture;
use super::models::Position;
use crate::game::entities::Chips;
use rand::Rng;

/// Value bets and raises
pub const VALUE_FACTOR_RANGE: (f32, f32) = (0.35, 1.0);
/// Bluffs
pub const BLUFF_FACTOR_RANGE: (f32, f32) = (0.2, 0.45);
/// Protection bets
pub const PROTECTION_FACTOR_RANGE: (f32, f32) = (0.35, 0.8);
/// Overbets
pub const OVERBET_FACTOR_RANGE: (f32, f32) = (1.1, 1.5);

/// Everything a sizing decision looks at
#[derive(Debug, Clone, Copy)]
pub struct SizingInputs {
    pub pot: Chips,
    pub to_call: Chips,
    pub chips: Chips,
    /// Strength ratio in [0, 1]
    pub strength: f32,
    pub texture_risk: f32,
    /// Stack-to-pot ratio
    pub spr: f32,
    pub position: Position,
    /// Opponents still in the hand
    pub opponents: usize,
    pub preflop: bool,
}

impl SizingInputs {
    fn base(&self) -> f32 {
        self.pot.saturating_add(self.to_call) as f32
    }

    fn opponents(&self) -> f32 {
        self.opponents.max(1) as f32
    }
}

/// Sizing for hands that want calls.
pub fn value_bet<R: Rng + ?Sized>(inputs: &SizingInputs, rng: &mut R) -> Chips {
    let mut factor = if inputs.preflop {
        let mut f = 0.55 + 0.04 * inputs.opponents();
        if inputs.strength >= 0.9 {
            f += 0.15;
        }
        if inputs.position == Position::Early && inputs.strength >= 0.8 {
            f += 0.1;
        }
        f
    } else {
        let mut f = match Texture::classify(inputs.texture_risk) {
            Texture::Dry => 0.45,
            Texture::Medium => 0.6,
            Texture::Wet => 0.7,
        };
        // Polarize with the near-nuts
        if inputs.strength > 0.95 {
            f += 0.1;
        }
        f
    };

    factor += spr_shift(inputs.spr) + jitter(rng, 0.1);
    to_chips(clamp(factor, VALUE_FACTOR_RANGE), inputs)
}

/// Sizing for bluffs: cheap enough to need few folds.
pub fn bluff_bet<R: Rng + ?Sized>(inputs: &SizingInputs, rng: &mut R) -> Chips {
    let factor = 0.3 + inputs.texture_risk * 0.1 - 0.02 * (inputs.opponents() - 1.0)
        + jitter(rng, 0.05);
    to_chips(clamp(factor, BLUFF_FACTOR_RANGE), inputs)
}

/// Sizing to charge draws when holding a strong but vulnerable hand.
pub fn protection_bet<R: Rng + ?Sized>(inputs: &SizingInputs, rng: &mut R) -> Chips {
    let mut factor = 0.5 + inputs.texture_risk * 0.2 + jitter(rng, 0.05);
    if inputs.spr < 3.0 {
        factor += 0.1;
    }
    to_chips(clamp(factor, PROTECTION_FACTOR_RANGE), inputs)
}

/// Sizing above the pot for near-nut hands with little behind.
pub fn overbet<R: Rng + ?Sized>(inputs: &SizingInputs, rng: &mut R) -> Chips {
    let mut factor = 1.2 + jitter(rng, 0.1);
    if inputs.spr < 1.5 {
        factor += 0.15;
    }
    to_chips(clamp(factor, OVERBET_FACTOR_RANGE), inputs)
}

fn spr_shift(spr: f32) -> f32 {
    if spr < 2.0 {
        0.1
    } else if spr < 4.0 {
        0.05
    } else if spr > 6.0 {
        -0.05
    } else {
        0.0
    }
}

/// Uniform in (-spread, spread)
fn jitter<R: Rng + ?Sized>(rng: &mut R, spread: f32) -> f32 {
    (rng.random::<f32>() * 2.0 - 1.0) * spread
}

fn clamp(factor: f32, (min, max): (f32, f32)) -> f32 {
    factor.clamp(min, max)
}

fn to_chips(factor: f32, inputs: &SizingInputs) -> Chips {
    let raw = inputs.base() * factor;
    let rounded = ((raw / 10.0).round() * 10.0) as Chips;
    rounded.min(inputs.chips)
}
