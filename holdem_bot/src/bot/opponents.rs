//! Opponent tendencies aggregated from session stats.

use super::models::{DecisionContext, Player};
use serde::Serialize;

/// Aggregated opponent signals.
///
/// `weight` stays at zero until the table has been observed long enough,
/// and every adjustment derived from this model is multiplied by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpponentModel {
    pub avg_fold_rate: f32,
    /// Laplace-smoothed VPIP, 0.5 when nothing is known
    pub avg_vpip: f32,
    pub avg_aggression: f32,
    pub avg_hands: f32,
    /// Confidence in the averages, in [0, 1)
    pub weight: f32,
}

impl Default for OpponentModel {
    fn default() -> Self {
        Self {
            avg_fold_rate: 0.0,
            avg_vpip: 0.5,
            avg_aggression: 1.0,
            avg_hands: 0.0,
            weight: 0.0,
        }
    }
}

impl OpponentModel {
    /// Aggregate every seat other than `player`.
    pub fn observe(
        ctx: &DecisionContext,
        player: &Player,
        min_sample_hands: f32,
        growth_rate: f32,
    ) -> Self {
        let opponents: Vec<&Player> = ctx.opponents(player).collect();
        if opponents.is_empty() {
            return Self::default();
        }
        let n = opponents.len() as f32;
        let mean = |f: fn(&Player) -> f32| opponents.iter().map(|p| f(p)).sum::<f32>() / n;

        let avg_hands = mean(|p| p.stats.hands as f32);

        Self {
            avg_fold_rate: mean(|p| p.stats.fold_rate()),
            avg_vpip: mean(|p| p.stats.vpip_rate()),
            avg_aggression: mean(|p| p.stats.aggression()),
            avg_hands,
            weight: sample_weight(avg_hands, min_sample_hands, growth_rate),
        }
    }

    /// Probability of turning a check or fold into a bluff.
    pub fn bluff_chance(&self, max_fold_rate: f32, texture_risk: f32) -> f32 {
        self.avg_fold_rate.min(max_fold_rate) * self.weight * (1.0 - texture_risk * 0.5)
    }

    /// Looseness relative to a neutral table, scaled by confidence.
    /// Positive when opponents enter too many pots.
    pub fn looseness(&self) -> f32 {
        (self.avg_vpip - 0.5) * self.weight
    }

    /// Aggression above a neutral 1:1 bet/call ratio, scaled by confidence.
    pub fn excess_aggression(&self) -> f32 {
        (self.avg_aggression - 1.0).clamp(-0.5, 1.0) * self.weight
    }
}

/// `1 - e^(-(hands - min)/growth)` above the sample threshold, else 0.
pub fn sample_weight(avg_hands: f32, min_sample_hands: f32, growth_rate: f32) -> f32 {
    if avg_hands <= min_sample_hands || growth_rate <= 0.0 {
        return 0.0;
    }
    1.0 - (-(avg_hands - min_sample_hands) / growth_rate).exp()
}
