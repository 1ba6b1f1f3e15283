//! Bot decision-making: combines strength, board, opponent and sizing
//! signals into one legal action.

use super::{
    board::BoardContext,
    errors::{BotError, BotResult},
    models::{BotDifficulty, Decision, DecisionContext, Player, PlayerId, Position},
    opponents::OpponentModel,
    sizing::{self, SizingInputs},
    strength::{HandEvaluator, StandardEvaluator, hand_strength, strength_ratio},
};
use crate::game::entities::{Card, Chips, Street};
use rand::{Rng, rngs::ThreadRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// === Threshold / aggressiveness adjustments ===

/// Lowest raise threshold any adjustment can reach
const THRESHOLD_FLOOR: f32 = 0.15;

/// Highest raise threshold any adjustment can reach. `validate` rejects a
/// `strength_tie_delta` above `1 - THRESHOLD_CEILING` so maximum-strength
/// hands never land in the tie zone.
const THRESHOLD_CEILING: f32 = 0.75;

/// Aggressiveness never drops below this
const AGGRESSIVENESS_FLOOR: f32 = 0.1;

const LATE_POSITION_THRESHOLD: f32 = 0.05;
const LATE_POSITION_AGGRESSION: f32 = 0.1;

const HEADS_UP_THRESHOLD: f32 = 0.1;
const HEADS_UP_AGGRESSION: f32 = 0.2;

const THREE_WAY_THRESHOLD: f32 = 0.05;
const THREE_WAY_AGGRESSION: f32 = 0.1;

const OVERPAIR_THRESHOLD: f32 = 0.15;
const OVERPAIR_AGGRESSION: f32 = 0.3;

const TOP_PAIR_THRESHOLD: f32 = 0.1;
const TOP_PAIR_AGGRESSION: f32 = 0.2;

const DRAW_THRESHOLD: f32 = 0.05;
const DRAW_AGGRESSION: f32 = 0.15;

const LOOSENESS_THRESHOLD: f32 = 0.2;
const LOOSENESS_AGGRESSION: f32 = 0.4;

const OPPONENT_AGGRESSION_THRESHOLD: f32 = 0.05;
const OPPONENT_AGGRESSION_AGGRESSION: f32 = 0.1;

const TEXTURE_THRESHOLD: f32 = 0.15;
const TEXTURE_DAMPING: f32 = 0.3;

/// Configuration for bot decision-making thresholds and probabilities.
///
/// All strength values are strength ratios in [0.0, 1.0]. Missing fields
/// take their defaults when deserialized.
///
/// # Examples
///
/// ```
/// use holdem_bot::bot::decision::BotDecisionConfig;
///
/// let config = BotDecisionConfig::default();
/// assert_eq!(config.max_raises_per_round, 3);
/// assert_eq!(config.preflop_raise_threshold, 0.7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotDecisionConfig {
    /// Distance from the raise threshold resolved by a coin flip.
    ///
    /// **Effect**: 0.25 = hands within 0.25 of the threshold raise half the time.
    /// At most 0.25.
    pub strength_tie_delta: f32,

    /// Pot-odds margin resolved by a coin flip when deciding to call.
    pub odds_tie_delta: f32,

    /// Hard cap on raises per betting round.
    pub max_raises_per_round: u8,

    /// Base raise threshold before the flop.
    pub preflop_raise_threshold: f32,

    /// Base raise threshold on the flop, turn and river.
    pub postflop_raise_threshold: f32,

    /// Base multiplier on strength when compared with pot odds.
    ///
    /// **Higher** = calls lighter
    pub base_aggressiveness: f32,

    /// Stack-to-pot ratio at or below which strong hands go all-in.
    pub shove_spr: f32,

    /// Strength needed for the low-SPR shove.
    pub shove_strength: f32,

    /// Preflop stacks at or below this many big blinds shove strong hands.
    pub short_stack_bb: f32,

    /// Strength needed for the short-stack shove.
    pub short_stack_strength: f32,

    /// Largest fraction of the stack a strong hand risks before raising.
    pub strong_hand_stack_ratio: f32,

    /// Largest fraction of the stack risked on a pot-odds call preflop.
    pub preflop_call_stack_fraction: f32,

    /// Largest fraction of the stack risked on a pot-odds call postflop.
    pub postflop_call_stack_fraction: f32,

    /// Strength above which a fold into an all-in becomes a call (preflop).
    pub preflop_allin_defense: f32,

    /// Strength above which a fold into an all-in becomes a call (postflop).
    pub postflop_allin_defense: f32,

    /// Chance to upsize a near-nut raise to an overbet.
    pub overbet_probability: f32,

    /// Chance to slow-play a near-nut raise.
    pub slow_play_probability: f32,

    /// Chance to turn a free check with a made hand into a protection bet.
    pub protect_probability: f32,

    /// Strength treated as near the nuts.
    pub near_nut_strength: f32,

    /// Overbets only happen at or below this stack-to-pot ratio.
    pub overbet_max_spr: f32,

    /// Strength that counts as a made hand worth protecting.
    pub protect_min_strength: f32,

    /// Average hands observed before opponent stats carry any weight.
    pub min_sample_hands: f32,

    /// Hands over the minimum sample for weight to reach `1 - 1/e`.
    pub sample_growth_rate: f32,

    /// Cap on the opponent fold rate used for bluffing.
    pub max_bluff_fold_rate: f32,

    /// Multiplier on the bluff chance.
    ///
    /// **Effect**: 0.0 = never bluffs
    pub bluff_scale: f32,
}

impl Default for BotDecisionConfig {
    fn default() -> Self {
        Self {
            // Tie-breaks
            strength_tie_delta: 0.25,
            odds_tie_delta: 0.02,
            max_raises_per_round: 3,
            // Thresholds
            preflop_raise_threshold: 0.7,
            postflop_raise_threshold: 0.35,
            base_aggressiveness: 1.0,
            // Shoves
            shove_spr: 1.2,
            shove_strength: 0.65,
            short_stack_bb: 10.0,
            short_stack_strength: 0.75,
            // Stack bounds
            strong_hand_stack_ratio: 1.0 / 3.0,
            preflop_call_stack_fraction: 0.5,
            postflop_call_stack_fraction: 0.7,
            // All-in defense
            preflop_allin_defense: 0.85,
            postflop_allin_defense: 0.5,
            // Post-adjustments
            overbet_probability: 0.3,
            slow_play_probability: 0.3,
            protect_probability: 0.3,
            near_nut_strength: 0.85,
            overbet_max_spr: 3.0,
            protect_min_strength: 0.3,
            // Opponent model
            min_sample_hands: 10.0,
            sample_growth_rate: 20.0,
            max_bluff_fold_rate: 0.3,
            bluff_scale: 1.0,
        }
    }
}

impl BotDecisionConfig {
    /// Preset tuned for a difficulty level
    pub fn for_difficulty(difficulty: BotDifficulty) -> Self {
        let base = Self::default();
        match difficulty {
            BotDifficulty::Easy => Self {
                preflop_raise_threshold: base.preflop_raise_threshold + 0.1,
                postflop_raise_threshold: base.postflop_raise_threshold + 0.1,
                base_aggressiveness: 1.15,
                bluff_scale: 0.0,
                ..base
            },
            BotDifficulty::Standard => base,
            BotDifficulty::Tag => Self {
                preflop_raise_threshold: base.preflop_raise_threshold - 0.05,
                postflop_raise_threshold: base.postflop_raise_threshold - 0.05,
                base_aggressiveness: 0.9,
                bluff_scale: 1.3,
                ..base
            },
        }
    }

    /// Parse a JSON config; absent fields take defaults.
    pub fn from_json_str(json: &str) -> BotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BotResult<()> {
        let ratios = [
            ("strength_tie_delta", self.strength_tie_delta),
            ("odds_tie_delta", self.odds_tie_delta),
            ("preflop_raise_threshold", self.preflop_raise_threshold),
            ("postflop_raise_threshold", self.postflop_raise_threshold),
            ("shove_strength", self.shove_strength),
            ("short_stack_strength", self.short_stack_strength),
            ("strong_hand_stack_ratio", self.strong_hand_stack_ratio),
            ("preflop_call_stack_fraction", self.preflop_call_stack_fraction),
            ("postflop_call_stack_fraction", self.postflop_call_stack_fraction),
            ("preflop_allin_defense", self.preflop_allin_defense),
            ("postflop_allin_defense", self.postflop_allin_defense),
            ("overbet_probability", self.overbet_probability),
            ("slow_play_probability", self.slow_play_probability),
            ("protect_probability", self.protect_probability),
            ("near_nut_strength", self.near_nut_strength),
            ("protect_min_strength", self.protect_min_strength),
            ("max_bluff_fold_rate", self.max_bluff_fold_rate),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(BotError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        if self.strength_tie_delta > 1.0 - THRESHOLD_CEILING {
            return Err(BotError::InvalidConfig(format!(
                "strength_tie_delta must be at most {}, got {}",
                1.0 - THRESHOLD_CEILING,
                self.strength_tie_delta
            )));
        }

        let non_negative = [
            ("shove_spr", self.shove_spr),
            ("short_stack_bb", self.short_stack_bb),
            ("overbet_max_spr", self.overbet_max_spr),
            ("min_sample_hands", self.min_sample_hands),
            ("bluff_scale", self.bluff_scale),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(BotError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if !(self.base_aggressiveness.is_finite() && self.base_aggressiveness > 0.0) {
            return Err(BotError::InvalidConfig(format!(
                "base_aggressiveness must be positive, got {}",
                self.base_aggressiveness
            )));
        }
        if !(self.sample_growth_rate.is_finite() && self.sample_growth_rate > 0.0) {
            return Err(BotError::InvalidConfig(format!(
                "sample_growth_rate must be positive, got {}",
                self.sample_growth_rate
            )));
        }
        if self.max_raises_per_round == 0 {
            return Err(BotError::InvalidConfig(
                "max_raises_per_round must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn raise_threshold(&self, street: Street) -> f32 {
        match street {
            Street::Preflop => self.preflop_raise_threshold,
            _ => self.postflop_raise_threshold,
        }
    }
}

/// Which decision branch produced the initial action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    /// Player cannot act meaningfully (folded, all-in, no chips, no cards)
    Degenerate,
    Shove,
    /// Nothing to call
    Open,
    /// Facing a bet with a strong hand
    Strong,
    /// Facing a bet, calling on pot odds
    Odds,
    Fold,
}

/// Overrides applied after the initial branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Adjustment {
    AllInDefense,
    Bluff,
    Overbet,
    SlowPlay,
    Protect,
    /// The final legality pass changed the action
    Downgraded,
}

/// Diagnostic fields of one decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionTrace {
    pub player: PlayerId,
    pub street: Street,
    pub route: Route,
    pub adjustments: Vec<Adjustment>,
    pub strength_ratio: f32,
    pub pot_odds: f32,
    pub raise_threshold: f32,
    pub aggressiveness: f32,
    pub texture_risk: f32,
    pub bluff_chance: f32,
    pub spr: f32,
    pub need_to_call: Chips,
    pub board: BoardContext,
    pub opponents: OpponentModel,
    pub decision: Decision,
}

/// Callback receiving every decision's trace
pub type DecisionObserver = Box<dyn Fn(&DecisionTrace) + Send + Sync>;

/// Bot decision maker.
///
/// Holds no per-hand state: every signal is recomputed from the player and
/// context passed to [`BotDecisionMaker::decide_action`].
pub struct BotDecisionMaker<R: Rng = ThreadRng> {
    /// Random number generator
    rng: R,
    /// Configuration for decision-making
    config: BotDecisionConfig,
    evaluator: Arc<dyn HandEvaluator>,
    observer: Option<DecisionObserver>,
}

impl BotDecisionMaker<ThreadRng> {
    /// Create a new decision maker with default config
    pub fn new() -> Self {
        Self::with_config(BotDecisionConfig::default())
    }

    /// Create a new decision maker with custom config
    pub fn with_config(config: BotDecisionConfig) -> Self {
        Self::with_rng(config, rand::rng())
    }
}

impl Default for BotDecisionMaker<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> BotDecisionMaker<R> {
    /// Create a decision maker drawing randomness from `rng`
    pub fn with_rng(config: BotDecisionConfig, rng: R) -> Self {
        Self {
            rng,
            config,
            evaluator: Arc::new(StandardEvaluator),
            observer: None,
        }
    }

    /// Swap the ranked-hand evaluator
    pub fn with_evaluator(mut self, evaluator: Arc<dyn HandEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Receive a [`DecisionTrace`] for every decision
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&DecisionTrace) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &BotDecisionConfig {
        &self.config
    }

    /// Decide the action for `player` in `ctx`.
    ///
    /// Always returns a legal decision: raises respect the minimum raise and
    /// the per-round cap, and no call or raise exceeds the player's stack.
    pub fn decide_action(&mut self, player: &Player, ctx: &DecisionContext) -> Decision {
        let need = ctx.need_to_call(player);

        let hole = match degenerate(player, need) {
            Ok(hole) => hole,
            Err(decision) => {
                let trace = DecisionTrace {
                    player: player.id,
                    street: ctx.phase,
                    route: Route::Degenerate,
                    adjustments: Vec::new(),
                    strength_ratio: 0.0,
                    pot_odds: 0.0,
                    raise_threshold: 0.0,
                    aggressiveness: 0.0,
                    texture_risk: 0.0,
                    bluff_chance: 0.0,
                    spr: 0.0,
                    need_to_call: need,
                    board: BoardContext::default(),
                    opponents: OpponentModel::default(),
                    decision,
                };
                self.report(&trace);
                return decision;
            }
        };

        let cfg = &self.config;
        let preflop = ctx.is_preflop();
        let chips = player.chips;
        let call_amount = need.min(chips);

        let strength = strength_ratio(hand_strength(
            &hole,
            &ctx.board,
            ctx.phase,
            self.evaluator.as_ref(),
        ));
        let board = BoardContext::analyze(&hole, &ctx.board, self.evaluator.as_ref());
        let opponents =
            OpponentModel::observe(ctx, player, cfg.min_sample_hands, cfg.sample_growth_rate);
        let active = ctx.active_opponents(player);
        let position = ctx.position_of(player);

        let pot_odds = if need == 0 {
            0.0
        } else {
            need as f32 / (ctx.pot as f32 + need as f32)
        };
        let spr = chips as f32 / ctx.pot.max(1) as f32;
        let stack_ratio = need as f32 / chips as f32;
        let texture = board.texture_risk;
        let (threshold, aggressiveness) =
            signals(cfg, ctx.phase, position, active, &board, &opponents);
        let bluff_chance =
            (opponents.bluff_chance(cfg.max_bluff_fold_rate, texture) * cfg.bluff_scale).clamp(0.0, 1.0);

        let can_raise = ctx.raises_this_round < cfg.max_raises_per_round && chips > need;
        let min_increment = ctx.min_raise_increment();
        let sizing = SizingInputs {
            pot: ctx.pot,
            to_call: need,
            chips,
            strength,
            texture_risk: texture,
            spr,
            position,
            opponents: active,
            preflop,
        };

        let equity = strength * aggressiveness;
        let odds_ok = |fraction: f32| equity >= pot_odds && stack_ratio <= fraction;
        let call_fraction = if preflop {
            cfg.preflop_call_stack_fraction
        } else {
            cfg.postflop_call_stack_fraction
        };
        let in_tie_zone = (strength - threshold).abs() < cfg.strength_tie_delta;

        // 1-5: first applicable branch wins
        let short_stacked = chips as f32 <= cfg.short_stack_bb * ctx.big_blind as f32;
        let (route, mut decision) = if (spr <= cfg.shove_spr && strength >= cfg.shove_strength)
            || (preflop && short_stacked && strength >= cfg.short_stack_strength)
        {
            (Route::Shove, Decision::Raise(chips))
        } else if need == 0 {
            let raise = Decision::Raise(sizing::value_bet(&sizing, &mut self.rng).max(min_increment));
            let decision = if !can_raise {
                Decision::Check
            } else if in_tie_zone {
                if coin_flip(&mut self.rng) {
                    raise
                } else {
                    Decision::Check
                }
            } else if strength >= threshold {
                raise
            } else {
                Decision::Check
            };
            (Route::Open, decision)
        } else if strength >= threshold - cfg.strength_tie_delta
            && stack_ratio <= cfg.strong_hand_stack_ratio
            && can_raise
        {
            let raise = Decision::Raise(
                need.saturating_add(
                    sizing::protection_bet(&sizing, &mut self.rng).max(min_increment),
                ),
            );
            let decision = if !in_tie_zone || coin_flip(&mut self.rng) {
                raise
            } else if odds_ok(call_fraction) {
                Decision::Call(call_amount)
            } else {
                Decision::Fold
            };
            (Route::Strong, decision)
        } else if stack_ratio <= call_fraction && equity - pot_odds > -cfg.odds_tie_delta {
            let decision = if (equity - pot_odds).abs() >= cfg.odds_tie_delta
                || coin_flip(&mut self.rng)
            {
                Decision::Call(call_amount)
            } else {
                Decision::Fold
            };
            (Route::Odds, decision)
        } else {
            (Route::Fold, Decision::Fold)
        };

        let mut adjustments = Vec::new();
        let anyone_all_in = ctx.anyone_all_in(player);

        // (a) all-in defense
        let defense = if preflop {
            cfg.preflop_allin_defense
        } else {
            cfg.postflop_allin_defense
        };
        if decision == Decision::Fold && anyone_all_in && strength > defense {
            decision = Decision::Call(call_amount);
            adjustments.push(Adjustment::AllInDefense);
        }

        // (b) bluff injection
        if matches!(decision, Decision::Check | Decision::Fold)
            && !anyone_all_in
            && can_raise
            && chance(&mut self.rng, bluff_chance)
        {
            decision = Decision::Raise(
                need.saturating_add(sizing::bluff_bet(&sizing, &mut self.rng).max(min_increment)),
            );
            adjustments.push(Adjustment::Bluff);
        }

        if route != Route::Shove && !preflop {
            let near_nuts = strength >= cfg.near_nut_strength;

            // (c) overbet upsizing
            if let Decision::Raise(amount) = decision
                && near_nuts
                && spr <= cfg.overbet_max_spr
                && chance(&mut self.rng, cfg.overbet_probability)
            {
                let overbet =
                    need.saturating_add(sizing::overbet(&sizing, &mut self.rng).max(min_increment));
                decision = Decision::Raise(overbet.max(amount));
                adjustments.push(Adjustment::Overbet);
            }

            // (d) slow-play
            let mut slow_played = false;
            if decision.is_raise() && near_nuts && chance(&mut self.rng, cfg.slow_play_probability)
            {
                decision = if need == 0 {
                    Decision::Check
                } else {
                    Decision::Call(call_amount)
                };
                slow_played = true;
                adjustments.push(Adjustment::SlowPlay);
            }

            // (e) protect a made hand that checked through
            let made = board.top_pair || board.overpair || strength >= cfg.protect_min_strength;
            if !slow_played
                && decision == Decision::Check
                && need == 0
                && can_raise
                && made
                && !near_nuts
                && chance(&mut self.rng, cfg.protect_probability)
            {
                decision = Decision::Raise(
                    sizing::protection_bet(&sizing, &mut self.rng).max(min_increment),
                );
                adjustments.push(Adjustment::Protect);
            }
        }

        let legal = legalize(decision, need, chips, min_increment, ctx.raises_this_round, cfg);
        if legal != decision {
            adjustments.push(Adjustment::Downgraded);
        }

        let trace = DecisionTrace {
            player: player.id,
            street: ctx.phase,
            route,
            adjustments,
            strength_ratio: strength,
            pot_odds,
            raise_threshold: threshold,
            aggressiveness,
            texture_risk: texture,
            bluff_chance,
            spr,
            need_to_call: need,
            board,
            opponents,
            decision: legal,
        };
        self.report(&trace);
        legal
    }

    fn report(&self, trace: &DecisionTrace) {
        log::debug!(
            "Player {} {} -> {} via {:?} {:?} (strength {:.2}, threshold {:.2}, odds {:.2}, aggr {:.2}, texture {:.2}, bluff {:.2}, spr {:.2})",
            trace.player,
            trace.street,
            trace.decision,
            trace.route,
            trace.adjustments,
            trace.strength_ratio,
            trace.raise_threshold,
            trace.pot_odds,
            trace.aggressiveness,
            trace.texture_risk,
            trace.bluff_chance,
            trace.spr,
        );
        if let Some(observer) = &self.observer {
            observer(trace);
        }
    }
}

/// Resolve players that cannot take a real decision. Returns the hole
/// cards when the player can act.
fn degenerate(player: &Player, need: Chips) -> Result<[Card; 2], Decision> {
    if player.folded {
        return Err(Decision::Fold);
    }
    if player.all_in || player.chips == 0 {
        return Err(Decision::Check);
    }
    match player.hole_cards {
        Some(hole) => Ok(hole),
        None => {
            log::warn!("Player {} asked to act without hole cards", player.id);
            Err(if need == 0 {
                Decision::Check
            } else {
                Decision::Fold
            })
        }
    }
}

/// Raise threshold and aggressiveness after every contextual adjustment
fn signals(
    cfg: &BotDecisionConfig,
    street: Street,
    position: Position,
    active_opponents: usize,
    board: &BoardContext,
    opponents: &OpponentModel,
) -> (f32, f32) {
    let mut threshold = cfg.raise_threshold(street);
    let mut aggressiveness = cfg.base_aggressiveness;

    if position == Position::Late {
        threshold -= LATE_POSITION_THRESHOLD;
        aggressiveness += LATE_POSITION_AGGRESSION;
    }

    match active_opponents {
        0 | 1 => {
            threshold -= HEADS_UP_THRESHOLD;
            aggressiveness += HEADS_UP_AGGRESSION;
        }
        2 => {
            threshold -= THREE_WAY_THRESHOLD;
            aggressiveness += THREE_WAY_AGGRESSION;
        }
        _ => {}
    }

    if board.overpair {
        threshold -= OVERPAIR_THRESHOLD;
        aggressiveness += OVERPAIR_AGGRESSION;
    } else if board.top_pair {
        threshold -= TOP_PAIR_THRESHOLD;
        aggressiveness += TOP_PAIR_AGGRESSION;
    }

    if board.has_draw() {
        threshold -= DRAW_THRESHOLD;
        aggressiveness += DRAW_AGGRESSION;
    }

    let looseness = opponents.looseness();
    threshold -= LOOSENESS_THRESHOLD * looseness;
    aggressiveness += LOOSENESS_AGGRESSION * looseness;

    let excess = opponents.excess_aggression();
    threshold += OPPONENT_AGGRESSION_THRESHOLD * excess;
    aggressiveness += OPPONENT_AGGRESSION_AGGRESSION * excess;

    threshold += TEXTURE_THRESHOLD * board.texture_risk;
    aggressiveness *= 1.0 - board.texture_risk * TEXTURE_DAMPING;

    (
        threshold.clamp(THRESHOLD_FLOOR, THRESHOLD_CEILING),
        aggressiveness.max(AGGRESSIVENESS_FLOOR),
    )
}

/// Enforce stack, minimum-raise and raise-cap rules.
fn legalize(
    decision: Decision,
    need: Chips,
    chips: Chips,
    min_increment: Chips,
    raises_this_round: u8,
    cfg: &BotDecisionConfig,
) -> Decision {
    let passive = if need == 0 {
        Decision::Check
    } else {
        Decision::Call(need.min(chips))
    };
    match decision {
        Decision::Raise(amount) => {
            let amount = amount.min(chips);
            if amount <= need
                || amount < need.saturating_add(min_increment)
                || raises_this_round >= cfg.max_raises_per_round
            {
                passive
            } else {
                Decision::Raise(amount)
            }
        }
        Decision::Call(_) => passive,
        other => other,
    }
}

fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<f32>() < 0.5
}

fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    probability > 0.0 && rng.random::<f32>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{models::PlayerStats, testing::FixedRng};
    use crate::game::entities::parse_cards;
    use std::sync::Mutex;

    fn card(code: &str) -> Card {
        code.parse().unwrap()
    }

    fn maker(rng: FixedRng) -> BotDecisionMaker<FixedRng> {
        BotDecisionMaker::with_rng(BotDecisionConfig::default(), rng)
    }

    /// Four seats: the acting player at seat 0, button on seat 1
    fn table(hole: (&str, &str), phase: Street, board: &[&str]) -> (Player, DecisionContext) {
        let me = Player::new(0, "bot", 2000).with_hole_cards(card(hole.0), card(hole.1));
        let players = vec![
            me.clone(),
            Player::new(1, "button", 2000).as_dealer(),
            Player::new(2, "small", 2000),
            Player::new(3, "big", 2000).as_big_blind(),
        ];
        let ctx = DecisionContext {
            current_bet: 0,
            pot: 30,
            small_blind: 10,
            big_blind: 20,
            raises_this_round: 0,
            phase,
            players,
            last_raise: 0,
            board: parse_cards(board).unwrap(),
        };
        (me, ctx)
    }

    fn rngs() -> [FixedRng; 3] {
        [FixedRng::low(), FixedRng(1 << 63), FixedRng::high()]
    }

    /// Bot that records every trace it reports
    fn observed(
        config: BotDecisionConfig,
        rng: FixedRng,
    ) -> (BotDecisionMaker<FixedRng>, Arc<Mutex<Vec<DecisionTrace>>>) {
        let traces = Arc::new(Mutex::new(Vec::new()));
        let sink = traces.clone();
        let bot = BotDecisionMaker::with_rng(config, rng).with_observer(move |trace: &DecisionTrace| {
            sink.lock().unwrap().push(trace.clone());
        });
        (bot, traces)
    }

    fn last_trace(traces: &Arc<Mutex<Vec<DecisionTrace>>>) -> DecisionTrace {
        traces.lock().unwrap().last().cloned().unwrap()
    }

    /// Quad nines on the flop with `chips` behind and `pot` in the middle
    fn quads(chips: Chips, pot: Chips) -> (Player, DecisionContext) {
        let (mut me, mut ctx) = table(("9C", "9D"), Street::Flop, &["9H", "9S", "2C"]);
        me.chips = chips;
        ctx.players[0].chips = chips;
        ctx.pot = pot;
        (me, ctx)
    }

    #[test]
    fn test_pocket_aces_open_raise() {
        for difficulty in [BotDifficulty::Easy, BotDifficulty::Standard, BotDifficulty::Tag] {
            for rng in rngs() {
                let (me, ctx) = table(("AC", "AD"), Street::Preflop, &[]);
                let mut bot =
                    BotDecisionMaker::with_rng(BotDecisionConfig::for_difficulty(difficulty), rng);
                let decision = bot.decide_action(&me, &ctx);
                assert!(decision.is_raise(), "{difficulty}: {decision}");
            }
        }
    }

    #[test]
    fn test_raise_cap_never_raises() {
        for rng in rngs() {
            let (me, mut ctx) = table(("AC", "AD"), Street::Preflop, &[]);
            ctx.raises_this_round = 3;
            assert_eq!(maker(rng).decide_action(&me, &ctx), Decision::Check);

            ctx.current_bet = 100;
            ctx.last_raise = 80;
            ctx.pot = 130;
            let decision = maker(rng).decide_action(&me, &ctx);
            assert!(!decision.is_raise(), "{decision}");
        }
    }

    #[test]
    fn test_raises_respect_minimum() {
        for rng in rngs() {
            let (me, mut ctx) = table(("KS", "KH"), Street::Preflop, &[]);
            ctx.current_bet = 100;
            ctx.last_raise = 300;
            ctx.pot = 150;
            let decision = maker(rng).decide_action(&me, &ctx);
            if let Decision::Raise(amount) = decision {
                assert!(amount >= 400, "{decision}");
            }
            assert!(decision.amount().unwrap_or(0) <= me.chips);
        }
    }

    #[test]
    fn test_short_all_in_raise_becomes_call() {
        let (mut me, mut ctx) = table(("AC", "AD"), Street::Preflop, &[]);
        me.chips = 250;
        ctx.players[0].chips = 250;
        ctx.current_bet = 200;
        ctx.last_raise = 180;
        ctx.pot = 400;
        // Shove of 250 is below 200 + 180
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Call(200));
    }

    #[test]
    fn test_all_in_defense_calls() {
        for rng in rngs() {
            let (me, mut ctx) = table(("AC", "AD"), Street::Preflop, &[]);
            let mut me = me;
            me.chips = 1000;
            ctx.players[0].chips = 1000;
            ctx.players[2].all_in = true;
            ctx.current_bet = 900;
            ctx.last_raise = 880;
            ctx.pot = 800;
            assert_eq!(maker(rng).decide_action(&me, &ctx), Decision::Call(900));
        }
    }

    #[test]
    fn test_weak_hand_folds_into_all_in() {
        let (me, mut ctx) = table(("7C", "2D"), Street::Preflop, &[]);
        ctx.players[2].all_in = true;
        ctx.current_bet = 1500;
        ctx.last_raise = 1480;
        ctx.pot = 1530;
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Fold);
    }

    #[test]
    fn test_degenerate_players() {
        let (mut me, mut ctx) = table(("AC", "AD"), Street::Flop, &["2C", "7D", "KS"]);
        ctx.current_bet = 100;

        me.folded = true;
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Fold);

        me.folded = false;
        me.chips = 0;
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Check);

        me.chips = 500;
        me.all_in = true;
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Check);

        me.all_in = false;
        me.hole_cards = None;
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Fold);
        ctx.current_bet = 0;
        assert_eq!(maker(FixedRng::low()).decide_action(&me, &ctx), Decision::Check);
    }

    #[test]
    fn test_low_spr_shove() {
        for rng in rngs() {
            // Aces full
            let (mut me, mut ctx) = table(("AC", "AD"), Street::Flop, &["AS", "7C", "7D"]);
            me.chips = 500;
            ctx.pot = 600;
            assert_eq!(maker(rng).decide_action(&me, &ctx), Decision::Raise(500));
        }
    }

    #[test]
    fn test_huge_stacks_do_not_overflow() {
        for rng in rngs() {
            let (me, mut ctx) = quads(4_000_000_000, 2_000_000_000);
            ctx.current_bet = 1_000_000_000;
            ctx.last_raise = 1_000_000_000;
            let (mut bot, traces) = observed(BotDecisionConfig::default(), rng);
            let decision = bot.decide_action(&me, &ctx);
            assert!(decision.amount().unwrap_or(0) <= me.chips, "{decision}");
            assert_ne!(decision, Decision::Fold);
            if rng.0 == 0 {
                // Overbet above u32::MAX saturates, then gets slow-played
                let trace = last_trace(&traces);
                assert!(trace.adjustments.contains(&Adjustment::Overbet));
                assert_eq!(decision, Decision::Call(1_000_000_000));
            }
        }
    }

    #[test]
    fn test_overbet_near_nuts_at_low_spr() {
        let config = BotDecisionConfig {
            slow_play_probability: 0.0,
            ..Default::default()
        };
        let (me, ctx) = quads(2000, 1000);

        let (mut bot, traces) = observed(config.clone(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Raise(1100));
        let trace = last_trace(&traces);
        assert_eq!(trace.route, Route::Open);
        assert_eq!(trace.adjustments, vec![Adjustment::Overbet]);

        let (mut bot, traces) = observed(config.clone(), FixedRng::high());
        assert!(bot.decide_action(&me, &ctx).is_raise());
        assert!(last_trace(&traces).adjustments.is_empty());

        // Deep stacks keep the value size
        let (me, ctx) = quads(2000, 300);
        let (mut bot, traces) = observed(config, FixedRng::low());
        assert!(bot.decide_action(&me, &ctx).is_raise());
        assert!(last_trace(&traces).adjustments.is_empty());
    }

    #[test]
    fn test_slow_play_checks_or_calls() {
        let config = BotDecisionConfig {
            overbet_probability: 0.0,
            ..Default::default()
        };
        let (me, mut ctx) = quads(2000, 1000);

        let (mut bot, traces) = observed(config.clone(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Check);
        assert_eq!(last_trace(&traces).adjustments, vec![Adjustment::SlowPlay]);

        ctx.current_bet = 200;
        ctx.last_raise = 200;
        let (mut bot, traces) = observed(config.clone(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Call(200));
        let trace = last_trace(&traces);
        assert_eq!(trace.route, Route::Strong);
        assert_eq!(trace.adjustments, vec![Adjustment::SlowPlay]);

        let (mut bot, traces) = observed(config, FixedRng::high());
        assert!(bot.decide_action(&me, &ctx).is_raise());
        assert!(last_trace(&traces).adjustments.is_empty());
    }

    #[test]
    fn test_slow_played_hand_is_not_protected() {
        let (me, ctx) = quads(2000, 1000);
        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Check);
        assert_eq!(
            last_trace(&traces).adjustments,
            vec![Adjustment::Overbet, Adjustment::SlowPlay]
        );
    }

    #[test]
    fn test_protects_top_pair_that_would_check() {
        // A tight postflop threshold puts top pair well below the tie zone
        let config = BotDecisionConfig {
            postflop_raise_threshold: 0.75,
            ..Default::default()
        };
        let (me, mut ctx) = table(("KC", "8D"), Street::Flop, &["KS", "7H", "2C"]);
        ctx.pot = 300;

        let (mut bot, traces) = observed(config.clone(), FixedRng::low());
        let decision = bot.decide_action(&me, &ctx);
        assert!(decision.is_raise(), "{decision}");
        let trace = last_trace(&traces);
        assert!(trace.board.top_pair);
        assert_eq!(trace.route, Route::Open);
        assert_eq!(trace.adjustments, vec![Adjustment::Protect]);

        let (mut bot, traces) = observed(config, FixedRng::high());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Check);
        assert!(last_trace(&traces).adjustments.is_empty());
    }

    #[test]
    fn test_shove_skips_postflop_adjustments() {
        let (me, ctx) = quads(500, 600);
        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Raise(500));
        let trace = last_trace(&traces);
        assert_eq!(trace.route, Route::Shove);
        assert!(trace.adjustments.is_empty());
    }

    #[test]
    fn test_strong_tie_zone_falls_back_to_call_or_fold() {
        // KQo at 0.8 against a 0.7 threshold facing a bet
        let (me, mut ctx) = table(("KC", "QD"), Street::Preflop, &[]);
        ctx.current_bet = 100;
        ctx.last_raise = 80;
        ctx.pot = 130;

        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::low());
        assert!(bot.decide_action(&me, &ctx).is_raise());
        assert_eq!(last_trace(&traces).route, Route::Strong);

        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::high());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Call(100));
        assert_eq!(last_trace(&traces).route, Route::Strong);

        // Pot odds of 1.0 cannot be met
        ctx.current_bet = 600;
        ctx.last_raise = 600;
        ctx.pot = 0;
        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::high());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Fold);
        assert_eq!(last_trace(&traces).route, Route::Strong);
    }

    #[test]
    fn test_odds_tie_zone_flips_between_call_and_fold() {
        // Pair of sevens (2/9) priced at exactly 200 into 700
        let (me, mut ctx) = table(("7S", "8D"), Street::Flop, &["2C", "7D", "KS"]);
        ctx.current_bet = 200;
        ctx.last_raise = 200;
        ctx.pot = 700;
        ctx.raises_this_round = 3;

        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Call(200));
        assert_eq!(last_trace(&traces).route, Route::Odds);

        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::high());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Fold);
        assert_eq!(last_trace(&traces).route, Route::Odds);

        // Clearly short of the price folds without a flip
        ctx.pot = 300;
        let (mut bot, traces) = observed(BotDecisionConfig::default(), FixedRng::low());
        assert_eq!(bot.decide_action(&me, &ctx), Decision::Fold);
        assert_eq!(last_trace(&traces).route, Route::Fold);
    }

    #[test]
    fn test_zero_pot_is_not_degenerate() {
        let (me, mut ctx) = table(("9C", "4D"), Street::Flop, &["2C", "7D", "KS"]);
        ctx.pot = 0;
        let decision = maker(FixedRng::high()).decide_action(&me, &ctx);
        assert_eq!(decision, Decision::Check);
    }

    #[test]
    fn test_tie_zone_flips_between_check_and_raise() {
        // KQo scores 0.8 against a 0.7 threshold
        let (me, ctx) = table(("KC", "QD"), Street::Preflop, &[]);
        assert!(maker(FixedRng::low()).decide_action(&me, &ctx).is_raise());
        assert_eq!(maker(FixedRng::high()).decide_action(&me, &ctx), Decision::Check);
    }

    #[test]
    fn test_calls_cheap_bet_with_pot_odds() {
        // Pair of sevens facing a 20 chip bet into 400
        let (me, mut ctx) = table(("7S", "8D"), Street::Flop, &["2C", "7D", "KS"]);
        ctx.current_bet = 20;
        ctx.last_raise = 20;
        ctx.pot = 400;
        ctx.raises_this_round = 3;
        assert_eq!(maker(FixedRng::high()).decide_action(&me, &ctx), Decision::Call(20));
    }

    #[test]
    fn test_bluffs_against_folding_table() {
        let folder = PlayerStats {
            hands: 200,
            folds: 160,
            vpip: 20,
            calls: 20,
            aggressive_acts: 10,
        };
        let (me, mut ctx) = table(("2D", "3H"), Street::Flop, &["KS", "9H", "4C"]);
        for seat in ctx.players.iter_mut().skip(1) {
            seat.stats = folder.clone();
        }
        ctx.pot = 300;

        let traces = Arc::new(Mutex::new(Vec::new()));
        let sink = traces.clone();
        let mut bot = maker(FixedRng::low()).with_observer(move |trace: &DecisionTrace| {
            sink.lock().unwrap().push(trace.clone());
        });
        assert!(bot.decide_action(&me, &ctx).is_raise());

        let traces = traces.lock().unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].route, Route::Open);
        assert_eq!(traces[0].adjustments, vec![Adjustment::Bluff]);
        assert!(traces[0].bluff_chance > 0.25);

        // Same spot without enough history never bluffs
        for seat in ctx.players.iter_mut().skip(1) {
            seat.stats = PlayerStats::default();
        }
        let traces = Arc::new(Mutex::new(Vec::new()));
        let sink = traces.clone();
        let mut bot = maker(FixedRng::low()).with_observer(move |trace: &DecisionTrace| {
            sink.lock().unwrap().push(trace.clone());
        });
        bot.decide_action(&me, &ctx);
        let traces = traces.lock().unwrap();
        assert_eq!(traces[0].bluff_chance, 0.0);
        assert!(!traces[0].adjustments.contains(&Adjustment::Bluff));
    }

    #[test]
    fn test_easy_preset_never_bluffs() {
        let config = BotDecisionConfig::for_difficulty(BotDifficulty::Easy);
        assert_eq!(config.bluff_scale, 0.0);
        assert!(config.preflop_raise_threshold > BotDecisionConfig::default().preflop_raise_threshold);
        config.validate().unwrap();
        BotDecisionConfig::for_difficulty(BotDifficulty::Tag)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_config_from_json() {
        let config = BotDecisionConfig::from_json_str(r#"{"max_raises_per_round": 4}"#).unwrap();
        assert_eq!(config.max_raises_per_round, 4);
        assert_eq!(config.strength_tie_delta, 0.25);

        assert!(matches!(
            BotDecisionConfig::from_json_str(r#"{"overbet_probability": 1.5}"#),
            Err(BotError::InvalidConfig(_))
        ));
        // A wider tie zone would let maximum-strength hands check
        assert!(matches!(
            BotDecisionConfig::from_json_str(r#"{"strength_tie_delta": 0.35}"#),
            Err(BotError::InvalidConfig(_))
        ));
        assert!(matches!(
            BotDecisionConfig::from_json_str("{"),
            Err(BotError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_signals_respond_to_context() {
        let cfg = BotDecisionConfig::default();
        let neutral = BoardContext::default();
        let model = OpponentModel::default();

        let (base, base_aggr) = signals(&cfg, Street::Flop, Position::Early, 4, &neutral, &model);
        assert!((base - 0.35).abs() < 1e-6);
        assert!((base_aggr - 1.0).abs() < 1e-6);

        let (late, late_aggr) = signals(&cfg, Street::Flop, Position::Late, 4, &neutral, &model);
        assert!(late < base && late_aggr > base_aggr);

        let (heads_up, heads_up_aggr) =
            signals(&cfg, Street::Flop, Position::Early, 1, &neutral, &model);
        let (three_way, three_way_aggr) =
            signals(&cfg, Street::Flop, Position::Early, 2, &neutral, &model);
        assert!(heads_up < three_way && three_way < base);
        assert!(heads_up_aggr > three_way_aggr && three_way_aggr > base_aggr);

        let wet = BoardContext {
            texture_risk: 1.0,
            ..neutral
        };
        let (wet_threshold, wet_aggr) = signals(&cfg, Street::Flop, Position::Early, 4, &wet, &model);
        assert!(wet_threshold > base && wet_aggr < base_aggr);

        let (preflop, _) = signals(&cfg, Street::Preflop, Position::Early, 4, &neutral, &model);
        assert!((preflop - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_legalize() {
        let cfg = BotDecisionConfig::default();
        assert_eq!(legalize(Decision::Raise(50), 40, 1000, 20, 0, &cfg), Decision::Call(40));
        assert_eq!(legalize(Decision::Raise(60), 40, 1000, 20, 0, &cfg), Decision::Raise(60));
        assert_eq!(legalize(Decision::Raise(5000), 0, 1000, 20, 0, &cfg), Decision::Raise(1000));
        assert_eq!(legalize(Decision::Raise(100), 0, 1000, 20, 3, &cfg), Decision::Check);
        assert_eq!(legalize(Decision::Call(500), 500, 300, 20, 0, &cfg), Decision::Call(300));
        assert_eq!(legalize(Decision::Call(0), 0, 300, 20, 0, &cfg), Decision::Check);
    }
}
