//! Minimal table engine driving bot seats through complete hands.
//!
//! Deals, posts blinds, walks the betting rounds by asking each bot for a
//! decision, and settles the pot (with side pots) at showdown. Every step
//! is recorded as an announcement for the caller to pace.

use holdem_bot::{
    bot::{BotDecisionMaker, Decision, DecisionContext, Player},
    entities::{Card, Chips, Deck, Street, SubHand},
    functional::eval,
};
use rand::Rng;
use std::collections::HashSet;

/// Safety cap on decisions per betting round
const MAX_ACTIONS_PER_ROUND: usize = 64;

/// Outcome of one hand
#[derive(Debug, Clone, Default)]
pub struct HandSummary {
    pub number: u32,
    /// Announcements in table order
    pub events: Vec<String>,
    /// (seat, chips won)
    pub payouts: Vec<(usize, Chips)>,
}

pub struct SimTable {
    pub seats: Vec<Player>,
    small_blind: Chips,
    big_blind: Chips,
    button: usize,
    hands_played: u32,
    deck: Deck,
}

/// Betting state of the street in progress
struct Round {
    street: Street,
    board: Vec<Card>,
    pot: Chips,
    current_bet: Chips,
    last_raise: Chips,
    raises: u8,
}

impl SimTable {
    pub fn new(players: usize, starting_chips: Chips, small_blind: Chips, big_blind: Chips) -> Self {
        let seats = (0..players)
            .map(|i| Player::new(i, &format!("bot{i}"), starting_chips))
            .collect();
        Self {
            seats,
            small_blind,
            big_blind,
            button: 0,
            hands_played: 0,
            deck: Deck::default(),
        }
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    /// Seats that can still post a blind
    pub fn funded_seats(&self) -> usize {
        self.seats.iter().filter(|p| p.chips > 0).count()
    }

    pub fn total_chips(&self) -> Chips {
        self.seats.iter().map(|p| p.chips).sum()
    }

    /// Play one full hand. `bots[i]` decides for seat `i`.
    pub fn play_hand<R: Rng, D: Rng>(
        &mut self,
        bots: &mut [BotDecisionMaker<D>],
        rng: &mut R,
    ) -> HandSummary {
        self.hands_played += 1;
        let mut summary = HandSummary {
            number: self.hands_played,
            ..Default::default()
        };

        for seat in &mut self.seats {
            seat.reset();
            // Busted seats sit out
            seat.folded = seat.chips == 0;
        }
        self.button = self.next_funded(self.button);
        self.seats[self.button].dealer = true;

        self.deck.shuffle(rng);
        for i in 0..self.seats.len() {
            if self.seats[i].folded {
                continue;
            }
            if let (Some(a), Some(b)) = (self.deck.deal_card(), self.deck.deal_card()) {
                self.seats[i].hole_cards = Some([a, b]);
            }
        }
        summary.events.push(format!(
            "Hand #{} - {} deals",
            summary.number, self.seats[self.button].name
        ));

        let mut contributions = vec![0; self.seats.len()];
        let mut round = Round {
            street: Street::Preflop,
            board: Vec::new(),
            pot: 0,
            current_bet: 0,
            last_raise: 0,
            raises: 0,
        };

        // Heads-up the button posts the small blind
        let heads_up = self.funded_seats() == 2;
        let sb_seat = if heads_up {
            self.button
        } else {
            self.next_funded(self.button)
        };
        let bb_seat = self.next_funded(sb_seat);
        self.seats[bb_seat].big_blind = true;
        for (seat, blind) in [(sb_seat, self.small_blind), (bb_seat, self.big_blind)] {
            let posted = self.commit(seat, blind, &mut round, &mut contributions);
            summary.events.push(format!(
                "{} posts {} ({} behind)",
                self.seats[seat].name, posted, self.seats[seat].chips
            ));
        }
        round.current_bet = self.big_blind;
        round.last_raise = self.big_blind;

        let mut voluntary = HashSet::new();
        let mut first_to_act = self.next_funded(bb_seat);

        loop {
            if self.live_seats() > 1 {
                self.betting_round(
                    first_to_act,
                    &mut round,
                    &mut contributions,
                    &mut voluntary,
                    bots,
                    &mut summary,
                );
            }

            let Some(next) = round.street.next() else {
                break;
            };
            if self.live_seats() <= 1 {
                break;
            }

            round.street = next;
            while round.board.len() < next.board_size() {
                if let Some(card) = self.deck.deal_card() {
                    round.board.push(card);
                }
            }
            round.current_bet = 0;
            round.last_raise = 0;
            round.raises = 0;
            for seat in &mut self.seats {
                seat.round_bet = 0;
            }
            summary.events.push(format!(
                "{}: {}",
                next,
                round
                    .board
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
            first_to_act = self.next_funded(self.button);
        }

        summary.payouts = self.settle(&contributions, &round.board, &mut summary.events);

        for (i, seat) in self.seats.iter_mut().enumerate() {
            if seat.hole_cards.is_some() {
                seat.stats.record_hand(seat.folded);
                if voluntary.contains(&i) {
                    seat.stats.record_vpip();
                }
            }
        }

        summary
    }

    fn betting_round<D: Rng>(
        &mut self,
        first: usize,
        round: &mut Round,
        contributions: &mut [Chips],
        voluntary: &mut HashSet<usize>,
        bots: &mut [BotDecisionMaker<D>],
        summary: &mut HandSummary,
    ) {
        let n = self.seats.len();
        let mut acted = vec![false; n];
        let mut seat = first;

        for _ in 0..MAX_ACTIONS_PER_ROUND {
            if self.live_seats() <= 1 || self.round_complete(round, &acted) {
                return;
            }
            let player = &self.seats[seat];
            if player.folded || player.all_in {
                seat = (seat + 1) % n;
                continue;
            }

            let ctx = self.context_for(seat, round);
            let decision = bots[seat].decide_action(player, &ctx);
            let need = ctx.need_to_call(player);
            let name = player.name.clone();

            match decision {
                Decision::Fold => {
                    self.seats[seat].folded = true;
                    summary.events.push(format!("{name} folds"));
                }
                Decision::Check if need > 0 => {
                    log::warn!("{name} checked facing {need}, folding");
                    self.seats[seat].folded = true;
                    summary.events.push(format!("{name} folds"));
                }
                Decision::Check => summary.events.push(format!("{name} checks")),
                Decision::Call(amount) => {
                    let paid = self.commit(seat, amount, round, contributions);
                    self.seats[seat].stats.record_call();
                    voluntary.insert(seat);
                    summary.events.push(format!("{name} calls {paid}"));
                }
                Decision::Raise(amount) => {
                    let previous = round.current_bet;
                    let paid = self.commit(seat, amount, round, contributions);
                    let total = self.seats[seat].round_bet;
                    if total > previous {
                        round.current_bet = total;
                        round.last_raise = round.last_raise.max(total - previous);
                        round.raises += 1;
                        // Everyone else must respond to the raise
                        acted.iter_mut().for_each(|a| *a = false);
                    }
                    self.seats[seat].stats.record_aggressive_action();
                    voluntary.insert(seat);
                    let all_in = if self.seats[seat].all_in { " (all-in)" } else { "" };
                    summary
                        .events
                        .push(format!("{name} raises {paid} to {total}{all_in}"));
                }
            }

            acted[seat] = true;
            seat = (seat + 1) % n;
        }
        log::warn!("Betting round hit the action cap on the {}", round.street);
    }

    fn round_complete(&self, round: &Round, acted: &[bool]) -> bool {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.folded && !p.all_in)
            .all(|(i, p)| acted[i] && p.round_bet >= round.current_bet)
    }

    /// Snapshot for a decision; other seats' hole cards stay hidden
    fn context_for(&self, seat: usize, round: &Round) -> DecisionContext {
        let players = self
            .seats
            .iter()
            .map(|p| {
                let mut view = p.clone();
                if p.id != seat {
                    view.hole_cards = None;
                }
                view
            })
            .collect();
        DecisionContext {
            current_bet: round.current_bet,
            pot: round.pot,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            raises_this_round: round.raises,
            phase: round.street,
            players,
            last_raise: round.last_raise,
            board: round.board.clone(),
        }
    }

    /// Move up to `amount` from a seat into the pot
    fn commit(
        &mut self,
        seat: usize,
        amount: Chips,
        round: &mut Round,
        contributions: &mut [Chips],
    ) -> Chips {
        let player = &mut self.seats[seat];
        let paid = amount.min(player.chips);
        player.chips -= paid;
        player.round_bet += paid;
        if player.chips == 0 {
            player.all_in = true;
        }
        contributions[seat] += paid;
        round.pot += paid;
        paid
    }

    /// Award main and side pots. Returns (seat, chips won).
    fn settle(
        &mut self,
        contributions: &[Chips],
        board: &[Card],
        events: &mut Vec<String>,
    ) -> Vec<(usize, Chips)> {
        let contenders: Vec<usize> = (0..self.seats.len())
            .filter(|&i| !self.seats[i].folded && self.seats[i].hole_cards.is_some())
            .collect();
        let hands: Vec<Option<Vec<SubHand>>> = self
            .seats
            .iter()
            .map(|p| {
                p.hole_cards.map(|hole| {
                    let mut cards = hole.to_vec();
                    cards.extend_from_slice(board);
                    eval(&cards)
                })
            })
            .collect();

        let mut levels: Vec<Chips> = contributions.iter().copied().filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut won = vec![0; self.seats.len()];
        let mut floor = 0;
        for level in levels {
            let slice: Chips = contributions
                .iter()
                .map(|&c| c.min(level) - c.min(floor))
                .sum();
            let eligible: Vec<usize> = contenders
                .iter()
                .copied()
                .filter(|&i| contributions[i] >= level)
                .collect();
            // Uncalled chips go back to the last contender standing
            let eligible = if eligible.is_empty() {
                contenders.clone()
            } else {
                eligible
            };
            let best = eligible.iter().filter_map(|&i| hands[i].as_ref()).max();
            let winners: Vec<usize> = eligible
                .iter()
                .copied()
                .filter(|&i| hands[i].as_ref() == best)
                .collect();
            if !winners.is_empty() {
                let share = slice / winners.len() as Chips;
                let remainder = slice % winners.len() as Chips;
                for (k, &i) in winners.iter().enumerate() {
                    won[i] += share + if k == 0 { remainder } else { 0 };
                }
            }
            floor = level;
        }

        let mut payouts = Vec::new();
        for (i, amount) in won.into_iter().enumerate() {
            if amount == 0 {
                continue;
            }
            self.seats[i].chips += amount;
            let shown = match (&hands[i], contenders.len() > 1) {
                (Some(hand), true) => hand
                    .first()
                    .map(|h| format!(" with {}", h.rank.name()))
                    .unwrap_or_default(),
                _ => String::new(),
            };
            events.push(format!("{} wins {}{}", self.seats[i].name, amount, shown));
            payouts.push((i, amount));
        }
        payouts
    }

    fn live_seats(&self) -> usize {
        self.seats.iter().filter(|p| !p.folded).count()
    }

    fn next_funded(&self, from: usize) -> usize {
        let n = self.seats.len();
        (1..=n)
            .map(|offset| (from + offset) % n)
            .find(|&i| self.seats[i].chips > 0 && !self.seats[i].folded)
            .unwrap_or(from)
    }
}
