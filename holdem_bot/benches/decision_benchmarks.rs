use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holdem_bot::{
    bot::{
        BotDecisionConfig, BotDecisionMaker, DecisionContext, Player, PlayerStats, StandardEvaluator,
        board::{BoardContext, evaluate_board_texture},
        strength::{hand_strength, preflop_score},
    },
    entities::{Card, Street, parse_cards},
    functional::eval,
};
use rand::{SeedableRng, rngs::StdRng};
use std::hint::black_box;

fn cards(codes: &[&str]) -> Vec<Card> {
    parse_cards(codes).unwrap()
}

/// Table with `n_players` seats where seat 0 is the bot
fn setup_table(n_players: usize, street: Street) -> (Player, DecisionContext) {
    let hole = cards(&["AH", "KH"]);
    let me = Player::new(0, "bot", 5000).with_hole_cards(hole[0], hole[1]);
    let mut players = vec![me.clone()];
    for i in 1..n_players {
        players.push(Player::new(i, &format!("player{i}"), 5000).with_stats(PlayerStats {
            hands: 120,
            folds: 60,
            vpip: 40,
            calls: 30,
            aggressive_acts: 20,
        }));
    }
    players[n_players - 1].dealer = true;

    let board = cards(&["QH", "JD", "2H", "9S", "3C"]);
    let ctx = DecisionContext {
        current_bet: 100,
        pot: 400,
        small_blind: 10,
        big_blind: 20,
        raises_this_round: 1,
        phase: street,
        players,
        last_raise: 80,
        board: board[..street.board_size()].to_vec(),
    };
    (me, ctx)
}

/// Benchmark hand evaluation with 7 cards (hole + full board)
fn bench_hand_eval_7_cards(c: &mut Criterion) {
    let hand = cards(&["AS", "KS", "QS", "JS", "TS", "2H", "3D"]);

    c.bench_function("hand_eval_7_cards", |b| {
        b.iter(|| eval(black_box(&hand)));
    });
}

fn bench_preflop_score(c: &mut Criterion) {
    let hole = cards(&["9H", "7D"]);

    c.bench_function("preflop_score", |b| {
        b.iter(|| preflop_score(black_box(hole[0]), black_box(hole[1])));
    });
}

fn bench_board_analysis(c: &mut Criterion) {
    let pocket = cards(&["AH", "KH"]);
    let hole = [pocket[0], pocket[1]];
    let board = cards(&["QH", "JD", "2H", "9S"]);

    c.bench_function("board_context_turn", |b| {
        b.iter(|| BoardContext::analyze(black_box(&hole), black_box(&board), &StandardEvaluator));
    });

    c.bench_function("board_texture_turn", |b| {
        b.iter(|| evaluate_board_texture(black_box(&board)));
    });

    c.bench_function("hand_strength_turn", |b| {
        b.iter(|| hand_strength(&hole, black_box(&board), Street::Turn, &StandardEvaluator));
    });
}

/// Benchmark a full decision at different table sizes and streets
fn bench_decide_action(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide_action");

    for n_players in [2, 6, 9] {
        for street in [Street::Preflop, Street::River] {
            let (me, ctx) = setup_table(n_players, street);
            let mut bot =
                BotDecisionMaker::with_rng(BotDecisionConfig::default(), StdRng::seed_from_u64(42));
            group.bench_with_input(
                BenchmarkId::new(street.to_string(), n_players),
                &n_players,
                |b, _| b.iter(|| bot.decide_action(black_box(&me), black_box(&ctx))),
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hand_eval_7_cards,
    bench_preflop_score,
    bench_board_analysis,
    bench_decide_action
);
criterion_main!(benches);
