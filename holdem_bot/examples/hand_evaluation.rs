//! Hand Evaluation Example
//!
//! Demonstrates how hands are scored and how the bot turns those scores
//! into a decision on each street.

use holdem_bot::bot::{
    BoardContext, BotDecisionMaker, DecisionContext, Player, StandardEvaluator,
    strength::{hand_strength, preflop_score, strength_ratio},
};
use holdem_bot::entities::{Street, parse_cards};
use holdem_bot::functional::eval;

fn main() {
    println!("=== Hold'em Bot Hand Evaluation Example ===\n");

    // Example 1: Preflop scores
    println!("Example 1: Preflop scores");
    for (a, b) in [("AC", "AD"), ("KS", "QS"), ("9H", "7D"), ("5H", "4H"), ("7C", "2D")] {
        let score = preflop_score(a.parse().unwrap(), b.parse().unwrap());
        println!("  {a} {b}: {score:.1}");
    }

    // Example 2: Best hand categories
    println!("\nExample 2: Evaluating 7-card hands");
    let hands = [
        ["AH", "KH", "QH", "JH", "TH", "9S", "2C"],
        ["8S", "8H", "8D", "8C", "2S", "3D", "4H"],
        ["TS", "TH", "TD", "6C", "6S", "2D", "3H"],
        ["AS", "2D", "3H", "4C", "5S", "9D", "KH"],
        ["9S", "9H", "KD", "7C", "4S", "2D", "3H"],
    ];
    for codes in hands {
        let cards = parse_cards(&codes).unwrap();
        let best = eval(&cards);
        if let Some(head) = best.first() {
            println!("  {}: {} ({:?})", codes.join(" "), head.rank.name(), head.values);
        }
    }

    // Example 3: One hand across the streets
    println!("\nExample 3: AH KH from preflop to river");
    let hole = parse_cards(&["AH", "KH"]).unwrap();
    let hole = [hole[0], hole[1]];
    let runout = parse_cards(&["QH", "7H", "2D", "9S", "4H"]).unwrap();

    let me = Player::new(0, "bot", 2000).with_hole_cards(hole[0], hole[1]);
    let mut bot = BotDecisionMaker::new();

    let mut street = Some(Street::Preflop);
    while let Some(current) = street {
        let board = &runout[..current.board_size()];
        let strength = hand_strength(&hole, board, current, &StandardEvaluator);
        let context = BoardContext::analyze(&hole, board, &StandardEvaluator);

        let ctx = DecisionContext {
            current_bet: 0,
            pot: 120,
            small_blind: 10,
            big_blind: 20,
            raises_this_round: 0,
            phase: current,
            players: vec![me.clone(), Player::new(1, "villain", 2000).as_dealer()],
            last_raise: 0,
            board: board.to_vec(),
        };
        let decision = bot.decide_action(&me, &ctx);

        println!(
            "  {current}: strength {:.2}, flush draw {}, texture {:.2} -> {decision}",
            strength_ratio(strength),
            context.flush_draw,
            context.texture_risk,
        );
        street = current.next();
    }

    println!("\n=== End of Hand Evaluation Example ===");
}
