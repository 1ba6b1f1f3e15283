//! Ranked-hand evaluation over any number of cards.

use super::entities::{ACE, Card, Rank, SubHand, Value};

/// Evaluate the best five-card hand among `cards`.
///
/// The result is ordered so that two evaluations compare correctly with
/// `Ord`: the first subhand carries the category and its defining values,
/// an optional trailing `HighCard` subhand carries the kickers. Fewer than
/// five cards are allowed (preflop, partial boards); the hand is simply
/// shorter.
pub fn eval(cards: &[Card]) -> Vec<SubHand> {
    if cards.is_empty() {
        return Vec::new();
    }

    let mut counts = [0u8; 15];
    let mut by_suit: [Vec<Value>; 4] = Default::default();
    for card in cards {
        counts[card.0 as usize] += 1;
        by_suit[card.1.index()].push(card.0);
    }

    let flush_values = by_suit.iter().find(|values| values.len() >= 5);

    if let Some(values) = flush_values
        && let Some(high) = straight_high(values.iter().copied())
    {
        return vec![SubHand {
            rank: Rank::StraightFlush,
            values: vec![high],
        }];
    }

    // (count, value), most copies first, then highest value.
    let mut groups: Vec<(u8, Value)> = (2..=ACE)
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let Some(&(top_count, top_value)) = groups.first() else {
        return Vec::new();
    };

    if top_count >= 4 {
        return with_kickers(Rank::FourOfAKind, vec![top_value], &counts, 1);
    }

    if top_count == 3 {
        let pair = groups[1..]
            .iter()
            .filter(|(count, _)| *count >= 2)
            .map(|(_, value)| *value)
            .max();
        if let Some(pair) = pair {
            return vec![SubHand {
                rank: Rank::FullHouse,
                values: vec![top_value, pair],
            }];
        }
    }

    if let Some(values) = flush_values {
        let mut values = values.clone();
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.truncate(5);
        return vec![SubHand {
            rank: Rank::Flush,
            values,
        }];
    }

    if let Some(high) = straight_high(groups.iter().map(|(_, value)| *value)) {
        return vec![SubHand {
            rank: Rank::Straight,
            values: vec![high],
        }];
    }

    if top_count == 3 {
        return with_kickers(Rank::ThreeOfAKind, vec![top_value], &counts, 2);
    }

    let pairs: Vec<Value> = groups
        .iter()
        .filter(|(count, _)| *count == 2)
        .map(|(_, value)| *value)
        .collect();

    match pairs.as_slice() {
        [high, low, ..] => with_kickers(Rank::TwoPair, vec![*high, *low], &counts, 1),
        [pair] => with_kickers(Rank::OnePair, vec![*pair], &counts, 3),
        [] => vec![SubHand {
            rank: Rank::HighCard,
            values: top_values(&counts, &[], 5),
        }],
    }
}

/// Highest card of a five-long run, counting the ace low as well.
pub fn straight_high(values: impl IntoIterator<Item = Value>) -> Option<Value> {
    let mut present = [false; 15];
    for value in values {
        present[value as usize] = true;
        if value == ACE {
            present[1] = true;
        }
    }
    (5..=ACE)
        .rev()
        .find(|&high| (high - 4..=high).all(|v| present[v as usize]))
}

fn with_kickers(rank: Rank, values: Vec<Value>, counts: &[u8; 15], n: usize) -> Vec<SubHand> {
    let kickers = top_values(counts, &values, n);
    let mut hand = vec![SubHand { rank, values }];
    if !kickers.is_empty() {
        hand.push(SubHand {
            rank: Rank::HighCard,
            values: kickers,
        });
    }
    hand
}

fn top_values(counts: &[u8; 15], exclude: &[Value], n: usize) -> Vec<Value> {
    (2..=ACE)
        .rev()
        .filter(|&v| counts[v as usize] > 0 && !exclude.contains(&v))
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::parse_cards;

    fn eval_codes(codes: &[&str]) -> Vec<SubHand> {
        eval(&parse_cards(codes).unwrap())
    }

    fn category(codes: &[&str]) -> Rank {
        eval_codes(codes)[0].rank
    }

    #[test]
    fn test_eval_categories() {
        assert_eq!(category(&["AH", "KD", "9C", "7S", "2H"]), Rank::HighCard);
        assert_eq!(category(&["AH", "AD", "9C", "7S", "2H"]), Rank::OnePair);
        assert_eq!(category(&["AH", "AD", "9C", "9S", "2H"]), Rank::TwoPair);
        assert_eq!(category(&["AH", "AD", "AC", "9S", "2H"]), Rank::ThreeOfAKind);
        assert_eq!(category(&["5H", "6D", "7C", "8S", "9H"]), Rank::Straight);
        assert_eq!(category(&["AH", "JH", "9H", "4H", "2H"]), Rank::Flush);
        assert_eq!(category(&["AH", "AD", "AC", "9S", "9H"]), Rank::FullHouse);
        assert_eq!(category(&["AH", "AD", "AC", "AS", "9H"]), Rank::FourOfAKind);
        assert_eq!(
            category(&["5H", "6H", "7H", "8H", "9H"]),
            Rank::StraightFlush
        );
    }

    #[test]
    fn test_eval_wheel_straight() {
        let hand = eval_codes(&["AH", "2D", "3C", "4S", "5H", "KD", "KC"]);
        assert_eq!(hand[0].rank, Rank::Straight);
        assert_eq!(hand[0].values, vec![5]);
    }

    #[test]
    fn test_eval_seven_cards_picks_best() {
        // Flush beats the straight also present.
        let hand = eval_codes(&["9H", "TH", "JD", "QH", "KH", "2H", "8C"]);
        assert_eq!(hand[0].rank, Rank::Flush);
        assert_eq!(hand[0].values, vec![13, 12, 10, 9, 2]);
    }

    #[test]
    fn test_eval_two_trips_make_full_house() {
        let hand = eval_codes(&["9H", "9D", "9C", "5S", "5H", "5D", "2C"]);
        assert_eq!(hand[0].rank, Rank::FullHouse);
        assert_eq!(hand[0].values, vec![9, 5]);
    }

    #[test]
    fn test_eval_pair_kickers() {
        let hand = eval_codes(&["QH", "QD", "AC", "7S", "4H", "3D", "2C"]);
        assert_eq!(hand[0].rank, Rank::OnePair);
        assert_eq!(hand[0].values, vec![12]);
        assert_eq!(hand[1].values, vec![14, 7, 4]);
    }

    #[test]
    fn test_eval_short_hands() {
        assert!(eval(&[]).is_empty());
        let pocket = eval_codes(&["AC", "AD"]);
        assert_eq!(pocket, vec![SubHand { rank: Rank::OnePair, values: vec![14] }]);
    }

    #[test]
    fn test_eval_ordering_compares_hands() {
        let kings = eval_codes(&["KH", "KD", "9C", "7S", "2H"]);
        let aces = eval_codes(&["AH", "AD", "3C", "4S", "6H"]);
        let aces_better_kicker = eval_codes(&["AS", "AC", "3D", "4C", "8H"]);
        assert!(aces > kings);
        assert!(aces_better_kicker > aces);
    }
}
