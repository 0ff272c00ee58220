use holdem_engine::cards::{parse_cards, Card, Rank, Suit};
use holdem_engine::evaluator::{evaluate, evaluate_cards, evaluate_five, Category, EvalError};
use holdem_engine::hand::{Board, HoleCards};

fn five(s: &str) -> [Card; 5] {
    let cards = parse_cards(s).unwrap();
    [cards[0], cards[1], cards[2], cards[3], cards[4]]
}

fn holdem(hole: &str, board: &str) -> holdem_engine::evaluator::HandEvaluation {
    let hole: HoleCards = hole.parse().unwrap();
    let board: Board = board.parse().unwrap();
    evaluate(&hole, &board).unwrap()
}

#[test]
fn every_category_is_recognized() {
    let cases = [
        ("As Ks Qs Js Ts", Category::RoyalFlush, "Royal flush"),
        ("9h 8h 7h 6h 5h", Category::StraightFlush, "Nine-high straight flush"),
        ("9c 9d 9h 9s Ac", Category::FourOfAKind, "Four of a kind, Nines"),
        ("3c 3d 3h Js Jc", Category::FullHouse, "Full house, Threes over Jacks"),
        ("Kh Th 8h 6h 3h", Category::Flush, "King-high flush"),
        ("Ac 5c 4d 3h 2s", Category::Straight, "Five-high straight"),
        ("7c 7d 7h Ks 2c", Category::ThreeOfAKind, "Three of a kind, Sevens"),
        ("Kc Kd 9h 9s 2c", Category::TwoPair, "Two pair, Kings and Nines"),
        ("6c 6d Ah 9s 2c", Category::Pair, "Pair of Sixes"),
        ("Qc Td 8h 5s 2c", Category::HighCard, "Queen high"),
    ];
    for (cards, category, description) in cases {
        let e = evaluate_five(&five(cards));
        assert_eq!(e.category, category, "{cards}");
        assert_eq!(e.description(), description, "{cards}");
    }
}

#[test]
fn categories_rank_in_order() {
    let ladder = [
        "Qc Td 8h 5s 2c",
        "6c 6d Ah 9s 2c",
        "Kc Kd 9h 9s 2c",
        "7c 7d 7h Ks 2c",
        "Ac 5c 4d 3h 2s",
        "Kh Th 8h 6h 3h",
        "3c 3d 3h Js Jc",
        "9c 9d 9h 9s Ac",
        "9h 8h 7h 6h 5h",
        "As Ks Qs Js Ts",
    ];
    let evals: Vec<_> = ladder.iter().map(|s| evaluate_five(&five(s))).collect();
    for pair in evals.windows(2) {
        assert!(pair[1] > pair[0], "{:?} should beat {:?}", pair[1].category, pair[0].category);
    }
}

#[test]
fn kickers_break_ties_within_a_category() {
    let better = evaluate_five(&five("Kc Kd 9h 9s Ac"));
    let worse = evaluate_five(&five("Kh Ks 9c 9d Qc"));
    assert!(better > worse);
    assert_eq!(better.kickers, vec![Rank::King, Rank::Nine, Rank::Ace]);

    let same_a = evaluate_five(&five("Ac Kd 8h 5s 3c"));
    let same_b = evaluate_five(&five("Ad Kh 8s 5c 3d"));
    assert_eq!(same_a, same_b);
}

#[test]
fn best_five_of_seven() {
    // Board pairs the kicker; the flush in hearts wins over trips.
    let e = holdem("Ah 7h", "7c 7d 2h 9h Kh");
    assert_eq!(e.category, Category::Flush);
    assert_eq!(e.kickers[0], Rank::Ace);
    assert!(e.best_five.iter().all(|c| c.suit() == Suit::Hearts));

    // Two trips make a full house with the higher set on top.
    let e = holdem("Qs Qd", "Qc 4h 4d 4s 8c");
    assert_eq!(e.category, Category::FullHouse);
    assert_eq!(e.description(), "Full house, Queens over Fours");

    // Three pairs: only the best two count, plus the best remaining kicker.
    let e = holdem("Ac Ad", "Kc Kd 3h 3s 9c");
    assert_eq!(e.category, Category::TwoPair);
    assert_eq!(e.kickers, vec![Rank::Ace, Rank::King, Rank::Nine]);
}

#[test]
fn wheel_lists_the_ace_last() {
    let e = holdem("As 2d", "3c 4h 5s Kd Kc");
    assert_eq!(e.category, Category::Straight);
    assert_eq!(e.kickers, vec![Rank::Five]);
    assert_eq!(e.best_five[4].rank(), Rank::Ace);
}

#[test]
fn flop_and_turn_evaluate_on_fewer_cards() {
    assert_eq!(holdem("Ah Kh", "Qh Jh Th").category, Category::RoyalFlush);
    assert_eq!(holdem("2c 2d", "2h 9s Kd 4c").category, Category::ThreeOfAKind);
}

#[test]
fn invalid_inputs_are_errors() {
    let hole: HoleCards = "Ah Kh".parse().unwrap();
    let preflop = Board::empty();
    assert_eq!(evaluate(&hole, &preflop).unwrap_err(), EvalError::NotEnoughCards(2));

    let overlapping: Board = "Ah 2c 3d".parse().unwrap();
    assert!(matches!(evaluate(&hole, &overlapping), Err(EvalError::InvalidHand(_))));

    let cards = parse_cards("Ah Kh Qh Jh Th 9h 8h 7h").unwrap();
    assert_eq!(evaluate_cards(&cards).unwrap_err(), EvalError::TooManyCards(8));
    assert!(evaluate_cards(&parse_cards("Ah Ah Qh Jh Th").unwrap()).is_err());
}
