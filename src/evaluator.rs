//! Best-five-of-seven hand evaluation.
//!
//! Every 5-card subset of the available cards is scored and the maximum wins. A score is a
//! packed [`HandValue`]: the category sits above all tiebreak bits, so a higher category always
//! outscores a lower one.

pub(crate) mod combinations;
pub(crate) mod description;
pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;
pub(crate) mod straight_info;
pub(crate) mod suit_info;

use crate::cards::{Card, Rank};
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use combinations::ChooseFive;
use core::cmp::Ordering;
use detector::DETECTORS;
use hand_analysis::HandAnalysis;
use serde::{Deserialize, Serialize};

/// Compact, comparable hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandValue(u64);

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two pair",
            Category::ThreeOfAKind => "Three of a kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full house",
            Category::FourOfAKind => "Four of a kind",
            Category::StraightFlush => "Straight flush",
            Category::RoyalFlush => "Royal flush",
        }
    }
}

impl HandValue {
    const CATEGORY_SHIFT: u32 = 48;
    const RANK_BITS: u32 = 6;

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a category and up to five tiebreak ranks (most significant first).
    ///
    /// Layout, high to low: `category | r0 | r1 | r2 | r3 | r4`, six bits per rank directly
    /// below the category. Missing ranks stay zero.
    pub fn from_parts(category: Category, tiebreak: &[Rank]) -> Self {
        let mut v = u64::from(category.ordinal()) << Self::CATEGORY_SHIFT;
        for (i, r) in tiebreak.iter().take(5).enumerate() {
            let offset = Self::CATEGORY_SHIFT - Self::RANK_BITS * (i as u32 + 1);
            v |= u64::from(r.value()) << offset;
        }
        HandValue(v)
    }

    pub const fn category_ordinal(self) -> u8 {
        (self.0 >> Self::CATEGORY_SHIFT) as u8
    }
}

/// Best five-card hand found for a player. Ordering and equality follow `score` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct HandEvaluation {
    pub category: Category,
    /// Tiebreak ranks in descending significance.
    pub kickers: Vec<Rank>,
    pub best_five: [Card; 5],
    score: HandValue,
}

impl HandEvaluation {
    pub const fn score(&self) -> HandValue {
        self.score
    }

    /// Human-readable summary, e.g. "Full house, Kings over Twos".
    pub fn description(&self) -> String {
        description::describe(self.category, &self.kickers)
    }
}

impl Ord for HandEvaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

impl PartialOrd for HandEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandEvaluation {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl Eq for HandEvaluation {}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate: {0}")]
    NotEnoughCards(usize),
    #[error("too many cards to evaluate: {0}")]
    TooManyCards(usize),
}

/// Evaluate a Hold'em holding: two hole cards plus three to five community cards.
///
/// ```
/// use holdem_engine::evaluator::{evaluate, Category};
///
/// let hole = "Ah Kh".parse().unwrap();
/// let board = "Qh Jh Th 2c".parse().unwrap();
/// let eval = evaluate(&hole, &board).unwrap();
/// assert_eq!(eval.category, Category::RoyalFlush);
/// assert_eq!(eval.description(), "Royal flush");
/// ```
pub fn evaluate(hole: &HoleCards, board: &Board) -> Result<HandEvaluation, EvalError> {
    validate_holdem(hole, board)?;
    if board.len() < 3 {
        return Err(EvalError::NotEnoughCards(board.len() + 2));
    }
    let mut cards = Vec::with_capacity(7);
    cards.extend_from_slice(&hole.as_array());
    cards.extend_from_slice(board.as_slice());
    evaluate_cards(&cards)
}

/// Best five-card evaluation among 5 to 7 distinct cards.
pub fn evaluate_cards(cards: &[Card]) -> Result<HandEvaluation, EvalError> {
    match cards.len() {
        n if n < 5 => return Err(EvalError::NotEnoughCards(n)),
        n if n > 7 => return Err(EvalError::TooManyCards(n)),
        _ => {}
    }
    for (i, c) in cards.iter().enumerate() {
        if cards[i + 1..].contains(c) {
            return Err(HandError::DuplicateBoardCards.into());
        }
    }

    let mut best: Option<HandEvaluation> = None;
    for idx in ChooseFive::new(cards.len()) {
        let eval = evaluate_five(&idx.map(|i| cards[i]));
        if best.as_ref().map_or(true, |b| eval > *b) {
            best = Some(eval);
        }
    }
    // ChooseFive yields at least once for 5..=7 cards.
    best.ok_or(EvalError::NotEnoughCards(cards.len()))
}

/// Score exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandEvaluation {
    let analysis = HandAnalysis::new(cards);
    let (category, kickers) = DETECTORS
        .iter()
        .find_map(|d| d.detect(&analysis).map(|k| (d.category(), k)))
        .unwrap_or_else(|| (Category::HighCard, analysis.ranks.to_vec()));
    HandEvaluation {
        category,
        score: HandValue::from_parts(category, &kickers),
        kickers,
        best_five: analysis.display_cards(),
    }
}

/// Compare two holdings on a shared board.
///
/// ```
/// use holdem_engine::evaluator::compare;
/// use std::cmp::Ordering;
///
/// let board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// let aces = "As Ah".parse().unwrap();
/// let kings = "Ks Kh".parse().unwrap();
/// assert_eq!(compare(&aces, &kings, &board).unwrap(), Ordering::Greater);
/// ```
pub fn compare(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let va = evaluate(a, board)?;
    let vb = evaluate(b, board)?;
    Ok(va.cmp(&vb))
}
