use super::hand_analysis::HandAnalysis;
use super::Category;
use crate::cards::Rank;

/// One hand category: recognizes it and produces its tiebreak ranks.
pub trait CategoryDetector: Sync {
    fn category(&self) -> Category;

    /// Tiebreak ranks in descending significance, or `None` if the hand is not in this category.
    fn detect(&self, analysis: &HandAnalysis) -> Option<Vec<Rank>>;
}

pub struct RoyalFlushDetector;

impl CategoryDetector for RoyalFlushDetector {
    fn category(&self) -> Category {
        Category::RoyalFlush
    }

    fn detect(&self, analysis: &HandAnalysis) -> Option<Vec<Rank>> {
        match analysis.straight.top {
            Some(Rank::Ace) if analysis.suits.is_flush() => Some(vec![Rank::Ace]),
            _ => None,
        }
    }
}

pub struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn category(&self) -> Category {
        Category::StraightFlush
    }

    fn detect(&self, analysis: &HandAnalysis) -> Option<Vec<Rank>> {
        if !analysis.suits.is_flush() {
            return None;
        }
        analysis.straight.top.map(|top| vec![top])
    }
}

pub struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn category(&self) -> Category {
        Category::Flush
    }

    fn detect(&self, analysis: &HandAnalysis) -> Option<Vec<Rank>> {
        analysis.suits.is_flush().then(|| analysis.ranks.to_vec())
    }
}

pub struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn category(&self) -> Category {
        Category::Straight
    }

    fn detect(&self, analysis: &HandAnalysis) -> Option<Vec<Rank>> {
        analysis.straight.top.map(|top| vec![top])
    }
}

/// Categories defined purely by rank multiplicities (quads, boat, trips, pairs, high card).
pub struct ShapeDetector {
    category: Category,
    shape: &'static [u8],
}

impl CategoryDetector for ShapeDetector {
    fn category(&self) -> Category {
        self.category
    }

    fn detect(&self, analysis: &HandAnalysis) -> Option<Vec<Rank>> {
        (analysis.groups.shape() == self.shape).then(|| analysis.groups.ordered_ranks())
    }
}

pub const FOUR_OF_A_KIND: ShapeDetector =
    ShapeDetector { category: Category::FourOfAKind, shape: &[4, 1] };
pub const FULL_HOUSE: ShapeDetector = ShapeDetector { category: Category::FullHouse, shape: &[3, 2] };
pub const THREE_OF_A_KIND: ShapeDetector =
    ShapeDetector { category: Category::ThreeOfAKind, shape: &[3, 1, 1] };
pub const TWO_PAIR: ShapeDetector = ShapeDetector { category: Category::TwoPair, shape: &[2, 2, 1] };
pub const PAIR: ShapeDetector = ShapeDetector { category: Category::Pair, shape: &[2, 1, 1, 1] };
pub const HIGH_CARD: ShapeDetector =
    ShapeDetector { category: Category::HighCard, shape: &[1, 1, 1, 1, 1] };

/// Detectors from strongest to weakest; the first match decides the category.
pub const DETECTORS: [&dyn CategoryDetector; 10] = [
    &RoyalFlushDetector,
    &StraightFlushDetector,
    &FOUR_OF_A_KIND,
    &FULL_HOUSE,
    &FlushDetector,
    &StraightDetector,
    &THREE_OF_A_KIND,
    &TWO_PAIR,
    &PAIR,
    &HIGH_CARD,
];
