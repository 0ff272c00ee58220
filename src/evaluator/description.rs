use super::Category;
use crate::cards::Rank;

/// Display string for a category and its tiebreak ranks.
pub fn describe(category: Category, kickers: &[Rank]) -> String {
    let first = kickers.first().copied();
    let second = kickers.get(1).copied();
    match (category, first, second) {
        (Category::RoyalFlush, _, _) => "Royal flush".to_string(),
        (Category::StraightFlush, Some(top), _) => format!("{}-high straight flush", top.name()),
        (Category::FourOfAKind, Some(quads), _) => format!("Four of a kind, {}", quads.plural()),
        (Category::FullHouse, Some(trips), Some(pair)) => {
            format!("Full house, {} over {}", trips.plural(), pair.plural())
        }
        (Category::Flush, Some(top), _) => format!("{}-high flush", top.name()),
        (Category::Straight, Some(top), _) => format!("{}-high straight", top.name()),
        (Category::ThreeOfAKind, Some(trips), _) => format!("Three of a kind, {}", trips.plural()),
        (Category::TwoPair, Some(high), Some(low)) => {
            format!("Two pair, {} and {}", high.plural(), low.plural())
        }
        (Category::Pair, Some(pair), _) => format!("Pair of {}", pair.plural()),
        (Category::HighCard, Some(top), _) => format!("{} high", top.name()),
        (other, _, _) => other.name().to_string(),
    }
}
