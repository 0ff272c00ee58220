use super::rank_groups::RankGroups;
use super::straight_info::StraightInfo;
use super::suit_info::SuitInfo;
use crate::cards::{Card, Rank};

/// Facts about one five-card hand, computed once and shared by all detectors.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Cards by rank descending, suit descending within a rank.
    pub sorted_cards: [Card; 5],
    pub ranks: [Rank; 5],
    pub groups: RankGroups,
    pub suits: SuitInfo,
    pub straight: StraightInfo,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut sorted_cards = *cards;
        sorted_cards.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));
        let ranks = sorted_cards.map(|c| c.rank());
        Self {
            sorted_cards,
            ranks,
            groups: RankGroups::from_ranks(&ranks),
            suits: SuitInfo::detect(&sorted_cards),
            straight: StraightInfo::detect(&ranks),
        }
    }

    /// Cards in presentation order: the wheel shows the ace last.
    pub fn display_cards(&self) -> [Card; 5] {
        let mut cards = self.sorted_cards;
        if self.straight.top == Some(Rank::Five) {
            cards.rotate_left(1);
        }
        cards
    }
}
