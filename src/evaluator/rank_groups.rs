use crate::cards::Rank;

/// Ranks of a five-card hand bucketed by multiplicity, ordered by (count desc, rank desc).
///
/// `KKK99` groups as `[(King, 3), (Nine, 2)]`; `AQ992` as `[(Nine, 2), (Ace, 1), (Queen, 1), (Two, 1)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(Rank, u8)>,
}

impl RankGroups {
    pub fn from_ranks(ranks: &[Rank; 5]) -> Self {
        let mut counts = [0u8; 15];
        for r in ranks {
            counts[r.value() as usize] += 1;
        }
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .rev()
            .filter_map(|&r| {
                let c = counts[r.value() as usize];
                (c > 0).then_some((r, c))
            })
            .collect();
        // Stable sort keeps the descending rank order within a count.
        groups.sort_by(|a, b| b.1.cmp(&a.1));
        Self { groups }
    }

    /// Multiplicities in group order, e.g. `[3, 2]` for a full house.
    pub fn shape(&self) -> Vec<u8> {
        self.groups.iter().map(|&(_, c)| c).collect()
    }

    /// Every distinct rank in group order. This is the tiebreak sequence for all
    /// categories except straights.
    pub fn ordered_ranks(&self) -> Vec<Rank> {
        self.groups.iter().map(|&(r, _)| r).collect()
    }
}
