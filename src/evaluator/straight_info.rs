use crate::cards::Rank;

/// Straight detection over a five-card rank set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StraightInfo {
    /// Highest card of the straight; `Five` for the wheel.
    pub top: Option<Rank>,
}

impl StraightInfo {
    const WHEEL: u16 = (1 << 14) | (1 << 5) | (1 << 4) | (1 << 3) | (1 << 2);

    pub fn detect(ranks: &[Rank; 5]) -> Self {
        let mask = ranks.iter().fold(0u16, |m, r| m | (1 << r.value()));
        if mask.count_ones() != 5 {
            return Self { top: None };
        }
        if mask == Self::WHEEL {
            return Self { top: Some(Rank::Five) };
        }
        let low = mask.trailing_zeros();
        let run = mask >> low;
        let top = if run == 0b1_1111 { Rank::from_value((low + 4) as u8) } else { None };
        Self { top }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadway() {
        let info = StraightInfo::detect(&[Rank::Ten, Rank::Ace, Rank::Queen, Rank::King, Rank::Jack]);
        assert_eq!(info.top, Some(Rank::Ace));
    }

    #[test]
    fn wheel_is_five_high() {
        let info = StraightInfo::detect(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]);
        assert_eq!(info.top, Some(Rank::Five));
    }

    #[test]
    fn six_high_beats_wheel() {
        let info = StraightInfo::detect(&[Rank::Six, Rank::Five, Rank::Four, Rank::Three, Rank::Two]);
        assert_eq!(info.top, Some(Rank::Six));
    }

    #[test]
    fn gaps_and_pairs_are_not_straights() {
        let gap = StraightInfo::detect(&[Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Nine]);
        assert_eq!(gap.top, None);
        let paired = StraightInfo::detect(&[Rank::Ace, Rank::Ace, Rank::King, Rank::Queen, Rank::Jack]);
        assert_eq!(paired.top, None);
        // No wrap-around through the ace.
        let wrap = StraightInfo::detect(&[Rank::Queen, Rank::King, Rank::Ace, Rank::Two, Rank::Three]);
        assert_eq!(wrap.top, None);
    }
}
