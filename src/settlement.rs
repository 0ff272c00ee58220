//! Side-pot construction and payout.

use crate::evaluator::{evaluate, HandEvaluation};
use crate::hand::Board;
use crate::state::{InvariantViolation, Phase, Player, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u64,
    /// Non-folded players who funded this pot, in seat order.
    pub eligible_players: Vec<PlayerId>,
    pub winners: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player: PlayerId,
    /// Shown-down hand; `None` for folded players and uncontested wins.
    pub evaluation: Option<HandEvaluation>,
    pub winnings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Everyone who won chips, in seat order.
    pub winners: Vec<PlayerId>,
    /// Main pot first.
    pub side_pots: Vec<SidePot>,
    pub player_results: Vec<PlayerResult>,
}

impl Settlement {
    pub fn total_paid(&self) -> u64 {
        self.player_results.iter().map(|r| r.winnings).sum()
    }

    pub fn winnings_of(&self, id: &PlayerId) -> u64 {
        self.player_results.iter().find(|r| &r.player == id).map_or(0, |r| r.winnings)
    }
}

/// Split the committed chips into pots and pay each one to its best eligible hand.
///
/// Tiers are the distinct positive `total_bet` levels. Each tier's pot is funded by everyone
/// who reached it; folded players fund pots but are never eligible. A tier nobody can win
/// joins the pot below it. Split pots are floored and the odd chips go to the first winner
/// in seat order.
pub fn settle(players: &[Player], board: &Board) -> Result<Settlement, InvariantViolation> {
    let pot: u64 = players.iter().map(|p| p.total_bet).sum();
    let contenders: Vec<usize> = (0..players.len()).filter(|&i| players[i].is_contender()).collect();

    match contenders.as_slice() {
        [] => return Err(InvariantViolation::TooFewPlayers(0)),
        [only] => return Ok(uncontested(players, *only, pot)),
        _ => {}
    }

    if board.len() != 5 {
        return Err(InvariantViolation::IncompleteBoard { phase: Phase::Showdown, cards: board.len() });
    }
    let mut evals: Vec<Option<HandEvaluation>> = vec![None; players.len()];
    for &i in &contenders {
        let hole = players[i].hole.ok_or_else(|| InvariantViolation::MissingHoleCards(players[i].id.clone()))?;
        evals[i] = Some(evaluate(&hole, board)?);
    }

    let pots = build_pots(players);
    let side_total: u64 = pots.iter().map(|(amount, _)| amount).sum();
    if side_total != pot {
        return Err(InvariantViolation::SidePotMismatch { pot, side_pots: side_total });
    }

    let mut winnings = vec![0u64; players.len()];
    let mut side_pots = Vec::with_capacity(pots.len());
    for (amount, eligible) in pots {
        let best = eligible.iter().filter_map(|&i| evals[i].as_ref()).max();
        let pot_winners: Vec<usize> =
            eligible.iter().copied().filter(|&i| evals[i].as_ref() == best).collect();
        let share = amount / pot_winners.len().max(1) as u64;
        let odd = amount - share * pot_winners.len() as u64;
        for (k, &i) in pot_winners.iter().enumerate() {
            winnings[i] += if k == 0 { share + odd } else { share };
        }
        debug!(amount, eligible = eligible.len(), winners = pot_winners.len(), odd, "pot awarded");
        side_pots.push(SidePot {
            amount,
            eligible_players: eligible.iter().map(|&i| players[i].id.clone()).collect(),
            winners: pot_winners.iter().map(|&i| players[i].id.clone()).collect(),
        });
    }

    let paid: u64 = winnings.iter().sum();
    if paid != pot {
        return Err(InvariantViolation::SettlementMismatch { pot, paid });
    }

    Ok(Settlement {
        winners: (0..players.len())
            .filter(|&i| winnings[i] > 0)
            .map(|i| players[i].id.clone())
            .collect(),
        side_pots,
        player_results: players
            .iter()
            .zip(evals)
            .zip(&winnings)
            .map(|((p, evaluation), &won)| PlayerResult {
                player: p.id.clone(),
                evaluation,
                winnings: won,
            })
            .collect(),
    })
}

/// Pots as `(amount, eligible seats)`, main pot first.
fn build_pots(players: &[Player]) -> Vec<(u64, Vec<usize>)> {
    let mut tiers: Vec<u64> = players.iter().map(|p| p.total_bet).filter(|&b| b > 0).collect();
    tiers.sort_unstable();
    tiers.dedup();

    let mut pots: Vec<(u64, Vec<usize>)> = Vec::new();
    let mut carry = 0u64;
    let mut prev = 0u64;
    for tier in tiers {
        let funders: Vec<usize> = (0..players.len()).filter(|&i| players[i].total_bet >= tier).collect();
        let amount = (tier - prev) * funders.len() as u64;
        prev = tier;
        let eligible: Vec<usize> =
            funders.into_iter().filter(|&i| players[i].is_contender()).collect();
        if eligible.is_empty() {
            match pots.last_mut() {
                Some(last) => last.0 += amount,
                None => carry += amount,
            }
            continue;
        }
        pots.push((amount + std::mem::take(&mut carry), eligible));
    }
    pots
}

fn uncontested(players: &[Player], winner: usize, pot: u64) -> Settlement {
    let id = players[winner].id.clone();
    debug!(player = %id, pot, "uncontested pot");
    Settlement {
        winners: vec![id.clone()],
        side_pots: vec![SidePot { amount: pot, eligible_players: vec![id.clone()], winners: vec![id] }],
        player_results: players
            .iter()
            .enumerate()
            .map(|(i, p)| PlayerResult {
                player: p.id.clone(),
                evaluation: None,
                winnings: if i == winner { pot } else { 0 },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HoleCards;
    use crate::state::fixtures::table;

    /// Seats with explicit contributions and hole cards on a fixed board.
    fn seats(bets: &[(u64, &str, bool)]) -> Vec<Player> {
        let mut s = table(&vec![1000; bets.len()]);
        for (p, &(bet, hole, folded)) in s.players.iter_mut().zip(bets) {
            p.total_bet = bet;
            p.hole = Some(hole.parse::<HoleCards>().unwrap());
            p.is_folded = folded;
        }
        s.players
    }

    fn board() -> Board {
        "2c 7d 9h Js 3c".parse().unwrap()
    }

    #[test]
    fn three_way_all_in_builds_main_and_side_pot() {
        let players = seats(&[(50, "Ah Ad", false), (150, "Kh Kd", false), (150, "Qh Qd", false)]);
        let s = settle(&players, &board()).unwrap();
        let amounts: Vec<u64> = s.side_pots.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![150, 200]);
        assert_eq!(s.side_pots[0].eligible_players.len(), 3);
        assert_eq!(s.side_pots[1].eligible_players, vec![PlayerId::from("p1"), PlayerId::from("p2")]);
        assert_eq!(s.winnings_of(&PlayerId::from("p0")), 150);
        assert_eq!(s.winnings_of(&PlayerId::from("p1")), 200);
        assert_eq!(s.winnings_of(&PlayerId::from("p2")), 0);
        assert_eq!(s.total_paid(), 350);
        assert_eq!(s.winners, vec![PlayerId::from("p0"), PlayerId::from("p1")]);
    }

    #[test]
    fn uncalled_top_tier_returns_to_its_owner() {
        let players = seats(&[(50, "Ah Ad", false), (150, "Kh Kd", false), (300, "Qh Qd", false)]);
        let s = settle(&players, &board()).unwrap();
        let amounts: Vec<u64> = s.side_pots.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![150, 200, 150]);
        assert_eq!(s.winnings_of(&PlayerId::from("p2")), 150);
    }

    #[test]
    fn folded_players_fund_but_never_win() {
        let players = seats(&[(100, "Ah Ad", true), (100, "Kh Kd", false), (100, "4h 5d", false)]);
        let s = settle(&players, &board()).unwrap();
        assert_eq!(s.side_pots.len(), 1);
        assert_eq!(s.side_pots[0].amount, 300);
        assert!(!s.side_pots[0].eligible_players.contains(&PlayerId::from("p0")));
        assert_eq!(s.winnings_of(&PlayerId::from("p1")), 300);
        assert!(s.player_results[0].evaluation.is_none());
    }

    #[test]
    fn dead_top_tier_merges_into_the_pot_below() {
        // p0 bet 400 and folded; the contenders only reached 100.
        let players = seats(&[(400, "Ah Ad", true), (100, "Kh Kd", false), (100, "4h 5d", false)]);
        let s = settle(&players, &board()).unwrap();
        assert_eq!(s.side_pots.len(), 1);
        assert_eq!(s.side_pots[0].amount, 600);
        assert_eq!(s.winnings_of(&PlayerId::from("p1")), 600);
    }

    #[test]
    fn odd_chip_goes_to_first_winner_in_seat_order() {
        // Board plays for both: broadway straight.
        let board: Board = "Ts Jd Qh Kc Ad".parse().unwrap();
        let players = seats(&[(33, "2h 3h", false), (34, "2d 3d", false), (34, "4s 5s", true)]);
        let s = settle(&players, &board).unwrap();
        let total: u64 = 33 + 34 + 34;
        assert_eq!(s.total_paid(), total);
        // Main pot 99 splits evenly; the 2-chip tier has p1 alone eligible.
        assert_eq!(s.side_pots[0].amount, 99);
        assert_eq!(s.side_pots[0].winners.len(), 2);
        assert_eq!(s.winnings_of(&PlayerId::from("p0")), 50);
        assert_eq!(s.winnings_of(&PlayerId::from("p1")), 51);
    }

    #[test]
    fn uneven_split_remainder() {
        let board: Board = "Ts Jd Qh Kc Ad".parse().unwrap();
        let players = seats(&[(25, "2h 3h", false), (25, "2d 3d", false), (25, "4s 5s", false)]);
        let s = settle(&players, &board).unwrap();
        assert_eq!(s.side_pots[0].winners.len(), 3);
        assert_eq!(s.winnings_of(&PlayerId::from("p0")), 25);
        assert_eq!(s.winnings_of(&PlayerId::from("p1")), 25);
        assert_eq!(s.winnings_of(&PlayerId::from("p2")), 25);

        let players = seats(&[(10, "2h 3h", false), (10, "2d 3d", false), (0, "4s 5s", true), (1, "6s 7c", true)]);
        let s = settle(&players, &board).unwrap();
        assert_eq!(s.winnings_of(&PlayerId::from("p0")), 11);
        assert_eq!(s.winnings_of(&PlayerId::from("p1")), 10);
    }

    #[test]
    fn single_contender_takes_everything_without_showdown() {
        let players = seats(&[(20, "Ah Ad", true), (60, "Kh Kd", false), (60, "4h 5d", true)]);
        let s = settle(&players, &Board::empty()).unwrap();
        assert_eq!(s.winners, vec![PlayerId::from("p1")]);
        assert_eq!(s.side_pots.len(), 1);
        assert_eq!(s.side_pots[0].amount, 140);
        assert!(s.player_results.iter().all(|r| r.evaluation.is_none()));
    }

    #[test]
    fn showdown_needs_a_full_board() {
        let players = seats(&[(20, "Ah Ad", false), (20, "Kh Kd", false)]);
        let short: Board = "2c 7d 9h".parse().unwrap();
        assert_eq!(
            settle(&players, &short),
            Err(InvariantViolation::IncompleteBoard { phase: Phase::Showdown, cards: 3 })
        );
    }
}
