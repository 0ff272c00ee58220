//! Per-hand table state: players, phase, pot and betting bookkeeping.
//!
//! `GameState` is the snapshot handed to observers after every mutation. It is created fresh
//! for each hand by [`crate::game::Game`] and only changed through the betting state machine.

use crate::evaluator::EvalError;
use crate::hand::{Board, HoleCards};
use crate::settlement::Settlement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistent player identity supplied by the lobby.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Hand phases in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Phase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Finished,
}

impl Phase {
    /// Whether players can submit actions in this phase.
    pub const fn is_betting(self) -> bool {
        matches!(self, Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Community cards on the table once this phase's cards are dealt.
    pub const fn board_len(self) -> Option<usize> {
        match self {
            Phase::Preflop => Some(0),
            Phase::Flop => Some(3),
            Phase::Turn => Some(4),
            Phase::River | Phase::Showdown => Some(5),
            Phase::Waiting | Phase::Finished => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Waiting => "waiting",
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
            Phase::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Most recent thing a player did, for display. Blind posts are recorded too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum LastAction {
    SmallBlind { amount: u64 },
    BigBlind { amount: u64 },
    Fold,
    Check,
    Call { amount: u64 },
    Raise { amount: u64 },
    AllIn { amount: u64 },
}

impl fmt::Display for LastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastAction::SmallBlind { amount } => write!(f, "SB {amount}"),
            LastAction::BigBlind { amount } => write!(f, "BB {amount}"),
            LastAction::Fold => f.write_str("Fold"),
            LastAction::Check => f.write_str("Check"),
            LastAction::Call { amount } => write!(f, "Call {amount}"),
            LastAction::Raise { amount } => write!(f, "Raise to {amount}"),
            LastAction::AllIn { amount } => write!(f, "All-in {amount}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) chips: u64,
    pub(crate) current_bet: u64,
    pub(crate) total_bet: u64,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) is_active: bool,
    pub(crate) is_folded: bool,
    pub(crate) is_all_in: bool,
    pub(crate) position: usize,
    pub(crate) last_action: Option<LastAction>,
}

impl Player {
    pub(crate) fn seated(id: PlayerId, name: String, chips: u64, position: usize) -> Self {
        Self {
            id,
            name,
            chips,
            current_bet: 0,
            total_bet: 0,
            hole: None,
            is_active: chips > 0,
            is_folded: false,
            is_all_in: false,
            position,
            last_action: None,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chips behind, not yet committed.
    pub fn chips(&self) -> u64 {
        self.chips
    }

    /// Chips committed in the current betting round.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    /// Chips committed over the whole hand.
    pub fn total_bet(&self) -> u64 {
        self.total_bet
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_folded(&self) -> bool {
        self.is_folded
    }

    pub fn is_all_in(&self) -> bool {
        self.is_all_in
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn last_action(&self) -> Option<LastAction> {
        self.last_action
    }

    /// Still in the hand: dealt in and not folded.
    pub fn is_contender(&self) -> bool {
        self.is_active && !self.is_folded
    }

    /// Still able to make betting decisions.
    pub fn can_act(&self) -> bool {
        self.is_contender() && !self.is_all_in
    }

    /// Move up to `amount` chips from the stack into the current bet. Returns what was paid.
    pub(crate) fn commit(&mut self, amount: u64) -> u64 {
        let pay = amount.min(self.chips);
        self.chips -= pay;
        self.current_bet += pay;
        self.total_bet += pay;
        if self.chips == 0 && self.is_contender() {
            self.is_all_in = true;
        }
        pay
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("pot {pot} does not equal total contributions {contributed}")]
    PotMismatch { pot: u64, contributed: u64 },
    #[error("settlement paid {paid} from a pot of {pot}")]
    SettlementMismatch { pot: u64, paid: u64 },
    #[error("side pots sum to {side_pots} but the pot is {pot}")]
    SidePotMismatch { pot: u64, side_pots: u64 },
    #[error("current bet {recorded} does not match the largest bet {actual}")]
    CurrentBetMismatch { recorded: u64, actual: u64 },
    #[error("active player index {index} does not name a player who can act")]
    InvalidActivePlayer { index: usize },
    #[error("deck cannot cover {players} players: {needed} cards needed")]
    DeckExhausted { players: usize, needed: usize },
    #[error("at least two players with chips are required, got {0}")]
    TooFewPlayers(usize),
    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),
    #[error("dealer index {index} is outside a table of {players}")]
    InvalidDealer { index: usize, players: usize },
    #[error("invalid blinds {small}/{big}")]
    InvalidBlinds { small: u64, big: u64 },
    #[error("contender {0} has no hole cards")]
    MissingHoleCards(PlayerId),
    #[error("board has {cards} cards during {phase}")]
    IncompleteBoard { phase: Phase, cards: usize },
    #[error("hand evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
    #[error("acted flags cover {flags} of {players} players")]
    ActedFlagsMismatch { flags: usize, players: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct GameState {
    pub(crate) phase: Phase,
    pub(crate) hand_number: u64,
    pub(crate) players: Vec<Player>,
    pub(crate) community_cards: Board,
    pub(crate) pot: u64,
    pub(crate) current_bet: u64,
    pub(crate) active_player_index: usize,
    pub(crate) dealer_index: usize,
    pub(crate) small_blind_index: usize,
    pub(crate) big_blind_index: usize,
    pub(crate) small_blind: u64,
    pub(crate) big_blind: u64,
    pub(crate) round_start_player_index: usize,
    pub(crate) players_acted_this_round: Vec<bool>,
    pub(crate) last_raise_player_index: Option<usize>,
    pub(crate) result: Option<Settlement>,
}

impl GameState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn community_cards(&self) -> &Board {
        &self.community_cards
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    /// Highest bet of the current round.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn active_player_index(&self) -> usize {
        self.active_player_index
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn small_blind_index(&self) -> usize {
        self.small_blind_index
    }

    pub fn big_blind_index(&self) -> usize {
        self.big_blind_index
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn round_start_player_index(&self) -> usize {
        self.round_start_player_index
    }

    pub fn players_acted_this_round(&self) -> &[bool] {
        &self.players_acted_this_round
    }

    pub fn last_raise_player_index(&self) -> Option<usize> {
        self.last_raise_player_index
    }

    /// Settlement of the hand, once it has been paid out.
    pub fn result(&self) -> Option<&Settlement> {
        self.result.as_ref()
    }

    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    pub fn player_by_id(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// The player whose turn it is, while a betting round is live.
    pub fn current_player(&self) -> Option<&Player> {
        if !self.phase.is_betting() {
            return None;
        }
        self.players.get(self.active_player_index)
    }

    /// Largest bet this round among players who have not folded. Folded bets are dead money.
    pub fn largest_live_bet(&self) -> u64 {
        self.players.iter().filter(|p| !p.is_folded).map(|p| p.current_bet).max().unwrap_or(0)
    }

    /// Chips `seat` must add to match the current bet (capped by their stack).
    pub fn to_call(&self, seat: usize) -> u64 {
        self.players
            .get(seat)
            .map(|p| self.current_bet.saturating_sub(p.current_bet).min(p.chips))
            .unwrap_or(0)
    }

    /// Copy of the state with other players' hole cards hidden.
    ///
    /// Hands shown down (those with an evaluation in the settlement) stay visible.
    pub fn redacted_for(&self, viewer: &PlayerId) -> GameState {
        let mut out = self.clone();
        let shown: Vec<PlayerId> = self
            .result
            .as_ref()
            .map(|r| {
                r.player_results
                    .iter()
                    .filter(|pr| pr.evaluation.is_some())
                    .map(|pr| pr.player.clone())
                    .collect()
            })
            .unwrap_or_default();
        for p in &mut out.players {
            if &p.id != viewer && !shown.contains(&p.id) {
                p.hole = None;
            }
        }
        out
    }

    /// Verify the structural invariants that must hold between mutations.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let contributed: u64 = self.players.iter().map(|p| p.total_bet).sum();
        if contributed != self.pot {
            return Err(InvariantViolation::PotMismatch { pot: self.pot, contributed });
        }

        let largest = self.largest_live_bet();
        if largest != self.current_bet {
            return Err(InvariantViolation::CurrentBetMismatch {
                recorded: self.current_bet,
                actual: largest,
            });
        }

        if self.players_acted_this_round.len() != self.players.len() {
            return Err(InvariantViolation::ActedFlagsMismatch {
                flags: self.players_acted_this_round.len(),
                players: self.players.len(),
            });
        }

        if let Some(expected) = self.phase.board_len() {
            if self.community_cards.len() != expected {
                return Err(InvariantViolation::IncompleteBoard {
                    phase: self.phase,
                    cards: self.community_cards.len(),
                });
            }
        }

        if self.phase.is_betting() {
            if let Some(p) = self.players.iter().find(|p| p.is_contender() && p.hole.is_none()) {
                return Err(InvariantViolation::MissingHoleCards(p.id.clone()));
            }
            let live = self.players.get(self.active_player_index).is_some_and(Player::can_act);
            if !live {
                return Err(InvariantViolation::InvalidActivePlayer {
                    index: self.active_player_index,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A preflop state with the given stacks, no blinds posted and nobody dealt in.
    pub fn table(stacks: &[u64]) -> GameState {
        let mut deck = crate::deck::Deck::shuffled_seeded(1);
        let players: Vec<Player> = stacks
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut p = Player::seated(PlayerId::new(format!("p{i}")), format!("P{i}"), c, i);
                p.hole = HoleCards::from_slice(&deck.deal(2)).ok();
                p
            })
            .collect();
        let n = players.len();
        GameState {
            phase: Phase::Preflop,
            hand_number: 1,
            players,
            community_cards: Board::empty(),
            pot: 0,
            current_bet: 0,
            active_player_index: 0,
            dealer_index: 0,
            small_blind_index: 0,
            big_blind_index: 1 % n.max(1),
            small_blind: 10,
            big_blind: 20,
            round_start_player_index: 0,
            players_acted_this_round: vec![false; n],
            last_raise_player_index: None,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::table;
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_marks_all_in() {
        let mut s = table(&[50, 100]);
        let paid = s.players[0].commit(80);
        assert_eq!(paid, 50);
        assert!(s.players[0].is_all_in());
        assert_eq!(s.players[0].total_bet(), 50);
        assert!(!s.players[0].can_act());
        assert!(s.players[0].is_contender());
    }

    #[test]
    fn pot_mismatch_is_detected() {
        let mut s = table(&[100, 100]);
        s.players[0].commit(10);
        s.current_bet = 10;
        assert_eq!(
            s.check_invariants(),
            Err(InvariantViolation::PotMismatch { pot: 0, contributed: 10 })
        );
        s.pot = 10;
        assert_eq!(s.check_invariants(), Ok(()));
    }

    #[test]
    fn active_index_must_name_a_player_who_can_act() {
        let mut s = table(&[100, 100]);
        s.players[0].is_folded = true;
        assert_eq!(
            s.check_invariants(),
            Err(InvariantViolation::InvalidActivePlayer { index: 0 })
        );
    }

    #[test]
    fn redaction_hides_other_hole_cards() {
        let s = table(&[100, 100, 100]);
        let view = s.redacted_for(&PlayerId::from("p1"));
        assert!(view.players[1].hole().is_some());
        assert!(view.players[0].hole().is_none());
        assert!(view.players[2].hole().is_none());
    }

    #[test]
    fn to_call_is_capped_by_stack() {
        let mut s = table(&[30, 100]);
        s.players[1].commit(60);
        s.pot = 60;
        s.current_bet = 60;
        assert_eq!(s.to_call(0), 30);
        assert_eq!(s.to_call(1), 0);
        assert_eq!(s.to_call(9), 0);
    }

    #[test]
    fn phase_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Phase::Preflop).unwrap(), "\"preflop\"");
        let a = LastAction::Raise { amount: 60 };
        assert_eq!(serde_json::to_string(&a).unwrap(), r#"{"type":"raise","amount":60}"#);
    }
}
