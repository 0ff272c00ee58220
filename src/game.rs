//! Hand orchestration: seating, dealing, blinds, street progression and payout.

use crate::betting::{self, Action, ActionError, LegalActions, RoundStatus};
use crate::config::TableConfig;
use crate::deck::{Deck, DECK_SIZE};
use crate::hand::{Board, HoleCards, MAX_BOARD};
use crate::settlement::{settle, Settlement};
use crate::state::{GameState, InvariantViolation, LastAction, Phase, Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::mpsc;
use tracing::{debug, error, info, warn};

/// A seated player as supplied by the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub chips: u64,
}

impl Seat {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, chips: u64) -> Self {
        Self { id: id.into(), name: name.into(), chips }
    }
}

/// Everything needed to start one hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSetup {
    pub seats: Vec<Seat>,
    pub small_blind: u64,
    pub big_blind: u64,
    pub dealer_index: usize,
    /// Deck seed for reproducible hands; `None` shuffles from the thread RNG.
    pub seed: Option<u64>,
    pub hand_number: u64,
}

impl HandSetup {
    pub fn new(seats: Vec<Seat>, small_blind: u64, big_blind: u64) -> Self {
        Self { seats, small_blind, big_blind, dealer_index: 0, seed: None, hand_number: 1 }
    }

    /// Blinds and seed from table configuration.
    pub fn from_config(config: &TableConfig, seats: Vec<Seat>) -> Self {
        Self { seed: config.seed, ..Self::new(seats, config.small_blind, config.big_blind) }
    }

    pub fn with_dealer(mut self, dealer_index: usize) -> Self {
        self.dealer_index = dealer_index;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_hand_number(mut self, hand_number: u64) -> Self {
        self.hand_number = hand_number;
        self
    }
}

/// Result of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOutcome {
    pub settlement: Settlement,
    pub stacks: Vec<(PlayerId, u64)>,
    /// At least two remaining players hold chips.
    pub can_continue: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("invariant violated, hand aborted: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("hand {0} is still in progress")]
    HandInProgress(u64),
}

/// Receives a copy of the state after every mutation.
pub trait SnapshotSink: Send {
    fn publish(&mut self, state: &GameState);
}

impl<F> SnapshotSink for F
where
    F: FnMut(&GameState) + Send,
{
    fn publish(&mut self, state: &GameState) {
        self(state)
    }
}

impl SnapshotSink for mpsc::Sender<GameState> {
    fn publish(&mut self, state: &GameState) {
        // A dropped receiver only means nobody is watching.
        let _ = self.send(state.clone());
    }
}

/// Owns the deck and the authoritative state of the current hand.
#[derive(Default)]
pub struct Game {
    state: Option<GameState>,
    deck: Option<Deck>,
    seed: Option<u64>,
    departed: HashSet<PlayerId>,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("seed", &self.seed)
            .field("departed", &self.departed)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn set_sink(&mut self, sink: impl SnapshotSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.state.as_ref()?.player_by_id(id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.state.as_ref()?.current_player()
    }

    pub fn can_perform(&self, id: &PlayerId, action: &Action) -> bool {
        self.state.as_ref().is_some_and(|s| betting::validate(s, id, action).is_ok())
    }

    pub fn legal_actions(&self, id: &PlayerId) -> Option<LegalActions> {
        betting::legal_actions(self.state.as_ref()?, id)
    }

    /// Seat the roster, shuffle, deal hole cards, post blinds and open preflop betting.
    ///
    /// ```
    /// use holdem_engine::game::{Game, HandSetup, Seat};
    /// use holdem_engine::state::Phase;
    ///
    /// let seats = vec![Seat::new("a", "Alice", 1000), Seat::new("b", "Bob", 1000)];
    /// let mut game = Game::new();
    /// let state = game.start_hand(HandSetup::new(seats, 10, 20).with_seed(7)).unwrap();
    /// assert_eq!(state.phase(), Phase::Preflop);
    /// assert_eq!(state.pot(), 30);
    /// ```
    pub fn start_hand(&mut self, setup: HandSetup) -> Result<&GameState, EngineError> {
        if let Some(live) = self.state.as_ref().filter(|s| s.phase != Phase::Finished) {
            warn!(hand = live.hand_number, phase = %live.phase, "new hand refused over an unfinished one");
            return Err(EngineError::HandInProgress(live.hand_number));
        }
        self.state = None;
        validate_setup(&setup)?;

        let mut deck = match setup.seed {
            Some(seed) => Deck::shuffled_seeded(seed),
            None => Deck::shuffled(),
        };
        let mut players: Vec<Player> = setup
            .seats
            .iter()
            .enumerate()
            .map(|(i, s)| Player::seated(s.id.clone(), s.name.clone(), s.chips, i))
            .collect();
        let n = players.len();
        let dealer = (0..n)
            .map(|off| (setup.dealer_index + off) % n)
            .find(|&i| players[i].is_active)
            .unwrap_or(setup.dealer_index);

        // Two passes, one card each, starting left of the dealer.
        let order: Vec<usize> = (1..=n).map(|off| (dealer + off) % n).filter(|&i| players[i].is_active).collect();
        let first = deck.deal(order.len());
        let second = deck.deal(order.len());
        for (k, &i) in order.iter().enumerate() {
            let hole = HoleCards::try_new(first[k], second[k])
                .map_err(|_| InvariantViolation::MissingHoleCards(players[i].id.clone()))?;
            players[i].hole = Some(hole);
        }

        let mut state = GameState {
            phase: Phase::Preflop,
            hand_number: setup.hand_number,
            players_acted_this_round: vec![false; n],
            players,
            community_cards: Board::empty(),
            pot: 0,
            current_bet: 0,
            active_player_index: dealer,
            dealer_index: dealer,
            small_blind_index: dealer,
            big_blind_index: dealer,
            small_blind: setup.small_blind,
            big_blind: setup.big_blind,
            round_start_player_index: dealer,
            last_raise_player_index: None,
            result: None,
        };
        post_blinds(&mut state, order.len() == 2);

        info!(
            hand = state.hand_number,
            players = order.len(),
            dealer,
            sb = state.small_blind,
            bb = state.big_blind,
            "hand started"
        );
        self.deck = Some(deck);
        self.seed = setup.seed;
        self.departed.clear();
        self.state = Some(state);
        self.publish();

        let status = self.state.as_ref().map_or(RoundStatus::Complete, betting::round_status);
        self.progress(status)?;
        self.verify()
    }

    /// Apply one action from the player whose turn it is.
    pub fn apply(&mut self, id: &PlayerId, action: Action) -> Result<&GameState, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NoHandInProgress)?;
        let status = betting::apply(state, id, action).map_err(|e| {
            warn!(player = %id, ?action, error = %e, "action rejected");
            e
        })?;
        self.publish();
        self.progress(status)?;
        self.verify()
    }

    /// The player leaves the table: their hand is forfeited even when it is not their turn.
    pub fn player_left(&mut self, id: &PlayerId) -> Result<&GameState, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NoHandInProgress)?;
        let seat = state.seat_of(id).ok_or_else(|| ActionError::UnknownPlayer(id.clone()))?;
        self.departed.insert(id.clone());
        info!(player = %id, phase = %state.phase, "player left");

        if !state.phase.is_betting() || !state.players[seat].is_contender() {
            state.players[seat].is_active = false;
            self.publish();
            return self.verify();
        }

        let p = &mut state.players[seat];
        p.is_folded = true;
        p.is_active = false;
        p.last_action = Some(LastAction::Fold);
        // The leaver's chips stay in the pot as dead money; the price to call is set by who remains.
        state.current_bet = state.largest_live_bet();

        let mut status = betting::round_status(state);
        if status == RoundStatus::InProgress && seat == state.active_player_index {
            match betting::next_to_act(state, seat) {
                Some(next) => state.active_player_index = next,
                None => status = RoundStatus::Complete,
            }
        }
        self.publish();
        self.progress(status)?;
        self.verify()
    }

    /// Result of the last hand, once it is finished.
    pub fn outcome(&self) -> Option<HandOutcome> {
        let state = self.state.as_ref()?;
        let settlement = state.result.clone()?;
        let stacks = state.players.iter().map(|p| (p.id.clone(), p.chips)).collect();
        let funded = state
            .players
            .iter()
            .filter(|p| p.chips > 0 && !self.departed.contains(&p.id))
            .count();
        Some(HandOutcome { settlement, stacks, can_continue: funded >= 2 })
    }

    /// Setup for the following hand: stacks carried forward, busted and departed players
    /// dropped, dealer moved to the next player with chips.
    pub fn next_hand_setup(&self) -> Option<HandSetup> {
        let state = self.state.as_ref().filter(|s| s.phase == Phase::Finished)?;
        let staying = |p: &Player| p.chips > 0 && !self.departed.contains(&p.id);
        let seats: Vec<Seat> = state
            .players
            .iter()
            .filter(|p| staying(p))
            .map(|p| Seat { id: p.id.clone(), name: p.name.clone(), chips: p.chips })
            .collect();
        if seats.len() < 2 {
            return None;
        }
        let n = state.players.len();
        let next_dealer = (1..=n)
            .map(|off| &state.players[(state.dealer_index + off) % n])
            .find(|p| staying(p))
            .and_then(|p| seats.iter().position(|s| s.id == p.id))
            .unwrap_or(0);
        Some(HandSetup {
            seats,
            small_blind: state.small_blind,
            big_blind: state.big_blind,
            dealer_index: next_dealer,
            seed: self.seed.map(|s| s.wrapping_add(1)),
            hand_number: state.hand_number + 1,
        })
    }

    fn publish(&mut self) {
        if let (Some(sink), Some(state)) = (self.sink.as_mut(), self.state.as_ref()) {
            sink.publish(state);
        }
    }

    /// Move the hand forward after a round-status change.
    fn progress(&mut self, status: RoundStatus) -> Result<(), EngineError> {
        match status {
            RoundStatus::InProgress => Ok(()),
            RoundStatus::HandOver => self.finish(),
            RoundStatus::Complete => self.next_streets(),
        }
    }

    /// Deal streets until betting is open again or the board is complete.
    fn next_streets(&mut self) -> Result<(), EngineError> {
        loop {
            let (state, deck) = match (self.state.as_mut(), self.deck.as_mut()) {
                (Some(s), Some(d)) => (s, d),
                _ => return Err(EngineError::NoHandInProgress),
            };
            let Some((phase, count)) = betting::next_street(state.phase) else {
                return Ok(());
            };
            state.community_cards.extend(deck.deal(count));
            betting::start_street(state, phase);
            debug!(hand = state.hand_number, %phase, board = state.community_cards.len(), "street dealt");
            self.publish();
            if phase == Phase::Showdown {
                return self.finish();
            }
            let open = self.state.as_ref().map_or(false, |s| betting::round_status(s) == RoundStatus::InProgress);
            if open {
                return Ok(());
            }
        }
    }

    /// Settle the pot, credit stacks and enter `finished`.
    fn finish(&mut self) -> Result<(), EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NoHandInProgress)?;
        let settlement = match settle(&state.players, &state.community_cards) {
            Ok(s) => s,
            Err(violation) => return Err(self.abort(violation)),
        };
        for (p, r) in state.players.iter_mut().zip(&settlement.player_results) {
            p.chips += r.winnings;
            p.current_bet = 0;
            p.total_bet = 0;
        }
        state.pot = 0;
        state.current_bet = 0;
        state.last_raise_player_index = None;
        state.phase = Phase::Finished;
        info!(
            hand = state.hand_number,
            winners = ?settlement.winners.iter().map(PlayerId::as_str).collect::<Vec<_>>(),
            pots = settlement.side_pots.len(),
            "hand finished"
        );
        state.result = Some(settlement);
        self.publish();
        Ok(())
    }

    fn verify(&mut self) -> Result<&GameState, EngineError> {
        let checked = self.state.as_ref().map(GameState::check_invariants);
        match checked {
            None => Err(EngineError::NoHandInProgress),
            Some(Err(violation)) => Err(self.abort(violation)),
            Some(Ok(())) => self.state.as_ref().ok_or(EngineError::NoHandInProgress),
        }
    }

    fn abort(&mut self, violation: InvariantViolation) -> EngineError {
        let hand = self.state.as_ref().map(|s| s.hand_number);
        error!(?hand, error = %violation, "invariant violated; aborting hand");
        self.state = None;
        self.deck = None;
        EngineError::Invariant(violation)
    }
}

fn validate_setup(setup: &HandSetup) -> Result<(), InvariantViolation> {
    if setup.small_blind == 0 || setup.small_blind > setup.big_blind {
        return Err(InvariantViolation::InvalidBlinds { small: setup.small_blind, big: setup.big_blind });
    }
    if setup.dealer_index >= setup.seats.len() {
        return Err(InvariantViolation::InvalidDealer {
            index: setup.dealer_index,
            players: setup.seats.len(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(dup) = setup.seats.iter().find(|s| !seen.insert(&s.id)) {
        return Err(InvariantViolation::DuplicatePlayer(dup.id.clone()));
    }
    let funded = setup.seats.iter().filter(|s| s.chips > 0).count();
    if funded < 2 {
        return Err(InvariantViolation::TooFewPlayers(funded));
    }
    let needed = 2 * funded + MAX_BOARD;
    if needed > DECK_SIZE {
        return Err(InvariantViolation::DeckExhausted { players: funded, needed });
    }
    Ok(())
}

/// Post blinds and pick the first preflop actor. Heads-up the dealer posts the small blind.
fn post_blinds(state: &mut GameState, heads_up: bool) {
    let dealer = state.dealer_index;
    let next_active = |s: &GameState, from: usize| {
        let n = s.players.len();
        (1..=n).map(|off| (from + off) % n).find(|&i| s.players[i].is_active).unwrap_or(from)
    };
    let sb = if heads_up { dealer } else { next_active(state, dealer) };
    let bb = next_active(state, sb);

    let sb_paid = state.players[sb].commit(state.small_blind);
    state.players[sb].last_action = Some(LastAction::SmallBlind { amount: sb_paid });
    let bb_paid = state.players[bb].commit(state.big_blind);
    state.players[bb].last_action = Some(LastAction::BigBlind { amount: bb_paid });
    debug!(sb, sb_paid, bb, bb_paid, "blinds posted");

    state.pot = sb_paid + bb_paid;
    state.current_bet = sb_paid.max(bb_paid);
    state.small_blind_index = sb;
    state.big_blind_index = bb;
    state.last_raise_player_index = Some(bb);

    let first = if heads_up && state.players[sb].can_act() {
        Some(sb)
    } else {
        betting::next_can_act(state, bb)
    };
    if let Some(first) = first {
        state.active_player_index = first;
    }
    state.round_start_player_index = state.active_player_index;
}
