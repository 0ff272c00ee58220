//! Betting-round state machine: legal actions, turn order and round completion.
//!
//! Every function here works on a [`GameState`] in place. The orchestrator owns dealing and
//! settlement; this module only moves chips from stacks into bets and decides whose turn it is.

use crate::state::{GameState, LastAction, Phase, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A player decision. `Raise::amount` is the new total bet for the round, not the increment.
///
/// ```
/// use holdem_engine::betting::Action;
///
/// let a: Action = serde_json::from_str(r#"{"type":"raise","amount":60}"#).unwrap();
/// assert_eq!(a, Action::Raise { amount: 60 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise { amount: u64 },
    AllIn,
}

/// Transport form of an action submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub player_id: PlayerId,
    pub action: Action,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no betting round in progress (phase {0})")]
    HandNotInProgress(Phase),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("player {0} has folded")]
    PlayerFolded(PlayerId),
    #[error("player {0} is all-in")]
    PlayerAllIn(PlayerId),
    #[error("cannot check facing a bet of {to_call}")]
    CannotCheck { to_call: u64 },
    #[error("nothing to call")]
    NothingToCall,
    #[error("amount too small: min {min}, got {got}")]
    AmountTooSmall { min: u64, got: u64 },
    #[error("amount too large: max {max}, got {got}")]
    AmountTooLarge { max: u64, got: u64 },
    #[error("player has no chips")]
    NoChips,
    #[error("betting was not reopened; call or fold")]
    BettingNotReopened,
}

/// Outcome of evaluating the round after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    InProgress,
    Complete,
    /// At most one contender remains.
    HandOver,
}

/// The legal-action contract for one seat, as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub can_check: bool,
    /// Chips a call would commit, when there is something to call.
    pub call: Option<u64>,
    /// Smallest and largest legal raise totals, when raising is possible.
    pub raise: Option<(u64, u64)>,
    pub all_in: bool,
}

impl LegalActions {
    pub fn allows(&self, action: &Action) -> bool {
        match *action {
            Action::Fold => true,
            Action::Check => self.can_check,
            Action::Call => self.call.is_some(),
            Action::Raise { amount } => {
                self.raise.is_some_and(|(min, max)| (min..=max).contains(&amount))
            }
            Action::AllIn => self.all_in,
        }
    }
}

/// Smallest total a raise may reach.
pub fn min_raise_to(state: &GameState) -> u64 {
    state.current_bet.saturating_mul(2).max(state.big_blind)
}

/// Whether `seat` may still raise this round. A short all-in leaves players who already acted
/// closed: they can match it or fold.
fn action_open(state: &GameState, seat: usize) -> bool {
    !state.players_acted_this_round.get(seat).copied().unwrap_or(false)
}

fn needs_to_act(state: &GameState, seat: usize) -> bool {
    let p = &state.players[seat];
    p.can_act() && (action_open(state, seat) || p.current_bet < state.current_bet)
}

/// Common preconditions: betting phase, seated, live and on turn. Returns the seat.
fn check_turn(state: &GameState, player: &PlayerId) -> Result<usize, ActionError> {
    if !state.phase.is_betting() {
        return Err(ActionError::HandNotInProgress(state.phase));
    }
    let seat = state.seat_of(player).ok_or_else(|| ActionError::UnknownPlayer(player.clone()))?;
    let p = &state.players[seat];
    if p.is_folded || !p.is_active {
        return Err(ActionError::PlayerFolded(player.clone()));
    }
    if p.is_all_in {
        return Err(ActionError::PlayerAllIn(player.clone()));
    }
    if seat != state.active_player_index {
        return Err(ActionError::NotYourTurn(player.clone()));
    }
    Ok(seat)
}

/// Check `action` against the table rules without changing anything. Returns the acting seat.
pub fn validate(state: &GameState, player: &PlayerId, action: &Action) -> Result<usize, ActionError> {
    let seat = check_turn(state, player)?;
    let p = &state.players[seat];
    match *action {
        Action::Fold => {}
        Action::Check => {
            if p.current_bet != state.current_bet {
                return Err(ActionError::CannotCheck { to_call: state.to_call(seat) });
            }
        }
        Action::Call => {
            if state.current_bet <= p.current_bet {
                return Err(ActionError::NothingToCall);
            }
        }
        Action::Raise { amount } => {
            let min = min_raise_to(state);
            let max = p.chips + p.current_bet;
            if amount < min {
                return Err(ActionError::AmountTooSmall { min, got: amount });
            }
            if amount > max {
                return Err(ActionError::AmountTooLarge { max, got: amount });
            }
            if !action_open(state, seat) {
                return Err(ActionError::BettingNotReopened);
            }
        }
        Action::AllIn => {
            if p.chips == 0 {
                return Err(ActionError::NoChips);
            }
            let raises = p.chips + p.current_bet > state.current_bet;
            if raises && !action_open(state, seat) {
                return Err(ActionError::BettingNotReopened);
            }
        }
    }
    Ok(seat)
}

/// What `player` may do right now, or `None` when it is not their turn to act.
pub fn legal_actions(state: &GameState, player: &PlayerId) -> Option<LegalActions> {
    let seat = check_turn(state, player).ok()?;
    let p = &state.players[seat];
    let open = action_open(state, seat);
    let max_total = p.chips + p.current_bet;
    let min = min_raise_to(state);
    Some(LegalActions {
        can_check: p.current_bet == state.current_bet,
        call: (state.current_bet > p.current_bet).then(|| state.to_call(seat)),
        raise: (open && max_total >= min).then_some((min, max_total)),
        all_in: p.chips > 0 && (open || max_total <= state.current_bet),
    })
}

fn reopen_for_others(state: &mut GameState, raiser: usize) {
    for (i, flag) in state.players_acted_this_round.iter_mut().enumerate() {
        if i != raiser && state.players[i].can_act() {
            *flag = false;
        }
    }
    state.last_raise_player_index = Some(raiser);
}

/// Validate and apply one action, then advance the turn.
///
/// On `InProgress` the active index names the next player to act. On `Complete` or `HandOver`
/// the caller moves the hand forward.
pub fn apply(
    state: &mut GameState,
    player: &PlayerId,
    action: Action,
) -> Result<RoundStatus, ActionError> {
    let seat = validate(state, player, &action)?;
    let table_bet = state.current_bet;

    let last = match action {
        Action::Fold => {
            state.players[seat].is_folded = true;
            state.current_bet = state.largest_live_bet();
            LastAction::Fold
        }
        Action::Check => LastAction::Check,
        Action::Call => {
            let owed = table_bet - state.players[seat].current_bet;
            let paid = state.players[seat].commit(owed);
            state.pot += paid;
            LastAction::Call { amount: paid }
        }
        Action::Raise { amount } => {
            let delta = amount - state.players[seat].current_bet;
            state.pot += state.players[seat].commit(delta);
            state.current_bet = amount;
            reopen_for_others(state, seat);
            LastAction::Raise { amount }
        }
        Action::AllIn => {
            let full_raise = min_raise_to(state);
            let stack = state.players[seat].chips;
            state.pot += state.players[seat].commit(stack);
            let new_bet = state.players[seat].current_bet;
            if new_bet > table_bet {
                state.current_bet = new_bet;
                if new_bet >= full_raise {
                    reopen_for_others(state, seat);
                } else {
                    debug!(seat, new_bet, full_raise, "short all-in does not reopen betting");
                }
            }
            LastAction::AllIn { amount: new_bet }
        }
    };
    state.players[seat].last_action = Some(last);
    state.players_acted_this_round[seat] = true;
    debug!(player = %player, seat, ?action, pot = state.pot, "action applied");

    let status = round_status(state);
    if status != RoundStatus::InProgress {
        return Ok(status);
    }
    match next_to_act(state, seat) {
        Some(next) => {
            state.active_player_index = next;
            Ok(RoundStatus::InProgress)
        }
        None => Ok(RoundStatus::Complete),
    }
}

/// Round-completion predicate, checked in order:
///
/// 1. one contender or fewer: the hand is over;
/// 2. nobody can act, or the only player who can act already matches the bet: complete;
/// 3. preflop, the big blind can act and has not acted: in progress (the option);
/// 4. everyone who can act has acted and matches the bet: complete;
/// 5. otherwise in progress.
pub fn round_status(state: &GameState) -> RoundStatus {
    let contenders = state.players.iter().filter(|p| p.is_contender()).count();
    if contenders <= 1 {
        return RoundStatus::HandOver;
    }

    let actors: Vec<usize> = (0..state.players.len()).filter(|&i| state.players[i].can_act()).collect();
    match actors.as_slice() {
        [] => return RoundStatus::Complete,
        [only] if state.players[*only].current_bet >= state.current_bet => {
            return RoundStatus::Complete
        }
        _ => {}
    }

    let bb = state.big_blind_index;
    if state.phase == Phase::Preflop
        && state.players.get(bb).is_some_and(|p| p.can_act())
        && !state.players_acted_this_round.get(bb).copied().unwrap_or(false)
    {
        return RoundStatus::InProgress;
    }

    let settled = actors.iter().all(|&i| {
        state.players_acted_this_round[i] && state.players[i].current_bet == state.current_bet
    });
    if settled {
        RoundStatus::Complete
    } else {
        RoundStatus::InProgress
    }
}

/// Next seat after `from`, circularly, whose player can act and still needs to.
pub fn next_to_act(state: &GameState, from: usize) -> Option<usize> {
    let n = state.players.len();
    (1..=n).map(|off| (from + off) % n).find(|&i| needs_to_act(state, i))
}

/// First seat after `from`, circularly, whose player can act at all.
pub fn next_can_act(state: &GameState, from: usize) -> Option<usize> {
    let n = state.players.len();
    (1..=n).map(|off| (from + off) % n).find(|&i| state.players[i].can_act())
}

/// Street that follows `phase` and the community cards it reveals.
pub fn next_street(phase: Phase) -> Option<(Phase, usize)> {
    match phase {
        Phase::Preflop => Some((Phase::Flop, 3)),
        Phase::Flop => Some((Phase::Turn, 1)),
        Phase::Turn => Some((Phase::River, 1)),
        Phase::River => Some((Phase::Showdown, 0)),
        _ => None,
    }
}

/// Clear round bookkeeping for a new street and hand the turn to the first player after the
/// dealer who can act.
pub fn start_street(state: &mut GameState, phase: Phase) {
    for p in &mut state.players {
        p.current_bet = 0;
    }
    for flag in &mut state.players_acted_this_round {
        *flag = false;
    }
    state.current_bet = 0;
    state.last_raise_player_index = None;
    state.phase = phase;
    if let Some(first) = next_can_act(state, state.dealer_index) {
        state.active_player_index = first;
    }
    state.round_start_player_index = state.active_player_index;
}
