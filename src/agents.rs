//! Agents: automatic players that choose actions from a state snapshot.
//!
//! `PlayerAgent` decides; `AgentTable` maps player ids to agents and drives any
//! [`GameEngine`] until the hand is finished. The simulator binary and the integration
//! tests play hands this way.

use crate::betting::{Action, ActionRequest, LegalActions};
use crate::engine::GameEngine;
use crate::game::{EngineError, HandOutcome, HandSetup};
use crate::state::{GameState, PlayerId};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

mod bots;

pub use bots::{CallingStation, RandomAgent, StrengthAgent, StrengthProfile};

/// Upper bound on actions in one hand before the table gives up.
pub const MAX_ACTIONS_PER_HAND: usize = 1_000;

/// Kinds of built-in agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AgentKind {
    CallingStation,
    Random,
    Strength,
}

impl AgentKind {
    /// Build an agent of this kind. `seed` fixes its decisions where it has any randomness.
    pub fn build(self, seed: u64) -> Box<dyn PlayerAgent> {
        match self {
            AgentKind::CallingStation => Box::new(CallingStation),
            AgentKind::Random => Box::new(RandomAgent::seeded(seed)),
            AgentKind::Strength => Box::new(StrengthAgent::new(StrengthProfile::default().with_seed(seed))),
        }
    }
}

/// A seat controller that picks an action when it is its player's turn.
pub trait PlayerAgent: Send {
    /// `seat` is the acting player's index in `state`; `legal` is never empty of options
    /// (folding is always allowed). The returned action must be one `legal` allows.
    fn decide(&mut self, state: &GameState, seat: usize, legal: &LegalActions) -> Action;

    fn kind(&self) -> AgentKind;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("no agent seated for player {0}")]
    NoAgent(PlayerId),
    #[error("hand did not finish within {0} actions")]
    Stalled(usize),
}

/// Agents keyed by player id.
#[derive(Default)]
pub struct AgentTable {
    agents: HashMap<PlayerId, Box<dyn PlayerAgent>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seats: Vec<String> =
            self.agents.iter().map(|(id, a)| format!("{id}:{:?}", a.kind())).collect();
        seats.sort();
        write!(f, "AgentTable({})", seats.join(", "))
    }
}

impl AgentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// One agent of `kind` per id; seeds are `seed`, `seed + 1`, ... in the given order.
    pub fn uniform<'a>(ids: impl IntoIterator<Item = &'a PlayerId>, kind: AgentKind, seed: u64) -> Self {
        let mut table = Self::new();
        for (i, id) in ids.into_iter().enumerate() {
            table.set_agent(id.clone(), kind.build(seed.wrapping_add(i as u64)));
        }
        table
    }

    pub fn set_agent(&mut self, id: PlayerId, agent: Box<dyn PlayerAgent>) {
        self.agents.insert(id, agent);
    }

    pub fn remove(&mut self, id: &PlayerId) -> Option<Box<dyn PlayerAgent>> {
        self.agents.remove(id)
    }

    pub fn agent_kind(&self, id: &PlayerId) -> Option<AgentKind> {
        self.agents.get(id).map(|a| a.kind())
    }

    pub fn has_agent(&self, id: &PlayerId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Let the agent on turn act once. Returns `Ok(false)` when no betting round is live.
    pub fn step(&mut self, engine: &mut dyn GameEngine) -> Result<bool, AgentError> {
        let request = {
            let Some(state) = engine.state() else {
                return Ok(false);
            };
            let Some(player) = state.current_player() else {
                return Ok(false);
            };
            let id = player.id().clone();
            let seat = state.active_player_index();
            let Some(legal) = engine.legal_actions(&id) else {
                return Ok(false);
            };
            let agent = self.agents.get_mut(&id).ok_or_else(|| AgentError::NoAgent(id.clone()))?;
            let action = agent.decide(state, seat, &legal);
            trace!(player = %id, ?action, ?legal, "agent decided");
            ActionRequest { player_id: id, action }
        };
        engine.submit(request)?;
        Ok(true)
    }

    /// Start a hand and drive it to completion.
    pub fn play_hand(
        &mut self,
        engine: &mut dyn GameEngine,
        setup: HandSetup,
    ) -> Result<HandOutcome, AgentError> {
        engine.start_hand(setup)?;
        self.finish_hand(engine)
    }

    /// Drive the hand already in progress to completion.
    pub fn finish_hand(&mut self, engine: &mut dyn GameEngine) -> Result<HandOutcome, AgentError> {
        let mut actions = 0;
        while self.step(engine)? {
            actions += 1;
            if actions >= MAX_ACTIONS_PER_HAND {
                return Err(AgentError::Stalled(actions));
            }
        }
        let outcome = engine.outcome().ok_or(EngineError::NoHandInProgress)?;
        debug!(actions, winners = outcome.settlement.winners.len(), "agents finished hand");
        Ok(outcome)
    }

    /// Play up to `hands` hands, carrying stacks forward, stopping early when fewer than two
    /// players have chips.
    pub fn play_session(
        &mut self,
        engine: &mut dyn GameEngine,
        first: HandSetup,
        hands: usize,
    ) -> Result<Vec<HandOutcome>, AgentError> {
        let mut outcomes = Vec::with_capacity(hands);
        let mut setup = Some(first);
        while outcomes.len() < hands {
            let Some(next) = setup.take() else { break };
            outcomes.push(self.play_hand(engine, next)?);
            setup = engine.next_hand_setup();
        }
        Ok(outcomes)
    }
}
