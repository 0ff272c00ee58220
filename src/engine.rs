// Engine boundary. Agents, the simulator and transports drive hands through this trait so
// they do not depend on `Game` internals. It is object safe and implemented by `Game`.

use crate::betting::{ActionRequest, LegalActions};
use crate::game::{EngineError, Game, HandOutcome, HandSetup};
use crate::state::{GameState, PlayerId};

pub trait GameEngine: Send {
    // Hand lifecycle
    fn start_hand(&mut self, setup: HandSetup) -> Result<&GameState, EngineError>;
    fn player_left(&mut self, id: &PlayerId) -> Result<&GameState, EngineError>;

    // Player actions
    fn submit(&mut self, request: ActionRequest) -> Result<&GameState, EngineError>;

    // Queries
    fn state(&self) -> Option<&GameState>;
    fn legal_actions(&self, id: &PlayerId) -> Option<LegalActions>;
    fn outcome(&self) -> Option<HandOutcome>;
    fn next_hand_setup(&self) -> Option<HandSetup>;
}

impl GameEngine for Game {
    fn start_hand(&mut self, setup: HandSetup) -> Result<&GameState, EngineError> {
        Game::start_hand(self, setup)
    }

    fn player_left(&mut self, id: &PlayerId) -> Result<&GameState, EngineError> {
        Game::player_left(self, id)
    }

    fn submit(&mut self, request: ActionRequest) -> Result<&GameState, EngineError> {
        Game::apply(self, &request.player_id, request.action)
    }

    fn state(&self) -> Option<&GameState> {
        Game::state(self)
    }
    fn legal_actions(&self, id: &PlayerId) -> Option<LegalActions> {
        Game::legal_actions(self, id)
    }
    fn outcome(&self) -> Option<HandOutcome> {
        Game::outcome(self)
    }
    fn next_hand_setup(&self) -> Option<HandSetup> {
        Game::next_hand_setup(self)
    }
}
