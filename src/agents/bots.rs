use crate::betting::{Action, LegalActions};
use crate::evaluator::evaluate;
use crate::hand::{Board, HoleCards};
use crate::state::GameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{AgentKind, PlayerAgent};

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(v) => ChaCha8Rng::seed_from_u64(v),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Checks when it can, calls otherwise. Never folds, never raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingStation;

impl PlayerAgent for CallingStation {
    fn decide(&mut self, _state: &GameState, _seat: usize, legal: &LegalActions) -> Action {
        if legal.can_check {
            Action::Check
        } else if legal.call.is_some() {
            Action::Call
        } else {
            Action::Fold
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::CallingStation
    }
}

/// Picks uniformly among the legal action types, raise sizes uniformly within the legal range.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: seeded_rng(Some(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: seeded_rng(None) }
    }
}

impl PlayerAgent for RandomAgent {
    fn decide(&mut self, _state: &GameState, _seat: usize, legal: &LegalActions) -> Action {
        let mut options = Vec::with_capacity(4);
        // Folding when a check is free is legal but pointless.
        if !legal.can_check {
            options.push(Action::Fold);
        }
        if legal.can_check {
            options.push(Action::Check);
        }
        if legal.call.is_some() {
            options.push(Action::Call);
        }
        if let Some((min, max)) = legal.raise {
            options.push(Action::Raise { amount: self.rng.random_range(min..=max) });
        }
        // All-in is rare so random tables still see flops.
        if legal.all_in && self.rng.random_bool(0.1) {
            options.push(Action::AllIn);
        }
        let pick = self.rng.random_range(0..options.len());
        options[pick]
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Random
    }
}

/// Style knobs for [`StrengthAgent`], each in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct StrengthProfile {
    pub tightness: f64,
    pub aggression: f64,
    pub bluff: f64,
    /// Random noise added to the strength estimate.
    pub noise: f64,
    pub rng_seed: Option<u64>,
}

impl StrengthProfile {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn tight() -> Self {
        Self { tightness: 0.7, aggression: 0.5, bluff: 0.03, noise: 0.05, rng_seed: None }
    }

    pub fn loose() -> Self {
        Self { tightness: 0.3, aggression: 0.3, bluff: 0.08, noise: 0.2, rng_seed: None }
    }
}

impl Default for StrengthProfile {
    fn default() -> Self {
        Self { tightness: 0.5, aggression: 0.4, bluff: 0.05, noise: 0.12, rng_seed: None }
    }
}

/// Plays by a rough hand-strength estimate: preflop from hole-card shape, postflop from the
/// evaluator's category.
#[derive(Debug, Clone)]
pub struct StrengthAgent {
    profile: StrengthProfile,
    rng: ChaCha8Rng,
}

impl StrengthAgent {
    pub fn new(profile: StrengthProfile) -> Self {
        let rng = seeded_rng(profile.rng_seed);
        Self { profile, rng }
    }

    pub fn profile(&self) -> &StrengthProfile {
        &self.profile
    }
}

impl PlayerAgent for StrengthAgent {
    fn decide(&mut self, state: &GameState, seat: usize, legal: &LegalActions) -> Action {
        let Some(hole) = state.players().get(seat).and_then(|p| p.hole()) else {
            return passive(legal);
        };
        let noise = self.rng.random_range(-1.0..=1.0) * self.profile.noise;
        let strength = (estimate_strength(&hole, state.community_cards()) + noise).clamp(0.0, 1.0);

        let to_call = legal.call.unwrap_or(0);
        let pot_odds = if to_call == 0 {
            0.0
        } else {
            to_call as f64 / (state.pot() + to_call) as f64
        };
        let fold_below = (0.25 + self.profile.tightness * 0.3 + pot_odds * 0.3).clamp(0.05, 0.9);
        let raise_above = (0.75 - self.profile.aggression * 0.25).clamp(0.3, 0.95);

        let value = strength > raise_above && self.rng.random::<f64>() < self.profile.aggression;
        let bluff = strength < fold_below && self.rng.random::<f64>() < self.profile.bluff;
        let wants_raise = value || bluff;
        if wants_raise {
            if let Some((min, max)) = legal.raise {
                return Action::Raise { amount: raise_target(state.pot(), strength, min, max) };
            }
            if legal.all_in && strength > 0.9 {
                return Action::AllIn;
            }
        }

        if !legal.can_check && strength < fold_below {
            return Action::Fold;
        }
        passive(legal)
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Strength
    }
}

fn passive(legal: &LegalActions) -> Action {
    if legal.can_check {
        Action::Check
    } else if legal.call.is_some() {
        Action::Call
    } else {
        Action::Fold
    }
}

/// Raise total sized as a fraction of the pot, clamped to the legal range.
fn raise_target(pot: u64, strength: f64, min: u64, max: u64) -> u64 {
    let fraction = if strength > 0.85 {
        1.0
    } else if strength > 0.65 {
        0.7
    } else {
        0.5
    };
    let sized = (pot as f64 * fraction).round() as u64;
    sized.clamp(min, max)
}

/// Rough strength in `0.0..=1.0`.
pub(crate) fn estimate_strength(hole: &HoleCards, board: &Board) -> f64 {
    match evaluate(hole, board) {
        Ok(eval) => {
            let category = eval.category.ordinal() as f64 / 9.0;
            let high = eval.best_five[0].rank().value() as f64 / 14.0;
            (0.3 + category * 0.6 + high * 0.1).min(1.0)
        }
        Err(_) => preflop_strength(hole),
    }
}

fn preflop_strength(hole: &HoleCards) -> f64 {
    let a = hole.first().rank().value() as f64;
    let b = hole.second().rank().value() as f64;
    let (high, low) = if a >= b { (a, b) } else { (b, a) };
    let suited = hole.first().suit() == hole.second().suit();
    let gap = high - low;

    let mut score = (high / 14.0) * 0.5 + (low / 14.0) * 0.1;
    if gap == 0.0 {
        score += 0.3 + (high / 14.0) * 0.1;
    }
    if suited {
        score += 0.05;
    }
    if gap == 1.0 {
        score += 0.05;
    } else if gap > 4.0 {
        score -= 0.05;
    }
    score.clamp(0.0, 1.0)
}
