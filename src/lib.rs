//! holdem-engine: Texas Hold'em game rules
//!
//! Goals:
//! - One hand at a time, from blinds to settlement, as a single-threaded state transformer
//! - Every mutation validated; illegal actions leave the state untouched
//! - Side pots split exactly, with the odd chip to the first winner in seat order
//! - Serializable snapshots for transports and observers
//!
//! ## Quick start: evaluate a Hold'em hand
//! ```
//! use holdem_engine::evaluator::{evaluate, Category};
//! use holdem_engine::hand::{Board, HoleCards};
//!
//! let hole: HoleCards = "As Ah".parse().unwrap();
//! let board: Board = "Kc Qd Jh 3s 2c".parse().unwrap();
//!
//! let eval = evaluate(&hole, &board).unwrap();
//! assert_eq!(eval.category, Category::Pair);
//! assert_eq!(eval.description(), "Pair of Aces");
//! ```
//!
//! ## Quick start: play a hand
//! ```
//! use holdem_engine::betting::Action;
//! use holdem_engine::game::{Game, HandSetup, Seat};
//! use holdem_engine::state::{Phase, PlayerId};
//!
//! let seats = vec![Seat::new("a", "Alice", 1000), Seat::new("b", "Bob", 1000)];
//! let mut game = Game::new();
//! game.start_hand(HandSetup::new(seats, 10, 20).with_seed(1)).unwrap();
//!
//! // Heads-up the dealer posts the small blind and acts first.
//! game.apply(&PlayerId::from("a"), Action::Call).unwrap();
//! let state = game.apply(&PlayerId::from("b"), Action::Check).unwrap();
//! assert_eq!(state.phase(), Phase::Flop);
//! assert_eq!(state.community_cards().len(), 3);
//! assert_eq!(state.pot(), 40);
//! ```
//!
//! ## Simulator
//! ```sh
//! cargo run --bin holdem -- --hands 10 --players 4 --seed 7
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod logging;
pub mod settlement;
pub mod state;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
