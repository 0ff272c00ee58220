use holdem_engine::betting::{Action, ActionError};
use holdem_engine::game::{EngineError, Game, HandSetup, Seat};
use holdem_engine::state::{LastAction, Phase, PlayerId};

fn id(s: &str) -> PlayerId {
    PlayerId::from(s)
}

fn seats(stacks: &[(&str, u64)]) -> Vec<Seat> {
    stacks.iter().map(|&(n, c)| Seat::new(n, n.to_uppercase(), c)).collect()
}

/// Check the street down with whoever is on turn.
fn check_down(game: &mut Game, street: Phase) {
    while game.state().is_some_and(|s| s.phase() == street) {
        let who = game.current_player().unwrap().id().clone();
        game.apply(&who, Action::Check).unwrap();
    }
}

#[test]
fn heads_up_check_down_to_showdown() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[("a", 1000), ("b", 1000)]), 10, 20).with_seed(5)).unwrap();
    g.apply(&id("a"), Action::Call).unwrap();
    g.apply(&id("b"), Action::Check).unwrap();

    for (street, cards) in [(Phase::Flop, 3), (Phase::Turn, 4), (Phase::River, 5)] {
        let s = g.state().unwrap();
        assert_eq!(s.phase(), street);
        assert_eq!(s.community_cards().len(), cards);
        assert_eq!(s.pot(), 40);
        check_down(&mut g, street);
    }

    let s = g.state().unwrap();
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.pot(), 0);
    let settlement = s.result().unwrap();
    assert_eq!(settlement.total_paid(), 40);
    assert!(settlement.player_results.iter().all(|r| r.evaluation.is_some()));
    let chips: u64 = s.players().iter().map(|p| p.chips()).sum();
    assert_eq!(chips, 2000);
}

#[test]
fn short_all_in_does_not_reopen_raising() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[("a", 1000), ("b", 1000), ("c", 130)]), 10, 20).with_seed(12))
        .unwrap();
    // a opens, b (small blind) calls, c (big blind) shoves 130: short of a full raise to 200.
    g.apply(&id("a"), Action::Raise { amount: 100 }).unwrap();
    g.apply(&id("b"), Action::Call).unwrap();
    let s = g.apply(&id("c"), Action::AllIn).unwrap();
    assert_eq!(s.current_bet(), 130);
    assert_eq!(s.players_acted_this_round(), &[true, true, true]);
    assert_eq!(s.players()[2].last_action(), Some(LastAction::AllIn { amount: 130 }));

    let legal = g.legal_actions(&id("a")).unwrap();
    assert_eq!(legal.call, Some(30));
    assert_eq!(legal.raise, None);
    assert!(!legal.all_in);
    assert_eq!(
        g.apply(&id("a"), Action::Raise { amount: 300 }).unwrap_err(),
        EngineError::Action(ActionError::BettingNotReopened)
    );

    g.apply(&id("a"), Action::Call).unwrap();
    let s = g.apply(&id("b"), Action::Call).unwrap();
    assert_eq!(s.phase(), Phase::Flop);
    assert_eq!(s.pot(), 390);
}

#[test]
fn full_all_in_raise_reopens_action() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[("a", 1000), ("b", 1000), ("c", 500)]), 10, 20).with_seed(3))
        .unwrap();
    g.apply(&id("a"), Action::Raise { amount: 100 }).unwrap();
    g.apply(&id("b"), Action::Call).unwrap();
    g.apply(&id("c"), Action::AllIn).unwrap();
    let legal = g.legal_actions(&id("a")).unwrap();
    assert_eq!(legal.raise, Some((1000, 1000)));
    assert!(legal.all_in);
}

#[test]
fn all_in_players_run_the_board_out() {
    let mut g = Game::new();
    let s = g
        .start_hand(HandSetup::new(seats(&[("a", 300), ("b", 300)]), 10, 20).with_seed(77))
        .unwrap();
    assert_eq!(s.phase(), Phase::Preflop);
    g.apply(&id("a"), Action::AllIn).unwrap();
    let s = g.apply(&id("b"), Action::Call).unwrap();
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.community_cards().len(), 5);
    let chips: u64 = s.players().iter().map(|p| p.chips()).sum();
    assert_eq!(chips, 600);
    assert_eq!(s.result().unwrap().total_paid(), 600);
}

#[test]
fn actions_after_the_hand_are_rejected() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[("a", 100), ("b", 100)]), 5, 10).with_seed(1)).unwrap();
    g.apply(&id("a"), Action::Fold).unwrap();
    assert_eq!(
        g.apply(&id("b"), Action::Check).unwrap_err(),
        EngineError::Action(ActionError::HandNotInProgress(Phase::Finished))
    );
    assert!(!g.can_perform(&id("b"), &Action::Check));
    assert!(Game::new().apply(&id("a"), Action::Fold).is_err());
}

#[test]
fn illegal_actions_name_the_problem() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[("a", 1000), ("b", 1000), ("c", 1000)]), 10, 20).with_seed(2))
        .unwrap();
    let cases = [
        (id("b"), Action::Call, ActionError::NotYourTurn(id("b"))),
        (id("z"), Action::Call, ActionError::UnknownPlayer(id("z"))),
        (id("a"), Action::Check, ActionError::CannotCheck { to_call: 20 }),
        (id("a"), Action::Raise { amount: 30 }, ActionError::AmountTooSmall { min: 40, got: 30 }),
        (id("a"), Action::Raise { amount: 5000 }, ActionError::AmountTooLarge { max: 1000, got: 5000 }),
    ];
    for (who, action, expected) in cases {
        assert_eq!(g.apply(&who, action).unwrap_err(), EngineError::Action(expected));
    }
    assert!(g.can_perform(&id("a"), &Action::Raise { amount: 40 }));
    assert_eq!(g.state().unwrap().pot(), 30);
}
