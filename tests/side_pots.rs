use holdem_engine::betting::Action;
use holdem_engine::game::{Game, HandSetup, Seat};
use holdem_engine::state::{Phase, PlayerId};

fn seats(stacks: &[u64]) -> Vec<Seat> {
    stacks.iter().enumerate().map(|(i, &c)| Seat::new(format!("p{i}"), format!("P{i}"), c)).collect()
}

fn id(i: usize) -> PlayerId {
    PlayerId::new(format!("p{i}"))
}

#[test]
fn three_way_all_in_builds_main_and_side_pot() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[50, 150, 300]), 5, 10).with_seed(31)).unwrap();
    g.apply(&id(0), Action::AllIn).unwrap();
    g.apply(&id(1), Action::AllIn).unwrap();
    let s = g.apply(&id(2), Action::Call).unwrap();

    assert_eq!(s.phase(), Phase::Finished);
    let settlement = s.result().unwrap();
    let amounts: Vec<u64> = settlement.side_pots.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![150, 200]);
    assert_eq!(settlement.side_pots[0].eligible_players, vec![id(0), id(1), id(2)]);
    assert_eq!(settlement.side_pots[1].eligible_players, vec![id(1), id(2)]);
    assert_eq!(settlement.total_paid(), 350);

    // p2 never risked the last 150 chips.
    let chips: u64 = s.players().iter().map(|p| p.chips()).sum();
    assert_eq!(chips, 500);
    assert!(g.player(&id(2)).unwrap().chips() >= 150);
}

#[test]
fn uncalled_excess_comes_back_as_its_own_pot() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[50, 150, 300]), 5, 10).with_seed(32)).unwrap();
    g.apply(&id(0), Action::AllIn).unwrap();
    g.apply(&id(1), Action::AllIn).unwrap();
    let s = g.apply(&id(2), Action::AllIn).unwrap();

    let settlement = s.result().unwrap();
    let amounts: Vec<u64> = settlement.side_pots.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![150, 200, 150]);
    assert_eq!(settlement.side_pots[2].eligible_players, vec![id(2)]);
    assert_eq!(settlement.side_pots[2].winners, vec![id(2)]);
    assert_eq!(settlement.total_paid(), 500);
}

#[test]
fn folded_chips_stay_in_the_pot_without_eligibility() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[1000, 1000, 100]), 10, 20).with_seed(33)).unwrap();
    // p0 raises and later folds to the all-in; p1 and p2 see it through.
    g.apply(&id(0), Action::Raise { amount: 60 }).unwrap();
    g.apply(&id(1), Action::Call).unwrap();
    g.apply(&id(2), Action::AllIn).unwrap();
    g.apply(&id(0), Action::Fold).unwrap();
    let s = g.apply(&id(1), Action::Call).unwrap();

    // p1 is the only player left who can bet, so the board runs out.
    assert_eq!(s.phase(), Phase::Finished);
    let settlement = s.result().unwrap();
    // One pot per contribution level: 60 from everyone, then 40 more from the two contenders.
    let amounts: Vec<u64> = settlement.side_pots.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![180, 80]);
    for pot in &settlement.side_pots {
        assert_eq!(pot.eligible_players, vec![id(1), id(2)]);
    }
    assert_eq!(settlement.total_paid(), 260);
    assert!(settlement.player_results[0].evaluation.is_none());
    assert_eq!(settlement.winnings_of(&id(0)), 0);
}

#[test]
fn uncontested_pot_has_one_entry_and_no_showdown() {
    let mut g = Game::new();
    g.start_hand(HandSetup::new(seats(&[500, 500, 500]), 10, 20).with_seed(34)).unwrap();
    g.apply(&id(0), Action::Raise { amount: 80 }).unwrap();
    g.apply(&id(1), Action::Fold).unwrap();
    let s = g.apply(&id(2), Action::Fold).unwrap();

    let settlement = s.result().unwrap();
    assert_eq!(settlement.winners, vec![id(0)]);
    assert_eq!(settlement.side_pots.len(), 1);
    assert_eq!(settlement.side_pots[0].amount, 110);
    assert!(settlement.player_results.iter().all(|r| r.evaluation.is_none()));
    assert_eq!(g.player(&id(0)).unwrap().chips(), 530);
}
