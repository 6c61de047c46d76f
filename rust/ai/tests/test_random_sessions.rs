use derby_ai::{create_mover, create_strategy, AgentSettings, StrategyKind};
use derby_engine::connect_four::{ConnectFour, COLUMNS, ROWS};
use derby_engine::env::Environment;
use derby_engine::stages::build_pipeline;
use derby_engine::wager::Resolution;

fn settings(seed: u64) -> [AgentSettings; 2] {
    [
        AgentSettings::new("A", StrategyKind::Random).with_seed(seed),
        AgentSettings::new("B", StrategyKind::Random).with_seed(seed + 1000),
    ]
}

#[test]
fn random_games_always_finish_with_consistent_rounds() {
    for seed in 0..50u64 {
        let [a, b] = settings(seed);
        let mut movers = [create_mover(&a).unwrap(), create_mover(&b).unwrap()];
        let mut env = build_pipeline(
            ConnectFour::new(),
            [create_strategy(&a).unwrap(), create_strategy(&b).unwrap()],
            ["A".into(), "B".into()],
            None,
            std::io::sink(),
        );
        env.reset();

        let mut moves = 0;
        let outcome = loop {
            let (player, observation) = env.observation();
            let legal = env.legal_actions();
            let mv = movers[player].choose_move(&observation, &legal).unwrap();
            let outcome = env.step(&mv).unwrap();
            moves += 1;
            if outcome.done {
                break outcome;
            }
            assert!(moves <= ROWS * COLUMNS);
        };

        let rounds = env.inner().rounds();
        for r in rounds {
            let expected_pot = match r.resolution {
                Resolution::Checked => 0,
                Resolution::Folded => 1,
                Resolution::Called => 2,
                Resolution::InvalidDecision => panic!("random agents never misbehave"),
            };
            assert_eq!(r.pot, expected_pot);
            assert!(r.decisions.len() <= 2);
        }
        // a fold can only be the last round of a game
        for r in rounds.iter().rev().skip(1) {
            assert_ne!(r.resolution, Resolution::Folded);
        }
        if let Some(last) = rounds.last().filter(|r| r.resolution == Resolution::Folded) {
            assert_eq!(outcome.winners.unwrap().players, vec![last.active]);
        }
    }
}

#[test]
fn seeded_sessions_replay_identically() {
    let run = |seed: u64| {
        let [a, b] = settings(seed);
        let mut movers = [create_mover(&a).unwrap(), create_mover(&b).unwrap()];
        let mut out = Vec::new();
        {
            let mut env = build_pipeline(
                ConnectFour::new(),
                [create_strategy(&a).unwrap(), create_strategy(&b).unwrap()],
                ["A".into(), "B".into()],
                None,
                &mut out,
            );
            env.reset();
            loop {
                let (player, observation) = env.observation();
                let legal = env.legal_actions();
                let mv = movers[player].choose_move(&observation, &legal).unwrap();
                if env.step(&mv).unwrap().done {
                    break;
                }
            }
        }
        String::from_utf8(out).unwrap()
    };
    assert_eq!(run(7), run(7));
}
