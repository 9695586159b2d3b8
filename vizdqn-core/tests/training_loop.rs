use anyhow::Result;
use rand::{rngs::SmallRng, SeedableRng};
use std::path::PathBuf;
use vizdqn_core::{
    collect_eval_states,
    dummy::{FixedQLearner, FixedQLearnerConfig, ScriptedGame, ScriptedGameConfig},
    metrics::{AVERAGE_Q, EPISODE, EPISODE_REWARD},
    record::BufferedRecorder,
    ActionSpace, EpisodeRunner, EpsilonGreedy, EpsilonSchedule, FramePreprocessor, GameSession,
    Learner, Observer, PreprocessConfig, RewardShaping, RewardShapingConfig, Scenario,
    ScenarioPool, Trainer, TrainerConfig, Transition,
};

fn preprocess_config() -> PreprocessConfig {
    PreprocessConfig {
        in_width: 32,
        in_height: 24,
        out_width: 8,
        out_height: 6,
    }
}

fn observer() -> Observer {
    Observer::new(FramePreprocessor::new(preprocess_config()), 4)
}

fn learner(q_values: Vec<f32>, loss: Option<f32>) -> FixedQLearner {
    let n = q_values.len();
    FixedQLearner::build(&FixedQLearnerConfig { q_values, loss }, [6, 8, 4], n, true).unwrap()
}

fn greedy_runner(n_actions: usize, shaping: RewardShapingConfig) -> EpisodeRunner {
    EpisodeRunner::new(
        observer(),
        EpsilonGreedy::new(EpsilonSchedule::Constant { eps: 0.0 }, n_actions),
        RewardShaping::new(shaping),
        ActionSpace::new(n_actions),
        4,
    )
}

fn pool() -> ScenarioPool {
    ScenarioPool::new(vec![
        Scenario::new("a.wad", "map01", "a.cfg"),
        Scenario::new("b.wad", "map01", "b.cfg"),
    ])
    .unwrap()
}

#[test]
fn greedy_episode_picks_best_action() -> Result<()> {
    let mut game = ScriptedGame::new(ScriptedGameConfig::default());
    let counters = game.counters();
    let mut learner = learner(vec![1.0, 2.0], None);
    let mut runner = greedy_runner(2, RewardShapingConfig::default().time_penalty(false));
    let mut rng = SmallRng::seed_from_u64(0);
    let mut frames = 0;

    let stats = runner.run(&mut game, &mut learner, &mut frames, &mut rng)?;

    assert_eq!(stats.steps, 5);
    assert!((stats.cumulative_reward - 5.0).abs() < 1e-6);
    assert_eq!(counters.borrow().actions, vec![1; 5]);
    assert!(learner.transitions().iter().all(|t| t.action.index() == 1));
    Ok(())
}

#[test]
fn terminal_next_state_is_current_state() -> Result<()> {
    let mut game = ScriptedGame::new(ScriptedGameConfig::default());
    let counters = game.counters();
    let mut learner = learner(vec![1.0, 2.0], None);
    let mut runner = greedy_runner(2, RewardShapingConfig::default());
    let mut rng = SmallRng::seed_from_u64(0);
    let mut frames = 0;

    runner.run(&mut game, &mut learner, &mut frames, &mut rng)?;

    let transitions = learner.transitions();
    let (last, rest) = transitions.split_last().unwrap();
    assert!(last.terminal);
    assert_eq!(last.next_state, last.state);
    assert!(rest.iter().all(|t| !t.terminal));

    // Two screens per non-terminal step, one for the terminal step
    assert_eq!(counters.borrow().screens, 2 * 4 + 1);

    // The next state of a step is the state of the following step
    for pair in transitions.windows(2) {
        assert_eq!(pair[0].next_state, pair[1].state);
    }
    Ok(())
}

#[test]
fn stacked_states_slide_over_frames() -> Result<()> {
    let mut game = ScriptedGame::new(ScriptedGameConfig::default());
    let mut learner = learner(vec![1.0, 2.0], None);
    let mut runner = greedy_runner(2, RewardShapingConfig::default());
    let mut rng = SmallRng::seed_from_u64(0);
    let mut frames = 0;
    runner.run(&mut game, &mut learner, &mut frames, &mut rng)?;

    let v = |step: usize| ScriptedGame::intensity(step) as f32 / 255.0;
    let channel = |t: &Transition, i: usize| t.state.frame(i)[[0, 0]];
    let transitions = learner.transitions();

    // First state of the episode: the first frame in every slot
    for i in 0..4 {
        assert!((channel(&transitions[0], i) - v(0)).abs() < 1e-6);
    }
    // Third state: [f0, f0, f1, f2]
    let expected = [v(0), v(0), v(1), v(2)];
    for (i, e) in expected.iter().enumerate() {
        assert!((channel(&transitions[2], i) - e).abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn dry_run_returns_exact_count_across_episodes() -> Result<()> {
    let config = ScriptedGameConfig {
        episode_length: 100,
        ..ScriptedGameConfig::default()
    };
    let game = ScriptedGame::new(config);
    let counters = game.counters();
    let pool = pool();
    let mut session = GameSession::open(game, &pool.scenarios()[0], "scenarios")?;
    let mut rng = SmallRng::seed_from_u64(3);
    let mut observer = observer();

    let states = collect_eval_states(
        &mut session,
        300,
        &ActionSpace::new(2),
        &pool,
        &mut observer,
        4,
        &mut rng,
    )?;

    assert_eq!(states.len(), 300);
    assert!(states.as_slice().iter().all(|s| s.shape() == [6, 8, 4]));
    let counters = counters.borrow();
    // Three episode boundaries, each followed by a close and a reinitialization
    assert_eq!(counters.inits, 4);
    assert_eq!(counters.closes, 3);
    assert_eq!(counters.episodes, 4);
    assert_eq!(counters.actions.len(), 300);
    Ok(())
}

#[test]
fn trainer_records_and_saves_every_episode() -> Result<()> {
    let config = TrainerConfig::default()
        .n_episodes(4)
        .n_eval_states(12)
        .preprocess(preprocess_config())
        .explorer(EpsilonSchedule::Constant { eps: 0.0 })
        .reward(RewardShapingConfig::default().time_penalty(false))
        .scenarios(pool().scenarios().to_vec())
        .model_dir("weights/test");
    let mut trainer = Trainer::build(config)?;
    let game = ScriptedGame::new(ScriptedGameConfig::default());
    let counters = game.counters();
    let mut session = trainer.open_session(game)?;
    let mut learner = learner(vec![1.0, 2.0], Some(0.25));
    let mut recorder = BufferedRecorder::new();

    trainer.train(&mut session, &mut learner, &mut recorder)?;

    assert_eq!(recorder.len(), 4);
    assert_eq!(recorder.scalars(EPISODE), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(recorder.scalars(EPISODE_REWARD), vec![5.0; 4]);
    assert_eq!(recorder.scalars(AVERAGE_Q), vec![2.0; 4]);
    assert_eq!(learner.persisted(), vec![PathBuf::from("weights/test"); 4]);
    assert_eq!(learner.train_steps(), 20);
    assert_eq!(trainer.frame_counter(), 20);

    // open + dry-run boundaries (12 random steps, episodes of 5) + post-dry-run switch
    // + one switch per episode
    let seen = counters.borrow().clone();
    assert_eq!(seen.inits, 1 + 2 + 1 + 4);
    assert_eq!(seen.closes, seen.inits - 1);

    drop(session);
    assert_eq!(counters.borrow().closes, seen.inits);
    Ok(())
}

#[test]
fn engine_failure_ends_run_and_releases_engine() -> Result<()> {
    let config = TrainerConfig::default()
        .n_episodes(10)
        .n_eval_states(3)
        .preprocess(preprocess_config());
    let mut trainer = Trainer::build(config)?;
    let game = ScriptedGame::new(ScriptedGameConfig {
        fail_at_action: Some(7),
        ..ScriptedGameConfig::default()
    });
    let counters = game.counters();
    let mut learner = learner(vec![1.0, 2.0], None);
    let mut recorder = BufferedRecorder::new();

    let result = {
        let mut session = trainer.open_session(game)?;
        trainer.train(&mut session, &mut learner, &mut recorder)
    };

    assert!(result.is_err());
    assert!(recorder.is_empty());
    let counters = counters.borrow();
    assert_eq!(counters.closes, counters.inits);
    Ok(())
}

fn seeded_run(seed: u64) -> Result<(vizdqn_core::dummy::Counters, Vec<f32>)> {
    let config = TrainerConfig::default()
        .n_episodes(10)
        .n_eval_states(9)
        .preprocess(preprocess_config())
        .explorer(EpsilonSchedule::Constant { eps: 0.5 })
        .scenarios(pool().scenarios().to_vec())
        .seed(seed);
    let mut trainer = Trainer::build(config)?;
    let game = ScriptedGame::new(ScriptedGameConfig {
        reward: 0.0,
        ..ScriptedGameConfig::default()
    });
    let counters = game.counters();
    let mut learner = learner(vec![1.0, 2.0], None);
    let mut recorder = BufferedRecorder::new();
    {
        let mut session = trainer.open_session(game)?;
        trainer.train(&mut session, &mut learner, &mut recorder)?;
    }
    let counters = counters.borrow().clone();
    Ok((counters, recorder.scalars(EPISODE_REWARD)))
}

#[test]
fn same_seed_gives_same_run() -> Result<()> {
    let (a, rewards_a) = seeded_run(11)?;
    let (b, rewards_b) = seeded_run(11)?;

    assert_eq!(a.actions, b.actions);
    assert_eq!(a.scenarios, b.scenarios);
    assert_eq!(rewards_a, rewards_b);

    // Exploration mixes both actions, and the pool is drawn from
    assert!(a.actions.contains(&0) && a.actions.contains(&1));
    assert!(a.scenarios.iter().any(|s| s == "a.wad"));
    assert!(a.scenarios.iter().any(|s| s == "b.wad"));
    Ok(())
}
