//! Collection of evaluation states before training.
use crate::{
    error::VizdqnError, ActionSpace, EvalStates, Game, GameSession, Observer, ScenarioPool,
};
use anyhow::Result;
use log::info;
use rand::Rng;

/// Plays `count` decision steps with uniformly random actions and returns the
/// observation of every step.
///
/// Nothing is learned. Observations are built with `observer` just as in training.
/// When an episode ends, the frame stack is cleared and the engine is reinitialized
/// with a scenario drawn from `pool`. Exactly `count` states are returned however many
/// episodes were played.
pub fn collect_eval_states<G, R>(
    session: &mut GameSession<G>,
    count: usize,
    actions: &ActionSpace,
    pool: &ScenarioPool,
    observer: &mut Observer,
    frame_repeat: usize,
    rng: &mut R,
) -> Result<EvalStates>
where
    G: Game,
    R: Rng,
{
    if actions.is_empty() {
        return Err(VizdqnError::EmptyActionSpace.into());
    }

    let mut states = Vec::with_capacity(count);
    let mut episodes = 1;
    observer.reset();
    session.game_mut()?.new_episode()?;

    while states.len() < count {
        let game = session.game_mut()?;
        states.push(observer.observe(game)?);

        let action = &actions.actions()[rng.gen_range(0..actions.len())];
        game.make_action(action, frame_repeat)?;

        if game.is_episode_finished() {
            observer.reset();
            session.switch(pool.choose(rng))?;
            session.game_mut()?.new_episode()?;
            episodes += 1;
        }
    }
    observer.reset();

    info!(
        "Collected {} evaluation states over {} episodes",
        states.len(),
        episodes
    );
    Ok(states.into())
}
