mod args;
mod config;
mod game;
mod learner;
use anyhow::Result;
use args::Args;
use clap::Parser;
use config::CorridorConfig;
use game::CorridorGame;
use learner::LinearQ;
use log::{error, info};
use vizdqn_core::{Game, Learner, Trainer};
use vizdqn_tensorboard::TensorboardRecorder;

fn train(args: &Args, config: &CorridorConfig) -> Result<()> {
    let mut trainer = Trainer::build(config.trainer.clone())?;
    let mut session = trainer.open_session(CorridorGame::new())?;
    let n_actions = session.game()?.available_buttons();
    let mut learner = LinearQ::build(&config.learner, trainer.obs_shape(), n_actions, true)?;
    let mut recorder = TensorboardRecorder::for_run(&args.logdir, &args.name)?;
    info!("Writing TensorBoard logs to {:?}", recorder.logdir());

    let result = trainer.train(&mut session, &mut learner, &mut recorder);
    if let Err(e) = &result {
        error!("Training stopped: {:#}", e);
    }
    drop(session);
    info!("Replay memory holds {} transitions", learner.memory_len());
    result
}

fn show_config(config: &CorridorConfig) -> Result<()> {
    println!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = CorridorConfig::from_args(&args)?;

    match args.mode.as_str() {
        "train" => train(&args, &config)?,
        "show-config" => show_config(&config)?,
        mode => anyhow::bail!("mode must be either 'train' or 'show-config', got '{}'", mode),
    }

    Ok(())
}
