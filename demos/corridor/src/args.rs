use clap::Parser;
use serde::{Deserialize, Serialize};

/// Train a linear Q learner in the corridor game
#[derive(Clone, Parser, Debug, Serialize, Deserialize)]
#[command(version, about)]
pub struct Args {
    /// "train" or "show-config".
    #[arg(long, default_value = "train")]
    pub mode: String,

    /// YAML configuration. The default configuration is used if not given.
    #[arg(long)]
    pub config: Option<String>,

    /// Root directory of TensorBoard logs
    #[arg(long, default_value = "logs")]
    pub logdir: String,

    /// Overrides the number of training episodes
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Overrides the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Name of the run, used in the log directory
    #[arg(long, default_value = "corridor")]
    pub name: String,
}
