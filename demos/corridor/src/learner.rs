//! A linear Q-function trained by minibatch SGD on the one-step target.
use anyhow::{anyhow, Result};
use log::info;
use ndarray::{Array1, Array2};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    fs::File,
    io::BufWriter,
    path::Path,
};
use vizdqn_core::{Learner, ObsShape, StackedObs, Transition};

pub(crate) const PARAMS_FILE: &str = "linear_q.json";

/// Configuration of [`LinearQ`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinearQConfig {
    pub learning_rate: f32,
    pub discount_factor: f32,
    pub batch_size: usize,

    /// Capacity of the replay memory. The oldest transitions are dropped first.
    pub replay_capacity: usize,

    /// No training step is taken before this many transitions are stored.
    pub warmup: usize,

    pub seed: u64,
}

impl Default for LinearQConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            discount_factor: 0.99,
            batch_size: 32,
            replay_capacity: 10000,
            warmup: 256,
            seed: 42,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Params {
    weights: Array2<f32>,
    bias: Array1<f32>,
}

/// `Q(s, a) = w_a . s + b_a` over the flattened stacked observation.
pub struct LinearQ {
    config: LinearQConfig,
    params: Params,
    memory: VecDeque<Transition>,
    rng: SmallRng,
    train: bool,
}

impl LinearQ {
    fn features(&self, state: &StackedObs) -> Result<Array1<f32>> {
        let x = state.as_array().iter().cloned().collect::<Array1<f32>>();
        if x.len() != self.params.weights.ncols() {
            return Err(anyhow!(
                "observation has {} values, expected {}",
                x.len(),
                self.params.weights.ncols()
            ));
        }
        Ok(x)
    }

    fn q(&self, x: &Array1<f32>) -> Array1<f32> {
        self.params.weights.dot(x) + &self.params.bias
    }

    /// Number of transitions in the replay memory.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }
}

impl Learner for LinearQ {
    type Config = LinearQConfig;

    fn build(config: &Self::Config, obs_shape: ObsShape, n_actions: usize, train: bool) -> Result<Self> {
        if n_actions == 0 || config.batch_size == 0 {
            return Err(anyhow!("n_actions and batch_size must be positive"));
        }
        let n_features = obs_shape.iter().product();
        info!(
            "Linear Q-function with {} actions over {} features",
            n_actions, n_features
        );

        Ok(Self {
            config: config.clone(),
            params: Params {
                weights: Array2::zeros((n_actions, n_features)),
                bias: Array1::zeros(n_actions),
            },
            memory: VecDeque::with_capacity(config.replay_capacity),
            rng: SmallRng::seed_from_u64(config.seed),
            train,
        })
    }

    fn q_values(&self, states: &[StackedObs]) -> Result<Vec<Vec<f32>>> {
        states
            .iter()
            .map(|s| Ok(self.q(&self.features(s)?).to_vec()))
            .collect()
    }

    fn record(&mut self, transition: Transition) {
        if !self.train || self.config.replay_capacity == 0 {
            return;
        }
        if self.memory.len() == self.config.replay_capacity {
            self.memory.pop_front();
        }
        self.memory.push_back(transition);
    }

    fn train_step(&mut self) -> Result<Option<f32>> {
        let batch_size = self.config.batch_size;
        if !self.train || self.memory.len() < self.config.warmup.max(batch_size) {
            return Ok(None);
        }

        let mut grad_w = Array2::<f32>::zeros(self.params.weights.dim());
        let mut grad_b = Array1::<f32>::zeros(self.params.bias.dim());
        let mut loss = 0.0;

        for _ in 0..batch_size {
            let ix = self.rng.gen_range(0..self.memory.len());
            let t = &self.memory[ix];
            let a = t.action.index();
            let x = self.features(&t.state)?;

            let target = if t.terminal {
                t.reward
            } else {
                let next_q = self.q(&self.features(&t.next_state)?);
                t.reward + self.config.discount_factor * next_q.fold(f32::MIN, |m, &v| m.max(v))
            };
            let err = self.params.weights.row(a).dot(&x) + self.params.bias[a] - target;
            loss += err * err;

            grad_w.row_mut(a).scaled_add(err, &x);
            grad_b[a] += err;
        }

        let step = self.config.learning_rate / batch_size as f32;
        self.params.weights.scaled_add(-step, &grad_w);
        self.params.bias.scaled_add(-step, &grad_b);

        Ok(Some(loss / batch_size as f32))
    }

    fn persist(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        let file = File::create(path.join(PARAMS_FILE))?;
        serde_json::to_writer(BufWriter::new(file), &self.params)?;
        Ok(())
    }
}
