//! Per-episode metrics.
use crate::record::{Record, RecordValue};
use std::time::Duration;

/// Key of the episode index in records.
pub const EPISODE: &str = "episode";

/// Key of the average max Q-value over the evaluation states.
pub const AVERAGE_Q: &str = "average_q";

/// Key of the cumulative shaped reward.
pub const EPISODE_REWARD: &str = "episode_reward";

/// Key of the loss averaged over decision steps.
pub const AVERAGE_LOSS: &str = "average_loss";

/// Key of the wall-clock duration in seconds.
pub const DURATION_SECS: &str = "duration_secs";

/// Summary of one training episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeMetrics {
    /// Episode index, from 0.
    pub index: usize,

    /// Sum of shaped rewards.
    pub cumulative_reward: f32,

    /// Sum of training losses over the number of decision steps.
    pub average_loss: f32,

    /// Average max Q-value over the evaluation states after the episode.
    pub average_q: f32,

    /// Wall-clock duration of the episode.
    pub duration: Duration,
}

impl EpisodeMetrics {
    /// Converts the metrics into a record for a [`Recorder`](crate::record::Recorder).
    pub fn into_record(self) -> Record {
        Record::from_slice(&[
            (EPISODE, RecordValue::Scalar(self.index as f32)),
            (AVERAGE_Q, RecordValue::Scalar(self.average_q)),
            (EPISODE_REWARD, RecordValue::Scalar(self.cumulative_reward)),
            (AVERAGE_LOSS, RecordValue::Scalar(self.average_loss)),
            (DURATION_SECS, RecordValue::Scalar(self.duration.as_secs_f32())),
        ])
    }
}
